//! `led-ctl` — command-line producer for the LED coordinator.
//!
//! Thin wrapper over the client library so operators and shell scripts can
//! submit any protocol command: `led-ctl symbol error --duration 5`,
//! `led-ctl progress 80`, `led-ctl layout payload.json`, `led-ctl test`.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use core_client::LedClient;
use core_model::{Animation, LayoutPayload, Priority, Rgb, Symbol};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "led-ctl", version, about = "Send commands to the LED coordinator")]
struct Args {
    /// Socket path override (also: LED_SOCKET_PATH).
    #[arg(long)]
    socket: Option<PathBuf>,
    /// Command priority.
    #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
    priority: PriorityArg,
    /// Log instead of sending (also: LED_MOCK_MODE).
    #[arg(long)]
    mock: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show a static symbol (wifi, wifi_error, tunnel, discord, check,
    /// error, hourglass, dot, all_on, connected).
    Symbol {
        name: String,
        /// Display duration in seconds.
        #[arg(long)]
        duration: Option<f64>,
        /// Override color as r,g,b.
        #[arg(long)]
        color: Option<String>,
    },
    /// Start an animation (boot, wifi_searching, activity, idle).
    Animation {
        name: String,
        /// Cap in seconds for looping animations.
        #[arg(long)]
        duration: Option<f64>,
        /// Per-frame delay in seconds.
        #[arg(long)]
        frame_delay: Option<f64>,
    },
    /// Show the legacy progress bar (0..=100).
    Progress { percentage: i64 },
    /// Show a hierarchical layout from a JSON payload file (`-` for stdin).
    Layout { file: String },
    /// Stop the running animation.
    Stop,
    /// Blank the panel.
    Clear,
    /// Run the built-in self test (blocks the display while it runs).
    Test,
    /// Shut the coordinator down.
    Shutdown,
}

fn parse_symbol(name: &str) -> Result<Symbol> {
    Symbol::ALL
        .into_iter()
        .find(|s| s.wire_name() == name)
        .ok_or_else(|| anyhow!("unknown symbol {name:?}"))
}

fn parse_animation(name: &str) -> Result<Animation> {
    Animation::ALL
        .into_iter()
        .find(|a| a.wire_name() == name)
        .ok_or_else(|| anyhow!("unknown animation {name:?}"))
}

fn parse_color(spec: &str) -> Result<Rgb> {
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() != 3 {
        return Err(anyhow!("color must be r,g,b"));
    }
    let channel = |s: &str| s.trim().parse::<u8>().context("color channel 0..=255");
    Ok(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

fn load_payload(file: &str) -> Result<LayoutPayload> {
    let raw = if file == "-" {
        std::io::read_to_string(std::io::stdin()).context("read payload from stdin")?
    } else {
        std::fs::read_to_string(file).with_context(|| format!("read payload file {file}"))?
    };
    serde_json::from_str(&raw).context("parse layout payload")
}

fn seconds(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.0))
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();
    let mut client = match (&args.socket, args.mock) {
        (Some(path), true) => LedClient::mock(path),
        (Some(path), false) => LedClient::new(path),
        (None, true) => LedClient::mock(core_config::DEFAULT_SOCKET_PATH),
        (None, false) => LedClient::from_env(),
    };
    client.set_priority(args.priority.into());

    match args.command {
        Cmd::Symbol {
            name,
            duration,
            color,
        } => {
            let symbol = parse_symbol(&name)?;
            let color = color.as_deref().map(parse_color).transpose()?;
            client.show_symbol(symbol, duration.map(seconds), color)?;
        }
        Cmd::Animation {
            name,
            duration,
            frame_delay,
        } => {
            let animation = parse_animation(&name)?;
            client.show_animation(
                animation,
                duration.map(seconds),
                frame_delay.map(seconds),
            )?;
        }
        Cmd::Progress { percentage } => client.show_progress(percentage)?,
        Cmd::Layout { file } => client.show_layout(&load_payload(&file)?)?,
        Cmd::Stop => client.stop_animation()?,
        Cmd::Clear => client.clear()?,
        Cmd::Test => client.run_test()?,
        Cmd::Shutdown => client.shutdown()?,
    }
    println!("ok");
    Ok(())
}

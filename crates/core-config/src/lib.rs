//! Configuration loading for the LED coordinator.
//!
//! Two layers live here:
//! * [`PanelConfig`] — hardware knobs parsed from `led-manager.toml`. A
//!   missing or malformed file falls back to defaults; unknown keys are
//!   ignored with one warning each; out-of-range values are clamped (the raw
//!   file is never trusted by the driver).
//! * [`Settings`] — the merged runtime configuration: CLI overrides beat the
//!   `LED_SOCKET_PATH` / `LED_MOCK_MODE` environment, which beats defaults.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};
use tracing::{info, warn};

/// Default IPC socket path; producers connect here unless overridden.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/led-manager.sock";

const SOCKET_PATH_ENV: &str = "LED_SOCKET_PATH";
const MOCK_MODE_ENV: &str = "LED_MOCK_MODE";

/// Keys recognized in `led-manager.toml`. Anything else draws a warning.
const KNOWN_KEYS: [&str; 8] = [
    "matrix_rows",
    "matrix_cols",
    "hardware_mapping",
    "gpio_slowdown",
    "pwm_bits",
    "brightness",
    "parallel_chains",
    "chain_length",
];

/// Wiring variant of the HUB75 adapter board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardwareMapping {
    Regular,
    AdafruitHat,
}

impl HardwareMapping {
    /// Name understood by the matrix driver library.
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareMapping::Regular => "regular",
            HardwareMapping::AdafruitHat => "adafruit-hat",
        }
    }
}

/// Hardware knobs for the matrix chain. All values are clamped to the ranges
/// the driver accepts before use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub matrix_rows: u32,
    pub matrix_cols: u32,
    pub hardware_mapping: HardwareMapping,
    pub gpio_slowdown: u32,
    pub pwm_bits: u32,
    pub brightness: u32,
    pub parallel_chains: u32,
    pub chain_length: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            matrix_rows: 64,
            matrix_cols: 64,
            hardware_mapping: HardwareMapping::Regular,
            gpio_slowdown: 1,
            pwm_bits: 11,
            brightness: 100,
            parallel_chains: 1,
            chain_length: 1,
        }
    }
}

impl PanelConfig {
    /// Clamp every knob into its accepted range, logging each adjustment.
    pub fn clamped(mut self) -> Self {
        self.gpio_slowdown = clamp_knob("gpio_slowdown", self.gpio_slowdown, 0, 4);
        self.pwm_bits = clamp_knob("pwm_bits", self.pwm_bits, 1, 11);
        self.brightness = clamp_knob("brightness", self.brightness, 0, 100);
        self.parallel_chains = clamp_knob("parallel_chains", self.parallel_chains, 1, 16);
        self.chain_length = clamp_knob("chain_length", self.chain_length, 1, 32);
        self
    }
}

fn clamp_knob(name: &str, raw: u32, min: u32, max: u32) -> u32 {
    let clamped = raw.clamp(min, max);
    if clamped != raw {
        warn!(target: "config", key = name, raw, clamped, "panel_knob_clamped");
    }
    clamped
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("led-manager.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("led-manager").join("led-manager.toml");
    }
    PathBuf::from("led-manager.toml")
}

/// Load and clamp the panel config. Missing file or parse failure yields the
/// defaults; the daemon must come up even with a broken config on disk.
pub fn load_panel_config(path: Option<PathBuf>) -> Result<PanelConfig> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => {
            info!(target: "config", path = %path.display(), "panel_config_missing_using_defaults");
            return Ok(PanelConfig::default());
        }
    };
    warn_unknown_keys(&content);
    match toml::from_str::<PanelConfig>(&content) {
        Ok(config) => Ok(config.clamped()),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "panel_config_parse_failed_using_defaults");
            Ok(PanelConfig::default())
        }
    }
}

fn warn_unknown_keys(content: &str) {
    let Ok(table) = content.parse::<toml::Table>() else {
        return;
    };
    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(target: "config", key = key.as_str(), "panel_config_unknown_key_ignored");
        }
    }
}

/// CLI-provided overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub socket_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub mock_mode: bool,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub socket_path: PathBuf,
    pub mock_mode: bool,
    pub panel: PanelConfig,
}

impl Settings {
    /// Merge CLI > environment > defaults and load the panel config.
    pub fn resolve(overrides: Overrides) -> Result<Settings> {
        let socket_path = overrides
            .socket_path
            .or_else(|| env::var_os(SOCKET_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH));
        let mock_mode = overrides.mock_mode || env_truthy(MOCK_MODE_ENV);
        let panel = load_panel_config(overrides.config_path)?;
        info!(
            target: "config",
            socket = %socket_path.display(),
            mock_mode,
            rows = panel.matrix_rows,
            cols = panel.matrix_cols,
            "settings_resolved"
        );
        Ok(Settings {
            socket_path,
            mock_mode,
            panel,
        })
    }
}

fn env_truthy(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}

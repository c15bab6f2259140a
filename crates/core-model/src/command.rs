//! Command records and the closed symbol / animation sets.

use crate::layout::LayoutPayload;
use crate::{Percent, Priority, Rgb};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static scenes drawn by a pure renderer function. Closed set; the wire
/// protocol rejects anything else as `InvalidParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Wifi,
    WifiError,
    Tunnel,
    Discord,
    Check,
    Error,
    Hourglass,
    Dot,
    AllOn,
    Connected,
}

impl Symbol {
    pub const ALL: [Symbol; 10] = [
        Symbol::Wifi,
        Symbol::WifiError,
        Symbol::Tunnel,
        Symbol::Discord,
        Symbol::Check,
        Symbol::Error,
        Symbol::Hourglass,
        Symbol::Dot,
        Symbol::AllOn,
        Symbol::Connected,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Symbol::Wifi => "wifi",
            Symbol::WifiError => "wifi_error",
            Symbol::Tunnel => "tunnel",
            Symbol::Discord => "discord",
            Symbol::Check => "check",
            Symbol::Error => "error",
            Symbol::Hourglass => "hourglass",
            Symbol::Dot => "dot",
            Symbol::AllOn => "all_on",
            Symbol::Connected => "connected",
        }
    }
}

/// Finite or looping scenes owned by the animation engine. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    Boot,
    WifiSearching,
    Activity,
    Idle,
}

impl Animation {
    pub const ALL: [Animation; 4] = [
        Animation::Boot,
        Animation::WifiSearching,
        Animation::Activity,
        Animation::Idle,
    ];

    /// Finite animations exit after the last frame; looping ones wrap.
    pub fn is_looping(&self) -> bool {
        !matches!(self, Animation::Boot)
    }

    /// Number of distinct frames before the index wraps (or the thread exits).
    pub fn frame_count(&self) -> u64 {
        match self {
            Animation::Boot => 40,
            Animation::WifiSearching => 3,
            Animation::Activity => 2,
            Animation::Idle => 8,
        }
    }

    pub fn default_frame_delay(&self) -> Duration {
        match self {
            Animation::Boot => Duration::from_millis(50),
            Animation::WifiSearching => Duration::from_millis(400),
            Animation::Activity => Duration::from_millis(500),
            Animation::Idle => Duration::from_millis(300),
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Animation::Boot => "boot",
            Animation::WifiSearching => "wifi_searching",
            Animation::Activity => "activity",
            Animation::Idle => "idle",
        }
    }
}

/// The operation a producer asked for, with its validated payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    ShowSymbol {
        symbol: Symbol,
        duration: Duration,
        color: Option<Rgb>,
    },
    ShowAnimation {
        animation: Animation,
        duration: Option<Duration>,
        frame_delay: Option<Duration>,
    },
    ShowProgress {
        percentage: Percent,
    },
    ShowLayout {
        payload: LayoutPayload,
    },
    StopAnimation,
    Clear,
    Test,
    Shutdown,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::ShowSymbol { .. } => "show_symbol",
            CommandKind::ShowAnimation { .. } => "show_animation",
            CommandKind::ShowProgress { .. } => "show_progress",
            CommandKind::ShowLayout { .. } => "show_layout",
            CommandKind::StopAnimation => "stop_animation",
            CommandKind::Clear => "clear",
            CommandKind::Test => "test",
            CommandKind::Shutdown => "shutdown",
        }
    }
}

/// A queued unit of work. Created when a request is accepted, consumed at
/// dispatch; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub priority: Priority,
    /// Server-assigned connection id, used for reply routing and log
    /// correlation.
    pub client_id: u64,
}

impl Command {
    /// Builds a command, applying the priority floor: control commands that
    /// must not queue behind display traffic are always `High`.
    pub fn new(kind: CommandKind, requested: Priority, client_id: u64) -> Self {
        let priority = match kind {
            CommandKind::StopAnimation | CommandKind::Shutdown => Priority::High,
            _ => requested,
        };
        Self {
            kind,
            priority,
            client_id,
        }
    }
}

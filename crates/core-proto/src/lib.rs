//! The wire protocol: newline-delimited JSON over a local stream socket.
//!
//! Requests look like
//! `{"command": "show_symbol", "priority": "HIGH", "params": {...}}` and
//! every request gets exactly one response
//! `{"success": true, "message": "...", "error": null}`.
//!
//! Validation happens here, before anything reaches the queue: an unknown
//! `command` is `InvalidCommand`, everything else wrong with a line
//! (malformed JSON, bad params shape, unknown symbol names, negative
//! durations) is `InvalidParams`. The coordinator worker only ever sees
//! well-formed [`Command`]s.

use core_model::{
    Animation, Command, CommandKind, LayoutPayload, Percent, Priority, Rgb, Symbol,
    DEFAULT_SYMBOL_DURATION,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Closed set of protocol error codes. Wire form matches the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidCommand,
    InvalidParams,
    QueueFull,
    NotRunning,
    HardwareUnavailable,
}

/// One decoded request line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub params: Value,
}

/// One response line. `NotRunning` pairs with `success: true` — stopping an
/// idle animation is informational, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorCode>,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: Some(code),
        }
    }

    pub fn err(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(code),
        }
    }

    /// Serialize as one protocol line, newline included.
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self).expect("response serialization");
        line.push('\n');
        line
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::UnknownCommand(_) => ErrorCode::InvalidCommand,
            DecodeError::InvalidParams(_) | DecodeError::Malformed(_) => ErrorCode::InvalidParams,
        }
    }

    pub fn to_response(&self) -> Response {
        Response::err(self.to_string(), self.code())
    }
}

// Param payloads, one per command that takes any.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowSymbolParams {
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowAnimationParams {
    pub animation: Animation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_delay: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowProgressParams {
    pub percentage: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowLayoutParams {
    pub payload: LayoutPayload,
}

/// Decode one raw request line into a queueable command.
pub fn decode_line(line: &str, client_id: u64) -> Result<Command, DecodeError> {
    let request: Request =
        serde_json::from_str(line).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode_request(&request, client_id)
}

/// Decode an already-parsed request. Split from [`decode_line`] so the client
/// library round-trips through the same validation.
pub fn decode_request(request: &Request, client_id: u64) -> Result<Command, DecodeError> {
    let kind = match request.command.as_str() {
        "show_symbol" => {
            let params: ShowSymbolParams = parse_params(&request.params)?;
            CommandKind::ShowSymbol {
                symbol: params.symbol,
                duration: match params.duration {
                    Some(secs) => seconds(secs)?,
                    None => DEFAULT_SYMBOL_DURATION,
                },
                color: params.color,
            }
        }
        "show_animation" => {
            let params: ShowAnimationParams = parse_params(&request.params)?;
            CommandKind::ShowAnimation {
                animation: params.animation,
                duration: params.duration.map(seconds).transpose()?,
                frame_delay: params.frame_delay.map(seconds).transpose()?,
            }
        }
        "show_progress" => {
            let params: ShowProgressParams = parse_params(&request.params)?;
            CommandKind::ShowProgress {
                percentage: params.percentage,
            }
        }
        "show_layout" => {
            let params: ShowLayoutParams = parse_params(&request.params)?;
            let mut payload = params.payload;
            payload.normalize();
            CommandKind::ShowLayout { payload }
        }
        "stop_animation" => CommandKind::StopAnimation,
        "clear" => CommandKind::Clear,
        "test" => CommandKind::Test,
        "shutdown" => CommandKind::Shutdown,
        other => return Err(DecodeError::UnknownCommand(other.to_string())),
    };
    Ok(Command::new(
        kind,
        request.priority.unwrap_or_default(),
        client_id,
    ))
}

fn parse_params<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, DecodeError> {
    serde_json::from_value(params.clone()).map_err(|e| DecodeError::InvalidParams(e.to_string()))
}

fn seconds(value: f64) -> Result<Duration, DecodeError> {
    if !value.is_finite() || value < 0.0 || value > 3600.0 {
        return Err(DecodeError::InvalidParams(format!(
            "duration {value} out of range"
        )));
    }
    Ok(Duration::from_secs_f64(value))
}

//! Producer-facing client for the LED coordinator.
//!
//! A thin, strictly typed facade over the line protocol: lazy connection,
//! up to three connect attempts with reconnect on a broken pipe, and a
//! per-command acknowledgment timeout. Parameters are validated and clamped
//! locally (via the shared model types) before a byte hits the socket, so a
//! well-typed call never earns an `InvalidParams` from the server.
//!
//! `LedClient::mock(..)` turns every method into a logged no-op returning
//! success — producers keep their call sites when the daemon is absent.

use core_model::{Animation, LayoutPayload, Percent, Priority, Rgb, Symbol};
use core_proto::{
    decode_request, ErrorCode, Request, Response, ShowAnimationParams, ShowLayoutParams,
    ShowProgressParams, ShowSymbolParams,
};
use serde_json::Value;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// End-to-end acknowledgment timeout. A timed-out command may still execute
/// server-side.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);
const CONNECT_ATTEMPTS: u32 = 3;
const RECONNECT_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connect to {path:?} failed after {attempts} attempts: {source}")]
    Connect {
        path: PathBuf,
        attempts: u32,
        source: std::io::Error,
    },
    #[error("no acknowledgment within {0:?}")]
    Timeout(Duration),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed response: {0}")]
    Protocol(String),
    #[error("rejected by coordinator: {message}")]
    Rejected {
        code: Option<ErrorCode>,
        message: String,
    },
}

pub struct LedClient {
    socket_path: PathBuf,
    stream: Option<BufReader<UnixStream>>,
    timeout: Duration,
    priority: Priority,
    mock: bool,
}

impl LedClient {
    /// Client for an explicit socket path. No connection is made until the
    /// first command.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            stream: None,
            timeout: COMMAND_TIMEOUT,
            priority: Priority::default(),
            mock: false,
        }
    }

    /// Client honoring `LED_SOCKET_PATH` / `LED_MOCK_MODE`, like the daemon.
    pub fn from_env() -> Self {
        let settings = core_config::Overrides::default();
        match core_config::Settings::resolve(settings) {
            Ok(resolved) if resolved.mock_mode => Self::mock(resolved.socket_path),
            Ok(resolved) => Self::new(resolved.socket_path),
            Err(_) => Self::new(core_config::DEFAULT_SOCKET_PATH),
        }
    }

    /// Every method becomes a logged no-op returning success.
    pub fn mock(socket_path: impl Into<PathBuf>) -> Self {
        let mut client = Self::new(socket_path);
        client.mock = true;
        client
    }

    /// Priority attached to commands sent through the convenience methods.
    pub fn set_priority(&mut self, priority: Priority) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Override the acknowledgment timeout (tests mostly).
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    // -- transport ---------------------------------------------------------

    fn connect(&mut self) -> Result<(), ClientError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let mut last_err = None;
        for attempt in 1..=CONNECT_ATTEMPTS {
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    debug!(
                        target: "client",
                        path = %self.socket_path.display(),
                        attempt,
                        "connected"
                    );
                    self.stream = Some(BufReader::new(stream));
                    return Ok(());
                }
                Err(e) => {
                    debug!(target: "client", attempt, error = %e, "connect_failed");
                    last_err = Some(e);
                    std::thread::sleep(RECONNECT_BACKOFF);
                }
            }
        }
        Err(ClientError::Connect {
            path: self.socket_path.clone(),
            attempts: CONNECT_ATTEMPTS,
            source: last_err
                .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "no attempt made")),
        })
    }

    fn send_once(&mut self, line: &str) -> Result<Response, ClientError> {
        self.connect()?;
        let reader = self.stream.as_mut().expect("stream after connect");
        reader.get_mut().write_all(line.as_bytes())?;

        let mut response_line = String::new();
        let read = reader.read_line(&mut response_line).map_err(|e| {
            if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::Io(e)
            }
        })?;
        if read == 0 {
            return Err(ClientError::Io(ErrorKind::BrokenPipe.into()));
        }
        serde_json::from_str(response_line.trim_end())
            .map_err(|e| ClientError::Protocol(e.to_string()))
    }

    /// Send a raw request and return the coordinator's acknowledgment.
    /// Reconnects once on a broken connection; timeouts are surfaced, not
    /// retried (the command may already be executing).
    pub fn send(&mut self, request: &Request) -> Result<Response, ClientError> {
        if self.mock {
            debug!(
                target: "client.mock",
                command = request.command.as_str(),
                params = %request.params,
                "mock_send"
            );
            return Ok(Response::ok("mock mode"));
        }
        // client-side validation: reject locally what the server would
        decode_request(request, 0).map_err(|e| ClientError::Rejected {
            code: Some(e.code()),
            message: e.to_string(),
        })?;

        let mut line = serde_json::to_string(request)
            .map_err(|e| ClientError::Protocol(e.to_string()))?;
        line.push('\n');

        match self.send_once(&line) {
            Ok(response) => Ok(response),
            Err(ClientError::Io(e)) => {
                warn!(target: "client", error = %e, "connection_lost_reconnecting");
                self.stream = None;
                self.send_once(&line)
            }
            Err(other) => Err(other),
        }
    }

    fn execute(&mut self, command: &str, params: Value) -> Result<(), ClientError> {
        let request = Request {
            command: command.to_string(),
            priority: Some(self.priority),
            params,
        };
        let response = self.send(&request)?;
        if response.success {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                code: response.error,
                message: response.message,
            })
        }
    }

    fn to_params<T: serde::Serialize>(params: &T) -> Result<Value, ClientError> {
        serde_json::to_value(params).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    // -- typed commands ----------------------------------------------------

    pub fn show_symbol(
        &mut self,
        symbol: Symbol,
        duration: Option<Duration>,
        color: Option<Rgb>,
    ) -> Result<(), ClientError> {
        let params = ShowSymbolParams {
            symbol,
            duration: duration.map(|d| d.as_secs_f64()),
            color,
        };
        self.execute("show_symbol", Self::to_params(&params)?)
    }

    pub fn show_animation(
        &mut self,
        animation: Animation,
        duration: Option<Duration>,
        frame_delay: Option<Duration>,
    ) -> Result<(), ClientError> {
        let params = ShowAnimationParams {
            animation,
            duration: duration.map(|d| d.as_secs_f64()),
            frame_delay: frame_delay.map(|d| d.as_secs_f64()),
        };
        self.execute("show_animation", Self::to_params(&params)?)
    }

    /// Legacy single-percentage bar. The value is clamped locally.
    pub fn show_progress(&mut self, percentage: i64) -> Result<(), ClientError> {
        let params = ShowProgressParams {
            percentage: Percent::new(percentage),
        };
        self.execute("show_progress", Self::to_params(&params)?)
    }

    /// Hierarchical scene. The payload is normalized locally before sending.
    pub fn show_layout(&mut self, payload: &LayoutPayload) -> Result<(), ClientError> {
        let mut payload = payload.clone();
        payload.normalize();
        let params = ShowLayoutParams { payload };
        self.execute("show_layout", Self::to_params(&params)?)
    }

    pub fn stop_animation(&mut self) -> Result<(), ClientError> {
        self.execute("stop_animation", Value::Null)
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.execute("clear", Value::Null)
    }

    /// Run the coordinator's built-in self test (blocks the display for a
    /// while; the ack itself returns immediately on enqueue).
    pub fn run_test(&mut self) -> Result<(), ClientError> {
        self.execute("test", Value::Null)
    }

    pub fn shutdown(&mut self) -> Result<(), ClientError> {
        self.execute("shutdown", Value::Null)
    }

    // -- per-scene sugar ---------------------------------------------------

    pub fn show_wifi(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Wifi, None, None)
    }

    pub fn show_wifi_error(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::WifiError, None, None)
    }

    pub fn show_tunnel(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Tunnel, None, None)
    }

    pub fn show_discord(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Discord, None, None)
    }

    pub fn show_check(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Check, None, None)
    }

    pub fn show_error(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Error, None, None)
    }

    pub fn show_hourglass(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Hourglass, None, None)
    }

    pub fn show_dot(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Dot, None, None)
    }

    pub fn show_all_on(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::AllOn, None, None)
    }

    pub fn show_connected(&mut self) -> Result<(), ClientError> {
        self.show_symbol(Symbol::Connected, None, None)
    }

    pub fn start_boot_animation(&mut self) -> Result<(), ClientError> {
        self.show_animation(Animation::Boot, None, None)
    }

    pub fn start_wifi_searching(&mut self) -> Result<(), ClientError> {
        self.show_animation(Animation::WifiSearching, None, None)
    }

    pub fn start_activity(&mut self) -> Result<(), ClientError> {
        self.show_animation(Animation::Activity, None, None)
    }

    pub fn start_idle(&mut self) -> Result<(), ClientError> {
        self.show_animation(Animation::Idle, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// One-connection fake coordinator: answers every line with a canned
    /// response and counts requests.
    fn fake_server(
        path: &std::path::Path,
        response: Response,
    ) -> (std::thread::JoinHandle<Vec<String>>, Arc<AtomicU64>) {
        let listener = UnixListener::bind(path).unwrap();
        let counter = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&counter);
        let handle = std::thread::spawn(move || {
            let mut received = Vec::new();
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                received.push(line.trim_end().to_string());
                seen.fetch_add(1, Ordering::SeqCst);
                reader
                    .get_mut()
                    .write_all(response.to_line().as_bytes())
                    .unwrap();
            }
            received
        });
        (handle, counter)
    }

    fn socket_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("led.sock")
    }

    #[test]
    fn commands_round_trip_through_a_server() {
        let dir = tempfile::tempdir().unwrap();
        let path = socket_path(&dir);
        let (server, _) = fake_server(&path, Response::ok("queued"));

        let mut client = LedClient::new(&path);
        client.show_progress(150).unwrap(); // clamped locally
        client.show_wifi().unwrap();
        client.clear().unwrap();
        drop(client);

        let received = server.join().unwrap();
        assert_eq!(received.len(), 3);
        assert!(received[0].contains("\"show_progress\""));
        assert!(received[0].contains("\"percentage\":100"));
        assert!(received[1].contains("\"symbol\":\"wifi\""));
        assert!(received[2].contains("\"clear\""));
    }

    #[test]
    fn rejection_surfaces_code_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = socket_path(&dir);
        let (_server, _) = fake_server(
            &path,
            Response::err("queue full (64 pending commands)", ErrorCode::QueueFull),
        );

        let mut client = LedClient::new(&path);
        let err = client.show_dot().unwrap_err();
        match err {
            ClientError::Rejected { code, .. } => assert_eq!(code, Some(ErrorCode::QueueFull)),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn invalid_input_fails_locally_without_a_connection() {
        // nothing listening at this path, so a send attempt would error
        let mut client = LedClient::new("/tmp/definitely-not-bound.sock");
        let request = Request {
            command: "warp".into(),
            priority: None,
            params: Value::Null,
        };
        match client.send(&request).unwrap_err() {
            ClientError::Rejected { code, .. } => {
                assert_eq!(code, Some(ErrorCode::InvalidCommand));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn connect_failure_reports_attempt_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = LedClient::new(dir.path().join("absent.sock"));
        match client.show_dot().unwrap_err() {
            ClientError::Connect { attempts, .. } => assert_eq!(attempts, CONNECT_ATTEMPTS),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ack_timeout_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = socket_path(&dir);
        // server accepts but never answers
        let listener = UnixListener::bind(&path).unwrap();
        let _server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_secs(5));
            drop(stream);
        });

        let mut client = LedClient::new(&path);
        client.set_timeout(Duration::from_millis(100));
        match client.show_dot().unwrap_err() {
            ClientError::Timeout(t) => assert_eq!(t, Duration::from_millis(100)),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn mock_mode_is_a_logged_no_op() {
        let mut client = LedClient::mock("/tmp/unused.sock");
        client.show_wifi().unwrap();
        client.show_progress(-50).unwrap();
        client.run_test().unwrap();
        client.shutdown().unwrap();
    }
}

//! Unix-socket IPC server: one accept thread, one reader thread per
//! connection.
//!
//! Framing is newline-delimited JSON; each request gets exactly one response
//! line. A malformed or invalid message earns an error response and the
//! connection is closed — later bytes on that connection are not processed.
//! Valid commands are enqueued (with the animation preemption hook) and
//! acknowledged immediately; the worker never talks back to producers.

use crate::coordinator::submit;
use anyhow::{Context, Result};
use core_anim::AnimationEngine;
use core_queue::CommandQueue;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
    queue: Arc<CommandQueue>,
    engine: Arc<AnimationEngine>,
    next_client_id: AtomicU64,
}

impl IpcServer {
    /// Bind the socket, replacing a stale file from a previous run. The
    /// socket is world-writable so unprivileged producers can connect.
    /// Bind failure is fatal to startup.
    pub fn bind(
        socket_path: &Path,
        queue: Arc<CommandQueue>,
        engine: Arc<AnimationEngine>,
    ) -> Result<Self> {
        if socket_path.exists() {
            info!(target: "ipc", path = %socket_path.display(), "removing_stale_socket");
            std::fs::remove_file(socket_path)
                .with_context(|| format!("remove stale socket {}", socket_path.display()))?;
        }
        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("bind socket {}", socket_path.display()))?;
        std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o666))
            .with_context(|| format!("chmod socket {}", socket_path.display()))?;
        info!(target: "ipc", path = %socket_path.display(), "listening");
        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
            queue,
            engine,
            next_client_id: AtomicU64::new(1),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Accept loop. Individual accept failures are logged and absorbed;
    /// the loop itself only ends with the process.
    pub fn run(self: Arc<Self>) {
        for incoming in self.listener.incoming() {
            match incoming {
                Ok(stream) => {
                    let client_id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
                    let queue = Arc::clone(&self.queue);
                    let engine = Arc::clone(&self.engine);
                    let spawned = std::thread::Builder::new()
                        .name(format!("led-conn-{client_id}"))
                        .spawn(move || {
                            if let Err(e) = handle_connection(stream, client_id, &queue, &engine) {
                                debug!(target: "ipc", client = client_id, error = %e, "connection_error");
                            }
                        });
                    if let Err(e) = spawned {
                        warn!(target: "ipc", error = %e, "connection_thread_spawn_failed");
                    }
                }
                Err(e) => {
                    warn!(target: "ipc", error = %e, "accept_failed");
                }
            }
        }
    }

    /// `run` on a background thread.
    pub fn spawn(self: Arc<Self>) -> std::thread::JoinHandle<()> {
        std::thread::Builder::new()
            .name("led-accept".into())
            .spawn(move || self.run())
            .expect("spawn accept thread")
    }
}

fn handle_connection(
    stream: UnixStream,
    client_id: u64,
    queue: &CommandQueue,
    engine: &AnimationEngine,
) -> Result<()> {
    debug!(target: "ipc", client = client_id, "connected");
    let mut writer = stream.try_clone().context("clone connection stream")?;
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        let line = line.context("read request line")?;
        if line.trim().is_empty() {
            continue;
        }
        match core_proto::decode_line(&line, client_id) {
            Ok(command) => {
                let response = submit(queue, engine, command);
                writer
                    .write_all(response.to_line().as_bytes())
                    .context("write response")?;
            }
            Err(e) => {
                debug!(
                    target: "ipc",
                    client = client_id,
                    error = %e,
                    "request_rejected_closing"
                );
                let _ = writer.write_all(e.to_response().to_line().as_bytes());
                break;
            }
        }
    }
    debug!(target: "ipc", client = client_id, "disconnected");
    Ok(())
}

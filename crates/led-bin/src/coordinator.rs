//! The coordinator core: one worker thread serializing every render.
//!
//! Dispatch contract:
//! * static symbol scenes stop the animation, present, then hold the worker
//!   for the symbol's display duration so lower-priority traffic cannot
//!   immediately overwrite an urgent glyph;
//! * progress/layout scenes present and return immediately;
//! * animations are handed to the engine and run asynchronously;
//! * `Shutdown` stops everything, clears the panel and ends the loop.
//!
//! `submit` is the enqueue-side half used by connection threads: it
//! validates queue pressure, applies the preemption hook, and produces the
//! acknowledgment for the producer.

use core_anim::AnimationEngine;
use core_model::{Animation, Command, CommandKind, Percent, Priority, Symbol};
use core_panel::Panel;
use core_proto::{ErrorCode, Response};
use core_queue::{CommandQueue, QueueError};
use core_render::{render_layout, render_progress, render_symbol};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Dwell times for the built-in self test.
const TEST_SYMBOL_DWELL: Duration = Duration::from_secs(2);
const TEST_ANIMATION_DWELL: Duration = Duration::from_millis(2500);
const TEST_PROGRESS_DWELL: Duration = Duration::from_millis(400);

/// Enqueue a decoded command and build its acknowledgment.
///
/// Runs on connection threads: never blocks. A `StopAnimation` with nothing
/// running is acknowledged as informational `NotRunning` without queueing.
pub fn submit(queue: &CommandQueue, engine: &AnimationEngine, command: Command) -> Response {
    if matches!(command.kind, CommandKind::StopAnimation) && !engine.is_running() {
        return Response::ok_with("no animation running", ErrorCode::NotRunning);
    }
    let priority = command.priority;
    let name = command.kind.name();
    match queue.push(command) {
        Ok(()) => {
            engine.preempt_if_below(priority);
            Response::ok(format!("{name} queued"))
        }
        Err(QueueError::Full { capacity }) => Response::err(
            format!("queue full ({capacity} pending commands)"),
            ErrorCode::QueueFull,
        ),
        Err(QueueError::Closed) => {
            Response::err("coordinator shutting down", ErrorCode::QueueFull)
        }
    }
}

pub struct Coordinator {
    queue: Arc<CommandQueue>,
    engine: Arc<AnimationEngine>,
    panel: Arc<dyn Panel>,
}

impl Coordinator {
    pub fn new(
        queue: Arc<CommandQueue>,
        engine: Arc<AnimationEngine>,
        panel: Arc<dyn Panel>,
    ) -> Self {
        Self {
            queue,
            engine,
            panel,
        }
    }

    /// Dispatch loop. Returns after a `Shutdown` command or once the queue
    /// is closed and drained.
    pub fn run(&self) {
        info!(target: "worker", "dispatch_loop_started");
        while let Some(command) = self.queue.pop() {
            debug!(
                target: "worker",
                command = command.kind.name(),
                priority = ?command.priority,
                client = command.client_id,
                "dispatch"
            );
            if !self.dispatch(command) {
                break;
            }
        }
        info!(target: "worker", "dispatch_loop_exited");
    }

    fn dispatch(&self, command: Command) -> bool {
        match command.kind {
            CommandKind::ShowSymbol {
                symbol,
                duration,
                color,
            } => {
                self.engine.stop();
                self.panel.present(&render_symbol(symbol, color));
                // hold the display window; lower-priority work waits in queue
                std::thread::sleep(duration);
            }
            CommandKind::ShowProgress { percentage } => {
                self.engine.stop();
                self.panel.present(&render_progress(percentage));
            }
            CommandKind::ShowLayout { payload } => {
                self.engine.stop();
                self.panel.present(&render_layout(&payload));
            }
            CommandKind::ShowAnimation {
                animation,
                duration,
                frame_delay,
            } => {
                self.engine.start(
                    Arc::clone(&self.panel),
                    animation,
                    command.priority,
                    duration,
                    frame_delay,
                );
            }
            CommandKind::StopAnimation => {
                self.engine.stop();
            }
            CommandKind::Clear => {
                self.engine.stop();
                self.panel.clear();
            }
            CommandKind::Test => self.run_test_sequence(),
            CommandKind::Shutdown => {
                self.engine.stop();
                self.panel.clear();
                self.queue.close();
                return false;
            }
        }
        true
    }

    /// Built-in diagnostic: every symbol, every animation, the progress
    /// ramp, then a clear. Blocks the worker for the whole sequence.
    fn run_test_sequence(&self) {
        info!(target: "worker", "self_test_started");
        self.engine.stop();
        for symbol in Symbol::ALL {
            self.panel.present(&render_symbol(symbol, None));
            std::thread::sleep(TEST_SYMBOL_DWELL);
        }
        for animation in Animation::ALL {
            self.engine.start(
                Arc::clone(&self.panel),
                animation,
                Priority::Low,
                None,
                None,
            );
            std::thread::sleep(TEST_ANIMATION_DWELL);
            self.engine.stop();
        }
        for step in [0, 25, 50, 75, 100] {
            self.panel.present(&render_progress(Percent::new(step)));
            std::thread::sleep(TEST_PROGRESS_DWELL);
        }
        self.panel.clear();
        info!(target: "worker", "self_test_finished");
    }
}

//! Bounded, priority-ordered command queue.
//!
//! One lane per priority; `pop` always yields the oldest command of the
//! highest non-empty lane, so FIFO order holds within a priority and higher
//! priorities overtake lower ones. `push` never blocks — producers get an
//! immediate `Full` error instead of backpressure, because a producer stuck
//! on a display daemon would be worse than a dropped frame of status.
//!
//! Shutdown: `close()` wakes all waiting consumers; `pop` drains whatever is
//! already queued, then returns `None`. Pushes after close fail.

use core_model::{Command, Priority};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue full ({capacity} pending commands)")]
    Full { capacity: usize },
    #[error("queue closed")]
    Closed,
}

#[derive(Default)]
struct QueueState {
    /// Index 0 = Low, 1 = Medium, 2 = High.
    lanes: [VecDeque<Command>; 3],
    len: usize,
    closed: bool,
}

impl QueueState {
    fn take_highest(&mut self) -> Option<Command> {
        for lane in self.lanes.iter_mut().rev() {
            if let Some(cmd) = lane.pop_front() {
                self.len -= 1;
                return Some(cmd);
            }
        }
        None
    }

    fn head_priority(&self) -> Option<Priority> {
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .find(|p| !self.lanes[*p as usize].is_empty())
    }
}

pub struct CommandQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    capacity: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Enqueue without blocking. Fails when the bound is reached or the
    /// queue has been closed.
    pub fn push(&self, command: Command) -> Result<(), QueueError> {
        let mut state = self.state.lock().expect("queue state poisoned");
        if state.closed {
            return Err(QueueError::Closed);
        }
        if state.len >= self.capacity {
            debug!(
                target: "queue",
                capacity = self.capacity,
                command = command.kind.name(),
                "push_rejected_full"
            );
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        state.lanes[command.priority as usize].push_back(command);
        state.len += 1;
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Block until a command is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn pop(&self) -> Option<Command> {
        let mut state = self.state.lock().expect("queue state poisoned");
        loop {
            if let Some(command) = state.take_highest() {
                return Some(command);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .expect("queue state poisoned");
        }
    }

    /// Non-blocking variant used by tests and the drain path.
    pub fn try_pop(&self) -> Option<Command> {
        self.state
            .lock()
            .expect("queue state poisoned")
            .take_highest()
    }

    /// Priority of the head command, if any.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.state
            .lock()
            .expect("queue state poisoned")
            .head_priority()
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("queue state poisoned").len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting commands and wake every blocked consumer.
    pub fn close(&self) {
        let mut state = self.state.lock().expect("queue state poisoned");
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }
}

//! Hardware abstraction for the matrix panel.
//!
//! One trait at the seam: [`Panel`] exposes `present` (atomically replace the
//! panel contents) and `clear`. Runtime calls never fail — transient device
//! errors are absorbed and logged inside the backend so a wobbly panel cannot
//! crash the coordinator. Only construction can fail, with
//! [`PanelError::HardwareInit`].
//!
//! Two backends:
//! * [`MockPanel`] — records calls for tests and no-hardware deployments.
//! * `Hub75Panel` (cargo feature `hub75`) — the physical chain.

use core_model::{Frame, PANEL_HEIGHT, PANEL_WIDTH};
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "hub75")]
mod hub75;
#[cfg(feature = "hub75")]
pub use hub75::Hub75Panel;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("hardware init failed: {0}")]
    HardwareInit(String),
}

/// The panel contract. Implementations are shared between the coordinator
/// worker and the animation thread (which never run a render concurrently),
/// so all methods take `&self`.
pub trait Panel: Send + Sync {
    /// Atomically replace the panel contents with `frame`. Must not fail;
    /// backends log and absorb device errors.
    fn present(&self, frame: &Frame);

    /// Blank the panel. Equivalent to presenting an all-black frame.
    fn clear(&self);
}

const MOCK_HISTORY_CAP: usize = 32;

#[derive(Default)]
struct MockState {
    last: Option<Frame>,
    history: VecDeque<Frame>,
    presents: u64,
    clears: u64,
}

/// Recording backend for tests and `LED_MOCK_MODE` deployments. Keeps the
/// last frame, a bounded history, and call counters.
#[derive(Default)]
pub struct MockPanel {
    state: Mutex<MockState>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.state.lock().expect("mock panel poisoned").last.clone()
    }

    pub fn present_count(&self) -> u64 {
        self.state.lock().expect("mock panel poisoned").presents
    }

    pub fn clear_count(&self) -> u64 {
        self.state.lock().expect("mock panel poisoned").clears
    }

    /// Most recent frames, oldest first. Bounded at `MOCK_HISTORY_CAP`.
    pub fn history(&self) -> Vec<Frame> {
        self.state
            .lock()
            .expect("mock panel poisoned")
            .history
            .iter()
            .cloned()
            .collect()
    }
}

impl Panel for MockPanel {
    fn present(&self, frame: &Frame) {
        let mut state = self.state.lock().expect("mock panel poisoned");
        state.presents += 1;
        if state.history.len() == MOCK_HISTORY_CAP {
            state.history.pop_front();
        }
        state.history.push_back(frame.clone());
        state.last = Some(frame.clone());
        debug!(
            target: "panel.mock",
            presents = state.presents,
            lit_rows = frame.lit_rows(),
            "present"
        );
        trace!(target: "panel.mock", dump = %frame.render_ascii(), "frame_dump");
    }

    fn clear(&self) {
        let mut state = self.state.lock().expect("mock panel poisoned");
        state.clears += 1;
        state.last = Some(Frame::black());
        debug!(target: "panel.mock", clears = state.clears, "clear");
    }
}

/// Sanity guard used by backends that address a fixed 64x64 module.
pub fn expects_single_module(rows: u32, cols: u32) -> bool {
    rows == PANEL_HEIGHT as u32 && cols == PANEL_WIDTH as u32
}

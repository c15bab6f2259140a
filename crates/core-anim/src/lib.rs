//! The animation engine: at most one looping/finite scene thread.
//!
//! Lifecycle: `start` cancels whatever is running, then spawns a dedicated
//! thread that renders frame `i`, presents it, and sleeps the frame delay.
//! Cancellation is cooperative — the flag is checked between frames and a
//! frame already presenting is allowed to finish. `stop` waits a bounded
//! 200 ms for the thread to exit; on timeout the leak is logged and the
//! caller proceeds (the stale thread still honors its cancel flag, so it
//! exits at its next frame boundary and never touches the panel again after
//! the worker's next present... in practice the window is one `present`).
//!
//! The running animation carries the priority of the command that started
//! it; `preempt_if_below` lets the enqueue path signal cancellation without
//! blocking when something more urgent arrives.

use core_model::{Animation, Priority};
use core_panel::Panel;
use core_render::animation_frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Bounded wait for the frame thread to exit after cancellation.
pub const SHUTDOWN_WAIT: Duration = Duration::from_millis(200);
const SHUTDOWN_POLL: Duration = Duration::from_millis(5);

struct ActiveAnimation {
    animation: Animation,
    priority: Priority,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the single animation slot. Shared between the coordinator worker
/// (start/stop) and connection threads (preemption), hence interior locking.
#[derive(Default)]
pub struct AnimationEngine {
    active: Mutex<Option<ActiveAnimation>>,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current animation (if any) with `animation`. The previous
    /// thread is stopped first, so at most one frame thread exists.
    pub fn start(
        &self,
        panel: Arc<dyn Panel>,
        animation: Animation,
        priority: Priority,
        duration: Option<Duration>,
        frame_delay: Option<Duration>,
    ) {
        self.stop();
        let cancel = Arc::new(AtomicBool::new(false));
        let delay = frame_delay.unwrap_or_else(|| animation.default_frame_delay());
        let thread_cancel = Arc::clone(&cancel);
        let spawned = std::thread::Builder::new()
            .name("led-anim".into())
            .spawn(move || run_frames(panel, animation, delay, duration, thread_cancel));
        match spawned {
            Ok(handle) => {
                debug!(
                    target: "anim",
                    animation = animation.wire_name(),
                    delay_ms = delay.as_millis() as u64,
                    "animation_started"
                );
                *self.active.lock().expect("animation slot poisoned") = Some(ActiveAnimation {
                    animation,
                    priority,
                    cancel,
                    handle,
                });
            }
            Err(e) => {
                warn!(target: "anim", error = %e, "animation_spawn_failed");
            }
        }
    }

    /// Cancel and join the running animation within the bounded window.
    /// Returns `false` when nothing was running.
    pub fn stop(&self) -> bool {
        let taken = self.active.lock().expect("animation slot poisoned").take();
        let Some(active) = taken else {
            return false;
        };
        active.cancel.store(true, Ordering::Relaxed);
        let deadline = Instant::now() + SHUTDOWN_WAIT;
        while !active.handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(SHUTDOWN_POLL);
        }
        if active.handle.is_finished() {
            let _ = active.handle.join();
            debug!(
                target: "anim",
                animation = active.animation.wire_name(),
                "animation_stopped"
            );
        } else {
            warn!(
                target: "anim",
                animation = active.animation.wire_name(),
                waited_ms = SHUTDOWN_WAIT.as_millis() as u64,
                "animation_thread_leaked"
            );
        }
        true
    }

    /// Signal cancellation iff the running animation is strictly less urgent
    /// than `priority`. Non-blocking; safe from connection threads.
    pub fn preempt_if_below(&self, priority: Priority) {
        if let Some(active) = &*self.active.lock().expect("animation slot poisoned") {
            if active.priority < priority && !active.handle.is_finished() {
                active.cancel.store(true, Ordering::Relaxed);
                debug!(
                    target: "anim",
                    animation = active.animation.wire_name(),
                    "animation_preempt_signaled"
                );
            }
        }
    }

    /// Priority of the live animation. A thread that already exited on its
    /// own (finite animation) is reaped here and reports `None`.
    pub fn running_priority(&self) -> Option<Priority> {
        let mut slot = self.active.lock().expect("animation slot poisoned");
        match slot.as_ref().map(|a| (a.priority, a.handle.is_finished())) {
            Some((_, true)) => {
                if let Some(done) = slot.take() {
                    let _ = done.handle.join();
                }
                None
            }
            Some((priority, false)) => Some(priority),
            None => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_priority().is_some()
    }
}

fn run_frames(
    panel: Arc<dyn Panel>,
    animation: Animation,
    delay: Duration,
    duration: Option<Duration>,
    cancel: Arc<AtomicBool>,
) {
    let started = Instant::now();
    let mut index: u64 = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        if let Some(cap) = duration {
            if started.elapsed() >= cap {
                break;
            }
        }
        panel.present(&animation_frame(animation, index));
        index += 1;
        if !animation.is_looping() && index >= animation.frame_count() {
            break;
        }
        std::thread::sleep(delay);
    }
    debug!(
        target: "anim",
        animation = animation.wire_name(),
        frames = index,
        "animation_thread_exit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_panel::MockPanel;

    fn wait_until(mut done: impl FnMut() -> bool, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    #[test]
    fn start_and_stop_presents_frames() {
        let panel = Arc::new(MockPanel::new());
        let engine = AnimationEngine::new();
        engine.start(
            panel.clone(),
            Animation::Idle,
            Priority::Low,
            None,
            Some(Duration::from_millis(10)),
        );
        assert!(wait_until(|| panel.present_count() >= 3, Duration::from_secs(2)));
        assert!(engine.is_running());
        assert!(engine.stop());
        assert!(!engine.is_running());
        let settled = panel.present_count();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(panel.present_count(), settled, "thread kept presenting after stop");
    }

    #[test]
    fn stop_when_idle_reports_not_running() {
        let engine = AnimationEngine::new();
        assert!(!engine.stop());
    }

    #[test]
    fn replacing_an_animation_leaves_one_live_thread() {
        let panel = Arc::new(MockPanel::new());
        let engine = AnimationEngine::new();
        engine.start(
            panel.clone(),
            Animation::Idle,
            Priority::Low,
            None,
            Some(Duration::from_millis(10)),
        );
        engine.start(
            panel.clone(),
            Animation::Activity,
            Priority::Medium,
            None,
            Some(Duration::from_millis(10)),
        );
        assert_eq!(engine.running_priority(), Some(Priority::Medium));
        // old thread must be gone: presents settle once the new one stops
        assert!(engine.stop());
        let settled = panel.present_count();
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(panel.present_count(), settled);
    }

    #[test]
    fn finite_animation_exits_on_its_own() {
        let panel = Arc::new(MockPanel::new());
        let engine = AnimationEngine::new();
        engine.start(
            panel.clone(),
            Animation::Boot,
            Priority::Medium,
            None,
            Some(Duration::from_millis(1)),
        );
        assert!(wait_until(|| !engine.is_running(), Duration::from_secs(2)));
        assert_eq!(panel.present_count(), Animation::Boot.frame_count());
    }

    #[test]
    fn duration_caps_a_looping_animation() {
        let panel = Arc::new(MockPanel::new());
        let engine = AnimationEngine::new();
        engine.start(
            panel.clone(),
            Animation::Activity,
            Priority::Low,
            Some(Duration::from_millis(50)),
            Some(Duration::from_millis(10)),
        );
        assert!(wait_until(|| !engine.is_running(), Duration::from_secs(2)));
    }

    #[test]
    fn preemption_signal_stops_lower_priority_only() {
        let panel = Arc::new(MockPanel::new());
        let engine = AnimationEngine::new();
        engine.start(
            panel.clone(),
            Animation::Idle,
            Priority::Medium,
            None,
            Some(Duration::from_millis(10)),
        );
        // equal priority does not preempt
        engine.preempt_if_below(Priority::Medium);
        std::thread::sleep(Duration::from_millis(50));
        assert!(engine.is_running());
        // higher priority does
        engine.preempt_if_below(Priority::High);
        assert!(wait_until(|| !engine.is_running(), Duration::from_secs(2)));
    }
}

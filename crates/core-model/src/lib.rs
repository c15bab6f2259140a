//! Shared value types for the LED display coordinator.
//!
//! Everything in this crate is plain data: the framebuffer, the clamped
//! percentage type, command/priority records and the layout payload consumed
//! by the hierarchical scene renderers. No IO, no threads, no rendering.
//!
//! Core invariants (must hold after every public call):
//! * `Frame::set` with out-of-bounds coordinates is a silent no-op; no caller
//!   can produce an out-of-bounds pixel write.
//! * A `Percent` always holds a value in `0..=100`, including values that
//!   arrived through serde from untrusted producers.
//! * `Command::new` applies the priority floor: `StopAnimation` and
//!   `Shutdown` are `High` no matter what the caller asked for.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

mod command;
mod layout;

pub use command::{Animation, Command, CommandKind, Symbol};
pub use layout::{
    LayoutKind, LayoutPayload, ProjectSummary, SprintSummary, UserStorySummary,
    PROJECT_NAME_BUDGET,
};

/// Panel width in pixels.
pub const PANEL_WIDTH: i32 = 64;
/// Panel height in pixels. Origin is top-left; y grows downward.
pub const PANEL_HEIGHT: i32 = 64;

/// One RGB pixel, 8 bits per channel. Wire form is a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u8; 3]", from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        *self == Rgb::BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A dense 64x64 RGB framebuffer presented to the panel as one atomic frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<Rgb>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::black()
    }
}

impl Frame {
    /// All-black frame (the cleared panel state).
    pub fn black() -> Self {
        Self {
            pixels: vec![Rgb::BLACK; (PANEL_WIDTH * PANEL_HEIGHT) as usize],
        }
    }

    /// Write one pixel. Coordinates outside the panel are silently skipped.
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if (0..PANEL_WIDTH).contains(&x) && (0..PANEL_HEIGHT).contains(&y) {
            self.pixels[(y * PANEL_WIDTH + x) as usize] = color;
        }
    }

    /// Read one pixel; `None` outside the panel.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        if (0..PANEL_WIDTH).contains(&x) && (0..PANEL_HEIGHT).contains(&y) {
            Some(self.pixels[(y * PANEL_WIDTH + x) as usize])
        } else {
            None
        }
    }

    /// Fill the whole frame with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Number of rows containing at least one non-black pixel.
    pub fn lit_rows(&self) -> usize {
        self.pixels
            .chunks(PANEL_WIDTH as usize)
            .filter(|row| row.iter().any(|px| !px.is_black()))
            .count()
    }

    /// Text-art dump used by the mock panel and failing pixel tests:
    /// `.` for black, `#` for anything lit.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((PANEL_WIDTH + 1) * PANEL_HEIGHT) as usize);
        for row in self.pixels.chunks(PANEL_WIDTH as usize) {
            for px in row {
                out.push(if px.is_black() { '.' } else { '#' });
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({} lit rows)", self.lit_rows())
    }
}

/// A percentage clamped to `0..=100`.
///
/// Producers routinely send junk (negative progress, 250%, floats); every
/// constructor clamps so rendering code downstream never re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    pub fn new(value: i64) -> Self {
        Percent(value.clamp(0, 100) as u8)
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Percent(value.clamp(0.0, 100.0) as u8)
        } else {
            Percent(0)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Completion test used for checkmark substitution and completed counts.
    pub fn is_complete(&self) -> bool {
        self.0 >= 100
    }

    /// `floor(pct/100 * span)` — the shared fill rule for gauges.
    pub fn scaled(&self, span: u32) -> u32 {
        (u32::from(self.0) * span) / 100
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(Percent::from_f64(raw))
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Command urgency. Higher priorities overtake lower ones at the queue head
/// and may preempt a running animation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Low = 0,
    Medium = 1,
    High = 2,
}

/// Default on-screen duration for a static symbol scene.
pub const DEFAULT_SYMBOL_DURATION: Duration = Duration::from_secs(2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_skipped() {
        let mut frame = Frame::black();
        frame.set(-1, 0, Rgb::new(255, 0, 0));
        frame.set(64, 10, Rgb::new(255, 0, 0));
        frame.set(10, 64, Rgb::new(255, 0, 0));
        frame.set(i32::MIN, i32::MAX, Rgb::new(255, 0, 0));
        assert_eq!(frame, Frame::black());
    }

    #[test]
    fn set_then_get_round_trips_in_bounds() {
        let mut frame = Frame::black();
        frame.set(0, 0, Rgb::new(1, 2, 3));
        frame.set(63, 63, Rgb::new(4, 5, 6));
        assert_eq!(frame.get(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(frame.get(63, 63), Some(Rgb::new(4, 5, 6)));
        assert_eq!(frame.get(64, 0), None);
    }

    #[test]
    fn ascii_dump_marks_lit_pixels() {
        let mut frame = Frame::black();
        frame.set(0, 0, Rgb::new(255, 0, 0));
        let dump = frame.render_ascii();
        assert_eq!(dump.lines().count(), 64);
        assert!(dump.starts_with('#'));
        assert!(dump.lines().last().unwrap().chars().all(|c| c == '.'));
    }

    #[test]
    fn percent_clamps_all_constructors() {
        assert_eq!(Percent::new(-5).value(), 0);
        assert_eq!(Percent::new(250).value(), 100);
        assert_eq!(Percent::from_f64(f64::NAN).value(), 0);
        assert_eq!(Percent::from_f64(99.9).value(), 99);
        assert!(Percent::new(100).is_complete());
        assert!(!Percent::new(99).is_complete());
    }

    #[test]
    fn percent_deserializes_and_clamps_json_numbers() {
        let p: Percent = serde_json::from_str("150").unwrap();
        assert_eq!(p.value(), 100);
        let p: Percent = serde_json::from_str("-3.5").unwrap();
        assert_eq!(p.value(), 0);
        let p: Percent = serde_json::from_str("42").unwrap();
        assert_eq!(p.value(), 42);
    }

    #[test]
    fn percent_scaled_uses_floor() {
        assert_eq!(Percent::new(50).scaled(10), 5);
        assert_eq!(Percent::new(58).scaled(24), 13); // floor(0.58 * 24) = 13
        assert_eq!(Percent::new(99).scaled(44), 43);
        assert_eq!(Percent::new(100).scaled(44), 44);
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn priority_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        let p: Priority = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(p, Priority::Medium);
    }

    #[test]
    fn rgb_wire_form_is_an_array() {
        assert_eq!(
            serde_json::to_string(&Rgb::new(0, 100, 255)).unwrap(),
            "[0,100,255]"
        );
        let c: Rgb = serde_json::from_str("[10,20,30]").unwrap();
        assert_eq!(c, Rgb::new(10, 20, 30));
    }
}

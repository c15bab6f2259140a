//! Pure scene renderers for the 64x64 matrix.
//!
//! Every function here maps input parameters to a fully populated
//! [`Frame`](core_model::Frame); no shared state, no IO. The browser preview
//! reimplements this module, so three things in here are *normative* and must
//! not drift without a coordinated change on the preview side:
//!
//! * the 3x5 glyph table in [`glyph`],
//! * the color constants in [`color`],
//! * the scene geometries in [`layouts`], [`symbols`] and [`progress`].
//!
//! Determinism contract: for any payload, two invocations of the same
//! renderer produce identical frames. Rendering never writes out of bounds
//! (the frame silently skips such writes), so hostile payloads can at worst
//! draw garbage, never crash.
//!
//! Text coordinates: `draw_text` anchors at the top-left of the glyph row.
//! The single-view scene converts its documented bottom-edge band positions
//! into top anchors locally (see `layouts.rs`).

pub mod color;
pub mod frames;
pub mod glyph;
pub mod layouts;
pub mod primitives;
pub mod progress;
pub mod symbols;

pub use frames::animation_frame;
pub use layouts::render_layout;
pub use progress::render_progress;
pub use symbols::render_symbol;

//! Legacy full-panel progress bar.
//!
//! Producers with a single percentage and no hierarchy context get a
//! full-width vertical bar filling from the bottom. Rows keep their band
//! color regardless of fill level: the bottom third is green, the middle
//! yellow, the top red.

use crate::color::{PROGRESS_GREEN, PROGRESS_RED, PROGRESS_YELLOW};
use core_model::{Frame, Percent, Rgb, PANEL_HEIGHT, PANEL_WIDTH};

/// First row (inclusive) of the green band; rows above up to `YELLOW_TOP`
/// are yellow, the rest red.
const GREEN_TOP: i32 = 43;
const YELLOW_TOP: i32 = 21;

fn band_color(y: i32) -> Rgb {
    if y >= GREEN_TOP {
        PROGRESS_GREEN
    } else if y >= YELLOW_TOP {
        PROGRESS_YELLOW
    } else {
        PROGRESS_RED
    }
}

pub fn render_progress(percentage: Percent) -> Frame {
    let mut frame = Frame::black();
    let fill = percentage.scaled(PANEL_HEIGHT as u32) as i32;
    for y in (PANEL_HEIGHT - fill)..PANEL_HEIGHT {
        for x in 0..PANEL_WIDTH {
            frame.set(x, y, band_color(y));
        }
    }
    frame
}

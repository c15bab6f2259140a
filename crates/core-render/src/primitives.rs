//! Shared drawing primitives.
//!
//! All ranges are half-open pixel ranges. Every primitive routes through
//! `Frame::set`, so out-of-range geometry clips instead of panicking.

use crate::color::{CHECKMARK_BG, ERROR_RED, TEXT_WHITE};
use crate::glyph::{glyph, text_width, GLYPH_ADVANCE, GLYPH_WIDTH};
use core_model::{Frame, Percent, Rgb, PANEL_WIDTH};
use std::ops::Range;

/// Fill `x_range` x `y_range` solid.
pub fn fill_rect(frame: &mut Frame, x_range: Range<i32>, y_range: Range<i32>, color: Rgb) {
    for y in y_range {
        for x in x_range.clone() {
            frame.set(x, y, color);
        }
    }
}

/// 1-pixel border around `x_range` x `y_range`.
pub fn draw_outline_rect(frame: &mut Frame, x_range: Range<i32>, y_range: Range<i32>, color: Rgb) {
    if x_range.is_empty() || y_range.is_empty() {
        return;
    }
    for x in x_range.clone() {
        frame.set(x, y_range.start, color);
        frame.set(x, y_range.end - 1, color);
    }
    for y in y_range {
        frame.set(x_range.start, y, color);
        frame.set(x_range.end - 1, y, color);
    }
}

/// Vertical gauge fill: `floor(pct/100 * height)` rows from the bottom of
/// `y_range` upward.
pub fn fill_vertical_bar(
    frame: &mut Frame,
    x_range: Range<i32>,
    y_range: Range<i32>,
    percentage: Percent,
    color: Rgb,
) {
    let height = (y_range.end - y_range.start).max(0) as u32;
    let fill = percentage.scaled(height) as i32;
    fill_rect(frame, x_range, (y_range.end - fill)..y_range.end, color);
}

/// Horizontal gauge fill: `floor(pct/100 * width)` columns from the left of
/// `x_range` rightward.
pub fn fill_horizontal_bar(
    frame: &mut Frame,
    x_range: Range<i32>,
    y_range: Range<i32>,
    percentage: Percent,
    color: Rgb,
) {
    let width = (x_range.end - x_range.start).max(0) as u32;
    let fill = percentage.scaled(width) as i32;
    fill_rect(frame, x_range.start..(x_range.start + fill), y_range, color);
}

/// Draw `text` with the 3x5 table, top-left anchored at `(x, y)`. Unknown
/// glyphs advance without ink.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, color: Rgb) {
    let mut pen_x = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (dy, row) in rows.iter().enumerate() {
                for dx in 0..GLYPH_WIDTH {
                    if row & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                        frame.set(pen_x + dx, y + dy as i32, color);
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE;
    }
}

/// `draw_text` horizontally centered on the panel.
pub fn draw_text_centered(frame: &mut Frame, text: &str, y: i32, color: Rgb) {
    let x = (PANEL_WIDTH - text_width(text)) / 2;
    draw_text(frame, text, x, y, color);
}

/// Bresenham line.
pub fn draw_line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        frame.set(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc of radius `r` around `(cx, cy)`.
pub fn fill_circle(frame: &mut Frame, cx: i32, cy: i32, r: i32, color: Rgb) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                frame.set(cx + dx, cy + dy, color);
            }
        }
    }
}

/// 7x7 completion sprite: green background, white tick. `(x, y)` is the
/// top-left corner. Used wherever a bar or label reaches 100%.
pub fn draw_checkmark(frame: &mut Frame, x: i32, y: i32) {
    draw_checkmark_colored(frame, x, y, CHECKMARK_BG);
}

/// Checkmark sprite with an overridden background (the tick stays white).
pub fn draw_checkmark_colored(frame: &mut Frame, x: i32, y: i32, background: Rgb) {
    fill_rect(frame, x..x + 7, y..y + 7, background);
    for (dx, dy) in [(0, 3), (1, 4), (2, 5), (3, 4), (4, 3), (5, 2), (6, 1)] {
        frame.set(x + dx, y + dy, TEXT_WHITE);
    }
}

/// 7x7 failure sprite: red background, white X.
pub fn draw_cross(frame: &mut Frame, x: i32, y: i32) {
    draw_cross_colored(frame, x, y, ERROR_RED);
}

pub fn draw_cross_colored(frame: &mut Frame, x: i32, y: i32, background: Rgb) {
    fill_rect(frame, x..x + 7, y..y + 7, background);
    for i in 0..7 {
        frame.set(x + i, y + i, TEXT_WHITE);
        frame.set(x + 6 - i, y + i, TEXT_WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SPRINT_GREEN;

    #[test]
    fn vertical_bar_fills_bottom_up() {
        let mut frame = Frame::black();
        fill_vertical_bar(&mut frame, 10..12, 0..10, Percent::new(50), SPRINT_GREEN);
        // floor(0.5 * 10) = 5 rows: y 5..10
        for y in 0..5 {
            assert!(frame.get(10, y).unwrap().is_black(), "row {y} should be empty");
        }
        for y in 5..10 {
            assert_eq!(frame.get(10, y).unwrap(), SPRINT_GREEN, "row {y} should be filled");
        }
    }

    #[test]
    fn horizontal_bar_fills_left_to_right() {
        let mut frame = Frame::black();
        fill_horizontal_bar(&mut frame, 0..64, 0..2, Percent::new(50), SPRINT_GREEN);
        assert_eq!(frame.get(31, 0).unwrap(), SPRINT_GREEN);
        assert!(frame.get(32, 0).unwrap().is_black());
    }

    #[test]
    fn zero_and_full_bars() {
        let mut frame = Frame::black();
        fill_vertical_bar(&mut frame, 0..4, 0..10, Percent::ZERO, SPRINT_GREEN);
        assert_eq!(frame, Frame::black());
        fill_vertical_bar(&mut frame, 0..4, 0..10, Percent::FULL, SPRINT_GREEN);
        assert_eq!(frame.get(0, 0).unwrap(), SPRINT_GREEN);
        assert_eq!(frame.get(3, 9).unwrap(), SPRINT_GREEN);
    }

    #[test]
    fn outline_rect_leaves_interior_empty() {
        let mut frame = Frame::black();
        draw_outline_rect(&mut frame, 2..8, 2..8, SPRINT_GREEN);
        assert_eq!(frame.get(2, 2).unwrap(), SPRINT_GREEN);
        assert_eq!(frame.get(7, 7).unwrap(), SPRINT_GREEN);
        assert_eq!(frame.get(4, 5).unwrap(), Rgb::BLACK);
    }

    #[test]
    fn text_draws_known_and_skips_unknown() {
        let mut known = Frame::black();
        draw_text(&mut known, "A", 0, 0, TEXT_WHITE);
        assert!(known.lit_rows() > 0);

        let mut unknown = Frame::black();
        draw_text(&mut unknown, "...", 0, 0, TEXT_WHITE);
        assert_eq!(unknown, Frame::black());

        // Unknown glyphs still advance: "A" prefixed by "." lands 4 px right.
        let mut shifted = Frame::black();
        draw_text(&mut shifted, ".A", 0, 0, TEXT_WHITE);
        let mut reference = Frame::black();
        draw_text(&mut reference, "A", 4, 0, TEXT_WHITE);
        assert_eq!(shifted, reference);
    }

    #[test]
    fn checkmark_is_seven_by_seven() {
        let mut frame = Frame::black();
        draw_checkmark(&mut frame, 10, 10);
        for y in 10..17 {
            for x in 10..17 {
                assert!(!frame.get(x, y).unwrap().is_black());
            }
        }
        assert!(frame.get(9, 10).unwrap().is_black());
        assert!(frame.get(17, 10).unwrap().is_black());
        // the tick is white on green
        assert_eq!(frame.get(10, 13).unwrap(), TEXT_WHITE);
        assert_eq!(frame.get(16, 11).unwrap(), TEXT_WHITE);
    }

    #[test]
    fn line_endpoints_are_drawn() {
        let mut frame = Frame::black();
        draw_line(&mut frame, 0, 0, 10, 5, TEXT_WHITE);
        assert_eq!(frame.get(0, 0).unwrap(), TEXT_WHITE);
        assert_eq!(frame.get(10, 5).unwrap(), TEXT_WHITE);
    }

    #[test]
    fn primitives_clip_out_of_bounds() {
        let mut frame = Frame::black();
        fill_rect(&mut frame, 60..70, 60..70, TEXT_WHITE);
        draw_line(&mut frame, -10, -10, 70, 70, TEXT_WHITE);
        fill_circle(&mut frame, 0, 0, 5, TEXT_WHITE);
        draw_text(&mut frame, "CLIPPED", 58, 62, TEXT_WHITE);
        // no panic is the assertion; spot-check an in-bounds write happened
        assert_eq!(frame.get(63, 63).unwrap(), TEXT_WHITE);
    }
}

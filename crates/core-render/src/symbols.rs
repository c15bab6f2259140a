//! Status symbol scenes.
//!
//! Each symbol maps to one fixed renderer. The optional `color` override from
//! `show_symbol` replaces the symbol's primary draw color; sprite foregrounds
//! (the white tick / X) are fixed.

use crate::color::{symbol_color, SPRINT_GREEN, TEXT_WHITE};
use crate::primitives::{
    draw_checkmark_colored, draw_cross_colored, draw_line, draw_text_centered, fill_circle,
    fill_rect,
};
use core_model::{Frame, Rgb, Symbol};

/// Center of the wifi arc fan; the dot sits here, arcs open upward.
const WIFI_CENTER: (i32, i32) = (32, 46);
const WIFI_RADII: [i32; 3] = [8, 14, 20];

/// Render one symbol into a fresh frame.
pub fn render_symbol(symbol: Symbol, color: Option<Rgb>) -> Frame {
    let color = color.unwrap_or_else(|| symbol_color(symbol));
    let mut frame = Frame::black();
    match symbol {
        Symbol::Wifi => draw_wifi(&mut frame, 3, color),
        Symbol::WifiError => {
            draw_wifi(&mut frame, 3, color);
            // double-width slash across the fan
            draw_line(&mut frame, 14, 12, 50, 52, color);
            draw_line(&mut frame, 15, 12, 51, 52, color);
        }
        Symbol::Tunnel => {
            // three perspective lines converging on the vanishing point
            draw_line(&mut frame, 4, 60, 32, 18, color);
            draw_line(&mut frame, 60, 60, 32, 18, color);
            draw_line(&mut frame, 32, 63, 32, 18, color);
        }
        Symbol::Discord => {
            // simplified controller: body with two dark eyes
            fill_rect(&mut frame, 14..50, 22..42, color);
            fill_circle(&mut frame, 24, 30, 2, Rgb::BLACK);
            fill_circle(&mut frame, 40, 30, 2, Rgb::BLACK);
        }
        Symbol::Check => draw_checkmark_colored(&mut frame, 28, 28, color),
        Symbol::Error => draw_cross_colored(&mut frame, 28, 28, color),
        Symbol::Hourglass => draw_hourglass(&mut frame, color),
        Symbol::Dot => fill_circle(&mut frame, 32, 32, 3, color),
        Symbol::AllOn => frame.fill(color),
        Symbol::Connected => {
            draw_text_centered(&mut frame, "CONNECTED", 22, TEXT_WHITE);
            // oversized tick below the label
            draw_line(&mut frame, 24, 38, 29, 43, SPRINT_GREEN);
            draw_line(&mut frame, 24, 39, 29, 44, SPRINT_GREEN);
            draw_line(&mut frame, 29, 43, 40, 32, SPRINT_GREEN);
            draw_line(&mut frame, 29, 44, 40, 33, SPRINT_GREEN);
        }
    }
    frame
}

/// Wifi fan: the base dot plus `arcs` concentric quarter-arcs opening upward.
/// Shared with the `wifi_searching` animation frames.
pub fn draw_wifi(frame: &mut Frame, arcs: u32, color: Rgb) {
    let (cx, cy) = WIFI_CENTER;
    fill_circle(frame, cx, cy, 2, color);
    for radius in WIFI_RADII.iter().take(arcs as usize) {
        draw_arc(frame, cx, cy, *radius, color);
    }
}

/// Quarter-arc above `(cx, cy)`: pixels whose distance from the center is
/// within one pixel of `r`, restricted to the 90-degree cone opening upward.
fn draw_arc(frame: &mut Frame, cx: i32, cy: i32, r: i32, color: Rgb) {
    for dy in -r - 1..=0 {
        for dx in -r - 1..=r + 1 {
            if dx.abs() > -dy {
                continue; // outside the cone
            }
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if (dist - r as f64).abs() < 1.0 {
                frame.set(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Two touching triangles, filled: bulbs at top and bottom meeting at the
/// panel center.
fn draw_hourglass(frame: &mut Frame, color: Rgb) {
    for i in 0..12 {
        let half = 11 - i;
        fill_rect(frame, (32 - half)..(32 + half + 1), (20 + i)..(21 + i), color);
        fill_rect(frame, (32 - i)..(32 + i + 1), (32 + i)..(33 + i), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DISCORD_PURPLE, ERROR_RED};

    #[test]
    fn every_symbol_renders_something() {
        for symbol in Symbol::ALL {
            let frame = render_symbol(symbol, None);
            assert!(frame.lit_rows() > 0, "{symbol:?} rendered nothing");
        }
    }

    #[test]
    fn symbols_render_deterministically() {
        for symbol in Symbol::ALL {
            assert_eq!(render_symbol(symbol, None), render_symbol(symbol, None));
        }
    }

    #[test]
    fn all_on_lights_the_whole_panel() {
        let frame = render_symbol(Symbol::AllOn, None);
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(frame.get(x, y).unwrap(), TEXT_WHITE);
            }
        }
    }

    #[test]
    fn dot_is_centered_and_small() {
        let frame = render_symbol(Symbol::Dot, None);
        assert_eq!(frame.get(32, 32).unwrap(), TEXT_WHITE);
        assert!(frame.get(32, 26).unwrap().is_black());
        assert!(frame.get(26, 32).unwrap().is_black());
    }

    #[test]
    fn color_override_changes_primary_color() {
        let frame = render_symbol(Symbol::Dot, Some(ERROR_RED));
        assert_eq!(frame.get(32, 32).unwrap(), ERROR_RED);
    }

    #[test]
    fn default_colors_follow_the_table() {
        let frame = render_symbol(Symbol::Discord, None);
        assert_eq!(frame.get(20, 25).unwrap(), DISCORD_PURPLE);
        let frame = render_symbol(Symbol::WifiError, None);
        assert_eq!(frame.get(32, 46).unwrap(), ERROR_RED); // the dot
    }

    #[test]
    fn check_and_error_are_centered_sprites() {
        let check = render_symbol(Symbol::Check, None);
        assert!(!check.get(28, 28).unwrap().is_black());
        assert!(!check.get(34, 34).unwrap().is_black());
        assert!(check.get(27, 28).unwrap().is_black());
        assert!(check.get(35, 28).unwrap().is_black());

        let error = render_symbol(Symbol::Error, None);
        assert_eq!(error.get(28, 28).unwrap(), TEXT_WHITE); // X corner
        assert_eq!(error.get(34, 34).unwrap(), TEXT_WHITE);
        assert_eq!(error.get(29, 28).unwrap(), ERROR_RED);
    }

    #[test]
    fn wifi_arc_count_grows_the_fan() {
        let mut one = Frame::black();
        draw_wifi(&mut one, 1, SPRINT_GREEN);
        let mut three = Frame::black();
        draw_wifi(&mut three, 3, SPRINT_GREEN);
        // outer arc only exists in the three-arc fan
        assert!(one.get(32, 46 - 20).unwrap().is_black());
        assert_eq!(three.get(32, 46 - 20).unwrap(), SPRINT_GREEN);
    }
}

//! The closed color set shared with the browser preview.

use core_model::{Rgb, Symbol};

/// Project-level bars and the tunnel symbol.
pub const PROJECT_BLUE: Rgb = Rgb::new(0, 100, 255);
/// Sprint bars, wifi arcs, the connected tick.
pub const SPRINT_GREEN: Rgb = Rgb::new(0, 255, 0);
/// 1-pixel gauge borders.
pub const GAUGE_OUTLINE: Rgb = Rgb::new(100, 100, 100);
pub const TEXT_WHITE: Rgb = Rgb::new(255, 255, 255);
/// Background of the 7x7 completion sprite.
pub const CHECKMARK_BG: Rgb = Rgb::new(0, 200, 0);
/// Unused sprint slot in the three-column view.
pub const EMPTY_SLOT: Rgb = Rgb::new(10, 10, 10);
pub const ERROR_RED: Rgb = Rgb::new(255, 0, 0);
pub const DISCORD_PURPLE: Rgb = Rgb::new(114, 137, 218);
pub const HOURGLASS_YELLOW: Rgb = Rgb::new(255, 255, 0);

/// Cyclic user-story palette; story `n` uses `STORY_PALETTE[n % 8]`.
pub const STORY_PALETTE: [Rgb; 8] = [
    Rgb::new(0, 0, 255),     // blue
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(255, 0, 255),   // magenta
    Rgb::new(255, 165, 0),   // orange
    Rgb::new(50, 205, 50),   // lime
    Rgb::new(255, 105, 180), // pink
    Rgb::new(128, 0, 128),   // purple
];

/// Legacy progress bar bands, bottom to top.
pub const PROGRESS_GREEN: Rgb = SPRINT_GREEN;
pub const PROGRESS_YELLOW: Rgb = HOURGLASS_YELLOW;
pub const PROGRESS_RED: Rgb = ERROR_RED;

/// Default draw color for each symbol scene.
pub fn symbol_color(symbol: Symbol) -> Rgb {
    match symbol {
        Symbol::Wifi => SPRINT_GREEN,
        Symbol::WifiError => ERROR_RED,
        Symbol::Tunnel => PROJECT_BLUE,
        Symbol::Discord => DISCORD_PURPLE,
        Symbol::Check => CHECKMARK_BG,
        Symbol::Error => ERROR_RED,
        Symbol::Hourglass => HOURGLASS_YELLOW,
        Symbol::Dot => TEXT_WHITE,
        Symbol::AllOn => TEXT_WHITE,
        Symbol::Connected => SPRINT_GREEN,
    }
}

//! Frame generators for the animation engine.
//!
//! Pure `(animation, frame index) -> Frame` functions; the engine owns the
//! thread, the delay and the wrap-around, this module owns the pixels.

use crate::color::{PROJECT_BLUE, SPRINT_GREEN, TEXT_WHITE};
use crate::primitives::{
    draw_outline_rect, draw_text_centered, fill_circle, fill_horizontal_bar,
};
use crate::symbols::draw_wifi;
use core_model::{Animation, Frame, Percent};

/// Orbit offsets for the idle pixel, clockwise from twelve o'clock.
const IDLE_ORBIT: [(i32, i32); 8] = [
    (0, -10),
    (7, -7),
    (10, 0),
    (7, 7),
    (0, 10),
    (-7, 7),
    (-10, 0),
    (-7, -7),
];

/// Render one frame. `index` may exceed the animation's frame count: looping
/// animations wrap, the finite boot bar saturates at its last frame.
pub fn animation_frame(animation: Animation, index: u64) -> Frame {
    match animation {
        Animation::Boot => boot_frame(index.min(Animation::Boot.frame_count() - 1)),
        Animation::WifiSearching => wifi_searching_frame(index),
        Animation::Activity => activity_frame(index),
        Animation::Idle => idle_frame(index),
    }
}

fn boot_frame(index: u64) -> Frame {
    let mut frame = Frame::black();
    draw_text_centered(&mut frame, "BOOTING...", 20, TEXT_WHITE);
    let last = Animation::Boot.frame_count() - 1;
    let percentage = Percent::new((index * 100 / last) as i64);
    draw_outline_rect(&mut frame, 4..60, 34..44, TEXT_WHITE);
    fill_horizontal_bar(&mut frame, 5..59, 35..43, percentage, PROJECT_BLUE);
    frame
}

fn wifi_searching_frame(index: u64) -> Frame {
    let mut frame = Frame::black();
    let arcs = (index % Animation::WifiSearching.frame_count()) as u32 + 1;
    draw_wifi(&mut frame, arcs, SPRINT_GREEN);
    frame
}

fn activity_frame(index: u64) -> Frame {
    let mut frame = Frame::black();
    if index % 2 == 0 {
        fill_circle(&mut frame, 59, 4, 2, TEXT_WHITE);
    }
    frame
}

fn idle_frame(index: u64) -> Frame {
    let mut frame = Frame::black();
    let (dx, dy) = IDLE_ORBIT[(index % Animation::Idle.frame_count()) as usize];
    fill_circle(&mut frame, 32 + dx, 32 + dy, 1, TEXT_WHITE);
    frame
}

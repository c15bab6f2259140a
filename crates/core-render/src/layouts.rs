//! Hierarchical progress scenes driven by a `LayoutPayload`.
//!
//! Geometry notes:
//! * Text is drawn top-left anchored. The single-view band positions are
//!   specified by their bottom edge (the percentage row sits on the panel's
//!   bottom edge at y=64), so this module converts: `top = bottom - 5` for
//!   text, `bottom - 7` for the completion sprite.
//! * Bars are colored; text is always white. Completion (clamped 100%)
//!   replaces a percentage readout with the 7x7 checkmark sprite.
//! * The checkmark centers as a 7-row sprite where text centers as 5 rows,
//!   so it sits one pixel higher than the text it replaces. That offset is a
//!   deliberate constant of the row scenes.

use crate::color::{
    EMPTY_SLOT, GAUGE_OUTLINE, PROJECT_BLUE, SPRINT_GREEN, STORY_PALETTE, TEXT_WHITE,
};
use crate::glyph::text_width;
use crate::primitives::{
    draw_checkmark, draw_outline_rect, draw_text, draw_text_centered, fill_horizontal_bar,
    fill_rect, fill_vertical_bar,
};
use core_model::{Frame, LayoutKind, LayoutPayload, Percent, SprintSummary, PANEL_WIDTH};

/// Render the scene named by `payload.layout`. The payload is normalized
/// (clamped percentages, truncated names) before any pixel is written, so
/// rendering is deterministic and bounds-safe for arbitrary input.
pub fn render_layout(payload: &LayoutPayload) -> Frame {
    let mut payload = payload.clone();
    payload.normalize();
    match payload.layout {
        LayoutKind::SingleView => render_single_view(&payload),
        LayoutKind::SprintView => render_sprint_view(&payload),
        LayoutKind::UserStoryLayout => render_user_story_layout(&payload),
    }
}

// ---------------------------------------------------------------------------
// SingleView
// ---------------------------------------------------------------------------

const SV_NAME_TOP: i32 = 3;
const SV_GAUGE_X: std::ops::Range<i32> = 22..42;
const SV_GAUGE_Y: std::ops::Range<i32> = 12..56;
/// Bottom edges of the three text bands (labels, counts, percentage).
const SV_LABELS_BOTTOM: i32 = 48;
const SV_COUNTS_BOTTOM: i32 = 61;
const SV_PERCENT_BOTTOM: i32 = 64;
const SV_EDGE_MARGIN: i32 = 2;

fn render_single_view(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::black();
    draw_text_centered(&mut frame, &payload.project.name, SV_NAME_TOP, TEXT_WHITE);

    draw_outline_rect(&mut frame, SV_GAUGE_X, SV_GAUGE_Y, GAUGE_OUTLINE);
    fill_vertical_bar(
        &mut frame,
        SV_GAUGE_X.start + 1..SV_GAUGE_X.end - 1,
        SV_GAUGE_Y.start + 1..SV_GAUGE_Y.end - 1,
        payload.project.percentage,
        SPRINT_GREEN,
    );

    let (sprints_done, sprints_total) = payload.sprint_counts();
    let (stories_done, stories_total) = payload.story_counts();
    if sprints_total > 0 {
        draw_text(
            &mut frame,
            "S:",
            SV_EDGE_MARGIN,
            SV_LABELS_BOTTOM - 5,
            TEXT_WHITE,
        );
        draw_text(
            &mut frame,
            &format!("{sprints_done}/{sprints_total}"),
            SV_EDGE_MARGIN,
            SV_COUNTS_BOTTOM - 5,
            TEXT_WHITE,
        );
    }
    if stories_total > 0 {
        let label_x = PANEL_WIDTH - SV_EDGE_MARGIN - text_width("US:");
        draw_text(&mut frame, "US:", label_x, SV_LABELS_BOTTOM - 5, TEXT_WHITE);
        let counts = format!("{stories_done}/{stories_total}");
        let counts_x = PANEL_WIDTH - SV_EDGE_MARGIN - text_width(&counts);
        draw_text(&mut frame, &counts, counts_x, SV_COUNTS_BOTTOM - 5, TEXT_WHITE);
    }

    if payload.project.percentage.is_complete() {
        draw_checkmark(&mut frame, (PANEL_WIDTH - 7) / 2, SV_PERCENT_BOTTOM - 7);
    } else {
        draw_text_centered(
            &mut frame,
            &payload.project.percentage.to_string(),
            SV_PERCENT_BOTTOM - 5,
            TEXT_WHITE,
        );
    }
    frame
}

// ---------------------------------------------------------------------------
// SprintView
// ---------------------------------------------------------------------------

const SPV_BAR_Y: std::ops::Range<i32> = 0..10;
const SPV_COL_WIDTH: i32 = 21;
const SPV_LABEL_TOP: i32 = 11;
const SPV_GAUGE_Y: std::ops::Range<i32> = 17..62;
/// Gauge x-offsets within a column.
const SPV_GAUGE_LEFT: i32 = 4;
const SPV_GAUGE_RIGHT: i32 = 17;

fn render_sprint_view(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::black();

    fill_horizontal_bar(
        &mut frame,
        0..PANEL_WIDTH,
        SPV_BAR_Y,
        payload.project.percentage,
        PROJECT_BLUE,
    );
    if payload.project.percentage.is_complete() {
        draw_checkmark(&mut frame, (PANEL_WIDTH - 7) / 2, 1);
    } else {
        draw_text_centered(
            &mut frame,
            &payload.project.percentage.to_string(),
            2,
            TEXT_WHITE,
        );
    }

    // Columns 1 and 2 host the first two sprints; later sprints are silently
    // omitted. The third column is always the unused dim slot.
    for slot in 0..2 {
        let x0 = slot * SPV_COL_WIDTH;
        match payload.sprints.get(slot as usize) {
            Some(sprint) => draw_sprint_column(&mut frame, x0, slot, sprint),
            None => draw_empty_slot(&mut frame, x0),
        }
    }
    draw_empty_slot(&mut frame, 2 * SPV_COL_WIDTH);
    frame
}

fn draw_sprint_column(frame: &mut Frame, x0: i32, slot: i32, sprint: &SprintSummary) {
    let label = format!("S{}", slot + 1);
    let label_x = x0 + (SPV_COL_WIDTH - text_width(&label)) / 2;
    draw_text(frame, &label, label_x, SPV_LABEL_TOP, TEXT_WHITE);

    let gauge_x = (x0 + SPV_GAUGE_LEFT)..(x0 + SPV_GAUGE_RIGHT);
    draw_outline_rect(frame, gauge_x.clone(), SPV_GAUGE_Y, GAUGE_OUTLINE);
    fill_vertical_bar(
        frame,
        gauge_x.start + 1..gauge_x.end - 1,
        SPV_GAUGE_Y.start + 1..SPV_GAUGE_Y.end - 1,
        sprint.percentage,
        SPRINT_GREEN,
    );

    let mid = (SPV_GAUGE_Y.start + SPV_GAUGE_Y.end) / 2;
    if sprint.percentage.is_complete() {
        draw_checkmark(frame, x0 + (SPV_COL_WIDTH - 7) / 2, mid - 3);
    } else {
        let text = sprint.percentage.to_string();
        let text_x = x0 + (SPV_COL_WIDTH - text_width(&text)) / 2;
        draw_text(frame, &text, text_x, mid - 2, TEXT_WHITE);
    }
}

fn draw_empty_slot(frame: &mut Frame, x0: i32) {
    fill_rect(
        frame,
        (x0 + SPV_GAUGE_LEFT)..(x0 + SPV_GAUGE_RIGHT),
        SPV_GAUGE_Y,
        EMPTY_SLOT,
    );
}

// ---------------------------------------------------------------------------
// UserStoryLayout
// ---------------------------------------------------------------------------

const USL_LABEL_X: i32 = 2;
const USL_GAUGE_X: std::ops::Range<i32> = 14..38;
const USL_GAUGE_HEIGHT: i32 = 7;
const USL_RIGHT_X: std::ops::Range<i32> = 38..PANEL_WIDTH;

fn render_user_story_layout(payload: &LayoutPayload) -> Frame {
    let mut frame = Frame::black();
    let Some(sprint) = payload.focus_sprint() else {
        return frame;
    };
    let sprint_number = payload.focus_sprint_index.unwrap_or(0) + 1;

    let lines = 1 + sprint.user_stories.len() as i32;
    let band_h = core_model::PANEL_HEIGHT / lines;

    draw_story_row(
        &mut frame,
        0,
        band_h,
        &format!("S{sprint_number}"),
        sprint.percentage,
        SPRINT_GREEN,
    );
    for (i, story) in sprint.user_stories.iter().enumerate() {
        draw_story_row(
            &mut frame,
            (1 + i as i32) * band_h,
            band_h,
            &format!("U{}", i + 1),
            story.percentage,
            STORY_PALETTE[i % STORY_PALETTE.len()],
        );
    }
    frame
}

fn draw_story_row(
    frame: &mut Frame,
    y0: i32,
    band_h: i32,
    label: &str,
    percentage: Percent,
    bar_color: core_model::Rgb,
) {
    let text_top = y0 + (band_h - 5) / 2;
    let sprite_top = y0 + (band_h - USL_GAUGE_HEIGHT) / 2;

    draw_text(frame, label, USL_LABEL_X, text_top, TEXT_WHITE);

    let gauge_y = sprite_top..sprite_top + USL_GAUGE_HEIGHT;
    draw_outline_rect(frame, USL_GAUGE_X, gauge_y.clone(), GAUGE_OUTLINE);
    fill_horizontal_bar(
        frame,
        USL_GAUGE_X.start + 1..USL_GAUGE_X.end - 1,
        gauge_y.start + 1..gauge_y.end - 1,
        percentage,
        bar_color,
    );

    let right_width = USL_RIGHT_X.end - USL_RIGHT_X.start;
    if percentage.is_complete() {
        // sprite centers one pixel above the text row it replaces; kept
        draw_checkmark(frame, USL_RIGHT_X.start + (right_width - 7) / 2, sprite_top);
    } else {
        let text = percentage.to_string();
        let text_x = USL_RIGHT_X.start + (right_width - text_width(&text)) / 2;
        draw_text(frame, &text, text_x, text_top, TEXT_WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{LayoutKind, ProjectSummary, UserStorySummary};

    fn base_payload(layout: LayoutKind) -> LayoutPayload {
        LayoutPayload {
            layout,
            project: ProjectSummary {
                name: "Demo".into(),
                percentage: Percent::new(50),
            },
            sprints: vec![],
            focus_sprint_index: None,
        }
    }

    fn sprint(pct: i64, story_pcts: &[i64]) -> SprintSummary {
        SprintSummary {
            name: "Sprint".into(),
            percentage: Percent::new(pct),
            user_stories: story_pcts
                .iter()
                .map(|&p| UserStorySummary {
                    title: "Story".into(),
                    percentage: Percent::new(p),
                })
                .collect(),
        }
    }

    #[test]
    fn single_view_without_sprints_omits_labels_but_keeps_gauge() {
        let frame = render_layout(&base_payload(LayoutKind::SingleView));
        // gauge outline present
        assert_eq!(frame.get(22, 12).unwrap(), GAUGE_OUTLINE);
        assert_eq!(frame.get(41, 55).unwrap(), GAUGE_OUTLINE);
        // label band empty (x=2..13, label rows)
        for y in 43..48 {
            for x in 0..14 {
                assert!(frame.get(x, y).unwrap().is_black());
            }
        }
        // name row lit
        let name_lit = (0..64).any(|x| (3..8).any(|y| !frame.get(x, y).unwrap().is_black()));
        assert!(name_lit);
    }

    #[test]
    fn single_view_gauge_fill_tracks_percentage() {
        let mut payload = base_payload(LayoutKind::SingleView);
        payload.project.percentage = Percent::new(100);
        let frame = render_layout(&payload);
        // interior fully green
        assert_eq!(frame.get(30, 13).unwrap(), SPRINT_GREEN);
        assert_eq!(frame.get(30, 54).unwrap(), SPRINT_GREEN);
        // checkmark replaces percentage at the bottom
        assert!(!frame.get(31, 59).unwrap().is_black());
    }

    #[test]
    fn sprint_view_top_bar_is_proportional() {
        let frame = render_layout(&base_payload(LayoutKind::SprintView));
        assert_eq!(frame.get(0, 0).unwrap(), PROJECT_BLUE);
        assert_eq!(frame.get(31, 9).unwrap(), PROJECT_BLUE);
        assert!(frame.get(33, 5).unwrap().is_black() || frame.get(33, 5).unwrap() == TEXT_WHITE);
        assert!(frame.get(63, 0).unwrap().is_black());
    }

    #[test]
    fn sprint_view_missing_sprints_render_dim_slots() {
        let frame = render_layout(&base_payload(LayoutKind::SprintView));
        // all three columns dim when no sprints exist
        for x0 in [0, 21, 42] {
            assert_eq!(frame.get(x0 + 5, 30).unwrap(), EMPTY_SLOT);
        }
    }

    #[test]
    fn sprint_view_shows_at_most_two_sprints() {
        let mut payload = base_payload(LayoutKind::SprintView);
        payload.sprints = vec![sprint(40, &[]), sprint(60, &[]), sprint(80, &[])];
        let frame = render_layout(&payload);
        // third column stays dim even with a third sprint present
        assert_eq!(frame.get(42 + 5, 30).unwrap(), EMPTY_SLOT);
        // first two have gray gauge outlines
        assert_eq!(frame.get(4, 17).unwrap(), GAUGE_OUTLINE);
        assert_eq!(frame.get(21 + 4, 17).unwrap(), GAUGE_OUTLINE);
    }

    #[test]
    fn user_story_layout_without_focus_sprint_is_black() {
        let frame = render_layout(&base_payload(LayoutKind::UserStoryLayout));
        assert_eq!(frame.lit_rows(), 0);

        let mut payload = base_payload(LayoutKind::UserStoryLayout);
        payload.sprints = vec![sprint(50, &[])];
        payload.focus_sprint_index = Some(9);
        assert_eq!(render_layout(&payload).lit_rows(), 0);
    }

    #[test]
    fn user_story_layout_sprint_only_renders_one_band() {
        let mut payload = base_payload(LayoutKind::UserStoryLayout);
        payload.sprints = vec![sprint(50, &[])];
        let frame = render_layout(&payload);
        // full-height band: gauge centered near panel middle
        assert_eq!(frame.get(14, (64 - 7) / 2).unwrap(), GAUGE_OUTLINE);
        // half fill: 11 of 22 interior columns
        assert_eq!(frame.get(15, 32).unwrap(), SPRINT_GREEN);
        assert_eq!(frame.get(25, 32).unwrap(), SPRINT_GREEN);
        assert!(frame.get(26, 32).unwrap().is_black());
    }

    #[test]
    fn user_story_rows_cycle_the_palette() {
        let mut payload = base_payload(LayoutKind::UserStoryLayout);
        payload.sprints = vec![sprint(
            100,
            &[50, 50, 50, 50, 50, 50, 50, 50, 50], // 9 stories wraps the palette
        )];
        let frame = render_layout(&payload);
        let band_h = 64 / 10;
        // story 1 (band 1) is palette[0] blue; story 9 (band 9) wraps to blue
        let y1 = band_h + (band_h - 7) / 2 + 1;
        let y9 = 9 * band_h + (band_h - 7) / 2 + 1;
        assert_eq!(frame.get(15, y1).unwrap(), STORY_PALETTE[0]);
        assert_eq!(frame.get(15, y9).unwrap(), STORY_PALETTE[0]);
    }

    #[test]
    fn render_layout_is_deterministic() {
        let mut payload = base_payload(LayoutKind::SprintView);
        payload.sprints = vec![sprint(37, &[10, 90]), sprint(100, &[100])];
        assert_eq!(render_layout(&payload), render_layout(&payload));
    }
}

//! The layout payload: the coordinator's sole knowledge of the surrounding
//! task system.
//!
//! An external service pre-computes this hierarchy (project -> sprints ->
//! user stories) and ships it with `show_layout`. Percentages clamp on the
//! way in via [`Percent`](crate::Percent); `normalize` additionally truncates
//! names to the advertised display budget so renderers never re-measure.

use crate::Percent;
use serde::{Deserialize, Serialize};

/// Displayed-character budget for the project name (SingleView headline).
pub const PROJECT_NAME_BUDGET: usize = 10;

/// Which scene renderer consumes the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    SingleView,
    SprintView,
    UserStoryLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub percentage: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStorySummary {
    pub title: String,
    pub percentage: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSummary {
    pub name: String,
    pub percentage: Percent,
    /// A sprint with no user stories is legal.
    #[serde(default)]
    pub user_stories: Vec<UserStorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub layout: LayoutKind,
    pub project: ProjectSummary,
    #[serde(default)]
    pub sprints: Vec<SprintSummary>,
    /// Index into `sprints` selecting the row-view subject; defaults to 0.
    #[serde(default)]
    pub focus_sprint_index: Option<usize>,
}

impl LayoutPayload {
    /// Truncates names to their display budgets. Percentages are already
    /// clamped by construction.
    pub fn normalize(&mut self) {
        truncate_chars(&mut self.project.name, PROJECT_NAME_BUDGET);
    }

    /// The sprint selected for `UserStoryLayout`; `None` when the index (or
    /// default 0) does not name an existing sprint.
    pub fn focus_sprint(&self) -> Option<&SprintSummary> {
        self.sprints.get(self.focus_sprint_index.unwrap_or(0))
    }

    /// `(completed, total)` over sprints; completed means clamped 100%.
    pub fn sprint_counts(&self) -> (usize, usize) {
        let completed = self
            .sprints
            .iter()
            .filter(|s| s.percentage.is_complete())
            .count();
        (completed, self.sprints.len())
    }

    /// `(completed, total)` over user stories across all sprints.
    pub fn story_counts(&self) -> (usize, usize) {
        let mut completed = 0;
        let mut total = 0;
        for sprint in &self.sprints {
            total += sprint.user_stories.len();
            completed += sprint
                .user_stories
                .iter()
                .filter(|us| us.percentage.is_complete())
                .count();
        }
        (completed, total)
    }
}

fn truncate_chars(text: &mut String, budget: usize) {
    if let Some((idx, _)) = text.char_indices().nth(budget) {
        text.truncate(idx);
    }
}

//! Task kinds and their completion semantics.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// What kind of task a config describes.
///
/// Serialized with an inner `"kind"` tag; the tracker variant inlines its
/// rule fields:
/// `{"kind":"tracker","max_progress":10,"edge_progress":8,"to_fill":true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    /// Recurs on a subset of weekdays until the cycle is closed.
    Habit,

    /// One-time target, due once on its starting day.
    Goal,

    /// Counter logged once per day, satisfied at or above the edge.
    Tracker(TrackerRule),
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Habit => "habit",
            TaskKind::Goal => "goal",
            TaskKind::Tracker(_) => "tracker",
        }
    }

    pub fn tracker_rule(&self) -> Option<&TrackerRule> {
        match self {
            TaskKind::Tracker(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self, TaskKind::Goal)
    }

    pub fn is_habit(&self) -> bool {
        matches!(self, TaskKind::Habit)
    }
}

/// Counter bounds for a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackerRule {
    /// Upper bound of the daily counter.
    pub max_progress: u32,

    /// A day counts as satisfied when its progress reaches this value.
    pub edge_progress: u32,

    /// `true`: higher is better. `false`: lower is better, and the
    /// completed count is inverted against the target count.
    pub to_fill: bool,
}

impl TrackerRule {
    pub fn new(max_progress: u32, edge_progress: u32, to_fill: bool) -> Self {
        Self {
            max_progress,
            edge_progress,
            to_fill,
        }
    }

    pub fn is_satisfied(&self, progress: u32) -> bool {
        progress >= self.edge_progress
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_progress == 0 {
            return Err(DomainError::ZeroMaxProgress);
        }
        if self.edge_progress > self.max_progress {
            return Err(DomainError::EdgeAboveMax {
                edge: self.edge_progress,
                max: self.max_progress,
            });
        }
        Ok(())
    }
}

impl Default for TrackerRule {
    fn default() -> Self {
        Self {
            max_progress: 10,
            edge_progress: 8,
            to_fill: true,
        }
    }
}

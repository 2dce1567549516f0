//! Input for creating or editing a task.
//!
//! A draft is what the editing form produces. The planner turns it into a
//! `TaskConfig` (minting ids and the creation date) and prepares it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::clock_window::ClockWindow;
use super::config::{TaskConfig, Verification};
use super::ids::{ConfigId, GroupId};
use super::task_kind::TaskKind;
use super::weekday::{WeekDay, WeekDays};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDraft {
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub kind: TaskKind,
    pub starting_from: NaiveDate,

    #[serde(default)]
    pub week_days: WeekDays,

    #[serde(default)]
    pub clock: ClockWindow,

    #[serde(default)]
    pub verification: Verification,
}

impl ConfigDraft {
    /// Convenience constructor; due every weekday until narrowed.
    pub fn new(title: impl Into<String>, kind: TaskKind, starting_from: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            kind,
            starting_from,
            week_days: WeekDay::every_day(),
            clock: ClockWindow::Untimed,
            verification: Verification::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_week_days(mut self, week_days: impl IntoIterator<Item = WeekDay>) -> Self {
        self.week_days = week_days.into_iter().collect();
        self
    }

    pub fn with_clock(mut self, clock: ClockWindow) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    /// Materialize into an (unprepared) open config.
    pub fn into_config(
        self,
        id: ConfigId,
        group_id: GroupId,
        creation_date: NaiveDateTime,
    ) -> TaskConfig {
        TaskConfig {
            id,
            group_id,
            title: self.title,
            description: self.description,
            kind: self.kind,
            starting_from: self.starting_from,
            completed_date: None,
            creation_date,
            week_days: self.week_days,
            clock: self.clock,
            verification: self.verification,
            is_hidden: false,
        }
    }

    /// A draft pre-filled from an existing generation, for editing.
    pub fn from_config(config: &TaskConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            kind: config.kind,
            starting_from: config.starting_from,
            week_days: config.week_days.clone(),
            clock: config.clock,
            verification: config.verification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn draft_without_optional_fields_deserializes() {
        let json = r#"{
            "title": "read",
            "kind": { "kind": "habit" },
            "starting_from": "2024-01-01",
            "week_days": ["monday", "friday"]
        }"#;
        let draft: ConfigDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.week_days.len(), 2);
        assert_eq!(draft.clock, ClockWindow::Untimed);
        assert!(!draft.verification.image_validation);
    }

    #[test]
    fn into_config_then_from_config_preserves_fields() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let draft = ConfigDraft::new("read", TaskKind::Habit, start)
            .with_description("20 pages")
            .with_week_days([WeekDay::Monday]);
        let id = ConfigId::from_ulid(Ulid::new());
        let config = draft
            .clone()
            .into_config(id, id.cast(), start.and_hms_opt(8, 0, 0).unwrap());

        assert!(config.is_open());
        assert_eq!(ConfigDraft::from_config(&config), draft);
    }
}

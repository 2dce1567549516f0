//! Task configuration: the recurrence rule of one generation of a task.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::clock_window::ClockWindow;
use super::errors::DomainError;
use super::ids::{ConfigId, GroupId};
use super::task_kind::{TaskKind, TrackerRule};
use super::weekday::{WeekDay, WeekDays};

/// How a completion has to be evidenced. Carried through, never evaluated
/// by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Verification {
    /// Completion opens a details sheet instead of a one-tap toggle.
    #[serde(default)]
    pub image_validation: bool,

    /// The details sheet asks for a comment only, no photos.
    #[serde(default)]
    pub only_comment: bool,

    #[serde(default)]
    pub is_momental: bool,
}

/// One generation of a task.
///
/// Superseded generations keep their row (with `completed_date` set and
/// usually `is_hidden`) so history stays countable; a new generation shares
/// the `group_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: ConfigId,
    pub group_id: GroupId,
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub kind: TaskKind,

    /// First day the rule can be due (inclusive).
    pub starting_from: NaiveDate,

    /// Last day of the active window; `None` while the cycle is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    /// Tie-break for ordering only.
    pub creation_date: NaiveDateTime,

    #[serde(default)]
    pub week_days: WeekDays,

    #[serde(default)]
    pub clock: ClockWindow,

    #[serde(default)]
    pub verification: Verification,

    #[serde(default)]
    pub is_hidden: bool,
}

impl TaskConfig {
    /// A new open config due every day of the week.
    pub fn new(
        id: ConfigId,
        group_id: GroupId,
        title: impl Into<String>,
        kind: TaskKind,
        starting_from: NaiveDate,
        creation_date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            group_id,
            title: title.into(),
            description: String::new(),
            kind,
            starting_from,
            completed_date: None,
            creation_date,
            week_days: WeekDay::every_day(),
            clock: ClockWindow::Untimed,
            verification: Verification::default(),
            is_hidden: false,
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

    pub fn completed_on(mut self, date: NaiveDate) -> Self {
        self.completed_date = Some(date);
        self
    }

    pub fn is_open(&self) -> bool {
        self.completed_date.is_none()
    }

    pub fn tracker_rule(&self) -> Option<&TrackerRule> {
        self.kind.tracker_rule()
    }

    /// Ring value of the weekday the rule starts on.
    pub fn start_ring_value(&self) -> u8 {
        WeekDay::of(self.starting_from).value()
    }

    /// Whether `date` falls on one of the rule's weekdays, on or after its
    /// starting day. Ignores `completed_date`.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        date >= self.starting_from && self.week_days.contains(&WeekDay::of(date))
    }

    /// Normalizes a draft before it is persisted.
    ///
    /// - non-habit kinds are due on every weekday
    /// - a goal is closed on its own starting day
    /// - a tracker has no clock time and is comment-only
    pub fn prepared(mut self) -> Self {
        if !self.kind.is_habit() {
            self.week_days = WeekDay::every_day();
        }
        match self.kind {
            TaskKind::Goal => {
                self.completed_date = Some(self.starting_from);
            }
            TaskKind::Tracker(_) => {
                self.clock = ClockWindow::Untimed;
                self.verification.only_comment = true;
            }
            TaskKind::Habit => {}
        }
        self
    }

    /// Checks the invariants the editing layer has to hold before a config
    /// is stored. The engine itself never calls this.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(rule) = self.tracker_rule() {
            rule.validate()?;
        }
        if self.kind.is_habit() && self.is_open() && self.week_days.is_empty() {
            return Err(DomainError::EmptyWeekDays);
        }
        if let Some(completed) = self.completed_date {
            if completed < self.starting_from {
                return Err(DomainError::InvertedDateRange {
                    starting_from: self.starting_from,
                    completed,
                });
            }
        }
        self.clock.validate()
    }

    /// Ordering of configs listed for the same day: by clock window, then by
    /// creation date.
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        self.clock
            .schedule_cmp(&other.clock)
            .then_with(|| self.creation_date.cmp(&other.creation_date))
    }
}

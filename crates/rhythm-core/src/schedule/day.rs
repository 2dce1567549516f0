//! Day offsets and day windows.
//!
//! Every engine computation works on integer day offsets relative to a
//! reference date, so nothing below depends on time zones or clock time.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// A closed range of day offsets `[start, end]` relative to `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub reference: NaiveDate,
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    pub fn new(reference: NaiveDate, start: i64, end: i64) -> Self {
        Self {
            reference,
            start,
            end,
        }
    }

    /// `days` consecutive days beginning at `anchor`: offsets `0..days`.
    ///
    /// A zero-length window has `end == -1` and contains nothing.
    pub fn of_len(anchor: NaiveDate, days: u32) -> Self {
        Self::new(anchor, 0, i64::from(days) - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn contains(&self, offset: i64) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn offsets(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }

    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        days_between(self.reference, date)
    }

    pub fn date_at(&self, offset: i64) -> NaiveDate {
        self.reference + Duration::days(offset)
    }
}

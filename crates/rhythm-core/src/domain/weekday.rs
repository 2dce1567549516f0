//! Weekday ring arithmetic.
//!
//! Weekdays live on a circular 1..=7 numbering with Sunday = 1, the same
//! numbering calendar libraries use for "day of week from Sunday". All
//! modular week math in the engine goes through the three primitives here
//! (`value`, `week_days_interval`, `add_to_week_day`) so the recurrence
//! lattice and the progress remainder-week never drift apart.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Number of positions on the weekday ring.
pub const RING_SIZE: u8 = 7;

/// A day of the week.
///
/// Variants are declared in ring order, so the derived `Ord` (and therefore
/// iteration over a `WeekDays` set) follows ring values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// A true set of weekdays; duplicates are impossible by construction.
pub type WeekDays = BTreeSet<WeekDay>;

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Sunday,
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
    ];

    /// Canonical ring position, 1..=7, Sunday = 1.
    pub fn value(self) -> u8 {
        match self {
            WeekDay::Sunday => 1,
            WeekDay::Monday => 2,
            WeekDay::Tuesday => 3,
            WeekDay::Wednesday => 4,
            WeekDay::Thursday => 5,
            WeekDay::Friday => 6,
            WeekDay::Saturday => 7,
        }
    }

    /// Inverse of [`WeekDay::value`].
    pub fn from_value(value: u8) -> Result<Self, DomainError> {
        match value {
            1..=7 => Ok(Self::ALL[usize::from(value - 1)]),
            _ => Err(DomainError::InvalidWeekDay(value)),
        }
    }

    /// Weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            WeekDay::Sunday => "Sun",
            WeekDay::Monday => "Mon",
            WeekDay::Tuesday => "Tue",
            WeekDay::Wednesday => "Wed",
            WeekDay::Thursday => "Thu",
            WeekDay::Friday => "Fri",
            WeekDay::Saturday => "Sat",
        }
    }

    pub fn every_day() -> WeekDays {
        Self::ALL.into_iter().collect()
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        // chrono numbers from Sunday as 1..=7, which is exactly our ring.
        Self::ALL[(day.number_from_sunday() - 1) as usize]
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for WeekDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekDay::Sunday),
            "mon" | "monday" => Ok(WeekDay::Monday),
            "tue" | "tues" | "tuesday" => Ok(WeekDay::Tuesday),
            "wed" | "wednesday" => Ok(WeekDay::Wednesday),
            "thu" | "thurs" | "thursday" => Ok(WeekDay::Thursday),
            "fri" | "friday" => Ok(WeekDay::Friday),
            "sat" | "saturday" => Ok(WeekDay::Saturday),
            _ => Err(DomainError::UnparsableWeekDay(s.to_string())),
        }
    }
}

/// Ring positions from `from` walking forward (wrapping 7 -> 1) up to, but
/// excluding, `to`.
///
/// `from == to` is a zero-length span and yields nothing. Both arguments
/// are expected to be ring values (1..=7).
pub fn week_days_interval(from: u8, to: u8) -> Vec<u8> {
    if from > to {
        (from..=RING_SIZE).chain(1..to).collect()
    } else {
        (from..to).collect()
    }
}

/// Ring addition with 1-based indexing: `(base + offset_days - 1) mod 7 + 1`.
///
/// Negative offsets walk backwards.
pub fn add_to_week_day(base: u8, offset_days: i64) -> u8 {
    let zero_based = (i64::from(base) + offset_days - 1).rem_euclid(i64::from(RING_SIZE));
    // rem_euclid keeps this in 0..7
    zero_based as u8 + 1
}

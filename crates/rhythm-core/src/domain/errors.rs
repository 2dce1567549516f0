//! Domain errors.
//!
//! The engine itself is total over well-formed input; these errors surface
//! caller bugs (a bad ring value, an unparsable id) and the checks the
//! config-editing layer runs before persisting a config.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid weekday ring value {0} (expected 1..=7)")]
    InvalidWeekDay(u8),

    #[error("unparsable weekday: {0:?}")]
    UnparsableWeekDay(String),

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("config closed on {completed} before it starts on {starting_from}")]
    InvertedDateRange {
        starting_from: NaiveDate,
        completed: NaiveDate,
    },

    #[error("tracker edge progress {edge} is above max progress {max}")]
    EdgeAboveMax { edge: u32, max: u32 },

    #[error("tracker max progress must be positive")]
    ZeroMaxProgress,

    #[error("an open habit needs at least one weekday")]
    EmptyWeekDays,

    #[error("end time {end} is before start time {start}")]
    EndBeforeStart { start: NaiveTime, end: NaiveTime },
}

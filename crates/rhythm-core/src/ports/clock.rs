//! Clock port - where "now" comes from
//!
//! The engine never reads a clock. Lifecycle operations do (closing a cycle
//! "today", stamping an instance), and they go through this trait so tests
//! can pin the date.
//!
//! # Implementations
//! - **SystemClock**: local wall clock
//! - **FixedClock**: a fixed instant, for tests

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Clock provides the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN) + Duration::hours(12))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_pins_today() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), date.and_hms_opt(12, 0, 0).unwrap());
    }
}

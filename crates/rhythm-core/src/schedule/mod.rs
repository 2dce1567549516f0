//! Recurrence and progress engine.
//!
//! Pure functions over a snapshot of configs and instances: due dates, target
//! and completed counts, and per-day calendar buckets. Nothing here reads
//! the system clock; "today" and the reference date are always passed in.
//!
//! # Components
//! - **day**: day offsets and closed day windows
//! - **recurrence**: due offsets of one config
//! - **progress**: lifetime target/completed counts, per group and overall
//! - **calendar**: due configs and recorded instances bucketed per day

pub mod calendar;
pub mod day;
pub mod progress;
pub mod recurrence;

pub use self::calendar::{
    CalendarDay, CalendarEntry, CalendarView, due_configs_by_day, recorded_instances_by_day,
};
pub use self::day::{DayWindow, days_between};
pub use self::progress::{
    ProgressCounts, aggregate_progress, progress_by_group, progress_counts, target_count,
};
pub use self::recurrence::{due_offsets, is_due_at};

//! rhythm-core
//!
//! Recurrence and progress accounting for habits, goals and trackers.
//!
//! # Modules
//! - **domain**: weekdays, task kinds, configs and their generations, instances
//! - **schedule**: the pure engine (due dates, progress counts, calendar buckets)
//! - **ports**: Clock, IdGenerator, PlanStore
//! - **app**: the `Plan` snapshot and the `Planner` lifecycle operations
//! - **impls**: JSON file and in-memory stores

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod schedule;

//! Domain model (ids, weekdays, task kinds, configs, instances, groups).

pub mod clock_window;
pub mod config;
pub mod draft;
pub mod errors;
pub mod group;
pub mod ids;
pub mod instance;
pub mod task_kind;
pub mod weekday;

pub use clock_window::ClockWindow;
pub use config::{TaskConfig, Verification};
pub use draft::ConfigDraft;
pub use errors::DomainError;
pub use group::ConfigGroup;
pub use ids::{ConfigId, GroupId, Id, IdMarker, InstanceId};
pub use instance::Instance;
pub use task_kind::{TaskKind, TrackerRule};
pub use weekday::{RING_SIZE, WeekDay, WeekDays, add_to_week_day, week_days_interval};

//! App - application layer
//!
//! Combines the domain, the engine and the ports into operations on a plan
//! snapshot.
//!
//! # Components
//! - **Plan**: the snapshot of configs and instances, with read-only views
//! - **Planner**: lifecycle operations (create, edit, close, reopen, log, ...)

pub mod plan;
pub mod planner;

pub use self::plan::Plan;
pub use self::planner::{PlanError, Planner};

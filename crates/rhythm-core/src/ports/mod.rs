//! Ports - the seams between the core and the outside world.
//!
//! Each trait abstracts something the pure engine must not touch directly:
//! the wall clock, id minting, and snapshot persistence.

pub mod clock;
pub mod id_generator;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::store::{PlanStore, StoreError};

//! IdGenerator port - minting config, group and instance ids
//!
//! # Implementations
//! - **UlidGenerator**: ULIDs stamped with the injected clock

use crate::domain::ids::{ConfigId, GroupId, InstanceId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator mints new identifiers.
///
/// ULIDs sort by creation time, so ids minted later also order later.
pub trait IdGenerator: Send + Sync {
    fn generate_config_id(&self) -> ConfigId;

    fn generate_group_id(&self) -> GroupId;

    fn generate_instance_id(&self) -> InstanceId;
}

/// UlidGenerator builds ULIDs from the clock's current time and random bits.
///
/// With a `FixedClock` every id shares the timestamp part and differs only
/// in the random part.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().and_utc().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_config_id(&self) -> ConfigId {
        ConfigId::from(self.next_ulid())
    }

    fn generate_group_id(&self) -> GroupId {
        GroupId::from(self.next_ulid())
    }

    fn generate_instance_id(&self) -> InstanceId {
        InstanceId::from(self.next_ulid())
    }
}

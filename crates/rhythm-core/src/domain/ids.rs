//! Domain identifiers (strongly-typed IDs).
//!
//! All identifiers are ULIDs wrapped in a phantom-typed `Id<T>`, so a
//! `ConfigId` can never be passed where an `InstanceId` is expected.
//! On the wire an id is the bare ULID string; `Display` adds a short
//! prefix (`cfg-`, `grp-`, `inst-`) and `FromStr` accepts either form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

use super::errors::DomainError;

/// Marker trait for each id kind.
pub trait IdMarker: Send + Sync + 'static {
    /// Display prefix, e.g. `"cfg-"`.
    fn prefix() -> &'static str;
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }

    /// Re-tag the same ULID as another id kind.
    pub fn cast<U: IdMarker>(self) -> Id<U> {
        Id::from_ulid(self.ulid)
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

// ========================================
// Markers
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Config {}

impl IdMarker for Config {
    fn prefix() -> &'static str {
        "cfg-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {}

impl IdMarker for Group {
    fn prefix() -> &'static str {
        "grp-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instance {}

impl IdMarker for Instance {
    fn prefix() -> &'static str {
        "inst-"
    }
}

/// Identifier of one task configuration row (one generation).
pub type ConfigId = Id<Config>;

/// Identifier shared by every generation of the same logical task.
pub type GroupId = Id<Group>;

/// Identifier of a recorded completion.
pub type InstanceId = Id<Instance>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_prefix() {
        let ulid = Ulid::new();
        assert!(ConfigId::from_ulid(ulid).to_string().starts_with("cfg-"));
        assert!(GroupId::from_ulid(ulid).to_string().starts_with("grp-"));
        assert!(InstanceId::from_ulid(ulid).to_string().starts_with("inst-"));
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let id = ConfigId::from_ulid(Ulid::new());
        let with_prefix: ConfigId = id.to_string().parse().unwrap();
        let bare: ConfigId = id.as_ulid().to_string().parse().unwrap();
        assert_eq!(with_prefix, id);
        assert_eq!(bare, id);
    }

    #[test]
    fn rejects_garbage() {
        let err = "cfg-nope".parse::<ConfigId>().unwrap_err();
        assert_eq!(err, DomainError::InvalidId("cfg-nope".to_string()));
    }

    #[test]
    fn serializes_as_bare_ulid_string() {
        let id = InstanceId::from_ulid(Ulid::new());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_ulid()));

        let back: InstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn cast_keeps_the_ulid() {
        let config = ConfigId::from_ulid(Ulid::new());
        let group: GroupId = config.cast();
        assert_eq!(group.as_ulid(), config.as_ulid());
    }
}

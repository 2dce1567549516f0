//! PlanStore port - where plan snapshots are kept
//!
//! The store is the source of truth between runs. It only ever moves whole
//! snapshots; every mutation happens on an in-memory `Plan` in between.
//!
//! # Implementations
//! - **JsonFileStore**: one JSON file, replaced atomically on save
//! - **InMemoryStore**: for tests

use thiserror::Error;

use crate::app::Plan;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("plan store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("plan snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// PlanStore loads and saves plan snapshots.
///
/// `load` on a store that has never been saved to returns an empty plan.
pub trait PlanStore {
    fn load(&self) -> Result<Plan, StoreError>;

    fn save(&self, plan: &Plan) -> Result<(), StoreError>;
}

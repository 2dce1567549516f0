//! InMemoryStore - a plan snapshot held in memory, for tests

use std::sync::Mutex;

use crate::app::Plan;
use crate::ports::{PlanStore, StoreError};

/// Holds the last saved plan behind a `Mutex`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    plan: Mutex<Plan>,
    saves: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(plan: Plan) -> Self {
        Self {
            plan: Mutex::new(plan),
            saves: Mutex::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlanStore for InMemoryStore {
    fn load(&self) -> Result<Plan, StoreError> {
        let plan = self.plan.lock().unwrap_or_else(|e| e.into_inner());
        Ok(plan.clone())
    }

    fn save(&self, plan: &Plan) -> Result<(), StoreError> {
        *self.plan.lock().unwrap_or_else(|e| e.into_inner()) = plan.clone();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

//! JsonFileStore - a plan snapshot in a single JSON file

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::Plan;
use crate::ports::{PlanStore, StoreError};

/// Keeps the plan as pretty-printed JSON at `path`.
///
/// Saves go to `<path>.tmp` first and are renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl PlanStore for JsonFileStore {
    fn load(&self) -> Result<Plan, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(Plan::new());
            }
            Err(e) => return Err(e.into()),
        };
        let plan: Plan = serde_json::from_str(&text)?;
        debug!(
            path = %self.path.display(),
            configs = plan.configs.len(),
            "loaded plan snapshot"
        );
        Ok(plan)
    }

    fn save(&self, plan: &Plan) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(plan)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), "saved plan snapshot");
        Ok(())
    }
}

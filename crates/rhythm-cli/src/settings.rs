use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "rhythm";
const APPLICATION: &str = "rhythm";

/// CLI settings, read from `settings.toml` in the platform config directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Snapshot file; defaults to `plan.json` in the platform data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Days shown by `calendar`.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// How many past days the calendar starts before today.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Include hidden (superseded) generations in listings and calendars.
    #[serde(default)]
    pub show_hidden: bool,
}

fn default_window_days() -> u32 {
    15
}

fn default_lookback_days() -> u32 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            window_days: default_window_days(),
            lookback_days: default_lookback_days(),
            show_hidden: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

impl Settings {
    /// `settings.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Reads settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    /// The snapshot path: the configured one, or `plan.json` in the platform
    /// data directory.
    pub fn data_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        let dirs = project_dirs().context("failed to resolve the platform data directory")?;
        Ok(dirs.data_dir().join("plan.json"))
    }
}

//! Recorded completions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::ids::InstanceId;

fn done() -> u32 {
    1
}

/// One logged completion of a config on a calendar day.
///
/// Only the date part of `completed_at` matters for scheduling. For
/// non-tracker kinds `progress` is always 1; trackers mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub completed_at: NaiveDateTime,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,

    #[serde(default)]
    pub comment: String,

    #[serde(default = "done")]
    pub progress: u32,
}

impl Instance {
    pub fn new(id: InstanceId, completed_at: NaiveDateTime) -> Self {
        Self {
            id,
            completed_at,
            image_urls: Vec::new(),
            comment: String::new(),
            progress: done(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self {
        self.image_urls = urls;
        self
    }

    pub fn with_progress(mut self, progress: u32) -> Self {
        self.progress = progress;
        self
    }

    /// Calendar day of the completion.
    pub fn day(&self) -> NaiveDate {
        self.completed_at.date()
    }
}

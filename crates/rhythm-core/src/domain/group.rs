//! Generations of one logical task.
//!
//! Closing a cycle and starting over appends a new `TaskConfig` under the
//! same `group_id`; older generations are immutable history. A group is an
//! append-only, start-ordered list of those rows.

use std::collections::BTreeMap;

use super::config::TaskConfig;
use super::ids::GroupId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigGroup {
    pub group_id: GroupId,
    generations: Vec<TaskConfig>,
}

impl ConfigGroup {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            generations: Vec::new(),
        }
    }

    /// Group a flat list of configs by `group_id`.
    pub fn collect<'a>(configs: impl IntoIterator<Item = &'a TaskConfig>) -> Vec<ConfigGroup> {
        let mut groups: BTreeMap<GroupId, ConfigGroup> = BTreeMap::new();
        for config in configs {
            groups
                .entry(config.group_id)
                .or_insert_with(|| ConfigGroup::new(config.group_id))
                .push(config.clone());
        }
        groups.into_values().collect()
    }

    /// Append a generation. Configs of another group are ignored and
    /// returned back.
    pub fn push(&mut self, config: TaskConfig) -> Option<TaskConfig> {
        if config.group_id != self.group_id {
            return Some(config);
        }
        self.generations.push(config);
        self.generations.sort_by(|a, b| {
            a.starting_from
                .cmp(&b.starting_from)
                .then_with(|| a.creation_date.cmp(&b.creation_date))
        });
        None
    }

    pub fn generations(&self) -> &[TaskConfig] {
        &self.generations
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// The generation that represents the task now: the open one if any,
    /// otherwise the one closed last.
    pub fn latest(&self) -> Option<&TaskConfig> {
        self.generations
            .iter()
            .rev()
            .find(|c| c.is_open())
            .or_else(|| {
                self.generations
                    .iter()
                    .max_by_key(|c| (c.completed_date, c.creation_date))
            })
    }
}

//! Plan - the snapshot every operation reads and writes.
//!
//! A plan holds all config generations and the instances logged against
//! them. It is a plain value: the store loads one, the planner mutates it,
//! the store saves it back. The engine functions only ever see borrowed
//! slices of it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigGroup, ConfigId, GroupId, Instance, TaskConfig};
use crate::schedule::{
    CalendarView, DayWindow, ProgressCounts, aggregate_progress, progress_by_group,
    progress_counts,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub configs: Vec<TaskConfig>,

    /// Instances per config. A config without instances may be missing.
    #[serde(default)]
    pub instances: BTreeMap<ConfigId, Vec<Instance>>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self, id: ConfigId) -> Option<&TaskConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub(crate) fn config_mut(&mut self, id: ConfigId) -> Option<&mut TaskConfig> {
        self.configs.iter_mut().find(|c| c.id == id)
    }

    pub fn instances_of(&self, id: ConfigId) -> &[Instance] {
        self.instances.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The instance of `id` logged on `day`, if any.
    pub fn instance_on(&self, id: ConfigId, day: NaiveDate) -> Option<&Instance> {
        self.instances_of(id).iter().find(|i| i.day() == day)
    }

    pub fn groups(&self) -> Vec<ConfigGroup> {
        ConfigGroup::collect(&self.configs)
    }

    pub fn group(&self, group_id: GroupId) -> Option<ConfigGroup> {
        let mut group = ConfigGroup::new(group_id);
        for config in self.configs.iter().filter(|c| c.group_id == group_id) {
            group.push(config.clone());
        }
        (!group.is_empty()).then_some(group)
    }

    /// Each config paired with its instances, in storage order.
    pub fn entries(&self) -> impl Iterator<Item = (&TaskConfig, &[Instance])> {
        self.configs.iter().map(|c| (c, self.instances_of(c.id)))
    }

    /// Configs that are not hidden, in schedule order.
    pub fn visible_configs(&self) -> Vec<&TaskConfig> {
        let mut visible: Vec<&TaskConfig> = self.configs.iter().filter(|c| !c.is_hidden).collect();
        visible.sort_by(|a, b| a.schedule_cmp(b));
        visible
    }

    /// Visible configs whose cycle is still open.
    pub fn active_configs(&self) -> Vec<&TaskConfig> {
        self.visible_configs()
            .into_iter()
            .filter(|c| c.is_open())
            .collect()
    }

    /// Visible configs whose cycle has been closed.
    pub fn finished_configs(&self) -> Vec<&TaskConfig> {
        self.visible_configs()
            .into_iter()
            .filter(|c| !c.is_open())
            .collect()
    }

    /// Calendar over `window`; hidden configs are included only when asked.
    pub fn calendar(&self, window: DayWindow, show_hidden: bool) -> CalendarView<'_> {
        let configs = self
            .configs
            .iter()
            .filter(move |c| show_hidden || !c.is_hidden);
        CalendarView::build(configs, &self.instances, window)
    }

    pub fn progress_of(&self, id: ConfigId, today: NaiveDate) -> Option<ProgressCounts> {
        self.config(id)
            .map(|c| progress_counts(c, self.instances_of(id), today))
    }

    pub fn progress_by_group(&self, today: NaiveDate) -> BTreeMap<GroupId, ProgressCounts> {
        progress_by_group(self.entries(), today)
    }

    /// Overall counts across every generation, hidden ones included.
    pub fn progress(&self, today: NaiveDate) -> ProgressCounts {
        aggregate_progress(self.entries(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::fixtures::{config, date, monday};
    use crate::domain::{InstanceId, TaskKind};
    use ulid::Ulid;

    fn logged(day: NaiveDate) -> Instance {
        Instance::new(
            InstanceId::from_ulid(Ulid::new()),
            day.and_hms_opt(19, 30, 0).unwrap(),
        )
    }

    #[test]
    fn views_split_open_and_closed_visible_configs() {
        let open = config(TaskKind::Habit, monday());
        let closed = config(TaskKind::Habit, monday()).completed_on(date(2024, 1, 5));
        let mut hidden = config(TaskKind::Habit, monday()).completed_on(date(2024, 1, 3));
        hidden.is_hidden = true;

        let plan = Plan {
            configs: vec![open.clone(), closed.clone(), hidden],
            instances: BTreeMap::new(),
        };

        assert_eq!(plan.visible_configs().len(), 2);
        assert_eq!(plan.active_configs()[0].id, open.id);
        assert_eq!(plan.finished_configs()[0].id, closed.id);
    }

    #[test]
    fn missing_instance_list_reads_as_empty() {
        let habit = config(TaskKind::Habit, monday());
        let plan = Plan {
            configs: vec![habit.clone()],
            instances: BTreeMap::new(),
        };
        assert!(plan.instances_of(habit.id).is_empty());
        assert_eq!(
            plan.progress_of(habit.id, date(2024, 1, 3)),
            Some(ProgressCounts::new(2, 0))
        );
    }

    #[test]
    fn group_collects_generations_and_progress_sums_them() {
        let first = config(TaskKind::Habit, monday()).completed_on(date(2024, 1, 2));
        let mut second = config(TaskKind::Habit, date(2024, 1, 3));
        second.group_id = first.group_id;

        let plan = Plan {
            configs: vec![first.clone(), second.clone()],
            instances: BTreeMap::from([
                (first.id, vec![logged(date(2024, 1, 1))]),
                (second.id, vec![logged(date(2024, 1, 3))]),
            ]),
        };

        let group = plan.group(first.group_id).unwrap();
        assert_eq!(group.generations().len(), 2);
        assert_eq!(group.latest().map(|c| c.id), Some(second.id));
        assert!(plan.group(GroupId::from_ulid(Ulid::new())).is_none());

        // first: 2 due, 1 done; second: 2 due (3rd, 4th), 1 done
        let today = date(2024, 1, 5);
        assert_eq!(plan.progress(today), ProgressCounts::new(4, 2));
        assert_eq!(plan.progress_by_group(today).len(), 1);
    }

    #[test]
    fn snapshot_json_keys_instances_by_bare_ulid() {
        let habit = config(TaskKind::Habit, monday());
        let plan = Plan {
            configs: vec![habit.clone()],
            instances: BTreeMap::from([(habit.id, vec![logged(monday())])]),
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["instances"][habit.id.as_ulid().to_string()].is_array());

        let back: Plan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
        assert_eq!(serde_json::from_str::<Plan>("{}").unwrap(), Plan::new());
    }
}

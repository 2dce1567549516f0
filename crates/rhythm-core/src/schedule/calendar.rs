//! Per-day aggregation across many configs, for calendar rendering.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::day::DayWindow;
use super::recurrence::due_offsets;
use crate::domain::{ConfigId, Instance, TaskConfig};

/// Configs due on each offset of `window`, in schedule order.
///
/// Every offset of the window has an entry, possibly empty.
pub fn due_configs_by_day<'a>(
    configs: impl IntoIterator<Item = &'a TaskConfig>,
    window: &DayWindow,
) -> BTreeMap<i64, Vec<&'a TaskConfig>> {
    let mut ordered: Vec<&TaskConfig> = configs.into_iter().collect();
    ordered.sort_by(|a, b| a.schedule_cmp(b));

    let mut by_day: BTreeMap<i64, Vec<&TaskConfig>> =
        window.offsets().map(|offset| (offset, Vec::new())).collect();
    for config in ordered {
        for offset in due_offsets(config, window) {
            if let Some(bucket) = by_day.get_mut(&offset) {
                bucket.push(config);
            }
        }
    }
    by_day
}

/// The instance recorded for each config on each offset of `window`.
///
/// Instances are bucketed by their calendar day relative to the window's
/// reference date; days outside the window are dropped. When a config has
/// more than one instance on a day the latest one wins.
pub fn recorded_instances_by_day<'a>(
    instances: &'a BTreeMap<ConfigId, Vec<Instance>>,
    window: &DayWindow,
) -> BTreeMap<i64, BTreeMap<ConfigId, &'a Instance>> {
    let mut by_day: BTreeMap<i64, BTreeMap<ConfigId, &Instance>> =
        window.offsets().map(|offset| (offset, BTreeMap::new())).collect();

    for (config_id, logged) in instances {
        for instance in logged {
            let offset = window.offset_of(instance.day());
            let Some(bucket) = by_day.get_mut(&offset) else {
                continue;
            };
            bucket
                .entry(*config_id)
                .and_modify(|kept| {
                    if instance.completed_at > kept.completed_at {
                        *kept = instance;
                    }
                })
                .or_insert(instance);
        }
    }
    by_day
}

/// A due config and what was recorded for it on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEntry<'a> {
    pub config: &'a TaskConfig,
    pub instance: Option<&'a Instance>,
}

impl CalendarEntry<'_> {
    pub fn is_done(&self) -> bool {
        self.instance.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub offset: i64,
    pub date: NaiveDate,
    pub entries: Vec<CalendarEntry<'a>>,
}

impl CalendarDay<'_> {
    pub fn done_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_done()).count()
    }
}

/// Both day maps of a window joined into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView<'a> {
    pub window: DayWindow,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> CalendarView<'a> {
    pub fn build(
        configs: impl IntoIterator<Item = &'a TaskConfig>,
        instances: &'a BTreeMap<ConfigId, Vec<Instance>>,
        window: DayWindow,
    ) -> Self {
        let due = due_configs_by_day(configs, &window);
        let recorded = recorded_instances_by_day(instances, &window);

        let days = due
            .into_iter()
            .map(|(offset, configs)| {
                let logged = recorded.get(&offset);
                let entries = configs
                    .into_iter()
                    .map(|config| CalendarEntry {
                        config,
                        instance: logged.and_then(|m| m.get(&config.id).copied()),
                    })
                    .collect();
                CalendarDay {
                    offset,
                    date: window.date_at(offset),
                    entries,
                }
            })
            .collect();

        Self { window, days }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a>> {
        let offset = self.window.offset_of(date);
        self.days.iter().find(|d| d.offset == offset)
    }
}

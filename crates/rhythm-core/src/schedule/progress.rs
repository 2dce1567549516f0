//! Progress accounting over a config's whole active lifetime.

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::day::days_between;
use crate::domain::{
    GroupId, Instance, RING_SIZE, TaskConfig, TaskKind, add_to_week_day, week_days_interval,
};

/// Due instances (`target`) versus instances that count as done
/// (`completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressCounts {
    pub target: u32,
    pub completed: u32,
}

impl ProgressCounts {
    pub fn new(target: u32, completed: u32) -> Self {
        Self { target, completed }
    }

    /// `completed / target`, or 0 when nothing was due.
    pub fn ratio(&self) -> f64 {
        if self.target == 0 {
            0.0
        } else {
            f64::from(self.completed) / f64::from(self.target)
        }
    }

    /// Whole percent, truncated.
    pub fn percent(&self) -> u32 {
        if self.target == 0 {
            0
        } else {
            (u64::from(self.completed) * 100 / u64::from(self.target)) as u32
        }
    }
}

impl Add for ProgressCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            target: self.target + rhs.target,
            completed: self.completed + rhs.completed,
        }
    }
}

impl AddAssign for ProgressCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ProgressCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Days of the active range that can hold a due instance, or `None` when
/// the config was closed before it started.
///
/// An open cycle does not count today; a closed cycle counts its closing
/// day.
fn counted_days(config: &TaskConfig, today: NaiveDate) -> Option<i64> {
    let end_date = config.completed_date.unwrap_or(today);
    let to_add = i64::from(config.completed_date.is_some());

    let diff = days_between(config.starting_from, end_date);
    if diff < 0 {
        debug!(
            config_id = %config.id,
            starting_from = %config.starting_from,
            end_date = %end_date,
            "inverted date range, counting nothing"
        );
        return None;
    }
    Some(diff.max(0) + to_add)
}

/// Number of due instances between `starting_from` and the end of the
/// cycle (`today` while open).
///
/// Whole weeks contribute one instance per weekday; the trailing partial
/// week counts the weekdays in the ring interval starting at the
/// starting weekday.
pub fn target_count(config: &TaskConfig, today: NaiveDate) -> u32 {
    let Some(days_diff) = counted_days(config, today) else {
        return 0;
    };

    // Goals are closed on their starting day (`TaskConfig::prepared`), so
    // the range is that one day and the weekday set plays no part.
    if config.kind.is_goal() {
        return u32::from(days_diff > 0);
    }

    let ring = i64::from(RING_SIZE);
    let full_weeks = days_diff / ring;
    let remainder_days = days_diff - full_weeks * ring;

    let start_ring = config.start_ring_value();
    let partial = week_days_interval(start_ring, add_to_week_day(start_ring, remainder_days));
    let in_partial = config
        .week_days
        .iter()
        .filter(|d| partial.contains(&d.value()))
        .count() as i64;

    let target = full_weeks * config.week_days.len() as i64 + in_partial;
    u32::try_from(target).unwrap_or(u32::MAX)
}

/// Target and completed counts for one config and all of its instances.
///
/// While the cycle is open an instance logged today is not settled yet and
/// does not count. Tracker instances count only at or above the edge; a
/// tracker that is not to be filled counts the due days that stayed below
/// the edge instead.
pub fn progress_counts(
    config: &TaskConfig,
    instances: &[Instance],
    today: NaiveDate,
) -> ProgressCounts {
    if counted_days(config, today).is_none() {
        return ProgressCounts::default();
    }
    let target = target_count(config, today);

    let settled = instances
        .iter()
        .filter(|instance| config.completed_date.is_some() || instance.day() != today);
    let completed = match &config.kind {
        TaskKind::Habit | TaskKind::Goal => settled.count() as u32,
        TaskKind::Tracker(rule) => {
            let raw = settled
                .filter(|instance| rule.is_satisfied(instance.progress))
                .count() as u32;
            if rule.to_fill {
                raw
            } else {
                target.saturating_sub(raw)
            }
        }
    };

    ProgressCounts::new(target, completed)
}

/// Per-group counts, summing every generation of each group.
pub fn progress_by_group<'a>(
    entries: impl IntoIterator<Item = (&'a TaskConfig, &'a [Instance])>,
    today: NaiveDate,
) -> BTreeMap<GroupId, ProgressCounts> {
    let mut by_group: BTreeMap<GroupId, ProgressCounts> = BTreeMap::new();
    for (config, instances) in entries {
        *by_group.entry(config.group_id).or_default() += progress_counts(config, instances, today);
    }
    by_group
}

/// Overall counts: grouped by `group_id` first, then summed across groups.
pub fn aggregate_progress<'a>(
    entries: impl IntoIterator<Item = (&'a TaskConfig, &'a [Instance])>,
    today: NaiveDate,
) -> ProgressCounts {
    progress_by_group(entries, today).into_values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::fixtures::{config, date, monday};
    use crate::domain::{InstanceId, TrackerRule, WeekDay};
    use chrono::Duration;
    use rstest::rstest;
    use ulid::Ulid;

    fn logged(day: NaiveDate) -> Instance {
        Instance::new(
            InstanceId::from_ulid(Ulid::new()),
            day.and_hms_opt(20, 0, 0).unwrap(),
        )
    }

    fn day(offset: i64) -> NaiveDate {
        monday() + Duration::days(offset)
    }

    #[test]
    fn open_cycle_excludes_today() {
        let habit = config(TaskKind::Habit, monday());
        assert_eq!(target_count(&habit, day(6)), 6);
    }

    #[test]
    fn closed_cycle_includes_its_closing_day() {
        let habit = config(TaskKind::Habit, monday()).completed_on(day(6));
        assert_eq!(target_count(&habit, day(30)), 7);
    }

    #[rstest]
    #[case::same_day_open(0, None, 0)]
    #[case::same_day_closed(0, Some(0), 1)]
    #[case::first_week_partial(3, None, 2)]
    #[case::exactly_two_weeks(14, None, 6)]
    #[case::two_weeks_and_a_day(15, None, 7)]
    #[case::closed_mid_week(20, Some(9), 5)]
    fn mon_wed_fri_targets(#[case] today: i64, #[case] closed: Option<i64>, #[case] expected: u32) {
        let mut habit = config(TaskKind::Habit, monday())
            .with_week_days([WeekDay::Monday, WeekDay::Wednesday, WeekDay::Friday]);
        habit.completed_date = closed.map(day);
        assert_eq!(target_count(&habit, day(today)), expected);
    }

    #[test]
    fn partial_week_wraps_past_saturday() {
        // starts Friday, due on Sundays: Fri, Sat, Sun counted after 3 days
        let habit = config(TaskKind::Habit, date(2024, 1, 5)).with_week_days([WeekDay::Sunday]);
        assert_eq!(target_count(&habit, date(2024, 1, 7)), 0);
        assert_eq!(target_count(&habit, date(2024, 1, 8)), 1);
    }

    #[test]
    fn target_matches_the_weekday_ring_for_any_length() {
        let habit = config(TaskKind::Habit, date(2024, 1, 3))
            .with_week_days([WeekDay::Tuesday, WeekDay::Saturday]);
        for span in 0..40 {
            let today = date(2024, 1, 3) + Duration::days(span);
            let expected = (0..span)
                .map(|o| date(2024, 1, 3) + Duration::days(o))
                .filter(|d| habit.week_days.contains(&WeekDay::of(*d)))
                .count() as u32;
            assert_eq!(target_count(&habit, today), expected, "span {span}");
        }
    }

    #[test]
    fn inverted_range_counts_nothing() {
        let habit = config(TaskKind::Habit, day(5)).completed_on(day(4));
        let counts = progress_counts(&habit, &[logged(day(5))], day(10));
        assert_eq!(counts, ProgressCounts::default());
    }

    #[test]
    fn prepared_goal_targets_one() {
        let goal = config(TaskKind::Goal, day(2)).prepared();
        let done = progress_counts(&goal, &[logged(day(2))], day(2));
        assert_eq!(done, ProgressCounts::new(1, 1));

        let missed = progress_counts(&goal, &[], day(9));
        assert_eq!(missed, ProgressCounts::new(1, 0));
    }

    #[test]
    fn todays_instance_waits_until_the_cycle_closes() {
        let habit = config(TaskKind::Habit, monday());
        let instances = [logged(day(0)), logged(day(3))];

        let open = progress_counts(&habit, &instances, day(3));
        assert_eq!(open, ProgressCounts::new(3, 1));

        let closed = habit.completed_on(day(3));
        assert_eq!(
            progress_counts(&closed, &instances, day(3)),
            ProgressCounts::new(4, 2)
        );
    }

    #[test]
    fn filling_tracker_counts_satisfied_days() {
        let tracker = config(TaskKind::Tracker(TrackerRule::new(10, 8, true)), monday()).prepared();
        let instances = [
            logged(day(0)).with_progress(9),
            logged(day(1)).with_progress(3),
            logged(day(2)).with_progress(8),
        ];
        assert_eq!(
            progress_counts(&tracker, &instances, day(3)),
            ProgressCounts::new(3, 2)
        );
    }

    #[test]
    fn draining_tracker_inverts_the_count() {
        let tracker = config(TaskKind::Tracker(TrackerRule::new(10, 8, false)), monday()).prepared();
        let instances = [logged(day(1)).with_progress(9)];
        assert_eq!(
            progress_counts(&tracker, &instances, day(3)),
            ProgressCounts::new(3, 2)
        );
    }

    #[test]
    fn draining_tracker_never_goes_negative() {
        let tracker = config(TaskKind::Tracker(TrackerRule::new(10, 2, false)), monday()).prepared();
        // a duplicated log: two satisfying instances against one due day
        let instances = [
            logged(day(0)).with_progress(5),
            logged(day(0)).with_progress(5),
        ];
        assert_eq!(
            progress_counts(&tracker, &instances, day(1)),
            ProgressCounts::new(1, 0)
        );
    }

    #[test]
    fn aggregate_groups_generations_then_sums() {
        let first = config(TaskKind::Habit, monday()).completed_on(day(6));
        let mut second = config(TaskKind::Habit, day(7));
        second.group_id = first.group_id;
        let other = config(TaskKind::Habit, monday()).with_week_days([WeekDay::Monday]);

        let first_done = [logged(day(0)), logged(day(1))];
        let second_done = [logged(day(7))];
        let entries = [
            (&first, &first_done[..]),
            (&second, &second_done[..]),
            (&other, &[][..]),
        ];

        let by_group = progress_by_group(entries, day(10));
        assert_eq!(by_group.len(), 2);
        assert_eq!(by_group[&first.group_id], ProgressCounts::new(10, 3));
        assert_eq!(by_group[&other.group_id], ProgressCounts::new(2, 0));

        assert_eq!(aggregate_progress(entries, day(10)), ProgressCounts::new(12, 3));
    }

    #[rstest]
    #[case(ProgressCounts::new(0, 0), 0)]
    #[case(ProgressCounts::new(3, 1), 33)]
    #[case(ProgressCounts::new(3, 2), 66)]
    #[case(ProgressCounts::new(4, 4), 100)]
    fn percent_truncates(#[case] counts: ProgressCounts, #[case] expected: u32) {
        assert_eq!(counts.percent(), expected);
    }

    #[test]
    fn ratio_of_empty_target_is_zero() {
        assert_eq!(ProgressCounts::default().ratio(), 0.0);
        assert_eq!(ProgressCounts::new(4, 1).ratio(), 0.25);
    }
}

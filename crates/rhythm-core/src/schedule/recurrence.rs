//! Recurrence evaluation: on which day offsets a config is due.

use std::collections::BTreeSet;

use tracing::trace;

use super::day::{DayWindow, days_between};
use crate::domain::{TaskConfig, TaskKind, WeekDay};

/// Day offsets inside `window` on which `config` is due.
///
/// The active range is the window clipped to `[starting_from,
/// completed_date]`. A goal is due once, on its starting day. Habits and
/// trackers are due on a weekly lattice anchored at the window's reference
/// date: each weekday walks from its raw offset (`-6..=6`, the weekday's
/// distance from the reference weekday) in steps of seven, keeping only
/// offsets inside the active range.
///
/// The walk never goes back past the raw offset, so a habit or tracker is
/// never due earlier than the reference week even when the window starts
/// before it. Windows anchored at their first day (`start >= 0`) are not
/// affected.
pub fn due_offsets(config: &TaskConfig, window: &DayWindow) -> BTreeSet<i64> {
    let mut due = BTreeSet::new();

    let start = window
        .start
        .max(days_between(window.reference, config.starting_from));
    let end = match config.completed_date {
        Some(completed) => window.end.min(days_between(window.reference, completed)),
        None => window.end,
    };
    if end < start {
        trace!(config_id = %config.id, start, end, "no active days in window");
        return due;
    }

    match config.kind {
        TaskKind::Goal => {
            let offset = days_between(window.reference, config.starting_from);
            if (start..=end).contains(&offset) {
                due.insert(offset);
            }
        }
        TaskKind::Habit | TaskKind::Tracker(_) => {
            let reference_ring = i64::from(WeekDay::of(window.reference).value());
            for week_day in &config.week_days {
                let mut index = i64::from(week_day.value()) - reference_ring;
                while index <= end {
                    if index >= start {
                        due.insert(index);
                    }
                    index += 7;
                }
            }
        }
    }

    due
}

/// Whether `config` is due on `offset` of `window`.
pub fn is_due_at(config: &TaskConfig, window: &DayWindow, offset: i64) -> bool {
    let day = DayWindow::new(window.reference, offset, offset);
    window.contains(offset) && due_offsets(config, &day).contains(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::fixtures::{config, date, monday};
    use crate::domain::TrackerRule;
    use chrono::NaiveDate;
    use rstest::rstest;

    /// Lattice offsets computed from the first in-range matching weekday.
    fn closed_form(config: &TaskConfig, window: &DayWindow) -> BTreeSet<i64> {
        let start = window
            .start
            .max(days_between(window.reference, config.starting_from));
        let end = config
            .completed_date
            .map(|c| window.end.min(days_between(window.reference, c)))
            .unwrap_or(window.end);
        let reference_ring = i64::from(WeekDay::of(window.reference).value());

        let mut due = BTreeSet::new();
        for week_day in &config.week_days {
            let base = i64::from(week_day.value()) - reference_ring;
            let first = start + (base - start).rem_euclid(7);
            let mut offset = first;
            while offset <= end {
                due.insert(offset);
                offset += 7;
            }
        }
        due
    }

    #[test]
    fn monday_habit_over_two_weeks() {
        let habit = config(TaskKind::Habit, monday()).with_week_days([WeekDay::Monday]);
        let window = DayWindow::of_len(monday(), 14);
        assert_eq!(due_offsets(&habit, &window), BTreeSet::from([0, 7]));
    }

    #[test]
    fn goal_is_due_once_when_window_contains_start() {
        let goal = config(TaskKind::Goal, date(2024, 1, 3)).prepared();

        for days in [3, 14, 60] {
            let window = DayWindow::of_len(monday(), days);
            assert_eq!(due_offsets(&goal, &window), BTreeSet::from([2]), "{days} days");
        }

        let before = DayWindow::of_len(monday(), 2);
        assert!(due_offsets(&goal, &before).is_empty());
        let after = DayWindow::of_len(date(2024, 1, 4), 30);
        assert!(due_offsets(&goal, &after).is_empty());
    }

    #[test]
    fn open_goal_is_still_due_once() {
        let goal = config(TaskKind::Goal, date(2024, 1, 3));
        let window = DayWindow::of_len(monday(), 30);
        assert_eq!(due_offsets(&goal, &window), BTreeSet::from([2]));
    }

    #[test]
    fn closed_habit_stops_on_its_completed_date() {
        let habit = config(TaskKind::Habit, monday())
            .with_week_days([WeekDay::Monday, WeekDay::Friday])
            .completed_on(date(2024, 1, 8));
        let window = DayWindow::of_len(monday(), 21);
        assert_eq!(due_offsets(&habit, &window), BTreeSet::from([0, 4, 7]));
    }

    #[test]
    fn inverted_range_is_never_due() {
        let habit = config(TaskKind::Habit, date(2024, 1, 10)).completed_on(date(2024, 1, 9));
        let window = DayWindow::of_len(monday(), 30);
        assert!(due_offsets(&habit, &window).is_empty());
    }

    #[test]
    fn tracker_follows_the_same_lattice() {
        let tracker = config(TaskKind::Tracker(TrackerRule::default()), monday()).prepared();
        let window = DayWindow::of_len(monday(), 7);
        assert_eq!(due_offsets(&tracker, &window), (0..7).collect::<BTreeSet<i64>>());
    }

    #[test]
    fn start_before_the_window_is_clipped() {
        let habit = config(TaskKind::Habit, date(2023, 12, 1)).with_week_days([WeekDay::Sunday]);
        // window starts Monday 2024-01-01, first Sunday is the 7th
        let window = DayWindow::of_len(monday(), 14);
        assert_eq!(due_offsets(&habit, &window), BTreeSet::from([6, 13]));
    }

    #[rstest]
    #[case::anchored_on_monday(date(2024, 1, 1), 0, 30)]
    #[case::anchored_on_saturday(date(2024, 1, 6), 0, 14)]
    #[case::anchored_on_sunday(date(2024, 1, 7), 0, 3)]
    #[case::starting_mid_window(date(2023, 12, 15), 5, 60)]
    fn loop_matches_closed_form(#[case] reference: NaiveDate, #[case] start: i64, #[case] end: i64) {
        let window = DayWindow::new(reference, start, end);
        let habits = [
            config(TaskKind::Habit, monday())
                .with_week_days([WeekDay::Monday, WeekDay::Wednesday, WeekDay::Friday]),
            config(TaskKind::Habit, date(2023, 12, 20)).with_week_days([WeekDay::Sunday]),
            config(TaskKind::Habit, date(2023, 12, 28))
                .with_week_days([WeekDay::Saturday, WeekDay::Tuesday])
                .completed_on(date(2024, 1, 20)),
            config(TaskKind::Habit, monday()),
        ];
        for habit in &habits {
            assert_eq!(due_offsets(habit, &window), closed_form(habit, &window));
        }
    }

    #[test]
    fn window_before_the_reference_week_is_not_walked() {
        let habit = config(TaskKind::Habit, date(2023, 12, 1)).with_week_days([WeekDay::Sunday]);
        // Sunday sits one day before the Monday reference; the Sunday a week
        // earlier (-8) is inside the window but never reached
        let window = DayWindow::new(monday(), -10, 10);
        assert_eq!(due_offsets(&habit, &window), BTreeSet::from([-1, 6]));
    }

    #[test]
    fn is_due_at_checks_a_single_day() {
        let habit = config(TaskKind::Habit, monday()).with_week_days([WeekDay::Tuesday]);
        let window = DayWindow::of_len(monday(), 14);
        assert!(is_due_at(&habit, &window, 1));
        assert!(is_due_at(&habit, &window, 8));
        assert!(!is_due_at(&habit, &window, 2));
        assert!(!is_due_at(&habit, &window, 15));
    }
}

//! Optional time-of-day bounds of a config.
//!
//! Clock times never take part in due-date computation. They order configs
//! inside a day and decide whether a config currently accepts completion.

use std::cmp::Ordering;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// How long after its end time a timed config still accepts completion.
const COMPLETION_GRACE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClockWindow {
    #[default]
    Untimed,
    Timed {
        start: NaiveTime,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<NaiveTime>,
    },
}

impl ClockWindow {
    pub fn at(start: NaiveTime) -> Self {
        ClockWindow::Timed { start, end: None }
    }

    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        ClockWindow::Timed {
            start,
            end: Some(end),
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, ClockWindow::Timed { .. })
    }

    pub fn start(&self) -> Option<NaiveTime> {
        match self {
            ClockWindow::Timed { start, .. } => Some(*start),
            ClockWindow::Untimed => None,
        }
    }

    pub fn end(&self) -> Option<NaiveTime> {
        match self {
            ClockWindow::Timed { end, .. } => *end,
            ClockWindow::Untimed => None,
        }
    }

    /// Whether a completion may be recorded at `now`.
    ///
    /// Untimed configs are always open. A timed config opens at its start
    /// time and closes one hour after its end time (its start time when it
    /// has no end).
    pub fn is_open_at(&self, now: NaiveTime) -> bool {
        match self {
            ClockWindow::Untimed => true,
            ClockWindow::Timed { start, end } => {
                let deadline = end.unwrap_or(*start);
                now >= *start
                    && now.signed_duration_since(deadline)
                        <= Duration::minutes(COMPLETION_GRACE_MINUTES)
            }
        }
    }

    /// Display order within a day: timed before untimed, then by start
    /// time, then by end time (a missing end first). Returns `Equal` when
    /// the caller has to fall back to another key.
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ClockWindow::Untimed, ClockWindow::Untimed) => Ordering::Equal,
            (ClockWindow::Timed { .. }, ClockWindow::Untimed) => Ordering::Less,
            (ClockWindow::Untimed, ClockWindow::Timed { .. }) => Ordering::Greater,
            (
                ClockWindow::Timed { start: s1, end: e1 },
                ClockWindow::Timed { start: s2, end: e2 },
            ) => s1.cmp(s2).then_with(|| match (e1, e2) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let ClockWindow::Timed {
            start,
            end: Some(end),
        } = self
        {
            if end < start {
                return Err(DomainError::EndBeforeStart {
                    start: *start,
                    end: *end,
                });
            }
        }
        Ok(())
    }

    /// `"8:00"` or `"8:00-8:30"`; empty when untimed.
    pub fn label(&self) -> String {
        match self {
            ClockWindow::Untimed => String::new(),
            ClockWindow::Timed { start, end: None } => start.format("%-H:%M").to_string(),
            ClockWindow::Timed {
                start,
                end: Some(end),
            } => format!("{}-{}", start.format("%-H:%M"), end.format("%-H:%M")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn timed_sorts_before_untimed() {
        let timed = ClockWindow::at(hm(22, 0));
        assert_eq!(timed.schedule_cmp(&ClockWindow::Untimed), Ordering::Less);
        assert_eq!(ClockWindow::Untimed.schedule_cmp(&timed), Ordering::Greater);
    }

    #[test]
    fn earlier_start_then_missing_end_first() {
        let early = ClockWindow::at(hm(7, 0));
        let late = ClockWindow::at(hm(8, 0));
        assert_eq!(early.schedule_cmp(&late), Ordering::Less);

        let open_ended = ClockWindow::at(hm(8, 0));
        let bounded = ClockWindow::between(hm(8, 0), hm(8, 30));
        assert_eq!(open_ended.schedule_cmp(&bounded), Ordering::Less);

        let longer = ClockWindow::between(hm(8, 0), hm(9, 0));
        assert_eq!(bounded.schedule_cmp(&longer), Ordering::Less);
        assert_eq!(bounded.schedule_cmp(&bounded), Ordering::Equal);
    }

    #[rstest]
    #[case::before_start(hm(7, 59), false)]
    #[case::at_start(hm(8, 0), true)]
    #[case::inside(hm(8, 15), true)]
    #[case::within_grace(hm(9, 30), true)]
    #[case::after_grace(hm(9, 31), false)]
    fn bounded_window_open_hours(#[case] now: NaiveTime, #[case] open: bool) {
        let window = ClockWindow::between(hm(8, 0), hm(8, 30));
        assert_eq!(window.is_open_at(now), open);
    }

    #[test]
    fn untimed_is_always_open() {
        assert!(ClockWindow::Untimed.is_open_at(hm(0, 0)));
        assert!(ClockWindow::Untimed.is_open_at(hm(23, 59)));
    }

    #[test]
    fn start_only_window_uses_start_as_deadline() {
        let window = ClockWindow::at(hm(8, 0));
        assert!(window.is_open_at(hm(9, 0)));
        assert!(!window.is_open_at(hm(9, 1)));
    }

    #[test]
    fn validate_rejects_inverted_times() {
        let bad = ClockWindow::between(hm(9, 0), hm(8, 0));
        assert!(matches!(
            bad.validate(),
            Err(DomainError::EndBeforeStart { .. })
        ));
        assert!(ClockWindow::between(hm(8, 0), hm(9, 0)).validate().is_ok());
    }

    #[test]
    fn label_formats_hours_without_padding() {
        assert_eq!(ClockWindow::between(hm(8, 0), hm(8, 30)).label(), "8:00-8:30");
        assert_eq!(ClockWindow::at(hm(18, 5)).label(), "18:05");
        assert_eq!(ClockWindow::Untimed.label(), "");
    }
}

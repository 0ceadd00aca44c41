//! Maps a comparison kind to its two date windows.

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use adpulse_core::DateRange;

use crate::error::AnalyticsError;

/// Trailing length of the `current` window for
/// [`ComparisonKind::BiweeklyVsMonthly`].
pub const BIWEEKLY_WINDOW_DAYS: i64 = 14;

/// Trailing length of the `previous` window for
/// [`ComparisonKind::BiweeklyVsMonthly`].
///
/// Fixed at 28 days so both windows cover whole weeks and carry the same
/// weekday mix. A 30-day window would not.
pub const MONTHLY_WINDOW_DAYS: i64 = 28;

/// Which two windows a digest section compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Yesterday vs. the day before.
    Daily,
    /// Monday→today vs. the prior full Monday–Sunday week.
    Weekly,
    /// The prior full week vs. the week before that.
    PrevWeekly,
    /// Trailing 14 days vs. trailing 28 days, both averaged per day.
    ///
    /// The windows overlap on purpose; they measure run rate against the
    /// longer baseline, not sequential periods.
    BiweeklyVsMonthly,
}

impl ComparisonKind {
    pub const ALL: [Self; 4] = [
        Self::Daily,
        Self::Weekly,
        Self::PrevWeekly,
        Self::BiweeklyVsMonthly,
    ];

    /// Whether totals for this kind are averaged per day before comparison.
    pub fn normalized(self) -> bool {
        matches!(self, Self::BiweeklyVsMonthly)
    }

    /// Section heading used by the renderer.
    pub fn title(self) -> &'static str {
        match self {
            Self::Daily => "Yesterday vs. the day before",
            Self::Weekly => "This week vs. last week",
            Self::PrevWeekly => "Last week vs. the week before",
            Self::BiweeklyVsMonthly => "Last 14 days vs. last 28, per day",
        }
    }
}

impl std::fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::PrevWeekly => write!(f, "prev_weekly"),
            Self::BiweeklyVsMonthly => write!(f, "biweekly_vs_monthly"),
        }
    }
}

impl FromStr for ComparisonKind {
    type Err = AnalyticsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "prev_weekly" => Ok(Self::PrevWeekly),
            "biweekly_vs_monthly" => Ok(Self::BiweeklyVsMonthly),
            other => Err(AnalyticsError::UnsupportedPeriodKind(other.to_string())),
        }
    }
}

/// The two windows a comparison runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonWindows {
    pub current: DateRange,
    pub previous: DateRange,
}

/// Resolve a comparison kind to its two windows relative to `today`.
///
/// `today` is the caller's reference day, already truncated to the local
/// date of whoever the digest is for. All returned ranges are inclusive.
/// For every kind except [`ComparisonKind::BiweeklyVsMonthly`] the windows
/// are disjoint with `previous.end < current.start`.
pub fn resolve(kind: ComparisonKind, today: NaiveDate) -> ComparisonWindows {
    match kind {
        ComparisonKind::Daily => {
            let yesterday = today - Duration::days(1);
            ComparisonWindows {
                current: DateRange::single(yesterday),
                previous: DateRange::single(yesterday - Duration::days(1)),
            }
        }
        ComparisonKind::Weekly => {
            let monday = monday_of(today);
            ComparisonWindows {
                current: DateRange::new(monday, today),
                previous: DateRange::new(monday - Duration::days(7), monday - Duration::days(1)),
            }
        }
        ComparisonKind::PrevWeekly => {
            let monday = monday_of(today);
            ComparisonWindows {
                current: DateRange::new(monday - Duration::days(7), monday - Duration::days(1)),
                previous: DateRange::new(monday - Duration::days(14), monday - Duration::days(8)),
            }
        }
        ComparisonKind::BiweeklyVsMonthly => ComparisonWindows {
            current: DateRange::new(today - Duration::days(BIWEEKLY_WINDOW_DAYS - 1), today),
            previous: DateRange::new(today - Duration::days(MONTHLY_WINDOW_DAYS - 1), today),
        },
    }
}

/// Most recent Monday at or before `day`.
fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2026-08-05 is a Wednesday.
    const REF: (i32, u32, u32) = (2026, 8, 5);

    fn today() -> NaiveDate {
        d(REF.0, REF.1, REF.2)
    }

    #[test]
    fn daily_is_yesterday_vs_day_before() {
        let w = resolve(ComparisonKind::Daily, today());
        assert_eq!(w.current, DateRange::single(d(2026, 8, 4)));
        assert_eq!(w.previous, DateRange::single(d(2026, 8, 3)));
    }

    #[test]
    fn weekly_runs_monday_to_today_vs_prior_full_week() {
        let w = resolve(ComparisonKind::Weekly, today());
        assert_eq!(w.current, DateRange::new(d(2026, 8, 3), d(2026, 8, 5)));
        assert_eq!(w.previous, DateRange::new(d(2026, 7, 27), d(2026, 8, 2)));
        assert_eq!(w.previous.day_count(), 7);
    }

    #[test]
    fn weekly_on_a_monday_has_single_day_current() {
        let w = resolve(ComparisonKind::Weekly, d(2026, 8, 3));
        assert_eq!(w.current, DateRange::single(d(2026, 8, 3)));
        assert_eq!(w.previous, DateRange::new(d(2026, 7, 27), d(2026, 8, 2)));
    }

    #[test]
    fn prev_weekly_compares_two_full_weeks() {
        let w = resolve(ComparisonKind::PrevWeekly, today());
        assert_eq!(w.current, DateRange::new(d(2026, 7, 27), d(2026, 8, 2)));
        assert_eq!(w.previous, DateRange::new(d(2026, 7, 20), d(2026, 7, 26)));
        assert_eq!(w.current.day_count(), 7);
        assert_eq!(w.previous.day_count(), 7);
    }

    #[test]
    fn biweekly_windows_share_today_and_overlap() {
        let w = resolve(ComparisonKind::BiweeklyVsMonthly, today());
        assert_eq!(w.current.end, today());
        assert_eq!(w.previous.end, today());
        assert_eq!(w.current.day_count(), 14);
        assert_eq!(w.previous.day_count(), 28);
        assert!(w.previous.contains(w.current.start));
    }

    #[test]
    fn windows_are_ordered_and_disjoint_where_required() {
        for kind in ComparisonKind::ALL {
            let w = resolve(kind, today());
            assert!(w.current.is_valid(), "{kind}: current inverted");
            assert!(w.previous.is_valid(), "{kind}: previous inverted");
            if kind != ComparisonKind::BiweeklyVsMonthly {
                assert!(
                    w.previous.end < w.current.start,
                    "{kind}: windows overlap"
                );
            }
        }
    }

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in ComparisonKind::ALL {
            assert_eq!(kind.to_string().parse::<ComparisonKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let err = "hourly".parse::<ComparisonKind>().unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::UnsupportedPeriodKind("hourly".to_string())
        );
    }

    #[test]
    fn only_biweekly_is_normalized() {
        assert!(ComparisonKind::BiweeklyVsMonthly.normalized());
        assert!(!ComparisonKind::Daily.normalized());
        assert!(!ComparisonKind::Weekly.normalized());
        assert!(!ComparisonKind::PrevWeekly.normalized());
    }
}

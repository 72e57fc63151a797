//! Day-boundary math for streak continuity.
//!
//! Streak days are anchored to midnight in a single fixed reference
//! timezone, independent of wherever the viewer happens to be. Everything in
//! this module is total: timezone conversion failures (DST gaps, bad zone
//! data) degrade to the zero countdown instead of propagating, because these
//! values only ever feed a status display.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default reference timezone when none is configured.
pub const DEFAULT_REFERENCE_TZ: Tz = chrono_tz::Asia::Seoul;

/// Time remaining until the next reference-timezone midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCountdown {
    /// "HH:MM:SS", hour component clamped to 23.
    pub formatted: String,
    /// Exact remaining milliseconds, never negative.
    pub millis: u64,
}

impl BoundaryCountdown {
    /// The degraded value returned on any conversion failure.
    pub fn zero() -> Self {
        Self {
            formatted: "00:00:00".to_string(),
            millis: 0,
        }
    }
}

/// Presentation tri-state for the streak indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// No streak to protect.
    None,
    /// Today's pomodoro is done; the streak survives the next boundary.
    Safe,
    /// The streak lapses at the next boundary without a completed session.
    AtRisk,
}

/// Duration remaining until the next midnight in `tz`.
///
/// Called at 23:59:59 local this returns one second; called exactly at
/// midnight it returns the full day (formatted hours clamp at 23 to guard
/// against any apparent 24+ hour span).
pub fn time_until_next_boundary(now: DateTime<Utc>, tz: Tz) -> BoundaryCountdown {
    let midnight = match next_midnight(now, tz) {
        Some(m) => m,
        None => return BoundaryCountdown::zero(),
    };

    let millis = (midnight.with_timezone(&Utc) - now).num_milliseconds();
    if millis <= 0 {
        return BoundaryCountdown::zero();
    }
    let millis = millis as u64;

    let total_secs = millis / 1000;
    let hours = (total_secs / 3600).min(23);
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    BoundaryCountdown {
        formatted: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
        millis,
    }
}

/// Resolve the next local midnight in `tz`, if one can be represented.
fn next_midnight(now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Tz>> {
    let local = now.with_timezone(&tz);
    let next_day = local.date_naive().succ_opt()?;
    let midnight = next_day.and_hms_opt(0, 0, 0)?;
    // A DST transition can make local midnight ambiguous or nonexistent.
    let resolved = tz.from_local_datetime(&midnight);
    resolved.earliest().or_else(|| resolved.latest())
}

pub fn streak_status(streak_count: u32, completed_today: bool) -> StreakStatus {
    if streak_count == 0 {
        StreakStatus::None
    } else if completed_today {
        StreakStatus::Safe
    } else {
        StreakStatus::AtRisk
    }
}

/// Human-readable streak line for the dashboard header.
pub fn streak_message(streak_count: u32, completed_today: bool, time_remaining: &str) -> String {
    match streak_status(streak_count, completed_today) {
        StreakStatus::None => "Complete a pomodoro today to start a streak.".to_string(),
        StreakStatus::Safe => format!(
            "{} day streak. Today's pomodoro is already in the books.",
            streak_count
        ),
        StreakStatus::AtRisk => format!(
            "{} day streak expires at midnight (reference time) in {}.",
            streak_count, time_remaining
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Asia/Seoul has no DST, so local instants map cleanly.
    fn seoul(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        DEFAULT_REFERENCE_TZ
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }

    #[test]
    fn one_second_before_midnight() {
        let now = seoul(2026, 3, 10, 23, 59, 59);
        let c = time_until_next_boundary(now, DEFAULT_REFERENCE_TZ);
        assert_eq!(c.millis, 1000);
        assert_eq!(c.formatted, "00:00:01");
    }

    #[test]
    fn exactly_midnight_returns_full_day_with_clamped_hours() {
        let now = seoul(2026, 3, 10, 0, 0, 0);
        let c = time_until_next_boundary(now, DEFAULT_REFERENCE_TZ);
        assert_eq!(c.millis, 86_400_000);
        // 24 hours clamps to 23 in the display.
        assert_eq!(c.formatted, "23:00:00");
    }

    #[test]
    fn mid_afternoon() {
        let now = seoul(2026, 3, 10, 15, 30, 0);
        let c = time_until_next_boundary(now, DEFAULT_REFERENCE_TZ);
        assert_eq!(c.formatted, "08:30:00");
        assert_eq!(c.millis, (8 * 3600 + 30 * 60) as u64 * 1000);
    }

    #[test]
    fn countdown_is_never_negative() {
        // Arbitrary instants across the day.
        for hour in 0..24 {
            let now = seoul(2026, 6, 1, hour, 17, 42);
            let c = time_until_next_boundary(now, DEFAULT_REFERENCE_TZ);
            assert!(c.millis <= 86_400_000);
        }
    }

    #[test]
    fn status_truth_table() {
        assert_eq!(streak_status(0, false), StreakStatus::None);
        assert_eq!(streak_status(0, true), StreakStatus::None);
        assert_eq!(streak_status(5, true), StreakStatus::Safe);
        assert_eq!(streak_status(5, false), StreakStatus::AtRisk);
    }

    #[test]
    fn messages_follow_status() {
        assert!(streak_message(0, false, "01:00:00").contains("start a streak"));
        assert!(streak_message(3, true, "01:00:00").contains("3 day streak"));
        let warning = streak_message(7, false, "02:15:00");
        assert!(warning.contains("expires at midnight"));
        assert!(warning.contains("02:15:00"));
    }
}

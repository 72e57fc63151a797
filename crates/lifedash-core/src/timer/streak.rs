//! Derived streak state.
//!
//! The count and the completed-today flag come from the server (it computes
//! them from session history); only the countdown to the next reference
//! midnight is computed client-side, re-derived on every tick.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::boundary::{self, StreakStatus};

/// Presentation-ready streak summary. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub streak_count: u32,
    pub has_completed_today: bool,
    /// "HH:MM:SS" until the streak boundary.
    pub time_remaining: String,
    pub status: StreakStatus,
    pub message: String,
}

impl StreakState {
    /// Combine the server summary with the client-side boundary countdown.
    pub fn derive(
        streak_count: u32,
        has_completed_today: bool,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let countdown = boundary::time_until_next_boundary(now, tz);
        let status = boundary::streak_status(streak_count, has_completed_today);
        let message =
            boundary::streak_message(streak_count, has_completed_today, &countdown.formatted);
        Self {
            streak_count,
            has_completed_today,
            time_remaining: countdown.formatted,
            status,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::DEFAULT_REFERENCE_TZ;
    use chrono::TimeZone;

    #[test]
    fn at_risk_state_carries_countdown_in_message() {
        let now = DEFAULT_REFERENCE_TZ
            .with_ymd_and_hms(2026, 2, 1, 21, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let state = StreakState::derive(6, false, now, DEFAULT_REFERENCE_TZ);
        assert_eq!(state.status, StreakStatus::AtRisk);
        assert_eq!(state.time_remaining, "03:00:00");
        assert!(state.message.contains("03:00:00"));
    }

    #[test]
    fn safe_state_ignores_countdown() {
        let state = StreakState::derive(2, true, Utc::now(), DEFAULT_REFERENCE_TZ);
        assert_eq!(state.status, StreakStatus::Safe);
        assert!(!state.message.contains("expires"));
    }
}

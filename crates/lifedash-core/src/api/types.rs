//! Response types for the dashboard API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PomodoroSessionRecord;

/// One page of session history, plus the server-computed streak.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub items: Vec<PomodoroSessionRecord>,
    pub total: u64,
    pub has_more: bool,
    #[serde(default)]
    pub streak_count: u32,
}

/// `GET /pomodoro-streak`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub streak_count: u32,
    pub has_completed_today: bool,
}

/// `GET /pomodoro-counts` aggregate session counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounts {
    pub today: u64,
    pub week: u64,
    pub total: u64,
}

/// `GET /pomodoro-ai-remaining` rate-limit state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiUsage {
    pub remaining_uses: u32,
    pub total_allowed: u32,
    #[serde(default)]
    pub reset_time: Option<DateTime<Utc>>,
}

/// Result of `POST /pomodoro-analysis`. The generation itself is opaque;
/// the server returns the text plus the updated remaining-uses counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInsight {
    pub insight: String,
    #[serde(default)]
    pub remaining_uses: Option<u32>,
}

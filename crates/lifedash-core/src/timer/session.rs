//! Session record wire types.
//!
//! A record is created when a Work countdown ends -- Completed when it ran
//! out naturally, Interrupted when it was skipped or reset mid-flight.
//! Breaks never produce records. Once submitted the server owns the record;
//! the client only reads aggregates back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Completed,
    Interrupted,
}

/// One completed or interrupted Work interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSessionRecord {
    /// Name of the task that was current when the interval ended; empty when
    /// the timer ran without one.
    #[serde(default)]
    pub task_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// The configured Work length, not the elapsed wall time.
    pub duration_minutes: u32,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

mod engine;
mod session;
mod streak;
mod tasks;

pub use engine::{PomodoroEngine, PomodoroMode};
pub use session::{PomodoroSessionRecord, SessionStatus};
pub use streak::StreakState;
pub use tasks::{Task, TaskQueue, MAX_TASK_NAME_LEN};

use serde::{Deserialize, Serialize};

/// Countdown durations and cycle settings.
///
/// Embedded in the application [`Config`](crate::storage::Config); the
/// long-break cadence and queue cap are configuration, not literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Every Nth completed Work interval leads into a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    /// Waiting tasks allowed behind the current one.
    #[serde(default = "default_max_queued_tasks")]
    pub max_queued_tasks: usize,
}

impl TimerConfig {
    /// Full countdown duration for `mode`, in seconds.
    pub fn duration_secs(&self, mode: PomodoroMode) -> u32 {
        let minutes = match mode {
            PomodoroMode::Work => self.work_minutes,
            PomodoroMode::ShortBreak => self.short_break_minutes,
            PomodoroMode::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }

    pub fn duration_minutes(&self, mode: PomodoroMode) -> u32 {
        match mode {
            PomodoroMode::Work => self.work_minutes,
            PomodoroMode::ShortBreak => self.short_break_minutes,
            PomodoroMode::LongBreak => self.long_break_minutes,
        }
    }
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_max_queued_tasks() -> usize {
    8
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            max_queued_tasks: default_max_queued_tasks(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PomodoroMode, PomodoroSessionRecord};

/// Every engine transition produces an Event. The host (CLI, GUI shell)
/// inspects events to drive display updates and to submit session records --
/// the engine itself never touches the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: PomodoroMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Remaining time returned to the full mode duration. Carries the
    /// Interrupted record when a running Work interval was cut short.
    TimerReset {
        mode: PomodoroMode,
        record: Option<PomodoroSessionRecord>,
        at: DateTime<Utc>,
    },
    /// A Work or break interval ended (natural completion or skip) and the
    /// engine advanced to `to_mode`. `record` is present only for Work
    /// intervals; the host is responsible for submitting it.
    IntervalEnded {
        from_mode: PomodoroMode,
        to_mode: PomodoroMode,
        completed_work_intervals: u32,
        record: Option<PomodoroSessionRecord>,
        at: DateTime<Utc>,
    },
    /// Mode changed explicitly by the user (not via the cycle rule).
    ModeChanged {
        mode: PomodoroMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A queued task moved into the current slot.
    TaskPromoted {
        task_name: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: PomodoroMode,
        remaining_secs: u32,
        total_secs: u32,
        is_running: bool,
        progress_pct: f64,
        completed_work_intervals: u32,
        current_task: Option<String>,
        queued_tasks: usize,
        at: DateTime<Utc>,
    },
}

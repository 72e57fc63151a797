//! Pomodoro timer state machine.
//!
//! The engine is tick-driven and owns no thread or interval handle: the host
//! calls `tick()` once per elapsed second and drops the engine on teardown,
//! which is also what cancels the countdown. Commands return `Option<Event>`
//! so the host can react (display updates, submitting the session record an
//! ending event carries) without the engine ever touching the network.
//!
//! ## State
//!
//! ```text
//! {mode: Work | ShortBreak | LongBreak, remaining_secs, is_running}
//! ```
//!
//! Work endings produce a session record and advance per the cycle rule:
//! every `long_break_interval`-th Work ending goes to LongBreak, the rest to
//! ShortBreak, and every break ending returns to Work. Advancing always
//! stops the timer; the user starts each interval explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{PomodoroSessionRecord, SessionStatus};
use super::tasks::{Task, TaskQueue};
use super::TimerConfig;
use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub fn is_break(&self) -> bool {
        matches!(self, PomodoroMode::ShortBreak | PomodoroMode::LongBreak)
    }
}

/// Core pomodoro engine.
///
/// Serializable so a host can round-trip it between invocations (the CLI
/// persists it as JSON between commands).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroEngine {
    config: TimerConfig,
    mode: PomodoroMode,
    remaining_secs: u32,
    is_running: bool,
    /// Work endings so far; drives the long-break cadence.
    completed_work_intervals: u32,
    /// When the current interval was first started. Brackets the record.
    #[serde(default)]
    interval_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tasks: TaskQueue,
}

impl PomodoroEngine {
    pub fn new(config: TimerConfig) -> Self {
        let remaining_secs = config.duration_secs(PomodoroMode::Work);
        let tasks = TaskQueue::new(config.max_queued_tasks);
        Self {
            config,
            mode: PomodoroMode::Work,
            remaining_secs,
            is_running: false,
            completed_work_intervals: 0,
            interval_started_at: None,
            tasks,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_work_intervals(&self) -> u32 {
        self.completed_work_intervals
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn total_secs(&self) -> u32 {
        self.config.duration_secs(self.mode)
    }

    /// Progress through the current interval as a percentage in [0, 100].
    ///
    /// Zero exactly at full remaining time, clamped even if the configured
    /// duration changed underneath a running interval.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        ((elapsed as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Full state snapshot for display.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            is_running: self.is_running,
            progress_pct: self.progress_pct(),
            completed_work_intervals: self.completed_work_intervals,
            current_task: self.tasks.current().map(|t| t.name.clone()),
            queued_tasks: self.tasks.queued_len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) the countdown. No-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running {
            return None;
        }
        self.is_running = true;
        if self.interval_started_at.is_none() {
            self.interval_started_at = Some(Utc::now());
        }
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Halt the countdown in place; remaining time is retained.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Return to the full duration of the current mode and stop.
    ///
    /// A running Work interval is cut short, so the event carries an
    /// Interrupted record for the host to submit. The mode and cycle
    /// counter are untouched -- reset is not an interval ending.
    pub fn reset(&mut self) -> Event {
        let record = if self.mode == PomodoroMode::Work && self.is_running {
            Some(self.make_record(SessionStatus::Interrupted))
        } else {
            None
        };
        self.is_running = false;
        self.remaining_secs = self.total_secs();
        self.interval_started_at = None;
        Event::TimerReset {
            mode: self.mode,
            record,
            at: Utc::now(),
        }
    }

    /// End the current interval immediately and advance per the cycle rule.
    ///
    /// A Work interval skipped with time remaining while running records
    /// Interrupted; one whose countdown had already hit zero records
    /// Completed. Skipping a break records nothing.
    pub fn skip(&mut self) -> Event {
        let record = if self.mode == PomodoroMode::Work {
            if self.remaining_secs == 0 {
                Some(self.make_record(SessionStatus::Completed))
            } else if self.is_running {
                Some(self.make_record(SessionStatus::Interrupted))
            } else {
                None
            }
        } else {
            None
        };
        self.end_interval(record)
    }

    /// Advance the countdown by one second. Call once per elapsed second
    /// while running; returns the ending event when the interval completes.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        let record = if self.mode == PomodoroMode::Work {
            Some(self.make_record(SessionStatus::Completed))
        } else {
            None
        };
        Some(self.end_interval(record))
    }

    /// Switch to `mode` explicitly: full duration restored, timer stopped.
    pub fn set_mode(&mut self, mode: PomodoroMode) -> Event {
        self.mode = mode;
        self.remaining_secs = self.total_secs();
        self.is_running = false;
        self.interval_started_at = None;
        Event::ModeChanged {
            mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Replace the configuration. The in-flight countdown keeps its
    /// remaining time; progress clamps if durations shrank underneath it.
    pub fn set_config(&mut self, config: TimerConfig) {
        self.tasks.set_max_queued(config.max_queued_tasks);
        self.config = config;
    }

    // ── Task management ──────────────────────────────────────────────

    /// Assign the active task slot, displacing any previous occupant.
    pub fn set_current_task(&mut self, task: Task) -> Option<Task> {
        self.tasks.set_current(task)
    }

    /// Append a task to the waiting queue (or the empty current slot).
    /// Surfaces the queue-full rejection without touching state.
    pub fn enqueue_task(&mut self, task: Task) -> Result<(), ValidationError> {
        self.tasks.enqueue(task)
    }

    /// Complete the current task and promote the next queued one (FIFO).
    /// Returns a promotion event when a queued task moved up.
    pub fn complete_current_task(&mut self) -> Option<Event> {
        self.tasks.complete_current()?;
        self.tasks.current().map(|task| Event::TaskPromoted {
            task_name: task.name.clone(),
            at: Utc::now(),
        })
    }

    /// Delete a task by id from either slot.
    pub fn remove_task(&mut self, id: uuid::Uuid) -> bool {
        self.tasks.remove(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// End the current interval: bump the cycle counter for Work endings,
    /// pick the next mode, restore its full duration, stop the timer.
    fn end_interval(&mut self, record: Option<PomodoroSessionRecord>) -> Event {
        let from_mode = self.mode;
        let to_mode = if from_mode == PomodoroMode::Work {
            self.completed_work_intervals = self.completed_work_intervals.saturating_add(1);
            let interval = self.config.long_break_interval.max(1);
            if self.completed_work_intervals % interval == 0 {
                PomodoroMode::LongBreak
            } else {
                PomodoroMode::ShortBreak
            }
        } else {
            PomodoroMode::Work
        };
        self.mode = to_mode;
        self.remaining_secs = self.total_secs();
        self.is_running = false;
        self.interval_started_at = None;
        Event::IntervalEnded {
            from_mode,
            to_mode,
            completed_work_intervals: self.completed_work_intervals,
            record,
            at: Utc::now(),
        }
    }

    fn make_record(&mut self, status: SessionStatus) -> PomodoroSessionRecord {
        let end_time = Utc::now();
        let start_time = self.interval_started_at.take().unwrap_or(end_time);
        PomodoroSessionRecord {
            task_name: self
                .tasks
                .current()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            start_time,
            end_time,
            duration_minutes: self.config.duration_minutes(PomodoroMode::Work),
            status,
            note: None,
        }
    }
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

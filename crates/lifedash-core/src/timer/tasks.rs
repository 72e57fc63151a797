//! Session-scoped task queue.
//!
//! Tasks live only in memory for the active timer session: one optional
//! current slot plus a bounded FIFO queue of waiting tasks. They are never
//! persisted remotely on their own -- a task name only leaves the client
//! inside a finished session record.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Upper bound on task display names.
pub const MAX_TASK_NAME_LEN: usize = 100;

const DEFAULT_MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Locally generated token; never reconciled with a remote store.
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Validate and create a task. The name is trimmed; empty or over-long
    /// names are rejected before they get anywhere near the network.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        if name.chars().count() > MAX_TASK_NAME_LEN {
            return Err(ValidationError::TaskNameTooLong {
                max: MAX_TASK_NAME_LEN,
                len: name.chars().count(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            completed: false,
            created_at: Utc::now(),
        })
    }
}

/// Current task slot + waiting FIFO queue, capped at `max_queued`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueue {
    current: Option<Task>,
    queued: VecDeque<Task>,
    max_queued: usize,
}

impl TaskQueue {
    pub fn new(max_queued: usize) -> Self {
        Self {
            current: None,
            queued: VecDeque::new(),
            max_queued,
        }
    }

    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    pub fn queued(&self) -> impl Iterator<Item = &Task> {
        self.queued.iter()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn max_queued(&self) -> usize {
        self.max_queued
    }

    pub fn set_max_queued(&mut self, max_queued: usize) {
        self.max_queued = max_queued;
    }

    /// Assign the current slot directly, returning any displaced task.
    pub fn set_current(&mut self, task: Task) -> Option<Task> {
        self.current.replace(task)
    }

    /// Add a task. With nothing current and nothing waiting it goes straight
    /// into the current slot; otherwise it joins the queue, which rejects
    /// the add once `max_queued` tasks are already waiting.
    pub fn enqueue(&mut self, task: Task) -> Result<(), ValidationError> {
        if self.current.is_none() && self.queued.is_empty() {
            self.current = Some(task);
            return Ok(());
        }
        if self.queued.len() >= self.max_queued {
            return Err(ValidationError::QueueFull {
                max: self.max_queued,
            });
        }
        self.queued.push_back(task);
        Ok(())
    }

    /// Mark the current task completed and promote the queue head (FIFO).
    /// Returns the completed task; the slot is left empty when the queue is.
    pub fn complete_current(&mut self) -> Option<Task> {
        let mut done = self.current.take()?;
        done.completed = true;
        self.current = self.queued.pop_front();
        Some(done)
    }

    /// Explicitly delete a task by id, from either the current slot or the
    /// queue. Deleting the current task promotes the queue head.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if self.current.as_ref().map(|t| t.id) == Some(id) {
            self.current = self.queued.pop_front();
            return true;
        }
        let before = self.queued.len();
        self.queued.retain(|t| t.id != id);
        self.queued.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queued.is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUEUED)
    }
}

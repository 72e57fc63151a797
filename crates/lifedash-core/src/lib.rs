//! # Lifedash Core Library
//!
//! Core client logic for the Lifedash personal dashboard: the pomodoro
//! timer engine, streak boundary math, the cached/deduplicated API client,
//! and configuration. Business logic of consequence (persistence, auth, AI
//! analysis) lives behind the remote API; this crate is the state machines
//! and the request/response plumbing in front of it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; the host invokes
//!   `tick()` once per second and submits the session records that ending
//!   events carry
//! - **Boundary**: pure day-boundary math in a fixed reference timezone,
//!   feeding streak status displays
//! - **Response Cache**: one shared TTL cache with in-flight request
//!   deduplication, used by every API read
//! - **API Client**: bearer-authenticated JSON client over reqwest
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: core timer state machine
//! - [`ResponseCache`]: TTL cache + request dedup
//! - [`ApiClient`]: remote dashboard API
//! - [`Config`]: application configuration

pub mod api;
pub mod boundary;
pub mod cache;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use api::{AiUsage, AnalysisInsight, ApiClient, SessionCounts, SessionPage, StreakSummary};
pub use boundary::{BoundaryCountdown, StreakStatus};
pub use cache::{CacheKey, ResponseCache};
pub use error::{ApiError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    PomodoroEngine, PomodoroMode, PomodoroSessionRecord, SessionStatus, StreakState, Task,
    TaskQueue, TimerConfig,
};

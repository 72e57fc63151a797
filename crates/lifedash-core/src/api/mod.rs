mod client;
mod types;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT};
pub use types::{AiUsage, AnalysisInsight, SessionCounts, SessionPage, StreakSummary};

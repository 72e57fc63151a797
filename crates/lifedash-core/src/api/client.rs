//! HTTP client for the dashboard API.
//!
//! All reads go through the shared [`ResponseCache`]: a cache hit skips the
//! network entirely, a miss is deduplicated against identical in-flight
//! requests, and mutations invalidate the key families they affect so the
//! next read reflects the write. Failures never populate the cache.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::types::{AiUsage, AnalysisInsight, SessionCounts, SessionPage, StreakSummary};
use crate::cache::{CacheKey, ResponseCache};
use crate::error::ApiError;
use crate::timer::PomodoroSessionRecord;

/// Bound on any single request; expiry surfaces as [`ApiError::Timeout`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Validity window for cached reads.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Bearer-authenticated JSON client.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    cache: Arc<ResponseCache>,
    cache_ttl: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_cache(
            base_url,
            token,
            Arc::new(ResponseCache::new()),
            DEFAULT_REQUEST_TIMEOUT,
            DEFAULT_CACHE_TTL,
        )
    }

    /// Construct with an injected cache and explicit timeouts. Lets tests
    /// and the host share one cache instance across services.
    pub fn with_cache(
        base_url: &str,
        token: impl Into<String>,
        cache: Arc<ResponseCache>,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Result<Self, ApiError> {
        // Url::join treats a missing trailing slash as a file component.
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token: token.into(),
            cache,
            cache_ttl,
        })
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `POST /pomodoro-sessions`. Invalidates every cached pomodoro read so
    /// the next aggregate fetch reflects this submission.
    pub async fn submit_session(
        &self,
        record: &PomodoroSessionRecord,
    ) -> Result<PomodoroSessionRecord, ApiError> {
        let url = self.endpoint("pomodoro-sessions")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await?;
        let stored = Self::read_json(response).await?;
        self.cache.clear_matching("pomodoro");
        log::debug!("session submitted, pomodoro caches invalidated");
        Ok(stored)
    }

    /// `GET /pomodoro-sessions?page=&size=`.
    pub async fn session_history(&self, page: u32, size: u32) -> Result<SessionPage, ApiError> {
        let key = CacheKey::new("pomodoro-sessions")
            .param("page", page)
            .param("size", size)
            .build();
        let query = [("page", page.to_string()), ("size", size.to_string())];
        self.get_cached(key, "pomodoro-sessions", &query).await
    }

    /// `GET /pomodoro-streak`.
    pub async fn streak_summary(&self) -> Result<StreakSummary, ApiError> {
        self.get_cached(
            CacheKey::new("pomodoro-streak").build(),
            "pomodoro-streak",
            &[],
        )
        .await
    }

    /// `GET /pomodoro-counts`.
    pub async fn session_counts(&self) -> Result<SessionCounts, ApiError> {
        self.get_cached(
            CacheKey::new("pomodoro-counts").build(),
            "pomodoro-counts",
            &[],
        )
        .await
    }

    /// `POST /pomodoro-analysis`. Opaque server-side generation; the
    /// remaining-uses cache is invalidated because the call consumed one.
    pub async fn request_analysis(&self) -> Result<AnalysisInsight, ApiError> {
        let url = self.endpoint("pomodoro-analysis")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let insight = Self::read_json(response).await?;
        self.cache.clear_matching("pomodoro-ai");
        Ok(insight)
    }

    /// `GET /pomodoro-ai-remaining`.
    pub async fn ai_remaining(&self) -> Result<AiUsage, ApiError> {
        self.get_cached(
            CacheKey::new("pomodoro-ai-remaining").build(),
            "pomodoro-ai-remaining",
            &[],
        )
        .await
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Cached, deduplicated GET. The settled value is written to the cache
    /// by every caller that produced or joined the flight (idempotent).
    async fn get_cached<T: DeserializeOwned>(
        &self,
        key: String,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        if let Some(value) = self.cache.get(&key) {
            return Self::decode(value);
        }
        let value = self
            .cache
            .dedupe(&key, || self.get_value(path, query))
            .await?;
        self.cache.set(key, value.clone(), Some(self.cache_ttl));
        Self::decode(value)
    }

    async fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.http.get(url).bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

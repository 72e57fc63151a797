//! Client-side response cache with request deduplication.
//!
//! Every idempotent read in the service layer goes through one shared
//! `ResponseCache`: a TTL keyed store (lazy eviction on read, no sweeper)
//! plus an in-flight map that collapses concurrent identical requests into a
//! single producer call. Payloads are stored as `serde_json::Value` with
//! typed accessors, so one cache instance serves every endpoint family.
//!
//! Mutations are expected to call `clear_matching` for the key family they
//! invalidate, which gives read-your-writes within a client session.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::ApiError;

/// Default entry validity when `set` is called without an explicit TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_valid(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) <= self.ttl
    }
}

/// Keyed TTL cache with in-flight request deduplication.
///
/// Interior mutability throughout; the handle is shared behind an `Arc` by
/// the API client. Locks are never held across an await point.
pub struct ResponseCache {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, broadcast::Sender<Result<Value, ApiError>>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a cached value if it is still within its TTL.
    ///
    /// An expired entry is treated as absent and evicted on the spot.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.is_valid(Instant::now()) => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            log::debug!("cache evict (expired): {key}");
            entries.remove(key);
        }
        None
    }

    /// Typed `get`. A payload that no longer matches `T` counts as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Unconditionally store `value` under `key`. `ttl = None` uses the
    /// cache-wide default.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let entry = CacheEntry {
            data: value,
            stored_at: Instant::now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Typed `set`. Values that fail to serialize are silently not cached --
    /// a cache write must never become an error path for the caller.
    pub fn set_as<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: Option<Duration>) {
        if let Ok(json) = serde_json::to_value(value) {
            self.set(key, json, ttl);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Drop every entry whose key contains `fragment`. Called after a
    /// mutation to invalidate the family of reads it affects.
    pub fn clear_matching(&self, fragment: &str) {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.contains(fragment));
        let dropped = before - entries.len();
        if dropped > 0 {
            log::debug!("cache invalidate '{fragment}': {dropped} entries");
        }
    }

    /// Number of stored entries, valid or not (expired entries linger until
    /// the next read touches them).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Run `producer` unless an identical request is already in flight, in
    /// which case await that request's result instead.
    ///
    /// All callers observe the same settled outcome, success or failure. The
    /// in-flight marker is removed once the producer settles, so a failure
    /// never wedges the key: the next call simply produces again. Nothing is
    /// written to the TTL store here -- that is the caller's decision.
    pub async fn dedupe<F, Fut>(&self, key: &str, producer: F) -> Result<Value, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let maybe_rx = {
            let mut in_flight = self.in_flight.lock();
            let rx = in_flight.get(key).map(|tx| tx.subscribe());
            if rx.is_none() {
                let (tx, _) = broadcast::channel(1);
                in_flight.insert(key.to_string(), tx);
            }
            rx
        };

        if let Some(mut rx) = maybe_rx {
            log::debug!("dedupe join: {key}");
            return match rx.recv().await {
                Ok(result) => result,
                // Leader dropped without sending (cancelled mid-produce or
                // panicked), which also dropped the sender.
                Err(_) => Err(ApiError::Cancelled),
            };
        }

        // The leader may itself be cancelled (caller-side timeout/select
        // dropping this future mid-await). The guard removes the marker on
        // any exit, so a dead flight never wedges the key; dropping the
        // sender with it fails joiners out of their recv.
        let guard = FlightGuard {
            flights: &self.in_flight,
            key,
        };
        let result = producer().await;

        let tx = guard.flights.lock().remove(key);
        if let Some(tx) = tx {
            // No receivers just means nobody joined this flight.
            let _ = tx.send(result.clone());
        }
        result
    }
}

/// Clears a key's in-flight marker when the leading `dedupe` call settles
/// or is dropped before settling.
struct FlightGuard<'a> {
    flights: &'a Mutex<HashMap<String, broadcast::Sender<Result<Value, ApiError>>>>,
    key: &'a str,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flights.lock().remove(self.key);
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic cache key builder.
///
/// Parameters are sorted by name and percent-encoded, so two calls for the
/// same logical query always produce the same key regardless of the order
/// optional parameters were supplied in, and two different queries never
/// collide.
#[derive(Debug, Clone)]
pub struct CacheKey {
    scope: String,
    params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(mut self) -> String {
        if self.params.is_empty() {
            return self.scope;
        }
        self.params.sort();
        let query = self
            .params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.scope, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_within_ttl_then_expired() {
        let cache = ResponseCache::new();
        cache.set("k", json!(42), Some(Duration::from_millis(80)));

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), Some(json!(42)));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get("k"), None);
        // Lazy eviction removed the entry on that read.
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites() {
        let cache = ResponseCache::new();
        cache.set("k", json!(1), None);
        cache.set("k", json!(2), None);
        assert_eq!(cache.get("k"), Some(json!(2)));
    }

    #[test]
    fn clear_matching_drops_only_the_family() {
        let cache = ResponseCache::new();
        cache.set("pomodoro-counts", json!(1), None);
        cache.set("pomodoro-sessions?page=0&size=20", json!(2), None);
        cache.set("finance-summary", json!(3), None);

        cache.clear_matching("pomodoro");
        assert_eq!(cache.get("pomodoro-counts"), None);
        assert_eq!(cache.get("pomodoro-sessions?page=0&size=20"), None);
        assert_eq!(cache.get("finance-summary"), Some(json!(3)));
    }

    #[test]
    fn typed_accessors_round_trip() {
        let cache = ResponseCache::new();
        cache.set_as("n", &vec![1u32, 2, 3], None);
        assert_eq!(cache.get_as::<Vec<u32>>("n"), Some(vec![1, 2, 3]));
        // Shape mismatch is a miss, not an error.
        assert_eq!(cache.get_as::<String>("n"), None);
    }

    #[test]
    fn cache_key_is_order_independent() {
        let a = CacheKey::new("pomodoro-sessions")
            .param("page", 2)
            .param("size", 20)
            .build();
        let b = CacheKey::new("pomodoro-sessions")
            .param("size", 20)
            .param("page", 2)
            .build();
        assert_eq!(a, b);
        assert_eq!(a, "pomodoro-sessions?page=2&size=20");
    }

    #[test]
    fn cache_key_distinguishes_queries() {
        let a = CacheKey::new("pomodoro-sessions").param("page", 1).build();
        let b = CacheKey::new("pomodoro-sessions").param("page", 2).build();
        assert_ne!(a, b);
    }

    #[test]
    fn cache_key_encodes_values() {
        let key = CacheKey::new("search").param("q", "a b&c").build();
        assert_eq!(key, "search?q=a%20b%26c");
    }

    #[tokio::test]
    async fn dedupe_collapses_concurrent_calls() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        let producer = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(json!("payload"))
        };

        let (a, b) = tokio::join!(cache.dedupe("k", producer), cache.dedupe("k", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!("should never run"))
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), json!("payload"));
        assert_eq!(b.unwrap(), json!("payload"));
    }

    #[tokio::test]
    async fn dedupe_shares_failures_without_wedging_the_key() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        let failing = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(ApiError::Timeout)
        };

        let (a, b) = tokio::join!(cache.dedupe("k", failing), cache.dedupe("k", failing));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, Err(ApiError::Timeout));
        assert_eq!(b, Err(ApiError::Timeout));

        // The failed flight is gone; a fresh call produces again.
        let c = cache
            .dedupe("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!(7))
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(c.unwrap(), json!(7));
    }

    #[tokio::test]
    async fn dedupe_does_not_write_the_ttl_store() {
        let cache = ResponseCache::new();
        let _ = cache.dedupe("k", || async { Ok(json!(1)) }).await;
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test]
    async fn cancelled_leader_releases_the_key() {
        let cache = ResponseCache::new();

        // Cancel the leader before its producer settles.
        let leader = cache.dedupe("k", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!(1))
        });
        let cancelled = tokio::time::timeout(Duration::from_millis(20), leader).await;
        assert!(cancelled.is_err());

        // The key is free again: the next call produces instead of joining
        // the dead flight.
        let fresh = tokio::time::timeout(
            Duration::from_millis(300),
            cache.dedupe("k", || async { Ok(json!(2)) }),
        )
        .await
        .expect("key released after leader cancellation")
        .unwrap();
        assert_eq!(fresh, json!(2));
    }

    #[tokio::test]
    async fn cancelled_leader_fails_joiners_out() {
        use std::sync::Arc;

        let cache = Arc::new(ResponseCache::new());
        let leader_cache = cache.clone();
        let leader = tokio::spawn(async move {
            leader_cache
                .dedupe("k", || async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(json!(1))
                })
                .await
        });
        // Let the leader register its flight before joining it.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (joined, _) = tokio::join!(
            cache.dedupe("k", || async { Ok(json!("unused")) }),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                leader.abort();
            }
        );
        assert_eq!(joined, Err(ApiError::Cancelled));

        let fresh = cache.dedupe("k", || async { Ok(json!(2)) }).await;
        assert_eq!(fresh.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn dedupe_different_keys_run_independently() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);
        let make = |v: i64| {
            let calls = &calls;
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!(v))
            }
        };
        let (a, b) = tokio::join!(cache.dedupe("x", make(1)), cache.dedupe("y", make(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(a.unwrap(), json!(1));
        assert_eq!(b.unwrap(), json!(2));
    }
}

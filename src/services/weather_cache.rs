//! Read-through cache for normalized weather snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::cache::WEATHER_KEY_PREFIX;
use crate::i18n::Lang;
use crate::models::WeatherSnapshot;

/// Key/value backing store with per-entry expiry. Reads and writes are atomic
/// per key; nothing stronger is required.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the value only while it has not expired.
    async fn get(&self, key: &str) -> Option<WeatherSnapshot>;

    async fn put(&self, key: String, value: WeatherSnapshot, expires_at: DateTime<Utc>);

    /// Drops every expired entry and returns how many were removed.
    async fn purge_expired(&self) -> usize;

    /// Number of stored entries, expired ones included until purged.
    async fn entry_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: WeatherSnapshot,
    expires_at: DateTime<Utc>,
}

/// In-process TTL map.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<WeatherSnapshot> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone())
    }

    async fn put(&self, key: String, value: WeatherSnapshot, expires_at: DateTime<Utc>) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        // Opportunistic cleanup while the write lock is held anyway
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key, CacheEntry { value, expires_at });
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[derive(Clone)]
pub struct WeatherCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl WeatherCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[must_use]
    pub fn key(city: &str, lang: Lang) -> String {
        format!("{WEATHER_KEY_PREFIX}:{city}:{lang}")
    }

    /// Returns the cached snapshot for `(city, lang)`, or runs `compute` once
    /// and caches its result when it succeeds. Errors are passed through and
    /// never cached. Concurrent misses for the same key may each compute.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        city: &str,
        lang: Lang,
        compute: F,
    ) -> Result<WeatherSnapshot, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<WeatherSnapshot, E>> + Send,
    {
        let key = Self::key(city, lang);

        if let Some(hit) = self.store.get(&key).await {
            metrics::counter!("weather_cache_hits_total").increment(1);
            debug!(key = %key, "Weather cache hit");
            return Ok(hit);
        }

        metrics::counter!("weather_cache_misses_total").increment(1);
        debug!(key = %key, "Weather cache miss");

        let value = compute().await?;
        self.store
            .put(key, value.clone(), Utc::now() + self.ttl)
            .await;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, CurrentConditions, SnapshotLocation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot(city: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location: SnapshotLocation {
                name: city.to_string(),
                region: "Region".to_string(),
                country: "Country".to_string(),
                localtime: "2026-03-01 12:00".to_string(),
            },
            current: CurrentConditions {
                temp_c: 12.0,
                temp_f: 53.6,
                condition: Condition {
                    text: "Cloudy".to_string(),
                },
                wind_kph: 10.1,
                humidity: 70,
            },
        }
    }

    fn cache(ttl: Duration) -> WeatherCache {
        WeatherCache::new(Arc::new(MemoryCacheStore::new()), ttl)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(WeatherCache::key("London", Lang::Es), "weather:London:es");
        assert_ne!(
            WeatherCache::key("london", Lang::En),
            WeatherCache::key("London", Lang::En)
        );
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let cache = cache(Duration::minutes(30));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_compute("London", Lang::En, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(snapshot("London"))
                })
                .await
                .unwrap();
            assert_eq!(value.location.name, "London");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_languages_are_cached_separately() {
        let cache = cache(Duration::minutes(30));
        let calls = AtomicUsize::new(0);

        for lang in [Lang::En, Lang::Es] {
            cache
                .get_or_compute("Madrid", lang, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(snapshot("Madrid"))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let cache = cache(Duration::zero());
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_compute("Oslo", Lang::En, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(snapshot("Oslo"))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = cache(Duration::minutes(30));
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_compute("Nowhere", Lang::En, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<WeatherSnapshot, _>("upstream down")
            })
            .await;
        assert_eq!(first.unwrap_err(), "upstream down");
        assert_eq!(cache.store.entry_count().await, 0);

        let second = cache
            .get_or_compute("Nowhere", Lang::En, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, &str>(snapshot("Nowhere"))
            })
            .await;
        assert!(second.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryCacheStore::new();
        let past = Utc::now() - Duration::seconds(1);
        let future = Utc::now() + Duration::minutes(5);

        store
            .put("weather:New:en".to_string(), snapshot("New"), future)
            .await;
        store.entries.write().await.insert(
            "weather:Old:en".to_string(),
            CacheEntry {
                value: snapshot("Old"),
                expires_at: past,
            },
        );

        assert!(store.get("weather:Old:en").await.is_none());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.entry_count().await, 1);
        assert!(store.get("weather:New:en").await.is_some());
    }
}

//! In-memory TTL caching for computed results.
//!
//! Caching decorators in the presentation layer are replaced by explicit
//! cache objects passed by reference: a short-TTL cache for live
//! price/status lookups and a longer-TTL cache for the loaded dataset.
//! Entries are immutable within their TTL window; expiry triggers
//! recomputation, and a user-initiated refresh clears explicitly.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::Ticker;
use crate::history::{DailySeries, HistoryRequest, HistorySource, ProviderError};

const PRICE_TTL: Duration = Duration::from_secs(300);
const DATASET_TTL: Duration = Duration::from_secs(3600);

/// Key used by whole-dataset cache entries.
pub const DATASET_KEY: &str = "dataset";

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner<T> {
    map: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

/// Thread-safe typed TTL cache.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    inner: Arc<tokio::sync::RwLock<CacheInner<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
        }
    }

    /// Cache for live current-price/status lookups, keyed by ticker (5 min).
    pub fn for_prices() -> Self {
        Self::new(PRICE_TTL)
    }

    /// Cache for the loaded on-disk dataset (1 hour).
    pub fn for_dataset() -> Self {
        Self::new(DATASET_TTL)
    }

    /// Non-expired value for `key`, if present.
    pub async fn get(&self, key: &str) -> Option<T> {
        let inner = self.inner.read().await;
        inner.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    pub async fn put(&self, key: impl Into<String>, value: T) {
        let mut inner = self.inner.write().await;
        let expires_at = Instant::now() + inner.ttl;
        inner.map.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Drop a single entry (per-ticker refresh).
    pub async fn invalidate(&self, key: &str) {
        let mut inner = self.inner.write().await;
        inner.map.remove(key);
    }

    /// Drop everything (the user-initiated refresh action).
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.map.clear();
    }

    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// History source decorated with the short-TTL price cache.
///
/// Only successful lookups are cached; a provider error is surfaced every
/// time so callers see current failure conditions.
pub struct CachedHistory {
    source: Arc<dyn HistorySource>,
    cache: TtlCache<DailySeries>,
}

impl CachedHistory {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self {
            source,
            cache: TtlCache::for_prices(),
        }
    }

    /// Drop all cached series, forcing fresh provider calls.
    pub async fn refresh(&self) {
        self.cache.clear().await;
    }
}

impl HistorySource for CachedHistory {
    fn daily_history<'a>(
        &'a self,
        ticker: &'a Ticker,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let key = request_key(ticker, &request);
            if let Some(series) = self.cache.get(&key).await {
                return Ok(series);
            }
            let series = self.source.daily_history(ticker, request).await?;
            self.cache.put(key, series.clone()).await;
            Ok(series)
        })
    }
}

fn request_key(ticker: &Ticker, request: &HistoryRequest) -> String {
    match request {
        HistoryRequest::Range { start, end } => format!("{ticker}:{start}:{end}"),
        HistoryRequest::Period(period) => format!("{ticker}:{period}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::history::{DailyRow, Period};

    #[tokio::test]
    async fn caches_within_ttl_window() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert!(cache.get("RDDT").await.is_none());

        cache.put("RDDT", 49.30_f64).await;
        assert_eq!(cache.get("RDDT").await, Some(49.30));
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = TtlCache::new(Duration::from_millis(50));
        cache.put("RDDT", 49.30_f64).await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("RDDT").await.is_none());
    }

    #[tokio::test]
    async fn explicit_invalidation_forces_recomputation() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("RDDT", 49.30_f64).await;
        cache.put("ALAB", 62.03_f64).await;

        cache.invalidate("RDDT").await;
        assert!(cache.get("RDDT").await.is_none());
        assert_eq!(cache.get("ALAB").await, Some(62.03));

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    struct CountingHistory {
        calls: AtomicUsize,
    }

    impl HistorySource for CountingHistory {
        fn daily_history<'a>(
            &'a self,
            ticker: &'a Ticker,
            _request: HistoryRequest,
        ) -> Pin<Box<dyn Future<Output = Result<DailySeries, ProviderError>> + Send + 'a>>
        {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(DailySeries {
                    ticker: ticker.clone(),
                    rows: vec![DailyRow {
                        date: crate::domain::IsoDate::parse("2024-03-21").expect("date"),
                        open: 47.0,
                        close: 50.44,
                    }],
                })
            })
        }
    }

    #[tokio::test]
    async fn repeated_lookup_hits_the_cache_once_warm() {
        let source = Arc::new(CountingHistory {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedHistory::new(Arc::clone(&source) as Arc<dyn HistorySource>);
        let ticker = Ticker::parse("RDDT").expect("ticker");

        let first = cached
            .daily_history(&ticker, HistoryRequest::Period(Period::OneDay))
            .await
            .expect("lookup");
        let second = cached
            .daily_history(&ticker, HistoryRequest::Period(Period::OneDay))
            .await
            .expect("lookup");

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // A different request shape misses.
        cached
            .daily_history(&ticker, HistoryRequest::Period(Period::Max))
            .await
            .expect("lookup");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        cached.refresh().await;
        cached
            .daily_history(&ticker, HistoryRequest::Period(Period::OneDay))
            .await
            .expect("lookup");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}

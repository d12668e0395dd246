pub mod store;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ImageSet;

pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

/// Default staleness window for cached image sets
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

const KEY_PREFIX: &str = "images:";

fn subject_key(subject_id: &str) -> String {
    format!("{KEY_PREFIX}{subject_id}")
}

/// Image cache tuning
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Entries older than this are treated as absent
    pub max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }
}

/// One cached image set with its write timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    images: ImageSet,
    cached_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: u64,
    pub approx_size_bytes: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// TTL cache for resolved game images.
///
/// One entry per subject, replaced wholesale on every `put` (last writer
/// wins, no merging). Reads never return entries older than
/// `CacheConfig::max_age`; expired entries are dropped lazily on read or in
/// bulk via [`evict_expired`](ImageCache::evict_expired). There is no size
/// bound and no background sweep.
///
/// The cache is best-effort: store failures are logged and surface as
/// misses or no-ops, never as caller errors. Callers must be able to
/// re-resolve images from their origin on any miss.
pub struct ImageCache {
    store: Arc<dyn KeyValueStore>,
    config: CacheConfig,
}

impl ImageCache {
    /// Create a cache with the default 7-day staleness window
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Store the image set for `subject_id`, resetting its age
    pub async fn put(&self, subject_id: &str, images: &ImageSet) {
        let entry = CacheEntry {
            images: images.clone(),
            cached_at: Utc::now(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to serialize image cache entry for {}: {}", subject_id, e);
                return;
            }
        };
        if let Err(e) = self.store.set(&subject_key(subject_id), &raw).await {
            tracing::warn!("image cache write failed for {}: {}", subject_id, e);
        }
    }

    /// Get the cached image set for `subject_id`, if present and fresh.
    ///
    /// A stale entry is removed and reported as absent.
    pub async fn get(&self, subject_id: &str) -> Option<ImageSet> {
        let key = subject_key(subject_id);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("image cache read failed for {}: {}", subject_id, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("corrupt image cache entry for {}: {}", subject_id, e);
                return None;
            }
        };

        if self.is_expired(&entry) {
            tracing::debug!("image cache entry for {} expired, dropping", subject_id);
            if let Err(e) = self.store.remove(&key).await {
                tracing::warn!("failed to drop expired entry for {}: {}", subject_id, e);
            }
            return None;
        }

        Some(entry.images)
    }

    /// Remove every entry older than the staleness window, returning the
    /// number removed. Unreadable entries can never be served and are
    /// removed as well.
    pub async fn evict_expired(&self) -> usize {
        let entries = match self.store.scan(KEY_PREFIX).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("image cache scan failed: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for (key, raw) in entries {
            let stale = match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => self.is_expired(&entry),
                Err(e) => {
                    tracing::warn!("corrupt image cache entry at {}: {}", key, e);
                    true
                }
            };
            if stale {
                match self.store.remove(&key).await {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("failed to evict {}: {}", key, e),
                }
            }
        }

        if removed > 0 {
            tracing::debug!("evicted {} expired image cache entries", removed);
        }
        removed
    }

    /// Remove every entry unconditionally, returning the number removed
    pub async fn clear_all(&self) -> usize {
        let entries = match self.store.scan(KEY_PREFIX).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("image cache scan failed: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for (key, _) in entries {
            match self.store.remove(&key).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("failed to remove {}: {}", key, e),
            }
        }
        removed
    }

    /// Count cached subjects and estimate their serialized footprint
    pub async fn stats(&self) -> CacheStats {
        let entries = match self.store.scan(KEY_PREFIX).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("image cache scan failed: {}", e);
                return CacheStats::default();
            }
        };

        let mut stats = CacheStats::default();
        for (key, raw) in &entries {
            stats.total_entries += 1;
            stats.approx_size_bytes += (key.len() + raw.len()) as u64;

            if let Ok(entry) = serde_json::from_str::<CacheEntry>(raw) {
                let older = stats
                    .oldest_entry
                    .map_or(true, |oldest| entry.cached_at < oldest);
                if older {
                    stats.oldest_entry = Some(entry.cached_at);
                }
                let newer = stats
                    .newest_entry
                    .map_or(true, |newest| entry.cached_at > newest);
                if newer {
                    stats.newest_entry = Some(entry.cached_at);
                }
            }
        }
        stats
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        Utc::now().signed_duration_since(entry.cached_at) > self.config.max_age
    }
}

//! The engine tying cache, image sources and suggestion ranking together.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheConfig, CacheStats, ImageCache, KeyValueStore, SqliteStore};
use crate::core::{collect_candidates, GameRecord, ImageSet, Suggestion};
use crate::error::{EngineError, Result};
use crate::ranking::{RankerConfig, SuggestionRanker};
use crate::sources::ImageSource;

/// Outcome of an image lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResolution {
    pub images: ImageSet,
    /// Name of the source that produced the images, or `"cache"`
    pub source: String,
    pub from_cache: bool,
    pub latency_ms: u64,
}

/// Image resolution and search suggestions for a game shelf.
///
/// Lookups are cache-first: a fresh cached image set is returned without
/// touching any source. On a miss the registered sources are consulted in
/// registration order; the first non-empty result is cached and returned.
/// A failing source is logged and skipped, so an unreachable origin never
/// takes the whole lookup down with it.
pub struct ShelfEngine {
    store: Arc<dyn KeyValueStore>,
    cache: ImageCache,
    sources: Vec<Arc<dyn ImageSource>>,
    ranker: SuggestionRanker,
}

impl ShelfEngine {
    /// Open an engine backed by a SQLite store at `db_path`
    pub fn open(db_path: &str) -> Result<Self> {
        let store = SqliteStore::open(db_path)?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Build an engine on any key-value store
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let cache = ImageCache::new(store.clone());
        Self {
            store,
            cache,
            sources: Vec::new(),
            ranker: SuggestionRanker::new(),
        }
    }

    /// Replace the cache tuning, keeping the same store
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = ImageCache::with_config(self.store.clone(), config);
        self
    }

    /// Replace the ranking tuning
    pub fn with_ranker_config(mut self, config: RankerConfig) -> Self {
        self.ranker = SuggestionRanker::with_config(config);
        self
    }

    /// Register an image source. Sources are consulted in registration
    /// order, so put overrides (like [`ManualImageSource`]) first.
    ///
    /// [`ManualImageSource`]: crate::sources::ManualImageSource
    pub fn add_source(&mut self, source: Arc<dyn ImageSource>) {
        tracing::debug!("registered image source '{}'", source.name());
        self.sources.push(source);
    }

    /// Resolve images for a game, preferring the cache.
    ///
    /// Returns [`EngineError::NoImages`] when the cache is cold and no
    /// source has anything for the game.
    pub async fn resolve_images(&self, game: &GameRecord) -> Result<ImageResolution> {
        let start = Instant::now();

        if let Some(images) = self.cache.get(&game.id).await {
            tracing::debug!("image cache hit for '{}'", game.display_name());
            return Ok(ImageResolution {
                images,
                source: "cache".to_string(),
                from_cache: true,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }

        for source in &self.sources {
            let images = match source.fetch_images(game).await {
                Ok(images) => images,
                Err(e) => {
                    tracing::warn!(
                        "image source '{}' failed for '{}': {}",
                        source.name(),
                        game.display_name(),
                        e
                    );
                    continue;
                }
            };
            if images.is_empty() {
                continue;
            }

            self.cache.put(&game.id, &images).await;
            tracing::info!(
                "resolved images for '{}' via '{}' in {}ms",
                game.display_name(),
                source.name(),
                start.elapsed().as_millis()
            );
            return Ok(ImageResolution {
                images,
                source: source.name().to_string(),
                from_cache: false,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }

        Err(EngineError::NoImages(game.display_name()))
    }

    /// Write images straight into the cache, resetting their age
    pub async fn store_images(&self, game_id: &str, images: &ImageSet) {
        self.cache.put(game_id, images).await;
    }

    /// Rank search suggestions for a query against the library and the
    /// recent search history. `limit` overrides the ranker's configured
    /// result cap for this call.
    pub fn suggest(
        &self,
        query: &str,
        games: &[GameRecord],
        history: &[String],
        limit: Option<usize>,
    ) -> Vec<Suggestion> {
        let candidates = collect_candidates(games, history);
        let limit = limit.unwrap_or(self.ranker.config().limit);
        let suggestions = self.ranker.rank_limited(query, &candidates, limit);
        tracing::debug!(
            "query '{}' matched {} of {} candidates",
            query,
            suggestions.len(),
            candidates.len()
        );
        suggestions
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop stale cache entries, returning the number removed
    pub async fn evict_expired(&self) -> usize {
        self.cache.evict_expired().await
    }

    /// Drop the whole image cache, returning the number removed
    pub async fn clear_cache(&self) -> usize {
        self.cache.clear_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::core::CandidateKind;
    use crate::sources::ManualImageSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        name: &'static str,
        images: ImageSet,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(name: &'static str, images: ImageSet) -> Arc<Self> {
            Arc::new(Self {
                name,
                images,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_images(&self, _game: &GameRecord) -> Result<ImageSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.images.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ImageSource for FailingSource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_images(&self, _game: &GameRecord) -> Result<ImageSet> {
            Err(EngineError::Source {
                name: "flaky".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn engine() -> ShelfEngine {
        ShelfEngine::with_store(Arc::new(MemoryStore::new()))
    }

    fn sample_images() -> ImageSet {
        ImageSet::default().with_cover("https://img.example/cover.jpg")
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let mut engine = engine();
        let stub = StubSource::new("stub", sample_images());
        engine.add_source(stub.clone());
        let game = GameRecord::new("witcher-3", "The Witcher 3");

        let first = engine.resolve_images(&game).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.source, "stub");
        assert_eq!(first.images, sample_images());

        let second = engine.resolve_images(&game).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.source, "cache");
        assert_eq!(second.images, sample_images());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_sources_consulted_in_registration_order() {
        let mut engine = engine();
        let manual = Arc::new(ManualImageSource::new());
        manual.assign("witcher-3", ImageSet::default().with_cover("manual.png"));
        let stub = StubSource::new("stub", sample_images());
        engine.add_source(manual);
        engine.add_source(stub.clone());

        let game = GameRecord::new("witcher-3", "The Witcher 3");
        let resolution = engine.resolve_images(&game).await.unwrap();
        assert_eq!(resolution.source, "manual");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_source_falls_through() {
        let mut engine = engine();
        let stub = StubSource::new("stub", sample_images());
        engine.add_source(Arc::new(FailingSource));
        engine.add_source(stub.clone());

        let game = GameRecord::new("witcher-3", "The Witcher 3");
        let resolution = engine.resolve_images(&game).await.unwrap();
        assert_eq!(resolution.source, "stub");
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn test_source_error_display() {
        let err = EngineError::Source {
            name: "flaky".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "image source 'flaky' error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_empty_source_falls_through() {
        let mut engine = engine();
        engine.add_source(StubSource::new("empty", ImageSet::default()));
        let stub = StubSource::new("stub", sample_images());
        engine.add_source(stub.clone());

        let game = GameRecord::new("witcher-3", "The Witcher 3");
        let resolution = engine.resolve_images(&game).await.unwrap();
        assert_eq!(resolution.source, "stub");
    }

    #[tokio::test]
    async fn test_no_images_anywhere_is_an_error() {
        let mut engine = engine();
        engine.add_source(Arc::new(FailingSource));
        engine.add_source(StubSource::new("empty", ImageSet::default()));

        let game = GameRecord::new("obscure", "Obscure Indie Game");
        let err = engine.resolve_images(&game).await.unwrap_err();
        assert!(matches!(err, EngineError::NoImages(_)));
    }

    #[tokio::test]
    async fn test_store_images_short_circuits_sources() {
        let mut engine = engine();
        let stub = StubSource::new("stub", sample_images());
        engine.add_source(stub.clone());

        let game = GameRecord::new("witcher-3", "The Witcher 3");
        let pinned = ImageSet::default().with_cover("picked-by-hand.png");
        engine.store_images("witcher-3", &pinned).await;

        let resolution = engine.resolve_images(&game).await.unwrap();
        assert!(resolution.from_cache);
        assert_eq!(resolution.images, pinned);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_maintenance_delegates() {
        let engine = engine();
        engine.store_images("a", &sample_images()).await;
        engine.store_images("b", &sample_images()).await;

        assert_eq!(engine.cache_stats().await.total_entries, 2);
        assert_eq!(engine.evict_expired().await, 0);
        assert_eq!(engine.clear_cache().await, 2);
        assert_eq!(engine.cache_stats().await.total_entries, 0);
    }

    #[test]
    fn test_suggest_spans_library_and_history() {
        let engine = engine();
        let mut game = GameRecord::new("witcher-3", "The Witcher 3");
        game.platforms.push("Steam".to_string());
        let history = vec!["witcher mods".to_string()];

        let suggestions = engine.suggest("witcher", &[game], &history, None);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, CandidateKind::Title);
        assert_eq!(suggestions[1].kind, CandidateKind::History);
    }

    #[test]
    fn test_suggest_per_call_limit() {
        let engine = engine();
        let games: Vec<GameRecord> = (0..10)
            .map(|i| GameRecord::new(format!("hl-{i}"), format!("Half-Life {i}")))
            .collect();

        let suggestions = engine.suggest("half", &games, &[], Some(2));
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_with_ranker_config_retunes_scoring() {
        // Default tuning puts a matching platform above a matching title;
        // a custom platform bonus flips that.
        let engine = engine().with_ranker_config(RankerConfig {
            platform_bonus: -30.0,
            ..RankerConfig::default()
        });
        let mut game = GameRecord::new("sw-dig", "SteamWorld Dig");
        game.platforms.push("Steam".to_string());

        let suggestions = engine.suggest("steam", &[game], &[], None);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, CandidateKind::Title);
        assert_eq!(suggestions[1].kind, CandidateKind::Platform);
    }
}

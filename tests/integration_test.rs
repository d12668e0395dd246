use async_trait::async_trait;
use gameshelf_engine::{
    CandidateKind, EngineError, GameRecord, ImageSet, ImageSource, ManualImageSource, Result,
    ShelfEngine,
};
use std::sync::Arc;

struct CannedSource {
    images: ImageSet,
}

#[async_trait]
impl ImageSource for CannedSource {
    fn name(&self) -> &str {
        "canned"
    }

    async fn fetch_images(&self, _game: &GameRecord) -> Result<ImageSet> {
        Ok(self.images.clone())
    }
}

fn canned_images() -> ImageSet {
    ImageSet::default()
        .with_banner("https://img.example/banner.jpg")
        .with_cover("https://img.example/cover.jpg")
}

#[tokio::test]
async fn test_engine_integration() {
    // Engine over an in-memory SQLite store
    let mut engine = ShelfEngine::open(":memory:").unwrap();
    engine.add_source(Arc::new(CannedSource {
        images: canned_images(),
    }));

    let game = GameRecord::new("witcher-3", "The Witcher 3");

    // First lookup resolves through the source
    let result = engine.resolve_images(&game).await.unwrap();
    assert!(!result.from_cache);
    assert_eq!(result.source, "canned");
    assert_eq!(result.images, canned_images());

    // Second lookup hits the cache
    let cached = engine.resolve_images(&game).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.source, "cache");
    assert_eq!(cached.images, result.images);
}

#[tokio::test]
async fn test_manual_assignments_override_other_sources() {
    let mut engine = ShelfEngine::open(":memory:").unwrap();

    let manual = Arc::new(ManualImageSource::new());
    manual.assign(
        "witcher-3",
        ImageSet::default().with_cover("file:///picked.png"),
    );
    engine.add_source(manual.clone());
    engine.add_source(Arc::new(CannedSource {
        images: canned_images(),
    }));

    let game = GameRecord::new("witcher-3", "The Witcher 3");
    let result = engine.resolve_images(&game).await.unwrap();
    assert_eq!(result.source, "manual");
    assert_eq!(result.images.cover.as_deref(), Some("file:///picked.png"));

    // Without the assignment the next source takes over
    manual.unassign("witcher-3");
    engine.clear_cache().await;
    let result = engine.resolve_images(&game).await.unwrap();
    assert_eq!(result.source, "canned");
}

#[tokio::test]
async fn test_cold_engine_without_sources_reports_no_images() {
    let engine = ShelfEngine::open(":memory:").unwrap();
    let game = GameRecord::new("obscure", "Obscure Indie Game");

    let err = engine.resolve_images(&game).await.unwrap_err();
    assert!(matches!(err, EngineError::NoImages(_)));

    // Caller-resolved images make the same lookup succeed
    engine.store_images("obscure", &canned_images()).await;
    let result = engine.resolve_images(&game).await.unwrap();
    assert!(result.from_cache);
}

#[tokio::test]
async fn test_cache_stats() {
    let engine = ShelfEngine::open(":memory:").unwrap();

    let stats = engine.cache_stats().await;
    assert_eq!(stats.total_entries, 0);

    engine.store_images("a", &canned_images()).await;
    engine.store_images("b", &canned_images()).await;

    let stats = engine.cache_stats().await;
    assert_eq!(stats.total_entries, 2);
    assert!(stats.approx_size_bytes > 0);
}

#[tokio::test]
async fn test_cache_maintenance() {
    let engine = ShelfEngine::open(":memory:").unwrap();
    engine.store_images("a", &canned_images()).await;

    // Nothing is older than the staleness window yet
    assert_eq!(engine.evict_expired().await, 0);
    assert_eq!(engine.clear_cache().await, 1);
    assert_eq!(engine.cache_stats().await.total_entries, 0);
}

#[tokio::test]
async fn test_suggest_over_library_snapshot() {
    let engine = ShelfEngine::open(":memory:").unwrap();

    // The shape a LIBRARY_PATH snapshot arrives in
    let library: Vec<GameRecord> = serde_json::from_str(
        r#"[
            {"id": "witcher-3", "title": "The Witcher 3", "platforms": ["GOG"], "status": "completed"},
            {"id": "fortnite", "title": "Fortnite"}
        ]"#,
    )
    .unwrap();
    let history = vec!["witcher mods".to_string()];

    let suggestions = engine.suggest("witcher", &library, &history, None);
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].kind, CandidateKind::Title);
    assert_eq!(suggestions[0].text, "The Witcher 3");
    assert_eq!(suggestions[1].kind, CandidateKind::History);

    let suggestions = engine.suggest("gog", &library, &history, None);
    assert_eq!(suggestions[0].kind, CandidateKind::Platform);
}

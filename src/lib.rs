//! # gameshelf-engine
//!
//! Image resolution and search suggestions for a game shelf.
//!
//! The engine keeps a TTL cache of game artwork over a pluggable key-value
//! store, fills it from registered [`ImageSource`]s on demand, and ranks
//! fuzzy search suggestions across the library and the recent search
//! history.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use gameshelf_engine::{GameRecord, ImageSet, MemoryStore, ShelfEngine};
//!
//! # tokio_test::block_on(async {
//! let engine = ShelfEngine::with_store(Arc::new(MemoryStore::new()));
//!
//! // Pin hand-picked artwork, then read it back through the cache.
//! let images = ImageSet::default().with_cover("https://img.example/cover.png");
//! engine.store_images("witcher-3", &images).await;
//!
//! let game = GameRecord::new("witcher-3", "The Witcher 3");
//! let resolution = engine.resolve_images(&game).await.unwrap();
//! assert!(resolution.from_cache);
//!
//! // Suggestions come from the library and the search history.
//! let suggestions = engine.suggest("witcher", &[game], &[], None);
//! assert_eq!(suggestions[0].text, "The Witcher 3");
//! # });
//! ```
//!
//! ## Features
//!
//! - `server`: axum HTTP API exposing resolution, suggestions and cache
//!   maintenance
//! - `cli`: command line interface over the same engine

pub mod cache;
pub mod core;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod sources;

pub use crate::cache::{
    CacheConfig, CacheStats, ImageCache, KeyValueStore, MemoryStore, SqliteStore, StoreError,
    DEFAULT_MAX_AGE_DAYS,
};
pub use crate::core::{
    collect_candidates, Candidate, CandidateKind, GameRecord, ImageSet, PlayStatus, Suggestion,
};
pub use crate::engine::{ImageResolution, ShelfEngine};
pub use crate::error::{EngineError, Result};
pub use crate::ranking::{RankerConfig, SuggestionRanker};
pub use crate::sources::{ImageSource, ManualImageSource};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

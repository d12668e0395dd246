use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gameshelf_engine::{
    GameRecord, ImageResolution, ImageSet, ShelfEngine, Suggestion,
};

const HISTORY_CAPACITY: usize = 50;

#[derive(Clone)]
struct AppState {
    engine: Arc<ShelfEngine>,
    library: Arc<Vec<GameRecord>>,
    history: Arc<Mutex<VecDeque<String>>>,
}

#[derive(Debug, Deserialize)]
struct SuggestRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct HistoryRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    cache: CacheStatsDto,
}

#[derive(Debug, Serialize)]
struct CacheStatsDto {
    total_entries: u64,
    approx_size_bytes: u64,
    oldest_entry: Option<DateTime<Utc>>,
    newest_entry: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct RemovedResponse {
    removed: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gameshelf_server=debug,gameshelf_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Read environment config
    let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "gameshelf.db".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);

    tracing::info!("🚀 Starting GameShelf Engine Server");
    tracing::info!("📦 Database: {}", db_path);
    tracing::info!("🔌 Port: {}", port);

    // Library snapshot is read-only for the lifetime of the server
    let library: Vec<GameRecord> = match std::env::var("LIBRARY_PATH") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let games: Vec<GameRecord> = serde_json::from_str(&raw)?;
            tracing::info!("📚 Loaded {} games from {}", games.len(), path);
            games
        }
        Err(_) => {
            tracing::info!("📚 No LIBRARY_PATH set, starting with an empty library");
            Vec::new()
        }
    };

    let engine = ShelfEngine::open(&db_path)?;

    let state = AppState {
        engine: Arc::new(engine),
        library: Arc::new(library),
        history: Arc::new(Mutex::new(VecDeque::new())),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/suggest", post(suggest_handler))
        .route("/v1/history", post(history_handler))
        .route(
            "/v1/images/:id",
            get(images_handler).put(store_images_handler),
        )
        .route("/v1/stats", get(stats_handler))
        .route("/v1/cache/evict", post(evict_handler))
        .route("/v1/cache/clear", post(clear_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: gameshelf_engine::VERSION.to_string(),
    })
}

async fn suggest_handler(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Json<Vec<Suggestion>> {
    let history: Vec<String> = state
        .history
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect();

    let suggestions = state
        .engine
        .suggest(&req.query, &state.library, &history, req.limit);

    tracing::info!("✅ '{}' → {} suggestions", req.query, suggestions.len());

    Json(suggestions)
}

async fn history_handler(
    State(state): State<AppState>,
    Json(req): Json<HistoryRequest>,
) -> StatusCode {
    let query = req.query.trim();
    if query.is_empty() {
        return StatusCode::NO_CONTENT;
    }

    let mut ring = state.history.lock().unwrap_or_else(PoisonError::into_inner);
    let lowered = query.to_lowercase();
    ring.retain(|q| q.to_lowercase() != lowered);
    ring.push_front(query.to_string());
    ring.truncate(HISTORY_CAPACITY);

    StatusCode::NO_CONTENT
}

async fn images_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageResolution>, AppError> {
    // Games outside the library snapshot can still have cached images
    let game = state
        .library
        .iter()
        .find(|g| g.id == id)
        .cloned()
        .unwrap_or_else(|| GameRecord::new(id.clone(), id.clone()));

    let resolution = state.engine.resolve_images(&game).await?;

    tracing::info!(
        "✅ images for '{}' via '{}' ({}ms)",
        game.display_name(),
        resolution.source,
        resolution.latency_ms
    );

    Ok(Json(resolution))
}

async fn store_images_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(images): Json<ImageSet>,
) -> StatusCode {
    state.engine.store_images(&id, &images).await;
    tracing::info!("💾 stored images for '{}'", id);
    StatusCode::NO_CONTENT
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache_stats = state.engine.cache_stats().await;

    Json(StatsResponse {
        cache: CacheStatsDto {
            total_entries: cache_stats.total_entries,
            approx_size_bytes: cache_stats.approx_size_bytes,
            oldest_entry: cache_stats.oldest_entry,
            newest_entry: cache_stats.newest_entry,
        },
    })
}

async fn evict_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.engine.evict_expired().await;
    tracing::info!("🧹 evicted {} expired entries", removed);
    Json(RemovedResponse { removed })
}

async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.engine.clear_cache().await;
    tracing::info!("🧹 cleared {} cache entries", removed);
    Json(RemovedResponse { removed })
}

// Error handling
struct AppError(gameshelf_engine::error::EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            gameshelf_engine::error::EngineError::NoImages(subject) => (
                StatusCode::NOT_FOUND,
                format!("No images found for: {}", subject),
            ),
            gameshelf_engine::error::EngineError::Source { name, message } => (
                StatusCode::BAD_GATEWAY,
                format!("Source '{}' error: {}", name, message),
            ),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<gameshelf_engine::error::EngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

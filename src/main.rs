use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::Method,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use mato_royale_backend::game::engine::Engine;
use mato_royale_backend::game::types::LeaderboardEntry;
use mato_royale_backend::transport::ws_session::handle_socket;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

struct AppState {
    arenas: DashMap<String, Arc<Engine>>,
}

#[derive(Debug, Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct RoundEndedResponse {
    message: &'static str,
    results: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct ArenaQuery {
    arena: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let state = Arc::new(AppState {
        arenas: DashMap::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app: Router = Router::new()
        .route("/api/health", get(health))
        .route("/api/metrics", get(metrics))
        .route("/api/admin/start-round", post(admin_start_round))
        .route("/api/admin/end-round", post(admin_end_round))
        .route("/api/admin/reset-arena", post(admin_reset_arena))
        .route("/api/arena/:arena", get(ws_handler))
        .layer(cors)
        .with_state(state.clone());

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8787);
    let address = format!("0.0.0.0:{port}");
    tracing::info!("listening on {address}");

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let engines: Vec<Arc<Engine>> = state
        .arenas
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    for engine in engines {
        engine.stop().await;
    }
    tracing::info!("engines stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}

impl AppState {
    fn arena(&self, name: String) -> Arc<Engine> {
        match self.arenas.entry(name) {
            dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let engine = Arc::new(Engine::new());
                engine.start();
                entry.insert(engine.clone());
                engine
            }
        }
    }
}

fn arena_name(requested: Option<String>) -> String {
    match requested {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => "main".to_string(),
    }
}

async fn health() -> impl IntoResponse {
    Json(OkResponse { ok: true })
}

async fn metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArenaQuery>,
) -> impl IntoResponse {
    let engine = state.arena(arena_name(params.arena));
    Json(engine.metrics_report().await)
}

async fn admin_start_round(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArenaQuery>,
) -> impl IntoResponse {
    let engine = state.arena(arena_name(params.arena));
    engine.start_round().await;
    Json(MessageResponse {
        message: "Round started",
    })
}

async fn admin_end_round(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArenaQuery>,
) -> impl IntoResponse {
    let engine = state.arena(arena_name(params.arena));
    let results = engine.end_round().await;
    Json(RoundEndedResponse {
        message: "Round ended",
        results,
    })
}

async fn admin_reset_arena(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArenaQuery>,
) -> impl IntoResponse {
    let engine = state.arena(arena_name(params.arena));
    engine.reset_arena().await;
    Json(MessageResponse {
        message: "Arena reset",
    })
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(arena): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let trimmed = arena.trim();
    let name = if trimmed.is_empty() { "main" } else { trimmed }.to_string();
    let engine = state.arena(name);
    ws.on_upgrade(move |socket| handle_socket(socket, engine))
}

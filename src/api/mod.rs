// src/api/mod.rs — HTTP boundary for the dashboard client

pub mod handlers;
pub mod types;

use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::infra::config::ServerConfig;
use crate::overview::DeckContext;

/// Shared state for API handlers. Read-only; every request recomputes
/// from durable storage and peers.
#[derive(Clone)]
pub struct ApiState {
    pub ctx: Arc<DeckContext>,
}

/// Build the axum router with all dashboard routes.
///
/// When `static_dir` is set, unmatched paths serve the browser client
/// bundle with an index.html fallback for client-side routing.
pub fn build_router(state: ApiState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let router = Router::new()
        .route("/api/overview", get(handlers::overview))
        .route("/api/heartbeat/state", get(handlers::heartbeat_state))
        .route("/api/heartbeat/log", get(handlers::heartbeat_log))
        .route("/api/todo", get(handlers::todo))
        .route("/api/research", get(handlers::research))
        .route("/api/writings", get(handlers::writings))
        .route("/api/crons", get(handlers::crons))
        .route("/api/insights", get(handlers::insights))
        .route("/api/curiosity", get(handlers::curiosity))
        .route("/api/daily", get(handlers::daily))
        .route("/api/briefing", get(handlers::briefing))
        .route("/api/system", get(handlers::system))
        .route("/api/mood", get(handlers::mood));

    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(&dir).not_found_service(index))
        }
        None => router.fallback(handlers::not_found),
    };

    router.layer(cors).with_state(state)
}

/// Start the API server (blocking).
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let router = build_router(state, config.static_dir.clone());

    tracing::info!("dashboard listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

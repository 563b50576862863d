//! Service routes: liveness, store readiness and build info.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    /// `postgres` or `memory`.
    store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    atomic_cascade: bool,
    images: bool,
}

async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let store = if state.settings.uses_memory_store() { "memory" } else { "postgres" };
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                store,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store is not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "unavailable",
                    store,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn info(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        atomic_cascade: state.settings.atomic_cascade,
        images: state.settings.s3_bucket.is_some(),
    })
}

/// GET /health, GET /ready, GET /version.
pub fn service_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(info))
        .with_state(state)
}

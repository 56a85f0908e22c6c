//! Common routes: root banner, liveness, database status probe.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn root() -> Json<MessageBody> {
    Json(MessageBody {
        message: "Advertisement API is running",
    })
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// On-demand probe: pings the database, then re-runs table creation.
/// Failures are reported in the body, never propagated.
async fn db_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "db-status: ping failed");
        return Json(serde_json::json!({ "database": "disconnected" }));
    }
    match state.store.ensure_schema().await {
        Ok(()) => Json(serde_json::json!({ "database": "connected" })),
        Err(e) => {
            tracing::warn!(error = %e, "db-status: schema check failed");
            Json(serde_json::json!({
                "database": "error",
                "detail": e.to_string()
            }))
        }
    }
}

/// GET /, GET /health, GET /db-status.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/db-status", get(db_status))
        .with_state(state)
}

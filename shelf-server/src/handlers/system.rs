use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::AppState;

pub async fn ping() -> Json<Value> {
    debug!("ping");
    Json(json!({
        "status": "ok",
        "message": "Shelf is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Reports 503 when the storage backend does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut status = StatusCode::OK;
    let storage = match &state.postgres {
        Some(postgres) => match postgres.ping().await {
            Ok(()) => json!({ "backend": "postgres", "status": "healthy" }),
            Err(err) => {
                error!(error = %err, "health check: database unreachable");
                status = StatusCode::SERVICE_UNAVAILABLE;
                json!({
                    "backend": "postgres",
                    "status": "unhealthy",
                    "error": err.to_string(),
                })
            }
        },
        None => json!({ "backend": "memory", "status": "healthy" }),
    };

    let overall = if status.is_success() { "healthy" } else { "unhealthy" };
    (
        status,
        Json(json!({
            "status": overall,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
            "checks": { "storage": storage },
        })),
    )
}

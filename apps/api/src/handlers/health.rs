use axum::Json;

use crate::dto::HealthResponse;

/// Liveness probe; touches no store.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

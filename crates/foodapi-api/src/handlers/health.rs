//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use foodapi_core::result::AppResult;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let session_store = describe("session_store", state.session_store.health_check().await);
    let database = describe("database", state.users.health_check().await);

    let healthy = session_store == "connected" && database == "connected";
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            session_store: session_store.to_string(),
            database: database.to_string(),
        }),
    )
}

fn describe(component: &str, result: AppResult<bool>) -> &'static str {
    match result {
        Ok(true) => "connected",
        Ok(false) => "unavailable",
        Err(e) => {
            warn!(component, error = %e, "Health check failed");
            "unavailable"
        }
    }
}

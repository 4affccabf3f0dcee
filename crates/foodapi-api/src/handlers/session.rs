//! Caller session status handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::SessionResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn session_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SessionResponse>, ApiError> {
    let active = state.session_manager.session_active(&auth).await?;

    Ok(Json(SessionResponse {
        token_id: auth.0.token_id,
        user_id: auth.0.user_id,
        active,
    }))
}

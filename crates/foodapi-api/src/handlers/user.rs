//! User lookup handler.

use axum::Json;
use axum::extract::{Path, State};

use foodapi_core::error::AppError;

use crate::dto::response::UserResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{id}' not found")))?;

    Ok(Json(user.into()))
}

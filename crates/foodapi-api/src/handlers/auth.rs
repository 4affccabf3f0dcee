//! Auth handlers: login, logout, refresh.

use axum::Json;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};

use foodapi_core::error::ErrorKind;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{DataLogin, StatusMessage};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ValidatedJson};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<DataLogin>, ApiError> {
    let result = state
        .session_manager
        .sign_in(&req.email, &req.password)
        .await?;

    Ok(Json(DataLogin {
        id: result.user.id,
        names: result.user.names,
        last_names: result.user.last_names,
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
    }))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusMessage>, ApiError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.session_manager.logout(authorization).await?;

    Ok(Json(StatusMessage::new(
        StatusCode::OK,
        "Successfully logged out",
    )))
}

/// POST /api/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<DataLogin>, ApiError> {
    // Rotation already happened if issuance fails; the client must log in again.
    let tokens = state
        .session_manager
        .refresh(&req.refresh_token)
        .await
        .map_err(|e| match e.kind {
            ErrorKind::TokenCreation | ErrorKind::SessionPersist => {
                e.into_kind(ErrorKind::Forbidden)
            }
            _ => e,
        })?;

    Ok(Json(DataLogin {
        id: tokens.user_id,
        names: req.names.unwrap_or_default(),
        last_names: req.last_names.unwrap_or_default(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

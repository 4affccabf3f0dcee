//! Shared application state passed to every handler.

use std::sync::Arc;

use foodapi_auth::SessionManager;
use foodapi_core::traits::{SessionStore, UserRepository};

/// Application state shared across all handlers via `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Login, logout, refresh, and the auth gate.
    pub session_manager: Arc<SessionManager>,
    /// Session store, for health reporting.
    pub session_store: Arc<dyn SessionStore>,
    /// User lookups.
    pub users: Arc<dyn UserRepository>,
}

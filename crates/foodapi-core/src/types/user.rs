//! User account entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User ID (UUID string).
    pub id: String,
    /// Given names.
    pub names: String,
    /// Family names.
    pub last_names: String,
    /// Login email.
    pub email: String,
    /// One-way password hash (PHC string).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

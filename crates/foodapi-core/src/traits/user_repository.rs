//! User repository trait consumed by the login flow.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::user::User;

/// Read access to stored user accounts.
///
/// The relational persistence layer is an external collaborator; the
/// session subsystem only needs these lookups.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

//! In-memory user repository.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use foodapi_core::result::AppResult;
use foodapi_core::traits::UserRepository;
use foodapi_core::types::User;

/// User repository held entirely in memory, keyed by user ID.
///
/// Backs the HTTP tests and local runs without PostgreSQL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            names: "Ada".to_string(),
            last_names: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_lookup_by_email_and_id() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("u-1", "ada@example.com"));

        let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, "u-1");
        assert!(repo.find_by_id("u-1").await.unwrap().is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}

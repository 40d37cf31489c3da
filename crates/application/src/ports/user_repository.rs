//! User repository port

use async_trait::async_trait;
use shortpress_domain::{User, UserId};

use super::RepositoryError;

/// Data for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Whether the user is an admin.
    pub is_admin: bool,
}

/// Repository trait for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and assigns its id.
    ///
    /// # Errors
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Gets a user by id.
    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Returns true if at least one admin exists.
    async fn has_admin(&self) -> Result<bool, RepositoryError>;

    /// Gets a user by id, failing if it does not exist.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    async fn require(&self, id: UserId) -> Result<User, RepositoryError> {
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))
    }
}

//! User accounts.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// An account that owns categories and variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Admins may read and write every owner's data.
    #[serde(default)]
    pub is_admin: bool,
    /// Inactive users are refused by every operation.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl User {
    /// Creates an active, non-admin user.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            is_admin: false,
            is_active: true,
        }
    }

    /// Creates an active admin user.
    #[must_use]
    pub fn admin(id: UserId, username: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id, username)
        }
    }
}

/// Validates a username: non-empty, no surrounding or embedded whitespace.
///
/// # Errors
///
/// Returns `DomainError::InvalidUsername` if the username is rejected.
pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.is_empty() || username.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

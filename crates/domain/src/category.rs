//! Categories group a user's variables.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CategoryId, UserId};

/// A named grouping of variables, owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display name, unique per owner.
    pub name: String,
    /// Owning user.
    pub owner_id: UserId,
}

impl Category {
    /// Creates a category after validating its name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyName` if the trimmed name is empty.
    pub fn new(id: CategoryId, name: impl Into<String>, owner_id: UserId) -> DomainResult<Self> {
        let name = name.into();
        validate_category_name(&name)?;
        Ok(Self { id, name, owner_id })
    }
}

/// Rejects blank category names.
///
/// # Errors
///
/// Returns `DomainError::EmptyName` if the trimmed name is empty.
pub fn validate_category_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName("category name"));
    }
    Ok(())
}

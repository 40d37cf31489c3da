//! The stored variable record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CategoryId, UserId, VariableId};

/// A named value owned by one user.
///
/// `value` is raw text and may contain `{{identifier}}` placeholders that
/// refer to other variables of the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique identifier.
    pub id: VariableId,
    /// Stable key, unique per owner. Placeholders match on this.
    pub identifier: String,
    /// Display name, not necessarily unique.
    pub name: String,
    /// Raw value, possibly containing placeholders.
    pub value: String,
    /// Optional grouping.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Optional parent in the variable tree. Unrelated to placeholder nesting.
    #[serde(default)]
    pub parent_variable_id: Option<VariableId>,
    /// Owning user.
    pub owner_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Variable {
    /// Creates a variable after validating its identifier and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not a valid reference name or
    /// the name is blank.
    pub fn new(
        id: VariableId,
        owner_id: UserId,
        identifier: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let identifier = identifier.into();
        let name = name.into();
        Self::validate_fields(&identifier, &name)?;

        Ok(Self {
            id,
            identifier,
            name,
            value: value.into(),
            category_id: None,
            parent_variable_id: None,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks the identifier and name rules without building a record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` or `EmptyName`.
    pub fn validate_fields(identifier: &str, name: &str) -> DomainResult<()> {
        if !is_valid_identifier(identifier) {
            return Err(DomainError::InvalidIdentifier(identifier.to_string()));
        }
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName("variable name"));
        }
        Ok(())
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Sets the parent variable.
    #[must_use]
    pub const fn with_parent(mut self, parent_variable_id: Option<VariableId>) -> Self {
        self.parent_variable_id = parent_variable_id;
        self
    }

    /// Marks the variable as modified at `now`.
    pub const fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Returns true if `identifier` matches `^[A-Za-z0-9_]+$`.
///
/// This is both the rule for stored identifiers and for the text between
/// `{{` and `}}` in a placeholder.
#[must_use]
pub fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

//! Variable repository port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shortpress_domain::{CategoryId, UserId, Variable, VariableArena, VariableId};

use super::{Page, RepositoryError};

/// Data for a variable that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariable {
    /// Owning user.
    pub owner_id: UserId,
    /// Stable key, unique per owner.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Raw value.
    pub value: String,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Optional parent variable.
    pub parent_variable_id: Option<VariableId>,
    /// Creation time, also used as the first modification time.
    pub created_at: DateTime<Utc>,
}

/// Repository trait for variable persistence.
#[async_trait]
pub trait VariableRepository: Send + Sync {
    /// Stores a new variable and assigns its id.
    ///
    /// # Errors
    /// Returns `RepositoryError::Conflict` if the owner already has a
    /// variable with this identifier, `RepositoryError::NotFound` if the
    /// category or parent is missing, and `RepositoryError::Invalid` if
    /// either belongs to another owner.
    async fn create(&self, variable: NewVariable) -> Result<Variable, RepositoryError>;

    /// Gets a variable by id.
    async fn get(&self, id: VariableId) -> Result<Option<Variable>, RepositoryError>;

    /// Finds one owner's variable by identifier. Never crosses owners.
    async fn find_by_identifier(
        &self,
        owner_id: UserId,
        identifier: &str,
    ) -> Result<Option<Variable>, RepositoryError>;

    /// Lists variables in id order, optionally restricted to one owner.
    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Variable>, RepositoryError>;

    /// Lists every variable of one owner.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Variable>, RepositoryError>;

    /// Replaces a stored variable.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if it or a linked record doesn't
    /// exist, `RepositoryError::Conflict` if the identifier is taken, and
    /// `RepositoryError::Invalid` for a foreign link or a parent cycle.
    async fn update(&self, variable: &Variable) -> Result<(), RepositoryError>;

    /// Deletes a variable. Its children lose their parent link.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if it doesn't exist.
    async fn delete(&self, id: VariableId) -> Result<(), RepositoryError>;

    /// Deletes every variable of an owner. Returns the number removed.
    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError>;

    /// Gets a variable by id, failing if it does not exist.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if the variable doesn't exist.
    async fn require(&self, id: VariableId) -> Result<Variable, RepositoryError> {
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("variable {id}")))
    }

    /// Loads a consistent snapshot of one owner's variables.
    async fn load_arena(&self, owner_id: UserId) -> Result<VariableArena, RepositoryError> {
        let variables = self.list_by_owner(owner_id).await?;
        Ok(VariableArena::from_variables(owner_id, variables))
    }
}

//! Category repository port

use async_trait::async_trait;
use shortpress_domain::{Category, CategoryId, UserId};

use super::{Page, RepositoryError};

/// What happens to a category's variables when it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletion {
    /// Delete the variables along with the category.
    Cascade,
    /// Move the variables to another category first.
    Reassign(CategoryId),
}

/// Repository trait for category persistence.
///
/// Deleting categories touches variables too; implementations must apply
/// both sides in one step so readers never see orphaned variables.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Stores a new category and assigns its id.
    ///
    /// # Errors
    /// Returns `RepositoryError::Conflict` if the owner already has a
    /// category with this name.
    async fn create(&self, name: &str, owner_id: UserId) -> Result<Category, RepositoryError>;

    /// Gets a category by id.
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;

    /// Lists categories in id order, optionally restricted to one owner.
    async fn list(
        &self,
        owner_id: Option<UserId>,
        page: Page,
    ) -> Result<Vec<Category>, RepositoryError>;

    /// Replaces a stored category.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if it doesn't exist, or
    /// `RepositoryError::Conflict` if the new name is taken.
    async fn update(&self, category: &Category) -> Result<(), RepositoryError>;

    /// Deletes a category, handling its variables as requested.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if the category (or the
    /// reassignment target) doesn't exist.
    async fn delete(&self, id: CategoryId, mode: CategoryDeletion) -> Result<(), RepositoryError>;

    /// Deletes every category of an owner, cascading to their variables.
    /// Returns the number of categories removed.
    async fn delete_by_owner(&self, owner_id: UserId) -> Result<usize, RepositoryError>;

    /// Gets a category by id, failing if it does not exist.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    async fn require(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("category {id}")))
    }
}

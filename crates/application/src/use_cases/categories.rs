//! Category use cases

use serde::Deserialize;
use shortpress_domain::category::validate_category_name;
use shortpress_domain::{Category, CategoryId, UserId};
use tracing::info;

use crate::authorization::Principal;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{CategoryDeletion, CategoryRepository, Page, RepositoryError, UserRepository};

fn name_conflict(error: RepositoryError) -> ApplicationError {
    match error {
        RepositoryError::Conflict(_) => {
            ApplicationError::Conflict("category name already exists".into())
        }
        other => other.into(),
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// Display name, unique per owner.
    pub name: String,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryInput {
    /// New name, if changing.
    #[serde(default)]
    pub name: Option<String>,
}

/// Creates a category owned by the caller.
pub struct CreateCategory<'a, C> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository> CreateCategory<'a, C> {
    /// Creates a new `CreateCategory` use case.
    pub const fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns a domain error for blank names and `Conflict` for duplicates.
    pub async fn execute(
        &self,
        principal: &Principal,
        input: CreateCategoryInput,
    ) -> ApplicationResult<Category> {
        validate_category_name(&input.name)?;
        let category = self
            .categories
            .create(input.name.trim(), principal.user_id)
            .await
            .map_err(name_conflict)?;

        info!(category_id = %category.id, owner_id = %category.owner_id, "category created");
        Ok(category)
    }
}

/// Lists the categories visible to the caller.
pub struct ListCategories<'a, C> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository> ListCategories<'a, C> {
    /// Creates a new `ListCategories` use case.
    pub const fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Executes the use case. Admins see every owner's categories.
    ///
    /// # Errors
    /// Returns an error if the repository fails.
    pub async fn execute(
        &self,
        principal: &Principal,
        page: Page,
    ) -> ApplicationResult<Vec<Category>> {
        Ok(self
            .categories
            .list(principal.visible_owner(), page)
            .await?)
    }
}

/// Reads one category.
pub struct GetCategory<'a, C> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository> GetCategory<'a, C> {
    /// Creates a new `GetCategory` use case.
    pub const fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `NotFound` or `Forbidden`.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: CategoryId,
    ) -> ApplicationResult<Category> {
        let category = self.categories.require(id).await?;
        principal.authorize(category.owner_id, "category")?;
        Ok(category)
    }
}

/// Renames a category.
pub struct UpdateCategory<'a, C> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository> UpdateCategory<'a, C> {
    /// Creates a new `UpdateCategory` use case.
    pub const fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `NotFound`, `Forbidden`, a domain error, or `Conflict`.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: CategoryId,
        input: UpdateCategoryInput,
    ) -> ApplicationResult<Category> {
        let mut category = self.categories.require(id).await?;
        principal.authorize(category.owner_id, "category")?;

        if let Some(name) = input.name {
            validate_category_name(&name)?;
            category.name = name.trim().to_string();
        }

        self.categories
            .update(&category)
            .await
            .map_err(name_conflict)?;
        Ok(category)
    }
}

/// Deletes a category, cascading to or reassigning its variables.
pub struct DeleteCategory<'a, C> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository> DeleteCategory<'a, C> {
    /// Creates a new `DeleteCategory` use case.
    pub const fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing category or target, `Forbidden`,
    /// or `InvalidInput` if the target is the category itself or belongs
    /// to another owner.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: CategoryId,
        mode: CategoryDeletion,
    ) -> ApplicationResult<()> {
        let category = self.categories.require(id).await?;
        principal.authorize(category.owner_id, "category")?;

        if let CategoryDeletion::Reassign(target_id) = mode {
            if target_id == id {
                return Err(ApplicationError::InvalidInput(
                    "cannot reassign variables to the category being deleted".into(),
                ));
            }
            let target = self
                .categories
                .get(target_id)
                .await?
                .ok_or_else(|| ApplicationError::NotFound("new category not found".into()))?;
            if target.owner_id != category.owner_id {
                return Err(ApplicationError::InvalidInput(
                    "new category belongs to another owner".into(),
                ));
            }
        }

        self.categories.delete(id, mode).await?;
        info!(category_id = %id, ?mode, "category deleted");
        Ok(())
    }
}

/// Admin: lists one user's categories.
pub struct ListUserCategories<'a, U, C> {
    users: &'a U,
    categories: &'a C,
}

impl<'a, U: UserRepository, C: CategoryRepository> ListUserCategories<'a, U, C> {
    /// Creates a new `ListUserCategories` use case.
    pub const fn new(users: &'a U, categories: &'a C) -> Self {
        Self { users, categories }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `Forbidden` for non-admins and `NotFound` for unknown users.
    pub async fn execute(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> ApplicationResult<Vec<Category>> {
        principal.require_admin()?;
        self.users.require(user_id).await?;
        Ok(self
            .categories
            .list(Some(user_id), Page::new(0, usize::MAX))
            .await?)
    }
}

/// Admin: deletes all of one user's categories and their variables.
pub struct DeleteAllUserCategories<'a, U, C> {
    users: &'a U,
    categories: &'a C,
}

impl<'a, U: UserRepository, C: CategoryRepository> DeleteAllUserCategories<'a, U, C> {
    /// Creates a new `DeleteAllUserCategories` use case.
    pub const fn new(users: &'a U, categories: &'a C) -> Self {
        Self { users, categories }
    }

    /// Executes the use case. Returns the number of categories removed.
    ///
    /// # Errors
    /// Returns `Forbidden` for non-admins and `NotFound` for unknown users.
    pub async fn execute(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> ApplicationResult<usize> {
        principal.require_admin()?;
        self.users.require(user_id).await?;
        let removed = self.categories.delete_by_owner(user_id).await?;
        info!(user_id = %user_id, removed, "user categories deleted");
        Ok(removed)
    }
}

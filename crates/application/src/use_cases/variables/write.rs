//! Creating, updating, and deleting variables.

use serde::{Deserialize, Deserializer};
use shortpress_domain::{CategoryId, DomainError, UserId, Variable, VariableId};
use tracing::info;

use crate::authorization::Principal;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{
    CategoryRepository, Clock, NewVariable, RepositoryError, UserRepository, VariableRepository,
};

fn identifier_conflict(error: RepositoryError) -> ApplicationError {
    match error {
        RepositoryError::Conflict(_) => {
            ApplicationError::Conflict("variable identifier already exists".into())
        }
        other => other.into(),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Checks that a category exists and belongs to `owner_id`.
async fn check_category<C: CategoryRepository>(
    categories: &C,
    category_id: CategoryId,
    owner_id: UserId,
) -> ApplicationResult<()> {
    let category = categories.require(category_id).await?;
    if category.owner_id != owner_id {
        return Err(ApplicationError::InvalidInput(
            "category belongs to another owner".into(),
        ));
    }
    Ok(())
}

/// Checks that a parent variable exists and belongs to `owner_id`.
async fn check_parent<V: VariableRepository>(
    variables: &V,
    parent_id: VariableId,
    owner_id: UserId,
) -> ApplicationResult<()> {
    let parent = variables.require(parent_id).await?;
    if parent.owner_id != owner_id {
        return Err(ApplicationError::InvalidInput(
            "parent variable belongs to another owner".into(),
        ));
    }
    Ok(())
}

/// Input for creating a variable.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariableInput {
    /// Stable key, unique per owner, referenced as `{{identifier}}`.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Raw value.
    #[serde(default)]
    pub value: String,
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Optional parent variable.
    #[serde(default)]
    pub parent_variable_id: Option<VariableId>,
}

/// Creates a variable owned by the caller.
pub struct CreateVariable<'a, V, C, K> {
    variables: &'a V,
    categories: &'a C,
    clock: &'a K,
}

impl<'a, V, C, K> CreateVariable<'a, V, C, K>
where
    V: VariableRepository,
    C: CategoryRepository,
    K: Clock,
{
    /// Creates a new `CreateVariable` use case.
    pub const fn new(variables: &'a V, categories: &'a C, clock: &'a K) -> Self {
        Self {
            variables,
            categories,
            clock,
        }
    }

    /// Executes the use case.
    ///
    /// The value is stored as given; broken placeholders surface when it
    /// is resolved, not here.
    ///
    /// # Errors
    /// Returns a domain error for a bad identifier or name, `NotFound` or
    /// `InvalidInput` for a bad category or parent, and `Conflict` if the
    /// identifier is taken.
    pub async fn execute(
        &self,
        principal: &Principal,
        input: CreateVariableInput,
    ) -> ApplicationResult<Variable> {
        Variable::validate_fields(&input.identifier, &input.name)?;
        let owner_id = principal.user_id;

        if let Some(category_id) = input.category_id {
            check_category(self.categories, category_id, owner_id).await?;
        }
        if let Some(parent_id) = input.parent_variable_id {
            check_parent(self.variables, parent_id, owner_id).await?;
        }

        let variable = self
            .variables
            .create(NewVariable {
                owner_id,
                identifier: input.identifier,
                name: input.name,
                value: input.value,
                category_id: input.category_id,
                parent_variable_id: input.parent_variable_id,
                created_at: self.clock.now(),
            })
            .await
            .map_err(identifier_conflict)?;

        info!(
            variable_id = %variable.id,
            owner_id = %owner_id,
            identifier = %variable.identifier,
            "variable created"
        );
        Ok(variable)
    }
}

/// Input for a partial variable update.
///
/// For the optional links, an absent field leaves the link alone and an
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVariableInput {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New raw value.
    #[serde(default)]
    pub value: Option<String>,
    /// New category, or `Some(None)` to clear.
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
    /// New parent, or `Some(None)` to clear.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_variable_id: Option<Option<VariableId>>,
}

/// Applies a partial update to a variable.
pub struct UpdateVariable<'a, V, C, K> {
    variables: &'a V,
    categories: &'a C,
    clock: &'a K,
}

impl<'a, V, C, K> UpdateVariable<'a, V, C, K>
where
    V: VariableRepository,
    C: CategoryRepository,
    K: Clock,
{
    /// Creates a new `UpdateVariable` use case.
    pub const fn new(variables: &'a V, categories: &'a C, clock: &'a K) -> Self {
        Self {
            variables,
            categories,
            clock,
        }
    }

    /// Executes the use case. Links are checked against the variable's
    /// owner, which differs from the caller when an admin edits.
    ///
    /// # Errors
    /// Returns `NotFound`, `Forbidden`, `InvalidInput`, or a domain error
    /// if the new parent would make the variable its own ancestor.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: VariableId,
        input: UpdateVariableInput,
    ) -> ApplicationResult<Variable> {
        let mut variable = self.variables.require(id).await?;
        principal.authorize(variable.owner_id, "variable")?;
        let owner_id = variable.owner_id;

        if let Some(name) = input.name {
            Variable::validate_fields(&variable.identifier, &name)?;
            variable.name = name;
        }
        if let Some(value) = input.value {
            variable.value = value;
        }
        if let Some(category_id) = input.category_id {
            if let Some(category_id) = category_id {
                check_category(self.categories, category_id, owner_id).await?;
            }
            variable.category_id = category_id;
        }
        if let Some(parent_id) = input.parent_variable_id {
            if let Some(parent_id) = parent_id {
                check_parent(self.variables, parent_id, owner_id).await?;
                let arena = self.variables.load_arena(owner_id).await?;
                if arena.would_create_parent_cycle(id, parent_id) {
                    return Err(DomainError::ParentCycle(variable.identifier).into());
                }
            }
            variable.parent_variable_id = parent_id;
        }

        variable.touch(self.clock.now());
        self.variables
            .update(&variable)
            .await
            .map_err(identifier_conflict)?;

        info!(variable_id = %id, "variable updated");
        Ok(variable)
    }
}

/// Deletes one variable.
pub struct DeleteVariable<'a, V> {
    variables: &'a V,
}

impl<'a, V: VariableRepository> DeleteVariable<'a, V> {
    /// Creates a new `DeleteVariable` use case.
    pub const fn new(variables: &'a V) -> Self {
        Self { variables }
    }

    /// Executes the use case. Children keep existing without a parent.
    ///
    /// # Errors
    /// Returns `NotFound` or `Forbidden`.
    pub async fn execute(&self, principal: &Principal, id: VariableId) -> ApplicationResult<()> {
        let variable = self.variables.require(id).await?;
        principal.authorize(variable.owner_id, "variable")?;
        self.variables.delete(id).await?;
        info!(variable_id = %id, "variable deleted");
        Ok(())
    }
}

/// Admin: deletes all of one user's variables.
pub struct DeleteAllUserVariables<'a, U, V> {
    users: &'a U,
    variables: &'a V,
}

impl<'a, U: UserRepository, V: VariableRepository> DeleteAllUserVariables<'a, U, V> {
    /// Creates a new `DeleteAllUserVariables` use case.
    pub const fn new(users: &'a U, variables: &'a V) -> Self {
        Self { users, variables }
    }

    /// Executes the use case. Returns the number of variables removed.
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
        let removed = self.variables.delete_by_owner(user_id).await?;
        info!(user_id = %user_id, removed, "user variables deleted");
        Ok(removed)
    }
}

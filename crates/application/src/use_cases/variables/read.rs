//! Reading variables along with their display values.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use shortpress_domain::{UserId, Variable, VariableArena, VariableId};
use tracing::debug;

use crate::authorization::Principal;
use crate::error::ApplicationResult;
use crate::ports::{Page, UserRepository, VariableRepository};
use crate::variable_resolver::{ResolverConfig, VariableResolver};

/// A variable as shown to readers.
///
/// Reads never fail because one value is broken: if resolution fails the
/// display value is absent and the reason is given instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableView {
    /// The stored record.
    #[serde(flatten)]
    pub variable: Variable,
    /// The resolved value, if resolution succeeded.
    pub display_value: Option<String>,
    /// Why resolution failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_error: Option<String>,
}

impl VariableView {
    /// Resolves `variable` against `arena` for display.
    #[must_use]
    pub fn build(variable: Variable, arena: &VariableArena, config: ResolverConfig) -> Self {
        let resolver = VariableResolver::new(arena, variable.owner_id).with_config(config);
        match resolver.resolve_variable(&variable) {
            Ok(value) => Self {
                variable,
                display_value: Some(value),
                resolution_error: None,
            },
            Err(error) => {
                debug!(variable_id = %variable.id, %error, "display value unavailable");
                Self {
                    variable,
                    display_value: None,
                    resolution_error: Some(error.to_string()),
                }
            }
        }
    }
}

/// Builds views for variables of possibly many owners, loading each
/// owner's arena once.
async fn views<V: VariableRepository>(
    repository: &V,
    variables: Vec<Variable>,
    config: ResolverConfig,
) -> ApplicationResult<Vec<VariableView>> {
    let mut arenas: HashMap<UserId, VariableArena> = HashMap::new();
    let mut out = Vec::with_capacity(variables.len());

    for variable in variables {
        let arena = match arenas.entry(variable.owner_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(repository.load_arena(variable.owner_id).await?),
        };
        out.push(VariableView::build(variable, arena, config));
    }

    Ok(out)
}

/// Lists the variables visible to the caller.
pub struct ListVariables<'a, V> {
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, V: VariableRepository> ListVariables<'a, V> {
    /// Creates a new `ListVariables` use case.
    pub const fn new(variables: &'a V, config: ResolverConfig) -> Self {
        Self { variables, config }
    }

    /// Executes the use case. Admins see every owner's variables.
    ///
    /// # Errors
    /// Returns an error if the repository fails.
    pub async fn execute(
        &self,
        principal: &Principal,
        page: Page,
    ) -> ApplicationResult<Vec<VariableView>> {
        let variables = self.variables.list(principal.visible_owner(), page).await?;
        views(self.variables, variables, self.config).await
    }
}

/// Reads one variable.
pub struct GetVariable<'a, V> {
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, V: VariableRepository> GetVariable<'a, V> {
    /// Creates a new `GetVariable` use case.
    pub const fn new(variables: &'a V, config: ResolverConfig) -> Self {
        Self { variables, config }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `NotFound` or `Forbidden`.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: VariableId,
    ) -> ApplicationResult<VariableView> {
        let variable = self.variables.require(id).await?;
        principal.authorize(variable.owner_id, "variable")?;
        let arena = self.variables.load_arena(variable.owner_id).await?;
        Ok(VariableView::build(variable, &arena, self.config))
    }
}

/// Admin: lists one user's variables.
pub struct ListUserVariables<'a, U, V> {
    users: &'a U,
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, U: UserRepository, V: VariableRepository> ListUserVariables<'a, U, V> {
    /// Creates a new `ListUserVariables` use case.
    pub const fn new(users: &'a U, variables: &'a V, config: ResolverConfig) -> Self {
        Self {
            users,
            variables,
            config,
        }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `Forbidden` for non-admins and `NotFound` for unknown users.
    pub async fn execute(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> ApplicationResult<Vec<VariableView>> {
        principal.require_admin()?;
        self.users.require(user_id).await?;
        let arena = self.variables.load_arena(user_id).await?;
        Ok(arena
            .iter()
            .cloned()
            .map(|variable| VariableView::build(variable, &arena, self.config))
            .collect())
    }
}

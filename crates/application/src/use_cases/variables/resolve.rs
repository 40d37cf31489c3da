//! Strict resolution of stored variables and draft values.

use serde::{Deserialize, Serialize};
use shortpress_domain::{UserId, Variable, VariableId};
use tracing::{debug, warn};

use crate::authorization::Principal;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::VariableRepository;
use crate::variable_resolver::{ResolverConfig, VariableResolver, distinct_reference_names};

/// A variable together with its fully resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVariable {
    /// The stored record.
    #[serde(flatten)]
    pub variable: Variable,
    /// The value with every placeholder substituted.
    pub resolved_value: String,
}

async fn resolve_stored<V: VariableRepository>(
    variables: &V,
    config: ResolverConfig,
    variable: Variable,
) -> ApplicationResult<ResolvedVariable> {
    let arena = variables.load_arena(variable.owner_id).await?;
    let resolver = VariableResolver::new(&arena, variable.owner_id).with_config(config);

    match resolver.resolve_variable(&variable) {
        Ok(resolved_value) => {
            debug!(variable_id = %variable.id, "variable resolved");
            Ok(ResolvedVariable {
                variable,
                resolved_value,
            })
        }
        Err(error) => {
            warn!(variable_id = %variable.id, %error, "variable resolution failed");
            Err(error.into())
        }
    }
}

/// Resolves a stored variable by id.
pub struct ResolveVariable<'a, V> {
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, V: VariableRepository> ResolveVariable<'a, V> {
    /// Creates a new `ResolveVariable` use case.
    pub const fn new(variables: &'a V, config: ResolverConfig) -> Self {
        Self { variables, config }
    }

    /// Executes the use case. Resolution happens in the variable owner's
    /// scope, also when an admin asks.
    ///
    /// # Errors
    /// Returns `NotFound`, `Forbidden`, or a `Resolution` error.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: VariableId,
    ) -> ApplicationResult<ResolvedVariable> {
        let variable = self.variables.require(id).await?;
        principal.authorize(variable.owner_id, "variable")?;
        resolve_stored(self.variables, self.config, variable).await
    }
}

/// Resolves a stored variable by identifier.
pub struct ResolveVariableByIdentifier<'a, V> {
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, V: VariableRepository> ResolveVariableByIdentifier<'a, V> {
    /// Creates a new `ResolveVariableByIdentifier` use case.
    pub const fn new(variables: &'a V, config: ResolverConfig) -> Self {
        Self { variables, config }
    }

    /// Executes the use case. `owner` defaults to the caller; only admins
    /// may name someone else.
    ///
    /// # Errors
    /// Returns `Forbidden`, `NotFound`, or a `Resolution` error.
    pub async fn execute(
        &self,
        principal: &Principal,
        identifier: &str,
        owner: Option<UserId>,
    ) -> ApplicationResult<ResolvedVariable> {
        let owner_id = principal.scope(owner)?;
        let variable = self
            .variables
            .find_by_identifier(owner_id, identifier)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("variable '{identifier}'")))?;
        resolve_stored(self.variables, self.config, variable).await
    }
}

/// Input for resolving a draft value.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewInput {
    /// Raw text, possibly containing placeholders.
    pub value: String,
    /// Whose variables to resolve against; defaults to the caller.
    #[serde(default)]
    pub owner_id: Option<UserId>,
}

/// Result of resolving a draft value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewOutput {
    /// The owner scope used.
    pub owner_id: UserId,
    /// Distinct placeholder texts found, in order of first appearance.
    pub references: Vec<String>,
    /// The resolved text.
    pub resolved_value: String,
}

/// Resolves a value that is not stored, e.g. while editing.
pub struct PreviewResolution<'a, V> {
    variables: &'a V,
    config: ResolverConfig,
}

impl<'a, V: VariableRepository> PreviewResolution<'a, V> {
    /// Creates a new `PreviewResolution` use case.
    pub const fn new(variables: &'a V, config: ResolverConfig) -> Self {
        Self { variables, config }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `Forbidden` or a `Resolution` error.
    pub async fn execute(
        &self,
        principal: &Principal,
        input: PreviewInput,
    ) -> ApplicationResult<PreviewOutput> {
        let owner_id = principal.scope(input.owner_id)?;
        let arena = self.variables.load_arena(owner_id).await?;
        let resolved_value = VariableResolver::new(&arena, owner_id)
            .with_config(self.config)
            .resolve(&input.value)?;

        Ok(PreviewOutput {
            owner_id,
            references: distinct_reference_names(&input.value),
            resolved_value,
        })
    }
}

/// What a variable depends on and what hangs below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDependenciesOutput {
    /// The variable inspected.
    pub variable_id: VariableId,
    /// Distinct placeholder texts in its raw value.
    pub references: Vec<String>,
    /// Placeholder texts with no matching variable in the owner scope.
    pub missing: Vec<String>,
    /// Direct children in the parent tree.
    pub children: Vec<VariableId>,
    /// Parent chain, nearest first.
    pub ancestors: Vec<VariableId>,
}

/// Reports a variable's direct references and its place in the tree.
pub struct VariableDependencies<'a, V> {
    variables: &'a V,
}

impl<'a, V: VariableRepository> VariableDependencies<'a, V> {
    /// Creates a new `VariableDependencies` use case.
    pub const fn new(variables: &'a V) -> Self {
        Self { variables }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `NotFound` or `Forbidden`.
    pub async fn execute(
        &self,
        principal: &Principal,
        id: VariableId,
    ) -> ApplicationResult<VariableDependenciesOutput> {
        let variable = self.variables.require(id).await?;
        principal.authorize(variable.owner_id, "variable")?;
        let arena = self.variables.load_arena(variable.owner_id).await?;

        let references = distinct_reference_names(&variable.value);
        let missing = references
            .iter()
            .filter(|name| arena.find_by_identifier(name).is_none())
            .cloned()
            .collect();

        Ok(VariableDependenciesOutput {
            variable_id: id,
            references,
            missing,
            children: arena.children_of(id).iter().map(|v| v.id).collect(),
            ancestors: arena.ancestors_of(id),
        })
    }
}

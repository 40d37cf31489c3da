//! Variable resolution engine
//!
//! Expands placeholders recursively, one pass over the placeholders found
//! in each value, failing on the first invalid, missing, cyclic, or too
//! deep reference.

use std::collections::HashMap;

use serde::Deserialize;
use shortpress_domain::{UserId, Variable, VariableId};
use thiserror::Error;

use super::lookup::VariableLookup;
use super::parser::{extract_reference_names, is_valid_reference_name};

/// Default bound on nested lookups.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Why a value could not be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Placeholder content does not match `[A-Za-z0-9_]+`.
    #[error("invalid variable reference syntax: '{0}'")]
    InvalidReferenceSyntax(String),

    /// No variable with this identifier exists in the owner scope.
    #[error("referenced variable '{0}' not found")]
    ReferenceNotFound(String),

    /// The chain of nested references is longer than allowed.
    #[error("maximum resolution depth of {max_depth} exceeded")]
    MaxDepthExceeded {
        /// The configured bound.
        max_depth: usize,
    },

    /// A variable refers back to itself, directly or through others.
    #[error("cyclic variable reference: {}", chain.join(" -> "))]
    CyclicReference {
        /// Identifiers along the loop, starting and ending with the same one.
        chain: Vec<String>,
    },
}

/// Tuning for the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Lookups at this depth or deeper fail with `MaxDepthExceeded`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A variable currently being expanded.
#[derive(Debug, Clone, Copy)]
struct Frame<'s> {
    id: VariableId,
    identifier: &'s str,
}

/// Resolves `{{identifier}}` placeholders against one owner's variables.
///
/// The resolver holds no mutable state; one instance may serve any number
/// of calls.
pub struct VariableResolver<'a, L: ?Sized> {
    lookup: &'a L,
    owner: UserId,
    config: ResolverConfig,
}

impl<'a, L: VariableLookup + ?Sized> VariableResolver<'a, L> {
    /// Creates a resolver scoped to `owner` with the default configuration.
    #[must_use]
    pub fn new(lookup: &'a L, owner: UserId) -> Self {
        Self {
            lookup,
            owner,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the owner whose variables are eligible lookup targets.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Resolves an arbitrary raw value, starting at depth 0.
    ///
    /// # Errors
    ///
    /// Returns the first `ResolutionError` met in scan order. No partial
    /// result is produced.
    pub fn resolve(&self, raw_value: &str) -> Result<String, ResolutionError> {
        self.resolve_at_depth(raw_value, 0)
    }

    /// Resolves a raw value as if it were found `depth` levels deep.
    ///
    /// # Errors
    ///
    /// Returns the first `ResolutionError` met in scan order.
    pub fn resolve_at_depth(
        &self,
        raw_value: &str,
        depth: usize,
    ) -> Result<String, ResolutionError> {
        self.expand(raw_value, depth, &mut Vec::new())
    }

    /// Resolves a stored variable's value.
    ///
    /// The variable itself counts as being expanded, so a value that
    /// refers to its own identifier is reported as a cycle.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` if the variable belongs to another owner,
    /// otherwise the first `ResolutionError` met in scan order.
    pub fn resolve_variable(&self, variable: &Variable) -> Result<String, ResolutionError> {
        if variable.owner_id != self.owner {
            return Err(ResolutionError::ReferenceNotFound(
                variable.identifier.clone(),
            ));
        }

        let mut stack = vec![Frame {
            id: variable.id,
            identifier: &variable.identifier,
        }];
        self.expand(&variable.value, 0, &mut stack)
    }

    fn expand<'s>(
        &self,
        raw_value: &str,
        depth: usize,
        stack: &mut Vec<Frame<'s>>,
    ) -> Result<String, ResolutionError>
    where
        'a: 's,
    {
        let candidates = extract_reference_names(raw_value);
        if candidates.is_empty() {
            return Ok(raw_value.to_string());
        }

        // Every candidate is replaced in scan order, duplicates included; a
        // repeated name reuses its first expansion instead of a new lookup.
        let lookup: &'a L = self.lookup;
        let mut expanded: HashMap<&str, String> = HashMap::new();
        let mut resolved = raw_value.to_string();
        for candidate in &candidates {
            let token = format!("{{{{{candidate}}}}}");
            if let Some(value) = expanded.get(candidate.as_str()) {
                resolved = resolved.replace(&token, value);
                continue;
            }

            if !is_valid_reference_name(candidate) {
                return Err(ResolutionError::InvalidReferenceSyntax(candidate.clone()));
            }

            let Some(variable) = lookup.find(candidate, self.owner) else {
                return Err(ResolutionError::ReferenceNotFound(candidate.clone()));
            };

            if let Some(position) = stack.iter().position(|frame| frame.id == variable.id) {
                let mut chain: Vec<String> = stack[position..]
                    .iter()
                    .map(|frame| frame.identifier.to_string())
                    .collect();
                chain.push(variable.identifier.clone());
                return Err(ResolutionError::CyclicReference { chain });
            }

            if depth >= self.config.max_depth {
                return Err(ResolutionError::MaxDepthExceeded {
                    max_depth: self.config.max_depth,
                });
            }

            stack.push(Frame {
                id: variable.id,
                identifier: &variable.identifier,
            });
            let value = self.expand(&variable.value, depth + 1, stack);
            stack.pop();

            let value = value?;
            resolved = resolved.replace(&token, &value);
            expanded.insert(candidate.as_str(), value);
        }

        Ok(resolved)
    }
}

/// Resolves `raw_value` within `owner`'s scope using the default configuration.
///
/// # Errors
///
/// Returns the first `ResolutionError` met in scan order.
pub fn resolve<L: VariableLookup + ?Sized>(
    raw_value: &str,
    owner: UserId,
    lookup: &L,
    depth: usize,
) -> Result<String, ResolutionError> {
    VariableResolver::new(lookup, owner).resolve_at_depth(raw_value, depth)
}

//! Per-owner arena of variables.
//!
//! Holds one owner's variables indexed by id. Both the parent tree and
//! placeholder references are expressed as id lookups into the arena,
//! never as links between records.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::id::{UserId, VariableId};

use super::record::Variable;

/// One owner's variables, indexed by id and by identifier.
#[derive(Debug, Clone)]
pub struct VariableArena {
    owner_id: UserId,
    variables: BTreeMap<VariableId, Variable>,
    by_identifier: HashMap<String, VariableId>,
}

impl VariableArena {
    /// Creates an empty arena for `owner_id`.
    #[must_use]
    pub fn new(owner_id: UserId) -> Self {
        Self {
            owner_id,
            variables: BTreeMap::new(),
            by_identifier: HashMap::new(),
        }
    }

    /// Builds an arena from `variables`, keeping only those owned by `owner_id`.
    #[must_use]
    pub fn from_variables(owner_id: UserId, variables: impl IntoIterator<Item = Variable>) -> Self {
        let mut arena = Self::new(owner_id);
        for variable in variables {
            arena.insert(variable);
        }
        arena
    }

    /// Returns the owner whose variables this arena holds.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Inserts or replaces a variable.
    ///
    /// Returns false and leaves the arena untouched if the variable belongs
    /// to another owner.
    pub fn insert(&mut self, variable: Variable) -> bool {
        if variable.owner_id != self.owner_id {
            return false;
        }
        if let Some(previous) = self.variables.get(&variable.id) {
            self.by_identifier.remove(&previous.identifier);
        }
        self.by_identifier
            .insert(variable.identifier.clone(), variable.id);
        self.variables.insert(variable.id, variable);
        true
    }

    /// Gets a variable by id.
    #[must_use]
    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(&id)
    }

    /// Finds a variable by its identifier.
    #[must_use]
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Variable> {
        self.by_identifier
            .get(identifier)
            .and_then(|id| self.variables.get(id))
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the arena holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over variables in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Returns the direct children of `id` in the parent tree.
    #[must_use]
    pub fn children_of(&self, id: VariableId) -> Vec<&Variable> {
        self.variables
            .values()
            .filter(|v| v.parent_variable_id == Some(id))
            .collect()
    }

    /// Returns the parent chain of `id`, nearest first.
    ///
    /// Stops at the first missing parent or at the first repeated id, so a
    /// corrupted tree cannot loop.
    #[must_use]
    pub fn ancestors_of(&self, id: VariableId) -> Vec<VariableId> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.get(id).and_then(|v| v.parent_variable_id);

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            ancestors.push(parent_id);
            current = self.get(parent_id).and_then(|v| v.parent_variable_id);
        }

        ancestors
    }

    /// Returns true if making `parent` the parent of `child` would close a
    /// loop in the tree.
    #[must_use]
    pub fn would_create_parent_cycle(&self, child: VariableId, parent: VariableId) -> bool {
        child == parent || self.ancestors_of(parent).contains(&child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn var(id: u64, owner: u64, identifier: &str, parent: Option<u64>) -> Variable {
        let now: DateTime<Utc> = DateTime::from_timestamp(0, 0).unwrap_or_default();
        Variable::new(
            VariableId(id),
            UserId(owner),
            identifier,
            identifier,
            "",
            now,
        )
        .expect("Should be valid")
        .with_parent(parent.map(VariableId))
    }

    #[test]
    fn test_foreign_owner_is_rejected() {
        let mut arena = VariableArena::new(UserId(1));
        assert!(arena.insert(var(1, 1, "mine", None)));
        assert!(!arena.insert(var(2, 2, "theirs", None)));
        assert_eq!(arena.len(), 1);
        assert!(arena.find_by_identifier("theirs").is_none());
    }

    #[test]
    fn test_from_variables_filters_owner() {
        let arena = VariableArena::from_variables(
            UserId(1),
            vec![var(1, 1, "a", None), var(2, 2, "shared", None)],
        );
        assert!(arena.find_by_identifier("a").is_some());
        assert!(arena.find_by_identifier("shared").is_none());
    }

    #[test]
    fn test_replacing_updates_identifier_index() {
        let mut arena = VariableArena::new(UserId(1));
        arena.insert(var(1, 1, "old", None));
        arena.insert(var(1, 1, "new", None));
        assert!(arena.find_by_identifier("old").is_none());
        assert_eq!(arena.find_by_identifier("new").map(|v| v.id), Some(VariableId(1)));
    }

    #[test]
    fn test_children_and_ancestors() {
        let arena = VariableArena::from_variables(
            UserId(1),
            vec![
                var(1, 1, "root", None),
                var(2, 1, "child", Some(1)),
                var(3, 1, "grandchild", Some(2)),
                var(4, 1, "sibling", Some(1)),
            ],
        );

        let children: Vec<VariableId> = arena
            .children_of(VariableId(1))
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(children, vec![VariableId(2), VariableId(4)]);
        assert_eq!(arena.ancestors_of(VariableId(3)), vec![VariableId(2), VariableId(1)]);
        assert!(arena.ancestors_of(VariableId(1)).is_empty());
    }

    #[test]
    fn test_ancestors_terminate_on_corrupt_tree() {
        let arena = VariableArena::from_variables(
            UserId(1),
            vec![var(1, 1, "a", Some(2)), var(2, 1, "b", Some(1))],
        );
        assert_eq!(arena.ancestors_of(VariableId(1)), vec![VariableId(2)]);
    }

    #[test]
    fn test_would_create_parent_cycle() {
        let arena = VariableArena::from_variables(
            UserId(1),
            vec![var(1, 1, "root", None), var(2, 1, "child", Some(1))],
        );
        assert!(arena.would_create_parent_cycle(VariableId(1), VariableId(1)));
        assert!(arena.would_create_parent_cycle(VariableId(1), VariableId(2)));
        assert!(!arena.would_create_parent_cycle(VariableId(2), VariableId(1)));
    }
}

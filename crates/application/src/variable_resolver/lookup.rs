//! The lookup capability the resolver is parameterized over.

use shortpress_domain::{UserId, Variable, VariableArena};

/// Maps a placeholder reference to a variable inside one owner's scope.
///
/// Implementations must never return a variable whose `owner_id` differs
/// from `owner`, even when the caller is an admin. Cross-owner access is
/// decided by the caller when it picks `owner`.
pub trait VariableLookup {
    /// Finds the variable whose identifier equals `reference` and which is
    /// owned by `owner`.
    fn find(&self, reference: &str, owner: UserId) -> Option<&Variable>;
}

impl VariableLookup for VariableArena {
    fn find(&self, reference: &str, owner: UserId) -> Option<&Variable> {
        if owner != self.owner_id() {
            return None;
        }
        self.find_by_identifier(reference)
    }
}

impl VariableLookup for [Variable] {
    fn find(&self, reference: &str, owner: UserId) -> Option<&Variable> {
        self.iter()
            .find(|v| v.owner_id == owner && v.identifier == reference)
    }
}

impl VariableLookup for Vec<Variable> {
    fn find(&self, reference: &str, owner: UserId) -> Option<&Variable> {
        self.as_slice().find(reference, owner)
    }
}

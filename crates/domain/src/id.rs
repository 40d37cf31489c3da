//! Numeric identifiers for stored entities.
//!
//! Each entity kind gets its own newtype so a `CategoryId` can never be
//! passed where a `VariableId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifies a user.
    UserId
);

numeric_id!(
    /// Identifies a category.
    CategoryId
);

numeric_id!(
    /// Identifies a variable.
    VariableId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_number() {
        assert_eq!(VariableId(42).to_string(), "42");
        assert_eq!(UserId::from(7).get(), 7);
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&CategoryId(3)).expect("Should serialize");
        assert_eq!(json, "3");
    }

    #[test]
    fn test_ordering_follows_number() {
        assert!(VariableId(1) < VariableId(2));
    }
}

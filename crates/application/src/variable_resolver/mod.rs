//! Variable resolution module
//!
//! Expands `{{identifier}}` placeholders in a raw value by recursively
//! substituting the resolved values of the variables they name, all within
//! one owner's scope.
//!
//! # Usage
//!
//! ```
//! use chrono::Utc;
//! use shortpress_application::variable_resolver::VariableResolver;
//! use shortpress_domain::{UserId, Variable, VariableArena, VariableId};
//!
//! let owner = UserId(1);
//! let host = Variable::new(VariableId(1), owner, "host", "Host", "localhost", Utc::now())
//!     .expect("valid variable");
//! let arena = VariableArena::from_variables(owner, [host]);
//!
//! let resolver = VariableResolver::new(&arena, owner);
//! let resolved = resolver.resolve("http://{{host}}/api").expect("resolvable");
//! assert_eq!(resolved, "http://localhost/api");
//! ```

pub mod engine;
pub mod lookup;
pub mod parser;

pub use engine::{
    DEFAULT_MAX_DEPTH, ResolutionError, ResolverConfig, VariableResolver, resolve,
};
pub use lookup::VariableLookup;
pub use parser::{
    PlaceholderReference, distinct_reference_names, extract_reference_names, has_placeholders,
    is_valid_reference_name, parse_references,
};

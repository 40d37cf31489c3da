//! ShortPress Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for storage, time, and files)
//! - The `{{identifier}}` resolution engine
//! - The authorization gate
//! - Use case orchestration
//! - Application-level error handling

pub mod authorization;
pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

#[cfg(test)]
mod test_support;

pub use authorization::{Access, Principal};
pub use error::{ApplicationError, ApplicationResult};
pub use variable_resolver::{
    DEFAULT_MAX_DEPTH, ResolutionError, ResolverConfig, VariableLookup, VariableResolver,
};

//! ShortPress Domain - Core business types
//!
//! This crate defines the domain model for the ShortPress variable service:
//! users, categories, and the variables they own.
//! All types here are pure Rust with no I/O dependencies.

pub mod category;
pub mod error;
pub mod id;
pub mod user;
pub mod variable;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, UserId, VariableId};
pub use user::User;
pub use variable::{Variable, VariableArena, is_valid_identifier};

//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod category_repository;
mod clock;
mod file_system;
mod repository_error;
mod user_repository;
mod variable_repository;

pub use category_repository::{CategoryDeletion, CategoryRepository};
pub use clock::Clock;
pub use file_system::{FileSystem, FileSystemError};
pub use repository_error::{Page, RepositoryError};
pub use user_repository::{NewUser, UserRepository};
pub use variable_repository::{NewVariable, VariableRepository};

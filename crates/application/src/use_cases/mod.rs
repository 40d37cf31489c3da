//! Application use cases (business logic orchestration).
//!
//! Every use case that touches a stored resource checks access through
//! [`Principal`](crate::authorization::Principal) before doing anything else.

pub mod categories;
pub mod users;
pub mod variables;

pub use categories::{
    CreateCategory, CreateCategoryInput, DeleteAllUserCategories, DeleteCategory, GetCategory,
    ListCategories, ListUserCategories, UpdateCategory, UpdateCategoryInput,
};
pub use users::{AuthenticateUser, BootstrapAdmin, CreateUser, CreateUserInput};
pub use variables::{
    CreateVariable, CreateVariableInput, DeleteAllUserVariables, DeleteVariable, GetVariable,
    ListUserVariables, ListVariables, PreviewInput, PreviewOutput, PreviewResolution,
    ResolveVariable, ResolveVariableByIdentifier, ResolvedVariable, UpdateVariable,
    UpdateVariableInput, VariableDependencies, VariableDependenciesOutput, VariableView,
};

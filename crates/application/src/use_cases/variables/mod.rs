//! Variable use cases

mod read;
mod resolve;
mod write;

pub use read::{GetVariable, ListUserVariables, ListVariables, VariableView};
pub use resolve::{
    PreviewInput, PreviewOutput, PreviewResolution, ResolveVariable, ResolveVariableByIdentifier,
    ResolvedVariable, VariableDependencies, VariableDependenciesOutput,
};
pub use write::{
    CreateVariable, CreateVariableInput, DeleteAllUserVariables, DeleteVariable, UpdateVariable,
    UpdateVariableInput,
};

//! Storage adapters.

mod file_system;
mod memory_store;

pub use file_system::TokioFileSystem;
pub use memory_store::InMemoryStore;

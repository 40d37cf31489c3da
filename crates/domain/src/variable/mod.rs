//! Variables and the per-owner arena used to look them up.

mod arena;
mod record;

pub use arena::VariableArena;
pub use record::{Variable, is_valid_identifier};

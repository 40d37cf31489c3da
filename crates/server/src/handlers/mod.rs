//! Route handlers, one module per resource.

pub mod admin;
pub mod categories;
pub mod users;
pub mod variables;

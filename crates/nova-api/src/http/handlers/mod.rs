//! Request handlers, one module per resource.

pub mod chat;
pub mod model;
pub mod process;

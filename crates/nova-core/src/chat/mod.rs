//! Conversation state: the bounded history and the session that owns it.

pub mod history;
pub mod session;

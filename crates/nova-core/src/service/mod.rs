//! Collaborator ports.
//!
//! The dispatcher and brain depend on these traits -- never on concrete
//! infrastructure. Adapters (browser launcher, Wikipedia, DuckDuckGo,
//! speech commands) live in nova-infra.

pub mod knowledge;
pub mod launcher;
pub mod search;
pub mod transcriber;

//! Conversational dispatch core for the Nova assistant.
//!
//! Defines the session, intent router, streaming brain and playback
//! controller, plus the "ports" (provider and collaborator traits) that the
//! infrastructure layer implements. It depends only on `nova-types` --
//! never on `nova-infra` or any HTTP/process crate.

pub mod brain;
pub mod chat;
pub mod dispatch;
pub mod intent;
pub mod llm;
pub mod playback;
pub mod service;

#[cfg(test)]
mod testing;

//! Interactive terminal front end.
//!
//! Voice or text input, streamed replies in text mode, spoken replies with
//! Enter-to-interrupt in voice mode. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;

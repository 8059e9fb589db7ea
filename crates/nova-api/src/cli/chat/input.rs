//! Line input for the chat loop, on top of `rustyline_async`.
//!
//! Reading is cancel-safe, which lets voice playback race a pending read
//! and treat any submitted line as an interrupt.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};
use tracing::debug;

/// What the user did at the prompt.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A submitted line, trimmed. May be empty (bare Enter).
    Message(String),
    /// Ctrl+D, or the editor failed.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

impl InputEvent {
    fn from_readline(result: Result<ReadlineEvent, ReadlineError>) -> Self {
        match result {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Message(line.trim().to_string()),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                debug!(error = %e, "readline failed, ending input");
                InputEvent::Eof
            }
        }
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the editor and a writer that prints above the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((Self { rl }, writer))
    }

    /// Swap the prompt, e.g. after a mode switch.
    pub fn update_prompt(&mut self, prompt: &str) {
        if let Err(e) = self.rl.update_prompt(prompt) {
            debug!(error = %e, "failed to update prompt");
        }
    }

    /// Dropping the future keeps any partially typed line in the editor.
    pub async fn read_line(&mut self) -> InputEvent {
        InputEvent::from_readline(self.rl.readline().await)
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.rl.clear() {
            debug!(error = %e, "failed to clear screen");
        }
    }
}

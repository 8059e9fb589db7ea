use std::process::Stdio;

use futures_util::future::BoxFuture;
use tokio::process::Command;
use tracing::debug;

use nova_core::service::transcriber::Transcriber;
use nova_types::config::VoiceConfig;
use nova_types::error::TranscriptionError;

/// [`Transcriber`] that runs a speech-to-text command for each utterance.
///
/// The command records one utterance and prints its transcript on stdout.
#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
}

impl CommandTranscriber {
    pub fn new(command: Vec<String>) -> Option<Self> {
        let mut parts = command.into_iter();
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// `None` when no transcribe command is configured.
    pub fn from_config(config: &VoiceConfig) -> Option<Self> {
        config.transcribe_command.clone().and_then(Self::new)
    }

    async fn run(&self) -> Result<String, TranscriptionError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| TranscriptionError::Spawn(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            debug!(status = %output.status, "transcriber exited unsuccessfully");
            return Err(TranscriptionError::Unintelligible);
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::Unintelligible);
        }
        Ok(text)
    }
}

impl Transcriber for CommandTranscriber {
    fn listen(&self) -> BoxFuture<'_, Result<String, TranscriptionError>> {
        Box::pin(self.run())
    }
}

//! Speech adapters driven by external commands.
//!
//! Text-to-speech and speech-to-text engines are platform programs
//! (`say`, `espeak`, a whisper wrapper, ...) configured in `[voice]`.

pub mod transcriber;

use std::process::Stdio;
use std::sync::Mutex;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use nova_core::playback::controller::AudioSink;
use nova_types::config::VoiceConfig;
use nova_types::error::SpeechError;
use nova_types::speech::SpeechChunk;

pub use self::transcriber::CommandTranscriber;

/// [`AudioSink`] that runs the configured TTS command once per chunk.
///
/// An empty command makes every chunk a no-op, which keeps the
/// interrupt and chunking flow identical on hosts without audio.
pub struct CommandSpeechSink {
    command: Vec<String>,
    /// Cancelled by `stop`; replaced with a fresh token afterwards.
    cancel: Mutex<CancellationToken>,
}

impl CommandSpeechSink {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(config.speak_command.clone())
    }

    pub fn is_silent(&self) -> bool {
        self.command.is_empty()
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel.lock().expect("speech cancel lock poisoned").clone()
    }
}

impl AudioSink for CommandSpeechSink {
    async fn play(&self, chunk: &SpeechChunk) -> Result<(), SpeechError> {
        let text = chunk.text.trim();
        let Some((program, args)) = self.command.split_first() else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        let token = self.current_token();
        let mut child = Command::new(program)
            .args(args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Spawn(format!("{program}: {e}")))?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::Engine(e.to_string()))?;
                if !status.success() {
                    return Err(SpeechError::Engine(format!("{program} exited with {status}")));
                }
                Ok(())
            }
            _ = token.cancelled() => {
                debug!("speech cancelled mid-chunk");
                let _ = child.kill().await;
                Ok(())
            }
        }
    }

    fn stop(&self) {
        let mut cancel = self.cancel.lock().expect("speech cancel lock poisoned");
        cancel.cancel();
        *cancel = CancellationToken::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> SpeechChunk {
        SpeechChunk {
            text: text.to_string(),
            terminator: text.chars().last().filter(|c| ".?!,".contains(*c)),
        }
    }

    #[tokio::test]
    async fn empty_command_is_silent() {
        let sink = CommandSpeechSink::new(Vec::new());
        assert!(sink.is_silent());
        sink.play(&chunk("Hello.")).await.unwrap();
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let sink = CommandSpeechSink::new(vec!["nova-no-such-tts-binary".to_string()]);
        let err = sink.play(&chunk("Hello.")).await.unwrap_err();
        assert!(matches!(err, SpeechError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_command_per_chunk() {
        let sink = CommandSpeechSink::new(vec!["true".to_string()]);
        sink.play(&chunk("Hello.")).await.unwrap();

        let failing = CommandSpeechSink::new(vec!["false".to_string()]);
        assert!(matches!(
            failing.play(&chunk("Hello.")).await,
            Err(SpeechError::Engine(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_cuts_a_playing_chunk() {
        let sink = std::sync::Arc::new(CommandSpeechSink::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "sleep 5".to_string(),
        ]));
        let playing = {
            let sink = sink.clone();
            tokio::spawn(async move { sink.play(&chunk("long")).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        sink.stop();

        let result = tokio::time::timeout(std::time::Duration::from_secs(2), playing)
            .await
            .expect("stop should end playback")
            .unwrap();
        assert!(result.is_ok());
    }
}

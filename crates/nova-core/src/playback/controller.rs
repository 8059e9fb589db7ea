//! Playback controller: display, chunk, speak, interrupt.

use std::sync::Mutex;

use tracing::{debug, warn};

use nova_types::error::SpeechError;
use nova_types::speech::{PlaybackOutcome, PlaybackState, SpeechChunk};

use super::chunker::chunks;
use super::interrupt::InterruptSignal;

/// Audio-out primitive.
///
/// `play` resolves once the chunk has finished playing. `stop` silences
/// anything still playing.
pub trait AudioSink: Send + Sync {
    fn play(
        &self,
        chunk: &SpeechChunk,
    ) -> impl std::future::Future<Output = Result<(), SpeechError>> + Send;

    fn stop(&self);
}

/// Where the full response text is shown before it is spoken.
pub trait ResponseDisplay: Send + Sync {
    fn show_response(&self, text: &str);

    fn show_interrupted(&self);
}

/// Speaks responses chunk by chunk, honouring the interrupt signal.
///
/// Single owner per voice front end; `speak` calls are sequential.
pub struct PlaybackController<S, D> {
    sink: S,
    display: D,
    interrupt: InterruptSignal,
    last_response: Mutex<Option<String>>,
    state: Mutex<PlaybackState>,
}

impl<S: AudioSink, D: ResponseDisplay> PlaybackController<S, D> {
    pub fn new(sink: S, display: D, interrupt: InterruptSignal) -> Self {
        Self {
            sink,
            display,
            interrupt,
            last_response: Mutex::new(None),
            state: Mutex::new(PlaybackState::Idle),
        }
    }

    /// Handle the input side uses to request an interrupt.
    pub fn interrupt_signal(&self) -> InterruptSignal {
        self.interrupt.clone()
    }

    /// The most recently attempted response, interrupted or not.
    pub fn last_response(&self) -> Option<String> {
        self.last_response
            .lock()
            .expect("last_response lock poisoned")
            .clone()
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock().expect("playback state lock poisoned")
    }

    fn set_state(&self, state: PlaybackState) {
        *self.state.lock().expect("playback state lock poisoned") = state;
    }

    /// Display `text`, then speak it chunk by chunk.
    ///
    /// The interrupt signal is checked before every chunk; a chunk that has
    /// started always plays to completion.
    pub async fn speak(&self, text: &str) -> PlaybackOutcome {
        *self
            .last_response
            .lock()
            .expect("last_response lock poisoned") = Some(text.to_string());
        self.display.show_response(text);

        let mut played = 0;
        for (index, chunk) in chunks(text).enumerate() {
            if self.interrupt.take() {
                debug!(played, "playback interrupted");
                self.sink.stop();
                self.set_state(PlaybackState::Interrupted);
                self.display.show_interrupted();
                return PlaybackOutcome::Interrupted { played };
            }

            self.set_state(PlaybackState::Speaking(index));
            if let Err(e) = self.sink.play(&chunk).await {
                warn!(error = %e, chunk = index, "failed to speak chunk");
            }
            played = index + 1;
        }

        // An interrupt that arrived during the final chunk refers to this
        // response, not the next one.
        self.interrupt.take();
        self.set_state(PlaybackState::Idle);
        PlaybackOutcome::Completed { chunks: played }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Vec<String>>,
        stops: AtomicUsize,
        /// Signal this interrupt once the first chunk has played.
        interrupt_after_first: Option<InterruptSignal>,
        fail: bool,
    }

    impl AudioSink for RecordingSink {
        async fn play(&self, chunk: &SpeechChunk) -> Result<(), SpeechError> {
            self.played.lock().unwrap().push(chunk.text.clone());
            if let Some(signal) = &self.interrupt_after_first {
                signal.signal();
            }
            if self.fail {
                return Err(SpeechError::Engine("device busy".into()));
            }
            Ok(())
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Mutex<Vec<String>>,
        interrupted: AtomicUsize,
    }

    impl ResponseDisplay for RecordingDisplay {
        fn show_response(&self, text: &str) {
            self.shown.lock().unwrap().push(text.to_string());
        }

        fn show_interrupted(&self) {
            self.interrupted.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn speaks_every_chunk_in_order() {
        let controller = PlaybackController::new(
            RecordingSink::default(),
            RecordingDisplay::default(),
            InterruptSignal::new(),
        );

        let outcome = controller.speak("Done. Next?").await;

        assert_eq!(outcome, PlaybackOutcome::Completed { chunks: 2 });
        assert_eq!(*controller.sink.played.lock().unwrap(), ["Done.", " Next?"]);
        assert_eq!(*controller.display.shown.lock().unwrap(), ["Done. Next?"]);
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn interrupt_halts_at_chunk_boundary_and_keeps_last_response() {
        let signal = InterruptSignal::new();
        let sink = RecordingSink {
            interrupt_after_first: Some(signal.clone()),
            ..Default::default()
        };
        let controller = PlaybackController::new(sink, RecordingDisplay::default(), signal.clone());

        let outcome = controller.speak("Done. Next?").await;

        assert_eq!(outcome, PlaybackOutcome::Interrupted { played: 1 });
        assert_eq!(*controller.sink.played.lock().unwrap(), ["Done."]);
        assert_eq!(controller.sink.stops.load(Ordering::SeqCst), 1);
        assert_eq!(controller.display.interrupted.load(Ordering::SeqCst), 1);
        assert_eq!(controller.last_response().as_deref(), Some("Done. Next?"));
        assert_eq!(controller.state(), PlaybackState::Interrupted);
        assert!(!signal.is_pending());
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_playback() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let controller =
            PlaybackController::new(sink, RecordingDisplay::default(), InterruptSignal::new());

        let outcome = controller.speak("One, two, three.").await;

        assert_eq!(outcome, PlaybackOutcome::Completed { chunks: 3 });
    }

    #[tokio::test]
    async fn late_interrupt_does_not_leak_into_next_response() {
        let signal = InterruptSignal::new();
        let sink = RecordingSink {
            interrupt_after_first: Some(signal.clone()),
            ..Default::default()
        };
        let controller = PlaybackController::new(sink, RecordingDisplay::default(), signal.clone());

        let outcome = controller.speak("Single chunk").await;

        assert_eq!(outcome, PlaybackOutcome::Completed { chunks: 1 });
        assert!(!signal.is_pending());
    }
}

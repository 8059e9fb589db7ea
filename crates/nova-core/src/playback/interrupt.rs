use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pending-interrupt flag shared between the input side and playback.
///
/// Set by any input that arrives while a response is being spoken; playback
/// consumes it only at chunk boundaries.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal(Arc<AtomicBool>);

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Consume the pending interrupt, returning whether one was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_flag() {
        let signal = InterruptSignal::new();
        let input_side = signal.clone();
        assert!(!signal.take());
        input_side.signal();
        assert!(signal.is_pending());
        assert!(signal.take());
        assert!(!signal.is_pending());
    }
}

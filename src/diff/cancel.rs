use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polled by long-running stages to abort early
pub trait CancelCheck {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F> CancelCheck for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Shareable cancellation flag, cloned into signal handlers or other threads
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl CancelCheck for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

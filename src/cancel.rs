//! Cooperative cancellation.
//!
//! The calling context (a chat UI the user can navigate away from) holds a
//! clone of the token and flips it; the core checks it between strategy
//! attempts and between paragraph-scoring steps. In-flight network I/O is
//! not interrupted — that is the HTTP client's concern, bounded by the
//! per-call timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

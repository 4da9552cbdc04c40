//! Progress, pause and cancellation shared between a caller and the executor.
//!
//! The executor polls [`Progress::checkpoint`] before each fold step and
//! before each target write. A paused handle blocks the polling worker
//! until [`Progress::resume`] or [`Progress::cancel`] is called.
//!
//! ```rust
//! use strata_arith::Progress;
//!
//! let progress = Progress::new();
//! progress.reset(3);
//! assert!(progress.checkpoint());
//! progress.increment();
//! assert_eq!(progress.processed(), 1);
//!
//! progress.cancel();
//! assert!(!progress.checkpoint());
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

/// Shared progress counter with cooperative pause and cancel.
#[derive(Debug, Default)]
pub struct Progress {
    total: AtomicUsize,
    processed: AtomicUsize,
    cancelled: AtomicBool,
    paused: Mutex<bool>,
    resumed: Condvar,
}

impl Progress {
    /// Creates a handle that is neither paused nor cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected item count and zeroes the processed count.
    pub fn reset(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
    }

    /// Expected item count.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Items processed so far.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Marks one more item processed and returns the new count.
    pub fn increment(&self) -> usize {
        self.processed.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Requests cancellation and wakes paused workers.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let _guard = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        self.resumed.notify_all();
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Makes subsequent checkpoints block.
    pub fn pause(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    /// Releases paused workers.
    pub fn resume(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.resumed.notify_all();
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks while paused; returns `false` if the work should stop.
    pub fn checkpoint(&self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        while *paused && !self.is_cancelled() {
            paused = self
                .resumed
                .wait(paused)
                .unwrap_or_else(PoisonError::into_inner);
        }
        !self.is_cancelled()
    }
}

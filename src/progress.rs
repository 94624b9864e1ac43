//! Batch progress reporting.
//!
//! After each input of a batch settles, the runner emits a
//! [`ProgressInfo`] to the configured [`ProgressCallback`]. Successful and
//! skipped items both advance the count, so a batch of N inputs always
//! produces exactly N reports with `completed` running from 1 to N.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reelthumb::{BatchRunner, ExtractOptions, ProgressInfo, VideoInput};
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(|info: &ProgressInfo| {
//!     println!("{}/{} {}", info.progress.completed, info.progress.total, info.item_name);
//! }));
//!
//! let mut runner = BatchRunner::new();
//! let items = runner.run_batch(vec![VideoInput::open("reel.mp4")], &options);
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::error::{ErrorKind, ThumbnailError};

/// How far a batch has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchProgress {
    /// Inputs attempted so far, successful or skipped.
    pub completed: usize,
    /// Inputs in the batch.
    pub total: usize,
}

impl BatchProgress {
    /// Completion percentage (0.0 – 100.0). An empty batch is complete.
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            (self.completed as f32 / self.total as f32) * 100.0
        }
    }

    /// `true` once every input has been attempted.
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// How a single batch item settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A thumbnail was produced.
    Completed,
    /// The item was skipped.
    Skipped {
        /// What kind of failure caused the skip.
        kind: ErrorKind,
        /// Human-readable reason.
        reason: String,
    },
}

impl ItemOutcome {
    pub(crate) fn skipped(error: &ThumbnailError) -> Self {
        ItemOutcome::Skipped {
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// A snapshot delivered after each batch item.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Counts after this item.
    pub progress: BatchProgress,
    /// Display name of the item that just settled.
    pub item_name: String,
    /// Whether it produced a thumbnail.
    pub outcome: ItemOutcome,
    /// Wall-clock time since the batch started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on throughput so far.
    pub estimated_remaining: Option<Duration>,
}

/// Receives progress updates during a batch.
///
/// Callbacks observe but cannot halt the batch. Any `Fn(&ProgressInfo)`
/// closure that is `Send + Sync` is a callback.
pub trait ProgressCallback: Send + Sync {
    /// Called once per batch item, in input order.
    fn on_progress(&self, info: &ProgressInfo);
}

impl<F> ProgressCallback for F
where
    F: Fn(&ProgressInfo) + Send + Sync,
{
    fn on_progress(&self, info: &ProgressInfo) {
        self(info)
    }
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Counts settled items and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: usize,
    completed: usize,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: usize) -> Self {
        Self {
            callback,
            total,
            completed: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one settled item and report it. Returns the new counts.
    pub(crate) fn advance(&mut self, item_name: &str, outcome: ItemOutcome) -> BatchProgress {
        self.completed += 1;
        let progress = BatchProgress {
            completed: self.completed,
            total: self.total,
        };

        let elapsed = self.start_time.elapsed();
        let remaining = self.total.saturating_sub(self.completed);
        let estimated_remaining = u32::try_from(self.completed)
            .ok()
            .zip(u32::try_from(remaining).ok())
            .map(|(done, left)| elapsed / done * left);

        self.callback.on_progress(&ProgressInfo {
            progress,
            item_name: item_name.to_string(),
            outcome,
            elapsed,
            estimated_remaining,
        });
        progress
    }
}

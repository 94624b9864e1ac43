//! Batch configuration.
//!
//! [`ExtractOptions`] carries the capture offset and the progress callback
//! through [`BatchRunner`](crate::BatchRunner) without widening every
//! signature.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use reelthumb::ExtractOptions;
//!
//! let options = ExtractOptions::new().with_offset(Duration::from_millis(2500));
//! assert_eq!(options.offset(), Duration::from_millis(2500));
//!
//! let options = ExtractOptions::new().with_offset_seconds(0.5).unwrap();
//! assert_eq!(options.offset(), Duration::from_millis(500));
//! assert!(ExtractOptions::new().with_offset_seconds(-1.0).is_err());
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use crate::{
    error::ThumbnailError,
    extractor::DEFAULT_OFFSET,
    progress::{NoOpProgress, ProgressCallback},
};

/// Settings for a batch of extractions.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) offset: Duration,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Defaults: offset [`DEFAULT_OFFSET`] (one second), no progress
    /// callback.
    pub fn new() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the capture offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Duration) -> Self {
        self.offset = offset;
        self
    }

    /// Set the capture offset from a number of seconds.
    ///
    /// # Errors
    ///
    /// [`ThumbnailError::InvalidOffset`] if `seconds` is negative, NaN or
    /// infinite.
    pub fn with_offset_seconds(self, seconds: f64) -> Result<Self, ThumbnailError> {
        let offset = Duration::try_from_secs_f64(seconds)
            .map_err(|_| ThumbnailError::InvalidOffset(seconds))?;
        Ok(self.with_offset(offset))
    }

    /// Attach a progress callback, invoked once per batch item.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The capture offset.
    pub fn offset(&self) -> Duration {
        self.offset
    }
}

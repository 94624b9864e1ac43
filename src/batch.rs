//! Sequential batch extraction.
//!
//! [`BatchRunner`] feeds inputs to a [`FrameExtractor`] strictly one at a
//! time, in order. A failing item is logged and skipped; the batch itself
//! never fails. Inputs whose declared media type is not accepted are
//! skipped without reaching the extractor.
//!
//! # Example
//!
//! ```no_run
//! use reelthumb::{BatchRunner, ExtractOptions, ThumbnailError, VideoInput};
//!
//! let videos = vec![VideoInput::open("reel.mp4"), VideoInput::open("clip-02.webm")];
//! let mut runner = BatchRunner::new();
//! for item in runner.run_batch(videos, &ExtractOptions::new()) {
//!     item.image.save(&item.suggested_name)?;
//! }
//! # Ok::<(), ThumbnailError>(())
//! ```

use std::ops::ControlFlow;

use crate::{
    configuration::ExtractOptions,
    decoder::VideoDecoder,
    encoder::{FrameEncoder, JpegEncoder},
    error::ThumbnailError,
    extractor::FrameExtractor,
    ffmpeg::FfmpegDecoder,
    handle::{HandleStore, ImageHandle},
    input::VideoInput,
    naming::create_thumbnail_file_name,
    progress::{BatchProgress, ItemOutcome, ProgressTracker},
    validation::is_valid_video_file,
};

/// One successful batch entry.
#[derive(Debug)]
pub struct BatchItem {
    /// The input the thumbnail was taken from.
    pub video: VideoInput,
    /// The encoded thumbnail.
    pub image: ImageHandle,
    /// Suggested output file name, e.g. `clip-thumb.jpg`.
    pub suggested_name: String,
}

/// One skipped batch entry.
#[derive(Debug)]
pub struct SkippedItem {
    /// The input that produced no thumbnail.
    pub video: VideoInput,
    /// Why.
    pub error: ThumbnailError,
}

/// How one input settled, with the batch counts after it.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Counts including this item.
    pub progress: BatchProgress,
    /// The produced item, or why there is none.
    pub result: Result<BatchItem, SkippedItem>,
}

/// Runs a [`FrameExtractor`] over a sequence of inputs.
pub struct BatchRunner<D = FfmpegDecoder, E = JpegEncoder> {
    extractor: FrameExtractor<D, E>,
}

impl BatchRunner {
    /// A runner backed by FFmpeg and the default JPEG encoder.
    pub fn new() -> Self {
        Self::with_extractor(FrameExtractor::new())
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: VideoDecoder, E: FrameEncoder> BatchRunner<D, E> {
    /// A runner over an existing extractor.
    pub fn with_extractor(extractor: FrameExtractor<D, E>) -> Self {
        Self { extractor }
    }

    /// The store the produced image handles live in.
    pub fn store(&self) -> &HandleStore {
        self.extractor.store()
    }

    /// Extract a thumbnail from every input, in order.
    ///
    /// Returns the successful items in input order. Skipped inputs are
    /// absent; each one is logged at `warn` level. The progress callback in
    /// `options` fires exactly once per input.
    pub fn run_batch(
        &mut self,
        videos: Vec<VideoInput>,
        options: &ExtractOptions,
    ) -> Vec<BatchItem> {
        let mut items = Vec::with_capacity(videos.len());
        self.run_each(videos, options, |outcome| {
            if let Ok(item) = outcome.result {
                items.push(item);
            }
            ControlFlow::Continue(())
        });
        items
    }

    /// Drive the batch, handing each settled input to `on_outcome`.
    ///
    /// Returning [`ControlFlow::Break`] from `on_outcome` stops before the
    /// next input is started.
    pub fn run_each<F>(
        &mut self,
        videos: Vec<VideoInput>,
        options: &ExtractOptions,
        mut on_outcome: F,
    ) where
        F: FnMut(BatchOutcome) -> ControlFlow<()>,
    {
        let total = videos.len();
        log::debug!(
            "Starting batch of {total} input(s) at offset {:?}",
            options.offset
        );
        let mut tracker = ProgressTracker::new(options.progress.clone(), total);

        for video in videos {
            let result = self.extract_one(&video, options);
            let outcome = match &result {
                Ok(_) => ItemOutcome::Completed,
                Err(error) => {
                    log::warn!("Skipping {}: {error}", video.name());
                    ItemOutcome::skipped(error)
                }
            };
            let progress = tracker.advance(video.name(), outcome);

            let result = match result {
                Ok(image) => Ok(BatchItem {
                    suggested_name: create_thumbnail_file_name(video.name()),
                    video,
                    image,
                }),
                Err(error) => Err(SkippedItem { video, error }),
            };

            if on_outcome(BatchOutcome { progress, result }).is_break() {
                log::debug!("Batch stopped after {} of {total}", progress.completed);
                break;
            }
        }
    }

    fn extract_one(
        &mut self,
        video: &VideoInput,
        options: &ExtractOptions,
    ) -> Result<ImageHandle, ThumbnailError> {
        if !is_valid_video_file(video) {
            return Err(ThumbnailError::UnsupportedMediaType {
                name: video.name().to_string(),
                media_type: video.media_type().to_string(),
            });
        }
        self.extractor.extract_frame(video, options.offset)
    }
}

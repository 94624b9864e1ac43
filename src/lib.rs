//! # reelthumb
//!
//! Pull a single still frame out of a video and hand it back as a JPEG
//! thumbnail.
//!
//! A [`FrameExtractor`] opens a video, seeks to an offset (clamped to the
//! video's duration), draws the decoded frame into a raster buffer at the
//! video's native size, and encodes it as JPEG at quality 80. A
//! [`BatchRunner`] does the same for a list of videos, one at a time, and
//! skips the ones that fail instead of giving up on the batch.
//!
//! Results are returned as owned, addressable handles ([`ImageHandle`],
//! [`SourceHandle`]) registered in a [`HandleStore`]. Dropping a handle
//! releases it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use reelthumb::{FrameExtractor, ThumbnailError, VideoInput};
//!
//! let mut extractor = FrameExtractor::new();
//! let image = extractor.extract_frame(&VideoInput::open("showreel.mp4"), Duration::from_secs(1))?;
//! image.save("showreel-thumb.jpg")?;
//! # Ok::<(), ThumbnailError>(())
//! ```
//!
//! ### Batches
//!
//! ```no_run
//! use reelthumb::{BatchRunner, ExtractOptions, ThumbnailError, VideoInput};
//!
//! let videos = ["a.mp4", "b.webm", "notes.txt"].map(VideoInput::open).to_vec();
//! let items = BatchRunner::new().run_batch(videos, &ExtractOptions::new());
//! for item in &items {
//!     item.image.save(&item.suggested_name)?;
//! }
//! # Ok::<(), ThumbnailError>(())
//! ```
//!
//! ## Custom backends
//!
//! Decoding and encoding sit behind the [`VideoDecoder`] and
//! [`FrameEncoder`] traits. [`FrameExtractor::with_backends`] accepts any
//! pair, which is how the sequencing logic is tested without FFmpeg.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | [`extract_frame_async`] and [`batch_stream`] on Tokio's blocking pool |
//! | `full`  | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod batch;
pub mod configuration;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod handle;
pub mod input;
pub mod metadata;
pub mod naming;
pub mod progress;
#[cfg(feature = "async")]
pub mod stream;
pub mod thumbnail;
mod utilities;
pub mod validation;

pub use batch::{BatchItem, BatchOutcome, BatchRunner, SkippedItem};
pub use configuration::ExtractOptions;
pub use decoder::{MAX_RASTER_DIMENSION, VideoDecoder, acquire_raster};
pub use encoder::{DEFAULT_JPEG_QUALITY, FrameEncoder, JpegEncoder};
pub use error::{ErrorKind, ThumbnailError};
pub use extractor::{DEFAULT_OFFSET, FrameExtractor, effective_offset};
pub use ffmpeg::{FfmpegDecoder, FfmpegLogLevel, set_ffmpeg_log_level};
pub use handle::{
    HandleAddress, HandleKind, HandlePayload, HandleStore, ImageHandle, SourceHandle,
};
pub use input::{UNKNOWN_MEDIA_TYPE, VideoInput};
pub use metadata::{AspectRatio, VideoInfo};
pub use naming::{THUMBNAIL_SUFFIX, THUMBNAILS_DIR, ThumbnailSlot, create_thumbnail_file_name};
pub use progress::{BatchProgress, ItemOutcome, ProgressCallback, ProgressInfo};
#[cfg(feature = "async")]
pub use stream::{BatchStream, ThumbnailFuture, batch_stream, batch_stream_with, extract_frame_async};
pub use thumbnail::ThumbnailResult;
pub use validation::{VideoMediaType, is_supported_media_type, is_valid_video_file};

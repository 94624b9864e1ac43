//! Error types for the `reelthumb` crate.
//!
//! [`ThumbnailError`] is the single error type returned by every fallible
//! operation. The three extraction failures named by the pipeline
//! ([`DecodeError`](ThumbnailError::DecodeError),
//! [`EncodeError`](ThumbnailError::EncodeError) and
//! [`EnvironmentError`](ThumbnailError::EnvironmentError)) are kept as
//! distinct variants so callers can tell a bad input apart from a broken
//! host.

use std::io::Error as IoError;

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `reelthumb` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbnailError {
    /// The video could not be opened or decoded (malformed bytes, no video
    /// stream, unsupported codec, failed seek).
    #[error("Failed to decode video: {0}")]
    DecodeError(String),

    /// A frame was rasterized but the encoder could not produce output bytes.
    #[error("Failed to encode thumbnail: {0}")]
    EncodeError(String),

    /// The rasterization surface could not be acquired at all.
    #[error("Rasterization unavailable: {0}")]
    EnvironmentError(String),

    /// The declared media type is not one of the accepted video formats.
    #[error("Unsupported media type {media_type:?} for {name}")]
    UnsupportedMediaType {
        /// Display name of the rejected input.
        name: String,
        /// The media type the input declared.
        media_type: String,
    },

    /// A capture offset was negative or not a finite number of seconds.
    #[error("Invalid offset: {0} seconds")]
    InvalidOffset(f64),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

/// Coarse classification of a [`ThumbnailError`].
///
/// Used by batch progress reports and the CLI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ThumbnailError::DecodeError`].
    Decode,
    /// See [`ThumbnailError::EncodeError`] and [`ThumbnailError::ImageError`].
    Encode,
    /// See [`ThumbnailError::EnvironmentError`].
    Environment,
    /// The request was refused before any decoding happened.
    Rejected,
    /// File system failure.
    Io,
}

impl ThumbnailError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThumbnailError::DecodeError(_) => ErrorKind::Decode,
            ThumbnailError::EncodeError(_) | ThumbnailError::ImageError(_) => ErrorKind::Encode,
            ThumbnailError::EnvironmentError(_) => ErrorKind::Environment,
            ThumbnailError::UnsupportedMediaType { .. } | ThumbnailError::InvalidOffset(_) => {
                ErrorKind::Rejected
            }
            ThumbnailError::IoError(_) => ErrorKind::Io,
        }
    }
}

impl From<FfmpegError> for ThumbnailError {
    fn from(error: FfmpegError) -> Self {
        ThumbnailError::DecodeError(error.to_string())
    }
}

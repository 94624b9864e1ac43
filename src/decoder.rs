//! The decoding seam.
//!
//! [`VideoDecoder`] is everything the extractor needs from a media stack:
//! open a video and report its metadata, seek, and draw the current frame
//! into a raster buffer. [`FfmpegDecoder`](crate::FfmpegDecoder) is the
//! production implementation; tests substitute their own.

use std::time::Duration;

use image::RgbImage;

use crate::{error::ThumbnailError, input::VideoInput, metadata::VideoInfo};

/// Largest edge, in pixels, a raster surface may have.
pub const MAX_RASTER_DIMENSION: u32 = 16_384;

/// Source of decoded video frames.
///
/// Calls arrive in a fixed order for each video: [`open`](VideoDecoder::open),
/// then [`seek`](VideoDecoder::seek), then [`draw`](VideoDecoder::draw), and
/// finally [`close`](VideoDecoder::close), which the extractor issues on
/// success and on failure. A later `open` discards whatever the previous one
/// held.
pub trait VideoDecoder {
    /// Open `video` and report its duration and native dimensions.
    ///
    /// # Errors
    ///
    /// [`ThumbnailError::DecodeError`] if the video cannot be opened or has
    /// no decodable video stream.
    fn open(&mut self, video: &VideoInput) -> Result<VideoInfo, ThumbnailError>;

    /// Move the playback position to `position` and decode the frame there.
    ///
    /// Returns the position the decoder actually landed on, which follows
    /// the decoder's own seek semantics.
    fn seek(&mut self, position: Duration) -> Result<Duration, ThumbnailError>;

    /// Draw the current frame into `raster`, filling it completely.
    fn draw(&mut self, raster: &mut RgbImage) -> Result<(), ThumbnailError>;

    /// Drop the open video and any decoded frame. Closing twice is a no-op.
    fn close(&mut self) {}
}

/// Allocate a raster surface of exactly `width × height` pixels.
///
/// # Errors
///
/// [`ThumbnailError::EnvironmentError`] if either dimension is zero or larger
/// than [`MAX_RASTER_DIMENSION`].
pub fn acquire_raster(width: u32, height: u32) -> Result<RgbImage, ThumbnailError> {
    if width == 0 || height == 0 {
        return Err(ThumbnailError::EnvironmentError(format!(
            "cannot allocate a {width}x{height} raster surface"
        )));
    }
    if width > MAX_RASTER_DIMENSION || height > MAX_RASTER_DIMENSION {
        return Err(ThumbnailError::EnvironmentError(format!(
            "{width}x{height} exceeds the {MAX_RASTER_DIMENSION}px raster limit"
        )));
    }
    Ok(RgbImage::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_bounds() {
        let raster = acquire_raster(4, 3).unwrap();
        assert_eq!(raster.dimensions(), (4, 3));
        assert!(matches!(
            acquire_raster(0, 3),
            Err(ThumbnailError::EnvironmentError(_))
        ));
        assert!(matches!(
            acquire_raster(MAX_RASTER_DIMENSION + 1, 3),
            Err(ThumbnailError::EnvironmentError(_))
        ));
    }
}

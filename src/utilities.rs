//! Internal utility functions.
//!
//! Pixel copying and timestamp conversion for the FFmpeg decoder.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};
use image::RgbImage;

use crate::error::ThumbnailError;

/// Copy the first plane of an RGB24 frame into `raster`, row by row.
///
/// The frame's stride may exceed `width * 3`; the padding is skipped. The
/// frame must be at least as large as the raster.
pub(crate) fn copy_rgb_rows(
    frame: &VideoFrame,
    raster: &mut RgbImage,
) -> Result<(), ThumbnailError> {
    let stride = frame.stride(0);
    let plane = frame.data(0);
    let row_bytes = raster.width() as usize * 3;
    let rows = raster.height() as usize;
    if row_bytes == 0 {
        return Ok(());
    }

    if stride < row_bytes || plane.len() < stride * rows.saturating_sub(1) + row_bytes {
        return Err(ThumbnailError::DecodeError(format!(
            "converted frame is smaller than the {}x{} raster",
            raster.width(),
            raster.height()
        )));
    }

    for (row, target) in raster.chunks_exact_mut(row_bytes).enumerate() {
        let offset = row * stride;
        target.copy_from_slice(&plane[offset..offset + row_bytes]);
    }
    Ok(())
}

/// Convert a [`Duration`] to a container-level seek timestamp.
///
/// `Input::seek` with no stream index expects AV_TIME_BASE units
/// (microseconds).
pub(crate) fn duration_to_seek_timestamp(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

/// Rescale a PTS value from the stream time base to a [`Duration`].
///
/// Negative timestamps (pre-roll) map to zero.
pub(crate) fn pts_to_duration(pts: i64, time_base: Rational) -> Duration {
    if time_base.denominator() == 0 {
        return Duration::ZERO;
    }
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}

/// Frames per second from a rational rate, `0.0` when unknown.
pub(crate) fn rational_to_fps(rate: Rational) -> f64 {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        0.0
    } else {
        rate.numerator() as f64 / rate.denominator() as f64
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::format::Pixel;

    use super::*;

    #[test]
    fn padded_rows_are_stripped() {
        let (width, height) = (5, 3);
        let mut frame = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = frame.stride(0);
        assert!(stride >= width as usize * 3);
        for (index, byte) in frame.data_mut(0).iter_mut().enumerate() {
            *byte = if index % stride < width as usize * 3 {
                (index / stride) as u8 + 1
            } else {
                0xEE
            };
        }

        let mut raster = RgbImage::new(width, height);
        copy_rgb_rows(&frame, &mut raster).unwrap();

        for (_, y, pixel) in raster.enumerate_pixels() {
            assert_eq!(pixel.0, [y as u8 + 1; 3]);
        }
    }

    #[test]
    fn undersized_frame_is_rejected() {
        let frame = VideoFrame::new(Pixel::RGB24, 2, 2);
        let mut raster = RgbImage::new(4, 4);
        assert!(matches!(
            copy_rgb_rows(&frame, &mut raster),
            Err(ThumbnailError::DecodeError(_))
        ));
    }

    #[test]
    fn pts_conversion() {
        let time_base = Rational::new(1, 90_000);
        assert_eq!(pts_to_duration(90_000, time_base), Duration::from_secs(1));
        assert_eq!(pts_to_duration(-3_000, time_base), Duration::ZERO);
        assert_eq!(pts_to_duration(10, Rational::new(1, 0)), Duration::ZERO);
    }

    #[test]
    fn seek_timestamp_is_microseconds() {
        assert_eq!(duration_to_seek_timestamp(Duration::from_millis(1500)), 1_500_000);
    }

    #[test]
    fn fps() {
        assert_eq!(rational_to_fps(Rational::new(30, 1)), 30.0);
        assert_eq!(rational_to_fps(Rational::new(0, 0)), 0.0);
    }
}

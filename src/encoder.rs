//! The encoding seam.
//!
//! [`FrameEncoder`] turns a raster buffer into compressed image bytes.
//! [`JpegEncoder`] is the production implementation and defaults to
//! quality 80 (a 0.8 quality factor).

use image::{RgbImage, codecs::jpeg::JpegEncoder as ImageJpegEncoder};

use crate::error::ThumbnailError;

/// Quality used for thumbnails unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Compresses a raster buffer into still-image bytes.
pub trait FrameEncoder {
    /// Encode `raster`.
    ///
    /// # Errors
    ///
    /// [`ThumbnailError::EncodeError`] if no output bytes could be produced.
    fn encode(&self, raster: &RgbImage) -> Result<Vec<u8>, ThumbnailError>;

    /// MIME type of the produced bytes.
    fn media_type(&self) -> &'static str;
}

/// Baseline JPEG encoder.
///
/// # Example
///
/// ```
/// use image::RgbImage;
/// use reelthumb::{FrameEncoder, JpegEncoder};
///
/// let encoder = JpegEncoder::default();
/// assert_eq!(encoder.quality(), 80);
///
/// let bytes = encoder.encode(&RgbImage::new(8, 8)).unwrap();
/// assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegEncoder {
    quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl JpegEncoder {
    /// Create an encoder with `quality` on the 1–100 scale, clamped.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Create an encoder from a quality factor in `0.0..=1.0`.
    pub fn from_factor(factor: f32) -> Self {
        let factor = if factor.is_finite() { factor } else { 0.8 };
        Self::new((factor.clamp(0.0, 1.0) * 100.0).round() as u8)
    }

    /// The configured quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl FrameEncoder for JpegEncoder {
    fn encode(&self, raster: &RgbImage) -> Result<Vec<u8>, ThumbnailError> {
        let mut bytes = Vec::new();
        let mut encoder = ImageJpegEncoder::new_with_quality(&mut bytes, self.quality);
        encoder
            .encode_image(raster)
            .map_err(|error| ThumbnailError::EncodeError(error.to_string()))?;

        if bytes.is_empty() {
            return Err(ThumbnailError::EncodeError(
                "JPEG encoder produced no bytes".to_string(),
            ));
        }
        Ok(bytes)
    }

    fn media_type(&self) -> &'static str {
        "image/jpeg"
    }
}

//! Single-frame extraction.
//!
//! [`FrameExtractor`] runs one decode → seek → rasterize → encode pipeline
//! per call. There is no retry and no search for a better timestamp: the
//! frame is whatever the decoder lands on at the clamped offset.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use reelthumb::{FrameExtractor, ThumbnailError, VideoInput};
//!
//! let mut extractor = FrameExtractor::new();
//! let image = extractor.extract_frame(&VideoInput::open("reel.mp4"), Duration::from_secs(1))?;
//! image.save("reel-thumb.jpg")?;
//! image.release();
//! # Ok::<(), ThumbnailError>(())
//! ```

use std::time::Duration;

use image::RgbImage;

use crate::{
    decoder::{VideoDecoder, acquire_raster},
    encoder::{FrameEncoder, JpegEncoder},
    error::ThumbnailError,
    ffmpeg::FfmpegDecoder,
    handle::{HandleStore, ImageHandle, SourceHandle},
    input::VideoInput,
    metadata::VideoInfo,
    thumbnail::ThumbnailResult,
};

/// Offset used when the caller does not pick one.
pub const DEFAULT_OFFSET: Duration = Duration::from_secs(1);

/// The offset actually captured for a `requested` offset.
///
/// Offsets past the end are clamped to `duration` so short clips still
/// yield their last reachable frame. A zero `duration` means the length is
/// unknown and leaves the request untouched.
///
/// ```
/// use std::time::Duration;
///
/// use reelthumb::effective_offset;
///
/// let clip = Duration::from_millis(400);
/// assert_eq!(effective_offset(Duration::from_secs(1), clip), clip);
/// assert_eq!(effective_offset(Duration::from_millis(100), clip), Duration::from_millis(100));
/// ```
pub fn effective_offset(requested: Duration, duration: Duration) -> Duration {
    if duration.is_zero() {
        requested
    } else {
        requested.min(duration)
    }
}

/// Extracts a still frame from a video and encodes it.
///
/// Generic over the decoding and encoding backends; [`FrameExtractor::new`]
/// uses FFmpeg and JPEG at quality 80.
pub struct FrameExtractor<D = FfmpegDecoder, E = JpegEncoder> {
    decoder: D,
    encoder: E,
    store: HandleStore,
}

impl FrameExtractor {
    /// An extractor backed by FFmpeg and the default JPEG encoder.
    pub fn new() -> Self {
        Self::with_backends(FfmpegDecoder::new(), JpegEncoder::default())
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: VideoDecoder, E: FrameEncoder> FrameExtractor<D, E> {
    /// An extractor over custom backends, with a fresh [`HandleStore`].
    pub fn with_backends(decoder: D, encoder: E) -> Self {
        Self {
            decoder,
            encoder,
            store: HandleStore::new(),
        }
    }

    /// Register handles in `store` instead of a private one.
    #[must_use]
    pub fn with_store(mut self, store: HandleStore) -> Self {
        self.store = store;
        self
    }

    /// The store handles are registered in.
    pub fn store(&self) -> &HandleStore {
        &self.store
    }

    /// Extract the frame at `offset` (clamped to the video's duration) and
    /// return a handle to the encoded image.
    ///
    /// The source handle allocated while opening the video is released
    /// before this returns, on success and on failure.
    ///
    /// # Errors
    ///
    /// - [`ThumbnailError::DecodeError`] if the video cannot be opened,
    ///   decoded or seeked.
    /// - [`ThumbnailError::EnvironmentError`] if no raster surface can be
    ///   acquired for the video's dimensions.
    /// - [`ThumbnailError::EncodeError`] if the encoder produces nothing.
    pub fn extract_frame(
        &mut self,
        video: &VideoInput,
        offset: Duration,
    ) -> Result<ImageHandle, ThumbnailError> {
        let (source, image, _) = self.capture(video, offset)?;
        source.release();
        Ok(image)
    }

    /// Like [`extract_frame`](FrameExtractor::extract_frame) but keeps the
    /// source handle and returns the full [`ThumbnailResult`].
    pub fn extract_thumbnail(
        &mut self,
        video: &VideoInput,
        offset: Duration,
    ) -> Result<ThumbnailResult, ThumbnailError> {
        let (source, image, info) = self.capture(video, offset)?;
        Ok(ThumbnailResult {
            source,
            image,
            title: video.title().to_string(),
            aspect_ratio_hint: info.aspect_ratio(),
        })
    }

    fn capture(
        &mut self,
        video: &VideoInput,
        offset: Duration,
    ) -> Result<(SourceHandle, ImageHandle, VideoInfo), ThumbnailError> {
        let source = self.store.register_source(video.path());

        let decoded = self.rasterize(video, offset);
        self.decoder.close();
        let (raster, info) = decoded?;

        let bytes = self.encoder.encode(&raster)?;
        log::debug!(
            "{}: encoded {}x{} {} ({} bytes)",
            video.name(),
            info.width,
            info.height,
            self.encoder.media_type(),
            bytes.len()
        );

        let image = self.store.register_image(bytes, info.width, info.height);
        Ok((source, image, info))
    }

    fn rasterize(
        &mut self,
        video: &VideoInput,
        offset: Duration,
    ) -> Result<(RgbImage, VideoInfo), ThumbnailError> {
        let info = self.decoder.open(video)?;
        let target = effective_offset(offset, info.duration);
        if target != offset {
            log::debug!(
                "{}: offset {:?} clamped to duration {:?}",
                video.name(),
                offset,
                target
            );
        }

        let landed = self.decoder.seek(target)?;
        log::debug!("{}: seek to {:?} landed at {:?}", video.name(), target, landed);

        let mut raster = acquire_raster(info.width, info.height)?;
        self.decoder.draw(&mut raster)?;
        Ok((raster, info))
    }
}

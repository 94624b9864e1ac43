//! The record handed back for a single extracted thumbnail.

use crate::{
    handle::{ImageHandle, SourceHandle},
    metadata::AspectRatio,
};

/// A finished thumbnail together with its source.
///
/// Both handles are owned by whoever holds the result. Dropping the result
/// releases them; [`release`](ThumbnailResult::release) does so explicitly.
#[derive(Debug)]
pub struct ThumbnailResult {
    /// The original video, kept alive for optional preview playback.
    pub source: SourceHandle,
    /// The encoded JPEG.
    pub image: ImageHandle,
    /// Display title, the input name without its extension.
    pub title: String,
    /// Native aspect ratio of the video, e.g. `16:9`.
    pub aspect_ratio_hint: AspectRatio,
}

impl ThumbnailResult {
    /// Release both handles.
    pub fn release(self) {
        let ThumbnailResult { source, image, .. } = self;
        source.release();
        image.release();
    }
}

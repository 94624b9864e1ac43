//! Input validation.
//!
//! Only a short whitelist of container formats is accepted. The check is
//! made against the media type the caller *declared*; nothing here sniffs
//! the bytes. Inputs that fail the check never reach the decoder.
//!
//! # Example
//!
//! ```
//! use reelthumb::{VideoInput, is_valid_video_file};
//!
//! assert!(is_valid_video_file(&VideoInput::new("a.mp4", "video/mp4", "a.mp4")));
//! assert!(!is_valid_video_file(&VideoInput::new("a.jpg", "image/jpeg", "a.jpg")));
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::input::VideoInput;

/// The accepted video container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoMediaType {
    /// `video/mp4`
    Mp4,
    /// `video/webm`
    WebM,
    /// `video/ogg`
    Ogg,
    /// `video/quicktime`
    QuickTime,
    /// `video/x-msvideo`
    Avi,
}

impl VideoMediaType {
    /// Every accepted media type, in declaration order.
    pub const ALL: [VideoMediaType; 5] = [
        VideoMediaType::Mp4,
        VideoMediaType::WebM,
        VideoMediaType::Ogg,
        VideoMediaType::QuickTime,
        VideoMediaType::Avi,
    ];

    /// The MIME string for this type.
    pub fn as_mime(self) -> &'static str {
        match self {
            VideoMediaType::Mp4 => "video/mp4",
            VideoMediaType::WebM => "video/webm",
            VideoMediaType::Ogg => "video/ogg",
            VideoMediaType::QuickTime => "video/quicktime",
            VideoMediaType::Avi => "video/x-msvideo",
        }
    }

    /// Parse a declared MIME string. Matching is exact apart from ASCII case
    /// and surrounding whitespace; parameters such as `; codecs=...` are
    /// ignored.
    pub fn from_mime(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|media_type| media_type.as_mime().eq_ignore_ascii_case(essence))
    }

    /// Guess the media type from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp4" | "m4v" => Some(VideoMediaType::Mp4),
            "webm" => Some(VideoMediaType::WebM),
            "ogv" | "ogg" => Some(VideoMediaType::Ogg),
            "mov" | "qt" => Some(VideoMediaType::QuickTime),
            "avi" => Some(VideoMediaType::Avi),
            _ => None,
        }
    }
}

impl Display for VideoMediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_mime())
    }
}

/// Returns `true` if the declared media type is one of
/// [`VideoMediaType::ALL`].
pub fn is_supported_media_type(media_type: &str) -> bool {
    VideoMediaType::from_mime(media_type).is_some()
}

/// Returns `true` only if `input` declares an accepted video media type.
pub fn is_valid_video_file(input: &VideoInput) -> bool {
    is_supported_media_type(input.media_type())
}

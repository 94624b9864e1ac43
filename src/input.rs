//! Video inputs.
//!
//! A [`VideoInput`] pairs the location of the video bytes with the media
//! type the caller declared for them. The declared type is what
//! [`is_valid_video_file`](crate::is_valid_video_file) inspects; the bytes
//! themselves are only touched by the decoder.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use crate::validation::VideoMediaType;

/// Media type recorded for files whose extension is not recognised.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A video handed to the extractor.
///
/// Never mutated after construction.
///
/// # Example
///
/// ```
/// use reelthumb::VideoInput;
///
/// let input = VideoInput::open("reels/showreel.mp4");
/// assert_eq!(input.name(), "showreel.mp4");
/// assert_eq!(input.media_type(), "video/mp4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInput {
    name: String,
    media_type: String,
    path: PathBuf,
}

impl VideoInput {
    /// Describe a video with an explicitly declared media type.
    ///
    /// `name` is the display name (usually the original file name) used for
    /// titles and suggested output names.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            path: path.into(),
        }
    }

    /// Describe a video on disk, declaring its media type from the file
    /// extension.
    ///
    /// Unknown extensions declare [`UNKNOWN_MEDIA_TYPE`], which validation
    /// rejects.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let media_type = path
            .extension()
            .and_then(|extension| VideoMediaType::from_extension(&extension.to_string_lossy()))
            .map(|media_type| media_type.as_mime())
            .unwrap_or(UNKNOWN_MEDIA_TYPE);

        Self::new(name, media_type, path)
    }

    /// Display name of the input.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The media type the caller declared.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Where the video bytes live.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The name without its final extension, used as the thumbnail title.
    pub fn title(&self) -> &str {
        match crate::naming::split_extension(&self.name) {
            Some((stem, _)) => stem,
            None => &self.name,
        }
    }
}

impl Display for VideoInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.name, self.media_type)
    }
}

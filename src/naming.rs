//! Output naming conventions.
//!
//! Thumbnails are named after their source with the final extension
//! replaced by `-thumb.jpg`. The portfolio site additionally expects
//! hand-placed files under `thumbnails/`, named by [`ThumbnailSlot`].

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

/// Suffix appended to every generated thumbnail name.
pub const THUMBNAIL_SUFFIX: &str = "-thumb.jpg";

/// Directory the site reads thumbnails from.
pub const THUMBNAILS_DIR: &str = "thumbnails";

/// Split `name` into `(stem, extension)` at the final dot.
///
/// Returns `None` if there is no extension: no dot, a trailing dot, or a
/// dot that belongs to a parent directory component.
pub(crate) fn split_extension(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.')?;
    let extension = &name[dot + 1..];
    if extension.is_empty() || extension.contains(['/', '\\']) {
        return None;
    }
    Some((&name[..dot], extension))
}

/// Suggested output name for a thumbnail of `input_name`.
///
/// Only the final extension is stripped.
///
/// # Example
///
/// ```
/// use reelthumb::create_thumbnail_file_name;
///
/// assert_eq!(create_thumbnail_file_name("clip.mp4"), "clip-thumb.jpg");
/// assert_eq!(create_thumbnail_file_name("archive.tar.mp4"), "archive.tar-thumb.jpg");
/// ```
pub fn create_thumbnail_file_name(input_name: &str) -> String {
    let stem = split_extension(input_name).map_or(input_name, |(stem, _)| stem);
    format!("{stem}{THUMBNAIL_SUFFIX}")
}

/// A named position in the site's `thumbnails/` directory.
///
/// Indices are rendered zero-padded to two digits.
///
/// # Example
///
/// ```
/// use reelthumb::ThumbnailSlot;
///
/// assert_eq!(ThumbnailSlot::Showreel.file_name(), "showreel-thumb.jpg");
/// assert_eq!(ThumbnailSlot::Video(3).file_name(), "video-03-thumb.jpg");
/// assert_eq!(
///     ThumbnailSlot::Social(12).path().to_string_lossy(),
///     "thumbnails/social-12-thumb.jpg"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailSlot {
    /// The single showreel thumbnail.
    Showreel,
    /// The n-th entry of the video grid.
    Video(u32),
    /// The n-th entry of the social clips grid.
    Social(u32),
}

impl ThumbnailSlot {
    /// File name for this slot.
    pub fn file_name(&self) -> String {
        match self {
            ThumbnailSlot::Showreel => format!("showreel{THUMBNAIL_SUFFIX}"),
            ThumbnailSlot::Video(index) => format!("video-{index:02}{THUMBNAIL_SUFFIX}"),
            ThumbnailSlot::Social(index) => format!("social-{index:02}{THUMBNAIL_SUFFIX}"),
        }
    }

    /// Relative path of this slot below the site root.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(THUMBNAILS_DIR).join(self.file_name())
    }

    /// The full layout for a site with the given number of entries, showreel
    /// first. Indices start at 1.
    pub fn layout(videos: u32, socials: u32) -> Vec<ThumbnailSlot> {
        let mut slots = vec![ThumbnailSlot::Showreel];
        slots.extend((1..=videos).map(ThumbnailSlot::Video));
        slots.extend((1..=socials).map(ThumbnailSlot::Social));
        slots
    }
}

impl Display for ThumbnailSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.path().display())
    }
}

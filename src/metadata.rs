//! Stream metadata reported by a decoder once a video is open.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

/// What the decoder knows about an opened video.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use reelthumb::VideoInfo;
///
/// let info = VideoInfo::new(1920, 1080, Duration::from_secs(12));
/// assert_eq!(info.aspect_ratio().to_string(), "16:9");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoInfo {
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
    /// Total duration. [`Duration::ZERO`] when the container does not say.
    pub duration: Duration,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

impl VideoInfo {
    /// Metadata with only the fields the extractor relies on.
    pub fn new(width: u32, height: u32, duration: Duration) -> Self {
        Self {
            width,
            height,
            duration,
            frames_per_second: 0.0,
            codec: String::from("unknown"),
        }
    }

    /// The native aspect ratio.
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_dimensions(self.width, self.height)
    }
}

/// A width:height ratio in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    /// Reduced width term.
    pub width: u32,
    /// Reduced height term.
    pub height: u32,
}

impl AspectRatio {
    /// Reduce `width:height` by their greatest common divisor.
    ///
    /// A zero dimension yields `0:0`.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self {
                width: 0,
                height: 0,
            };
        }
        let divisor = gcd(width, height);
        Self {
            width: width / divisor,
            height: height / divisor,
        }
    }

    /// `true` for ratios taller than they are wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.width, self.height)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_common_ratios() {
        assert_eq!(AspectRatio::from_dimensions(1920, 1080).to_string(), "16:9");
        assert_eq!(AspectRatio::from_dimensions(1080, 1920).to_string(), "9:16");
        assert_eq!(AspectRatio::from_dimensions(640, 640).to_string(), "1:1");
        assert_eq!(AspectRatio::from_dimensions(0, 480).to_string(), "0:0");
        assert!(AspectRatio::from_dimensions(720, 1280).is_portrait());
    }
}

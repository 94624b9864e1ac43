//! In-memory decoder and encoder used to exercise extraction without FFmpeg.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use image::{Rgb, RgbImage};
use reelthumb::{FrameEncoder, ThumbnailError, VideoDecoder, VideoInfo, VideoInput};

/// A call observed by [`FakeDecoder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(String),
    Seek(Duration),
    Draw(u32, u32),
    Close,
}

#[derive(Debug, Clone)]
struct FakeVideo {
    width: u32,
    height: u32,
    duration: Duration,
    corrupt: bool,
}

/// Decoder serving synthetic videos keyed by path.
///
/// Frames are a solid colour derived from the seek position, so two captures
/// at the same offset are pixel-identical.
#[derive(Clone, Default)]
pub struct FakeDecoder {
    videos: HashMap<PathBuf, FakeVideo>,
    calls: Arc<Mutex<Vec<Call>>>,
    position: Option<Duration>,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decodable video.
    pub fn with_video(mut self, path: &str, width: u32, height: u32, duration: Duration) -> Self {
        self.videos.insert(
            PathBuf::from(path),
            FakeVideo {
                width,
                height,
                duration,
                corrupt: false,
            },
        );
        self
    }

    /// Register a video whose bytes cannot be decoded.
    pub fn with_corrupt(mut self, path: &str) -> Self {
        self.videos.insert(
            PathBuf::from(path),
            FakeVideo {
                width: 0,
                height: 0,
                duration: Duration::ZERO,
                corrupt: true,
            },
        );
        self
    }

    /// Shared record of every call, usable after the decoder moved into an
    /// extractor.
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }
}

impl VideoDecoder for FakeDecoder {
    fn open(&mut self, video: &VideoInput) -> Result<VideoInfo, ThumbnailError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Open(video.name().to_string()));
        self.position = None;
        match self.videos.get(video.path()) {
            Some(fake) if !fake.corrupt => {
                Ok(VideoInfo::new(fake.width, fake.height, fake.duration))
            }
            _ => Err(ThumbnailError::DecodeError(format!(
                "cannot decode {}",
                video.name()
            ))),
        }
    }

    fn seek(&mut self, position: Duration) -> Result<Duration, ThumbnailError> {
        self.calls.lock().unwrap().push(Call::Seek(position));
        self.position = Some(position);
        Ok(position)
    }

    fn draw(&mut self, raster: &mut RgbImage) -> Result<(), ThumbnailError> {
        let position = self
            .position
            .ok_or_else(|| ThumbnailError::DecodeError("not seeked".into()))?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Draw(raster.width(), raster.height()));
        let shade = (position.as_millis() % 256) as u8;
        for pixel in raster.pixels_mut() {
            *pixel = Rgb([shade, 255 - shade, 128]);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.calls.lock().unwrap().push(Call::Close);
        self.position = None;
    }
}

/// Encoder that always fails.
pub struct FailingEncoder;

impl FrameEncoder for FailingEncoder {
    fn encode(&self, _raster: &RgbImage) -> Result<Vec<u8>, ThumbnailError> {
        Err(ThumbnailError::EncodeError("encoder offline".into()))
    }

    fn media_type(&self) -> &'static str {
        "image/jpeg"
    }
}

/// Shorthand for an input declared as MP4.
pub fn mp4(path: &str) -> VideoInput {
    VideoInput::new(path, "video/mp4", path)
}

/// Seek positions recorded so far.
pub fn seeks(calls: &Arc<Mutex<Vec<Call>>>) -> Vec<Duration> {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter_map(|call| match call {
            Call::Seek(position) => Some(*position),
            _ => None,
        })
        .collect()
}

/// Number of `close` calls so far.
pub fn closes(calls: &Arc<Mutex<Vec<Call>>>) -> usize {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| **call == Call::Close)
        .count()
}

/// Names passed to `open` so far.
pub fn opened(calls: &Arc<Mutex<Vec<Call>>>) -> Vec<String> {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter_map(|call| match call {
            Call::Open(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

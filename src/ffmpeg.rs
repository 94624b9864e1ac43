//! FFmpeg-backed decoding and FFmpeg log control.
//!
//! [`FfmpegDecoder`] implements [`VideoDecoder`] on top of
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next). Seeking jumps to
//! the nearest keyframe at or before the target and decodes forward to the
//! first frame whose timestamp reaches it; if the stream ends first, the
//! last decoded frame is kept.
//!
//! FFmpeg prints its own diagnostics to stderr independently of the `log`
//! crate. [`set_ffmpeg_log_level`] tunes that output.

use std::{mem, str::FromStr, time::Duration};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as Decoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::log::Level,
};
use image::RgbImage;

use crate::{
    decoder::VideoDecoder, error::ThumbnailError, input::VideoInput, metadata::VideoInfo,
    utilities,
};

/// Slack allowed when deciding whether a decoded frame has reached the seek
/// target, for containers whose timestamps are rounded.
const SEEK_TOLERANCE: Duration = Duration::from_millis(1);

struct OpenVideo {
    input: Input,
    stream_index: usize,
    decoder: Decoder,
    time_base: Rational,
    current: Option<VideoFrame>,
}

/// [`VideoDecoder`] backed by FFmpeg.
///
/// Holds at most one open video, from [`open`](VideoDecoder::open) until
/// [`close`](VideoDecoder::close) or the next `open`. Create one per worker.
#[derive(Default)]
pub struct FfmpegDecoder {
    open: Option<OpenVideo>,
}

impl FfmpegDecoder {
    /// Create a decoder with nothing open.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a video opened by [`VideoDecoder::open`] is held.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn open_video(&mut self) -> Result<&mut OpenVideo, ThumbnailError> {
        self.open
            .as_mut()
            .ok_or_else(|| ThumbnailError::DecodeError("no video is open".to_string()))
    }
}

impl VideoDecoder for FfmpegDecoder {
    fn open(&mut self, video: &VideoInput) -> Result<VideoInfo, ThumbnailError> {
        self.open = None;
        log::debug!("Opening {} for decoding", video.path().display());

        ffmpeg_next::init().map_err(|error| {
            ThumbnailError::EnvironmentError(format!("FFmpeg initialisation failed: {error}"))
        })?;

        let input = ffmpeg_next::format::input(&video.path()).map_err(|error| {
            ThumbnailError::DecodeError(format!("cannot open {}: {error}", video.name()))
        })?;

        let (stream_index, time_base, frames_per_second, stream_duration, decoder) = {
            let stream = input.streams().best(Type::Video).ok_or_else(|| {
                ThumbnailError::DecodeError(format!("{} has no video stream", video.name()))
            })?;
            let time_base = stream.time_base();
            let mut frames_per_second = utilities::rational_to_fps(stream.avg_frame_rate());
            if frames_per_second <= 0.0 {
                frames_per_second = utilities::rational_to_fps(stream.rate());
            }
            let stream_duration = utilities::pts_to_duration(stream.duration(), time_base);
            let decoder = CodecContext::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|error| {
                    ThumbnailError::DecodeError(format!(
                        "unsupported video codec in {}: {error}",
                        video.name()
                    ))
                })?;
            (
                stream.index(),
                time_base,
                frames_per_second,
                stream_duration,
                decoder,
            )
        };

        let container_duration = input.duration();
        let duration = if container_duration > 0 {
            Duration::from_micros(container_duration as u64)
        } else {
            stream_duration
        };

        let info = VideoInfo {
            width: decoder.width(),
            height: decoder.height(),
            duration,
            frames_per_second,
            codec: decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        };
        log::debug!(
            "{}: {}x{} {} {:?} @ {:.3} fps",
            video.name(),
            info.width,
            info.height,
            info.codec,
            info.duration,
            info.frames_per_second
        );

        self.open = Some(OpenVideo {
            input,
            stream_index,
            decoder,
            time_base,
            current: None,
        });
        Ok(info)
    }

    fn seek(&mut self, position: Duration) -> Result<Duration, ThumbnailError> {
        let video = self.open_video()?;
        let target = utilities::duration_to_seek_timestamp(position);
        video.input.seek(target, ..target)?;
        video.decoder.flush();
        video.current = None;

        let threshold = position.saturating_sub(SEEK_TOLERANCE);
        let mut scratch = VideoFrame::empty();
        let mut current = VideoFrame::empty();
        let mut landed = None;

        for (stream, packet) in video.input.packets() {
            if stream.index() != video.stream_index {
                continue;
            }
            video.decoder.send_packet(&packet)?;
            while video.decoder.receive_frame(&mut scratch).is_ok() {
                mem::swap(&mut scratch, &mut current);
                let at = frame_position(&current, video.time_base);
                landed = Some(at);
                if at >= threshold {
                    video.current = Some(current);
                    return Ok(at);
                }
            }
        }

        // End of stream before the target: keep the last frame we reached.
        video.decoder.send_eof()?;
        while video.decoder.receive_frame(&mut scratch).is_ok() {
            mem::swap(&mut scratch, &mut current);
            let at = frame_position(&current, video.time_base);
            landed = Some(at);
            if at >= threshold {
                break;
            }
        }

        match landed {
            Some(at) => {
                video.current = Some(current);
                Ok(at)
            }
            None => Err(ThumbnailError::DecodeError(format!(
                "no decodable frame at or before {position:?}"
            ))),
        }
    }

    fn draw(&mut self, raster: &mut RgbImage) -> Result<(), ThumbnailError> {
        let video = self.open_video()?;
        let frame = video.current.as_ref().ok_or_else(|| {
            ThumbnailError::DecodeError("no frame has been decoded yet".to_string())
        })?;

        let (width, height) = raster.dimensions();
        let mut scaler = ScalingContext::get(
            frame.format(),
            frame.width(),
            frame.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| {
            ThumbnailError::EnvironmentError(format!("pixel converter unavailable: {error}"))
        })?;

        let mut rgb_frame = VideoFrame::empty();
        scaler.run(frame, &mut rgb_frame)?;
        utilities::copy_rgb_rows(&rgb_frame, raster)
    }

    fn close(&mut self) {
        if self.open.take().is_some() {
            log::trace!("Closed decoder input");
        }
    }
}

fn frame_position(frame: &VideoFrame, time_base: Rational) -> Duration {
    let pts = frame.timestamp().or_else(|| frame.pts()).unwrap_or(0);
    utilities::pts_to_duration(pts, time_base)
}

/// FFmpeg internal log verbosity, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Unrecoverable errors only.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "fatal" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "debug" => Ok(FfmpegLogLevel::Debug),
            other => Err(format!("unknown FFmpeg log level: {other}")),
        }
    }
}

/// Set FFmpeg's own stderr verbosity. Does not affect `log` output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into());
}

//! Async extraction.
//!
//! FFmpeg calls block, so both entry points move the work onto
//! `tokio::task::spawn_blocking`. [`ThumbnailFuture`] resolves to a single
//! image handle; [`BatchStream`] yields each batch outcome as it settles,
//! still strictly in input order.
//!
//! # Example
//!
//! ```no_run
//! use tokio_stream::StreamExt;
//!
//! use reelthumb::{ExtractOptions, VideoInput, batch_stream};
//!
//! # async fn example() {
//! let videos = vec![VideoInput::open("reel.mp4"), VideoInput::open("clip.webm")];
//! let mut stream = batch_stream(videos, ExtractOptions::new());
//! while let Some(outcome) = stream.next().await {
//!     match outcome.result {
//!         Ok(item) => println!("{} ready", item.suggested_name),
//!         Err(skipped) => println!("{} skipped: {}", skipped.video.name(), skipped.error),
//!     }
//! }
//! # }
//! ```

use std::{
    future::Future,
    ops::ControlFlow,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use tokio::{sync::mpsc::Receiver, task::JoinHandle};
use tokio_stream::Stream;

use crate::{
    batch::{BatchOutcome, BatchRunner},
    configuration::ExtractOptions,
    decoder::VideoDecoder,
    encoder::FrameEncoder,
    error::ThumbnailError,
    extractor::FrameExtractor,
    handle::{HandleStore, ImageHandle},
    input::VideoInput,
};

/// Bounded-channel capacity for [`BatchStream`].
const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// A future resolving to one extracted thumbnail.
pub struct ThumbnailFuture {
    handle: JoinHandle<Result<ImageHandle, ThumbnailError>>,
}

impl Future for ThumbnailFuture {
    type Output = Result<ImageHandle, ThumbnailError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|result| {
            result.unwrap_or_else(|error| {
                Err(ThumbnailError::EnvironmentError(format!(
                    "extraction task failed: {error}"
                )))
            })
        })
    }
}

/// Extract one frame on a blocking thread, registering the image in `store`.
pub fn extract_frame_async(
    video: VideoInput,
    offset: Duration,
    store: HandleStore,
) -> ThumbnailFuture {
    let handle = tokio::task::spawn_blocking(move || {
        FrameExtractor::new()
            .with_store(store)
            .extract_frame(&video, offset)
    });
    ThumbnailFuture { handle }
}

/// A stream of batch outcomes produced by a background thread.
///
/// Dropping the stream stops the batch before its next input.
pub struct BatchStream {
    receiver: Receiver<BatchOutcome>,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

impl Stream for BatchStream {
    type Item = BatchOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Run a batch with the FFmpeg-backed extractor on a blocking thread.
pub fn batch_stream(videos: Vec<VideoInput>, options: ExtractOptions) -> BatchStream {
    batch_stream_with(FrameExtractor::new, videos, options)
}

/// Run a batch on a blocking thread with an extractor built by `factory`.
///
/// The extractor is constructed on the worker thread, so the backends need
/// not be [`Send`].
pub fn batch_stream_with<F, D, E>(
    factory: F,
    videos: Vec<VideoInput>,
    options: ExtractOptions,
) -> BatchStream
where
    F: FnOnce() -> FrameExtractor<D, E> + Send + 'static,
    D: VideoDecoder + 'static,
    E: FrameEncoder + 'static,
{
    let (sender, receiver) = tokio::sync::mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

    let handle = tokio::task::spawn_blocking(move || {
        let mut runner = BatchRunner::with_extractor(factory());
        runner.run_each(videos, &options, |outcome| match sender.blocking_send(outcome) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        });
    });

    BatchStream { receiver, handle }
}

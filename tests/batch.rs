//! Batch runner integration tests.
//!
//! Uses the in-memory decoder from `common`; no fixtures are needed.

mod common;

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex},
    time::Duration,
};

use reelthumb::{
    BatchRunner, ErrorKind, ExtractOptions, FrameExtractor, ItemOutcome, JpegEncoder,
    ProgressInfo, VideoInput,
};

use common::{FakeDecoder, mp4, opened, seeks};

fn runner(decoder: FakeDecoder) -> BatchRunner<FakeDecoder, JpegEncoder> {
    BatchRunner::with_extractor(FrameExtractor::with_backends(decoder, JpegEncoder::default()))
}

struct Recorder {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            infos: Mutex::new(Vec::new()),
        })
    }

    fn counts(&self) -> Vec<(usize, usize)> {
        self.infos
            .lock()
            .unwrap()
            .iter()
            .map(|info| (info.progress.completed, info.progress.total))
            .collect()
    }
}

impl reelthumb::ProgressCallback for Recorder {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

#[test]
fn corrupt_middle_input_is_skipped_in_order() {
    let decoder = FakeDecoder::new()
        .with_video("one.mp4", 16, 9, Duration::from_secs(3))
        .with_corrupt("two.mp4")
        .with_video("three.mp4", 16, 9, Duration::from_secs(3));
    let recorder = Recorder::new();
    let options = ExtractOptions::new().with_progress(recorder.clone());

    let items = runner(decoder).run_batch(
        vec![mp4("one.mp4"), mp4("two.mp4"), mp4("three.mp4")],
        &options,
    );

    let names: Vec<&str> = items.iter().map(|item| item.video.name()).collect();
    assert_eq!(names, ["one.mp4", "three.mp4"]);
    assert_eq!(recorder.counts(), vec![(1, 3), (2, 3), (3, 3)]);

    let infos = recorder.infos.lock().unwrap();
    assert_eq!(infos[0].outcome, ItemOutcome::Completed);
    assert!(matches!(
        &infos[1].outcome,
        ItemOutcome::Skipped {
            kind: ErrorKind::Decode,
            ..
        }
    ));
    assert_eq!(infos[1].item_name, "two.mp4");
}

#[test]
fn suggested_names_follow_convention() {
    let decoder = FakeDecoder::new()
        .with_video("clip.mp4", 8, 8, Duration::from_secs(2))
        .with_video("archive.tar.mp4", 8, 8, Duration::from_secs(2));

    let items = runner(decoder).run_batch(
        vec![mp4("clip.mp4"), mp4("archive.tar.mp4")],
        &ExtractOptions::new(),
    );

    let suggested: Vec<&str> = items.iter().map(|item| item.suggested_name.as_str()).collect();
    assert_eq!(suggested, ["clip-thumb.jpg", "archive.tar-thumb.jpg"]);
}

#[test]
fn rejected_inputs_never_reach_the_extractor() {
    let decoder = FakeDecoder::new()
        .with_video("poster.jpg", 8, 8, Duration::from_secs(2))
        .with_video("reel.mp4", 8, 8, Duration::from_secs(2));
    let calls = decoder.calls();
    let recorder = Recorder::new();
    let options = ExtractOptions::new().with_progress(recorder.clone());

    let items = runner(decoder).run_batch(
        vec![
            VideoInput::new("poster.jpg", "image/jpeg", "poster.jpg"),
            mp4("reel.mp4"),
        ],
        &options,
    );

    assert_eq!(items.len(), 1);
    assert_eq!(opened(&calls), vec!["reel.mp4".to_string()]);
    assert_eq!(recorder.counts(), vec![(1, 2), (2, 2)]);
    assert!(matches!(
        recorder.infos.lock().unwrap()[0].outcome,
        ItemOutcome::Skipped {
            kind: ErrorKind::Rejected,
            ..
        }
    ));
}

#[test]
fn every_input_failing_still_reports_each_one() {
    let decoder = FakeDecoder::new();
    let recorder = Recorder::new();
    let options = ExtractOptions::new().with_progress(recorder.clone());

    let items = runner(decoder).run_batch(
        vec![mp4("missing-1.mp4"), mp4("missing-2.mp4")],
        &options,
    );

    assert!(items.is_empty());
    assert_eq!(recorder.counts(), vec![(1, 2), (2, 2)]);
}

#[test]
fn empty_batch_reports_nothing() {
    let recorder = Recorder::new();
    let options = ExtractOptions::new().with_progress(recorder.clone());

    let items = runner(FakeDecoder::new()).run_batch(Vec::new(), &options);

    assert!(items.is_empty());
    assert!(recorder.counts().is_empty());
}

#[test]
fn batch_uses_configured_offset() {
    let decoder = FakeDecoder::new().with_video("a.mp4", 8, 8, Duration::from_secs(10));
    let calls = decoder.calls();
    let options = ExtractOptions::new().with_offset(Duration::from_secs(4));

    runner(decoder).run_batch(vec![mp4("a.mp4")], &options);

    assert_eq!(seeks(&calls), vec![Duration::from_secs(4)]);
}

#[test]
fn default_offset_is_one_second() {
    let decoder = FakeDecoder::new().with_video("a.mp4", 8, 8, Duration::from_secs(10));
    let calls = decoder.calls();

    runner(decoder).run_batch(vec![mp4("a.mp4")], &ExtractOptions::new());

    assert_eq!(seeks(&calls), vec![Duration::from_secs(1)]);
}

#[test]
fn handles_are_released_when_items_drop() {
    let decoder = FakeDecoder::new()
        .with_video("a.mp4", 8, 8, Duration::from_secs(2))
        .with_corrupt("b.mp4");
    let mut runner = runner(decoder);

    let items = runner.run_batch(vec![mp4("a.mp4"), mp4("b.mp4")], &ExtractOptions::new());
    assert_eq!(runner.store().outstanding(), 1);

    drop(items);
    assert_eq!(runner.store().outstanding(), 0);
}

#[test]
fn closure_progress_callback() {
    let decoder = FakeDecoder::new().with_video("a.mp4", 8, 8, Duration::from_secs(2));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = ExtractOptions::new().with_progress(Arc::new(move |info: &ProgressInfo| {
        sink.lock().unwrap().push(info.progress.percentage());
    }));

    runner(decoder).run_batch(vec![mp4("a.mp4")], &options);

    assert_eq!(*seen.lock().unwrap(), vec![100.0]);
}

#[test]
fn run_each_can_stop_early() {
    let decoder = FakeDecoder::new()
        .with_video("a.mp4", 8, 8, Duration::from_secs(2))
        .with_video("b.mp4", 8, 8, Duration::from_secs(2));
    let calls = decoder.calls();
    let mut settled = 0;

    runner(decoder).run_each(
        vec![mp4("a.mp4"), mp4("b.mp4")],
        &ExtractOptions::new(),
        |_| {
            settled += 1;
            ControlFlow::Break(())
        },
    );

    assert_eq!(settled, 1);
    assert_eq!(opened(&calls), vec!["a.mp4".to_string()]);
}

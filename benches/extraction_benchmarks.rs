//! Benchmarks for thumbnail encoding and extraction.
//!
//! Run with: cargo bench
//!
//! The FFmpeg benchmarks require fixture files from
//! `tests/fixtures/generate_fixtures.sh` and are skipped without them.

use std::{path::Path, time::Duration};

use criterion::Criterion;
use image::{Rgb, RgbImage};
use reelthumb::{
    BatchRunner, ExtractOptions, FfmpegLogLevel, FrameEncoder, FrameExtractor, JpegEncoder,
    VideoInput,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn benchmark_jpeg_encoding(criterion: &mut Criterion) {
    let raster = RgbImage::from_fn(1920, 1080, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let encoder = JpegEncoder::default();

    criterion.bench_function("encode 1080p raster as JPEG q80", |bencher| {
        bencher.iter(|| encoder.encode(&raster).unwrap());
    });
}

fn benchmark_single_extraction(criterion: &mut Criterion) {
    reelthumb::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let input = VideoInput::open(SAMPLE_VIDEO);
    criterion.bench_function("extract thumbnail at 1s", |bencher| {
        bencher.iter(|| {
            let mut extractor = FrameExtractor::new();
            extractor
                .extract_frame(&input, Duration::from_secs(1))
                .unwrap()
        });
    });

    criterion.bench_function("extract thumbnail past end (clamped)", |bencher| {
        bencher.iter(|| {
            let mut extractor = FrameExtractor::new();
            extractor
                .extract_frame(&input, Duration::from_secs(3600))
                .unwrap()
        });
    });
}

fn benchmark_batch(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    criterion.bench_function("batch of 4 thumbnails", |bencher| {
        bencher.iter(|| {
            let videos = vec![VideoInput::open(SAMPLE_VIDEO); 4];
            BatchRunner::new().run_batch(videos, &ExtractOptions::new())
        });
    });
}

criterion::criterion_group!(
    benches,
    benchmark_jpeg_encoding,
    benchmark_single_extraction,
    benchmark_batch,
);
criterion::criterion_main!(benches);

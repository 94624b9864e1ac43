use std::{
    collections::HashMap,
    fs,
    ops::ControlFlow,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reelthumb::{
    BatchRunner, ExtractOptions, FfmpegDecoder, FfmpegLogLevel, ItemOutcome, ProgressCallback,
    ProgressInfo, ThumbnailSlot, VideoDecoder, VideoInput, create_thumbnail_file_name,
    effective_offset, is_valid_video_file,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  reelthumb extract showreel.mp4 clips/*.webm --out thumbnails --progress\n  reelthumb extract intro.mov --offset 00:02.5 --json\n  reelthumb check clips/*\n  reelthumb layout --videos 6 --socials 4\n  reelthumb completions zsh > _reelthumb";

#[derive(Debug, Parser)]
#[command(
    name = "reelthumb",
    version,
    about = "Extract JPEG thumbnails from video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one thumbnail per input video.
    #[command(
        about = "Extract thumbnails",
        after_help = "Examples:\n  reelthumb extract a.mp4 b.webm --out thumbs\n  reelthumb extract a.mp4 --offset 2.5 --json"
    )]
    Extract {
        /// Input video files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory for the JPEG files.
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Capture offset, in seconds or [hh:]mm:ss(.fff).
        #[arg(long, default_value = "1")]
        offset: String,
        /// Print a machine-readable summary.
        #[arg(long)]
        json: bool,
    },

    /// Report whether inputs are accepted, and probe the accepted ones.
    #[command(about = "Validate and probe inputs", visible_alias = "probe")]
    Check {
        /// Input video files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Capture offset to report the effective (clamped) value for.
        #[arg(long, default_value = "1")]
        offset: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the expected thumbnails/ layout for the portfolio site.
    #[command(about = "Print the thumbnail layout convention")]
    Layout {
        /// Number of entries in the video grid.
        #[arg(long, default_value_t = 0)]
        videos: u32,
        /// Number of entries in the social grid.
        #[arg(long, default_value_t = 0)]
        socials: u32,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completion scripts")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    let total_seconds = if let Ok(seconds) = trimmed.parse::<f64>() {
        seconds
    } else {
        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [minutes, seconds] => (0_u64, minutes.parse::<u64>()?, seconds.parse::<f64>()?),
            [hours, minutes, seconds] => (
                hours.parse::<u64>()?,
                minutes.parse::<u64>()?,
                seconds.parse::<f64>()?,
            ),
            _ => return Err(format!("invalid time format: {trimmed}").into()),
        };
        (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds
    };

    Duration::try_from_secs_f64(total_seconds)
        .map_err(|_| format!("offset must be a non-negative number of seconds: {trimmed}").into())
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

/// Check every thumbnail path the batch will write, including paths that two
/// inputs share (`a/clip.mp4` and `b/clip.webm` both become `clip-thumb.jpg`).
fn check_output_targets(
    out: &Path,
    videos: &[VideoInput],
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    for video in videos.iter().filter(|video| is_valid_video_file(video)) {
        let target = out.join(create_thumbnail_file_name(video.name()));
        if let Some(first) = claimed.get(&target) {
            if !overwrite {
                return Err(format!(
                    "{} and {} both map to {} (use --overwrite to keep the last one)",
                    first.display(),
                    video.path().display(),
                    target.display()
                )
                .into());
            }
            continue;
        }
        ensure_writable_path(&target, overwrite)?;
        claimed.insert(target, video.path());
    }
    Ok(())
}

fn init_logging(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level.parse()?;
        reelthumb::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Prints one line per skipped input, and drives the progress bar if any.
struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let ItemOutcome::Skipped { reason, .. } = &info.outcome {
            let line = format!(
                "{} {} ({})",
                "skipped:".yellow().bold(),
                info.item_name,
                reason
            );
            match &self.bar {
                Some(bar) => bar.println(line),
                None => eprintln!("{line}"),
            }
        }
        if let Some(bar) = &self.bar {
            bar.set_position(info.progress.completed as u64);
            bar.set_message(info.item_name.clone());
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global)?;

    match cli.command {
        Commands::Extract {
            inputs,
            out,
            offset,
            json,
        } => {
            let offset = parse_timecode(&offset)?;
            let videos: Vec<VideoInput> = inputs.iter().map(VideoInput::open).collect();

            fs::create_dir_all(&out)?;
            check_output_targets(&out, &videos, cli.global.overwrite)?;

            let bar = if cli.global.progress && !json {
                let bar = ProgressBar::new(videos.len() as u64);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?;
                bar.set_style(style.progress_chars("##-"));
                Some(bar)
            } else {
                None
            };
            let options = ExtractOptions::new()
                .with_offset(offset)
                .with_progress(Arc::new(TerminalProgress { bar: bar.clone() }));

            let mut written = Vec::new();
            let mut skipped = Vec::new();
            let mut write_error = None;
            let mut runner = BatchRunner::new();
            runner.run_each(videos, &options, |outcome| {
                match outcome.result {
                    Ok(item) => {
                        let path = out.join(&item.suggested_name);
                        if let Err(error) = item.image.save(&path) {
                            write_error = Some(error);
                            return ControlFlow::Break(());
                        }
                        if cli.global.verbose {
                            eprintln!("saved {} -> {}", item.video.name(), path.display());
                        }
                        written.push(json!({
                            "input": item.video.path().display().to_string(),
                            "output": path.display().to_string(),
                            "width": item.image.width(),
                            "height": item.image.height(),
                            "bytes": item.image.bytes().len(),
                        }));
                        item.image.release();
                    }
                    Err(skip) => {
                        skipped.push(json!({
                            "input": skip.video.path().display().to_string(),
                            "kind": format!("{:?}", skip.error.kind()).to_ascii_lowercase(),
                            "reason": skip.error.to_string(),
                        }));
                    }
                }
                ControlFlow::Continue(())
            });

            if let Some(bar) = bar {
                bar.finish_with_message("done");
            }
            if let Some(error) = write_error {
                return Err(error.into());
            }

            if json {
                let payload = json!({
                    "offset_seconds": offset.as_secs_f64(),
                    "written": written,
                    "skipped": skipped,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Wrote {} thumbnail(s) to {} ({} skipped)",
                        written.len(),
                        out.display(),
                        skipped.len()
                    )
                    .green()
                );
            }

            if written.is_empty() {
                return Err("no thumbnails were produced".into());
            }
        }
        Commands::Check {
            inputs,
            offset,
            json,
        } => {
            let offset = parse_timecode(&offset)?;
            let mut decoder = FfmpegDecoder::new();
            let mut reports = Vec::new();

            for path in &inputs {
                let video = VideoInput::open(path);
                let accepted = is_valid_video_file(&video);
                let probe = if accepted {
                    let info = decoder.open(&video);
                    decoder.close();
                    Some(info)
                } else {
                    None
                };

                if json {
                    reports.push(json!({
                        "input": path.display().to_string(),
                        "media_type": video.media_type(),
                        "accepted": accepted,
                        "probe": match &probe {
                            Some(Ok(info)) => json!({
                                "width": info.width,
                                "height": info.height,
                                "duration_seconds": info.duration.as_secs_f64(),
                                "frames_per_second": info.frames_per_second,
                                "codec": info.codec,
                                "aspect_ratio": info.aspect_ratio().to_string(),
                                "effective_offset_seconds":
                                    effective_offset(offset, info.duration).as_secs_f64(),
                            }),
                            Some(Err(error)) => json!({ "error": error.to_string() }),
                            None => serde_json::Value::Null,
                        },
                    }));
                    continue;
                }

                match probe {
                    None => println!(
                        "{} {} ({} is not an accepted video type)",
                        "rejected:".red().bold(),
                        path.display(),
                        video.media_type()
                    ),
                    Some(Err(error)) => println!(
                        "{} {} ({error})",
                        "unreadable:".red().bold(),
                        path.display()
                    ),
                    Some(Ok(info)) => println!(
                        "{} {} {}x{} ({}) {} {:.3}s, capture at {:.3}s",
                        "ok:".green().bold(),
                        path.display(),
                        info.width,
                        info.height,
                        info.aspect_ratio(),
                        info.codec,
                        info.duration.as_secs_f64(),
                        effective_offset(offset, info.duration).as_secs_f64()
                    ),
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
        Commands::Layout { videos, socials } => {
            for slot in ThumbnailSlot::layout(videos, socials) {
                println!("{slot}");
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "reelthumb", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use reelthumb::VideoInput;

    use super::{check_output_targets, parse_timecode};

    #[test]
    fn parse_timecode_formats() {
        assert_eq!(parse_timecode("1").unwrap().as_secs(), 1);
        assert_eq!(parse_timecode("2.5").unwrap().as_millis(), 2500);
        assert_eq!(parse_timecode("01:15").unwrap().as_secs(), 75);
        assert_eq!(parse_timecode("00:01:15.5").unwrap().as_millis(), 75_500);
    }

    #[test]
    fn parse_timecode_rejects_bad_input() {
        assert!(parse_timecode("").is_err());
        assert!(parse_timecode("-1").is_err());
        assert!(parse_timecode("1:2:3:4").is_err());
        assert!(parse_timecode("abc").is_err());
    }

    #[test]
    fn colliding_inputs_are_refused_without_overwrite() {
        let out = tempfile::tempdir().unwrap();
        let videos = vec![
            VideoInput::open("first/clip.mp4"),
            VideoInput::open("second/clip.webm"),
        ];

        let error = check_output_targets(out.path(), &videos, false).unwrap_err();
        assert!(error.to_string().contains("clip-thumb.jpg"));
        assert!(check_output_targets(out.path(), &videos, true).is_ok());
    }

    #[test]
    fn existing_output_is_refused_without_overwrite() {
        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("reel-thumb.jpg"), b"old").unwrap();
        let videos = vec![VideoInput::open("reel.mp4")];

        assert!(check_output_targets(out.path(), &videos, false).is_err());
        assert!(check_output_targets(out.path(), &videos, true).is_ok());
    }

    #[test]
    fn distinct_and_rejected_inputs_pass() {
        let out = tempfile::tempdir().unwrap();
        let videos = vec![
            VideoInput::open("a.mp4"),
            VideoInput::open("b.mp4"),
            VideoInput::open("a.png"),
            VideoInput::open("notes/a.txt"),
        ];

        assert!(check_output_targets(out.path(), &videos, false).is_ok());
    }
}

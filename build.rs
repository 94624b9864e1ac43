use std::{env, path::PathBuf};

const WATCHED_VARIABLES: [&str; 3] = ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"];

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // Linux and macOS builds find FFmpeg through pkg-config.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    match vcpkg_ffmpeg_dir() {
        Some(dir) if dir.exists() => warn(&format!(
            "reelthumb links FFmpeg from {}; export FFMPEG_DIR to pin it",
            dir.display()
        )),
        Some(dir) => warn(&format!("no FFmpeg found under {}", dir.display())),
        None => warn("FFMPEG_DIR is unset; point it at an FFmpeg install (vcpkg works)"),
    }
}

fn vcpkg_ffmpeg_dir() -> Option<PathBuf> {
    let root = env::var_os("VCPKG_ROOT")?;
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_owned());
    Some(PathBuf::from(root).join("installed").join(triplet))
}

fn warn(message: &str) {
    println!("cargo:warning={message}");
}

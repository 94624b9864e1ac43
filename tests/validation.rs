//! Input validation and naming tests.

use reelthumb::{
    ThumbnailSlot, UNKNOWN_MEDIA_TYPE, VideoInput, VideoMediaType, create_thumbnail_file_name,
    is_supported_media_type, is_valid_video_file,
};

#[test]
fn accepts_each_whitelisted_type() {
    for mime in [
        "video/mp4",
        "video/webm",
        "video/ogg",
        "video/quicktime",
        "video/x-msvideo",
    ] {
        let input = VideoInput::new("clip", mime, "clip");
        assert!(is_valid_video_file(&input), "{mime} should be accepted");
    }
}

#[test]
fn rejects_other_types() {
    for mime in ["image/jpeg", "audio/mpeg", "video/x-matroska", "", UNKNOWN_MEDIA_TYPE] {
        let input = VideoInput::new("clip", mime, "clip");
        assert!(!is_valid_video_file(&input), "{mime:?} should be rejected");
    }
}

#[test]
fn extension_guess_round_trips_through_validation() {
    assert!(is_valid_video_file(&VideoInput::open("reel.mp4")));
    assert!(is_valid_video_file(&VideoInput::open("clip.AVI")));
    assert!(!is_valid_video_file(&VideoInput::open("cover.png")));
}

#[test]
fn mime_display() {
    assert_eq!(VideoMediaType::QuickTime.to_string(), "video/quicktime");
    assert!(is_supported_media_type(&VideoMediaType::Avi.to_string()));
}

#[test]
fn thumbnail_file_names() {
    assert_eq!(create_thumbnail_file_name("clip.mp4"), "clip-thumb.jpg");
    assert_eq!(
        create_thumbnail_file_name("archive.tar.mp4"),
        "archive.tar-thumb.jpg"
    );
}

#[test]
fn site_layout_paths() {
    let paths: Vec<String> = ThumbnailSlot::layout(1, 2)
        .iter()
        .map(|slot| slot.to_string())
        .collect();
    assert_eq!(
        paths,
        [
            "thumbnails/showreel-thumb.jpg",
            "thumbnails/video-01-thumb.jpg",
            "thumbnails/social-01-thumb.jpg",
            "thumbnails/social-02-thumb.jpg",
        ]
    );
}

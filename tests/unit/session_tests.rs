/*!
 * Tests for session construction and video-id extraction
 */

use subsync::errors::AppError;
use subsync::session::{extract_video_id, Session};

use crate::common;

#[test]
fn test_extractVideoId_withSupportedUrlForms_shouldExtract() {
    let cases = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/watch?feature=shared&v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://www.youtube.com/shorts/dQw4w9WgXcQ",
    ];

    for url in cases {
        assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "url {}", url);
    }
}

#[test]
fn test_extractVideoId_withUnrecognizedUrl_shouldReturnNone() {
    assert!(extract_video_id("https://example.com/video/123").is_none());
    assert!(extract_video_id("not a url").is_none());
}

#[test]
fn test_sessionBuild_withSingleTrack_shouldExpand() {
    let session = Session::build("vid00000001", common::PRIMARY_SRT, None).unwrap();

    assert_eq!(session.video_id, "vid00000001");
    assert_eq!(session.summary.primary_blocks, 3);
    assert!(!session.summary.aligned);
    assert!(session.secondary_subs.is_empty());
    assert_eq!(session.primary_subs.len(), session.summary.primary_slots);
}

#[test]
fn test_sessionBuild_withTwoTracks_shouldAlignToEqualLengths() {
    let session =
        Session::build("vid00000001", common::PRIMARY_SRT, Some(common::SECONDARY_SRT)).unwrap();

    assert!(session.summary.aligned);
    assert_eq!(session.primary_subs.len(), session.secondary_subs.len());
    for (p, s) in session.primary_subs.iter().zip(session.secondary_subs.iter()) {
        assert_eq!(p.start, s.start);
        assert_eq!(p.end, s.end);
    }
}

#[test]
fn test_sessionBuild_withUnparsablePrimary_shouldFail() {
    let result = Session::build("vid00000001", "nothing parsable here", None);

    assert!(matches!(result, Err(AppError::EmptySubtitle(_))));
}

#[test]
fn test_sessionBuild_withUnparsableSecondary_shouldDegradeToExpansion() {
    let session =
        Session::build("vid00000001", common::PRIMARY_SRT, Some("nothing parsable")).unwrap();

    // All primary blocks fall into the degraded tail; secondary stays empty
    assert!(session.summary.aligned);
    assert!(session.secondary_subs.is_empty());
    assert_eq!(session.primary_subs.len(), 3);
}

#[test]
fn test_sessionSummary_display_shouldDescribeBothShapes() {
    let single = Session::build("vid00000001", common::PRIMARY_SRT, None).unwrap();
    let dual =
        Session::build("vid00000001", common::PRIMARY_SRT, Some(common::SECONDARY_SRT)).unwrap();

    assert_eq!(single.summary.to_string(), "primary: 3 blocks -> 3 slots");
    assert!(dual.summary.to_string().contains("(aligned)"));
}

/*!
 * Session construction.
 *
 * A session pairs a video identifier with its processed subtitle tracks.
 * Sessions are built once per load operation and fully replace any prior
 * session; tracks are never updated incrementally.
 */

use std::fmt;

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;
use crate::reflow::{align_entries, expand_entries};
use crate::subtitle_processor::{parse_srt_string, SubtitleEntry};

// @const: Video id extraction patterns, tried in order
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[?&]v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"/embed/([a-zA-Z0-9_-]{11})",
        r"/shorts/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract the 11-character video id from a watch/share/embed/shorts URL
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

/// Entry counts before and after segmentation, for display
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Parsed primary blocks
    pub primary_blocks: usize,

    /// Parsed secondary blocks (0 when single-track)
    pub secondary_blocks: usize,

    /// Primary display slots after expansion/alignment
    pub primary_slots: usize,

    /// Secondary display slots after alignment
    pub secondary_slots: usize,

    /// Whether dual-track alignment was performed
    pub aligned: bool,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.aligned {
            write!(
                f,
                "primary: {} slots | secondary: {} slots (aligned)",
                self.primary_slots, self.secondary_slots
            )
        } else {
            write!(
                f,
                "primary: {} blocks -> {} slots",
                self.primary_blocks, self.primary_slots
            )
        }
    }
}

/// A video identifier paired with its processed subtitle tracks
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque video identifier, also the progress-store key
    pub video_id: String,

    /// Primary display track, sorted and non-overlapping
    pub primary_subs: Vec<SubtitleEntry>,

    /// Secondary display track; empty when single-track
    pub secondary_subs: Vec<SubtitleEntry>,

    /// Entry counts for the status line
    pub summary: SessionSummary,
}

impl Session {
    /// Build a session from raw subtitle text.
    ///
    /// With two tracks the entries are slot-aligned for bilingual display;
    /// with one they are expanded independently. A primary input with no
    /// parsable entries at all is the one hard error at this boundary.
    pub fn build(
        video_id: &str,
        primary_raw: &str,
        secondary_raw: Option<&str>,
    ) -> Result<Self, AppError> {
        let raw_primary = parse_srt_string(primary_raw);
        if raw_primary.is_empty() {
            return Err(AppError::EmptySubtitle("primary track".to_string()));
        }

        let session = match secondary_raw {
            Some(secondary_raw) => {
                let raw_secondary = parse_srt_string(secondary_raw);
                let aligned = align_entries(&raw_primary, &raw_secondary);
                let summary = SessionSummary {
                    primary_blocks: raw_primary.len(),
                    secondary_blocks: raw_secondary.len(),
                    primary_slots: aligned.primary.len(),
                    secondary_slots: aligned.secondary.len(),
                    aligned: true,
                };
                Session {
                    video_id: video_id.to_string(),
                    primary_subs: aligned.primary,
                    secondary_subs: aligned.secondary,
                    summary,
                }
            }
            None => {
                let primary_subs = expand_entries(&raw_primary);
                let summary = SessionSummary {
                    primary_blocks: raw_primary.len(),
                    secondary_blocks: 0,
                    primary_slots: primary_subs.len(),
                    secondary_slots: 0,
                    aligned: false,
                };
                Session {
                    video_id: video_id.to_string(),
                    primary_subs,
                    secondary_subs: Vec::new(),
                    summary,
                }
            }
        };

        info!("Built session for '{}': {}", session.video_id, session.summary);
        Ok(session)
    }
}

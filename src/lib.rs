/*!
 * # subsync - Bilingual Subtitle Sync Engine
 *
 * A Rust library for synchronizing externally-authored subtitle tracks
 * with a continuously advancing playback clock.
 *
 * ## Features
 *
 * - Parse time-coded caption text into structured entries
 * - Re-segment long entries into display-sized chunks with proportional
 *   time redistribution
 * - Align two independently-segmented tracks onto shared time slots for
 *   bilingual display
 * - Resolve the active entry for an arbitrary timestamp in O(log n)
 * - Poll an external playback clock and republish the latest resolved pair
 * - Persist display preferences and per-video playback progress
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: caption parsing and timecode handling
 * - `segmenter`: display-sized chunking and ratio math
 * - `reflow`: track expansion and dual-track alignment
 * - `resolver`: active-entry lookup
 * - `sync_poller`: clock sampling and sample publication
 * - `session`: per-video session construction
 * - `playlist`: catalog retrieval
 * - `store`: preference and progress persistence
 * - `app_config`: configuration management
 * - `app_controller`: main application controller
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod playlist;
pub mod reflow;
pub mod resolver;
pub mod segmenter;
pub mod session;
pub mod store;
pub mod subtitle_processor;
pub mod sync_poller;

// Re-export main types for easier usage
pub use app_config::{Config, SubtitleMode, UserPreferences};
pub use errors::{AppError, PlayerError, PlaylistError};
pub use reflow::{align_entries, expand_entries, AlignedTracks};
pub use resolver::find_active;
pub use session::Session;
pub use subtitle_processor::{parse_srt_string, sec_to_tc, tc_to_sec, SubtitleEntry, SubtitleTrack};
pub use sync_poller::{PlaybackClock, SyncPoller, SyncSample};

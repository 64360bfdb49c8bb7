use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn, debug};
use parking_lot::Mutex;

use crate::app_config::{Config, SubtitleStyle, UserPreferences};
use crate::errors::{AppError, PlayerError};
use crate::playlist::Playlist;
use crate::reflow::{align_entries, expand_entries};
use crate::session::{extract_video_id, Session};
use crate::store::Repository;
use crate::subtitle_processor::{parse_srt_string, read_subtitle_file, SubtitleEntry, SubtitleTrack};
use crate::sync_poller::{PlaybackClock, SyncPoller, SyncSample};

// @module: Application controller for subtitle playback sessions

/// Saved positions at or below this are not restored on session start
pub const RESUME_THRESHOLD_SECS: f64 = 10.0;

/// How often playback progress is persisted, in elapsed playback seconds
pub const PROGRESS_SAVE_INTERVAL_SECS: f64 = 5.0;

/// Wall-clock stand-in for the external player.
///
/// The real player lives outside the process; for terminal playback the
/// timeline is simulated from a monotonic anchor. The clock reports
/// not-ready until started, and seeking re-anchors the timeline.
pub struct WallClockPlayer {
    state: Mutex<PlayerState>,
}

struct PlayerState {
    anchor: Option<Instant>,
    offset: f64,
}

impl WallClockPlayer {
    /// Create a player that is not yet started (clock unavailable)
    pub fn new() -> Self {
        WallClockPlayer {
            state: Mutex::new(PlayerState {
                anchor: None,
                offset: 0.0,
            }),
        }
    }

    /// Start the clock; a seek issued before start becomes the origin
    pub fn start(&self) {
        let mut state = self.state.lock();
        if state.anchor.is_none() {
            state.anchor = Some(Instant::now());
        }
    }
}

impl Default for WallClockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackClock for WallClockPlayer {
    async fn current_time(&self) -> Result<f64, PlayerError> {
        let state = self.state.lock();
        match state.anchor {
            Some(anchor) => Ok(state.offset + anchor.elapsed().as_secs_f64()),
            None => Err(PlayerError::NotReady),
        }
    }

    async fn seek(&self, seconds: f64) -> Result<(), PlayerError> {
        let mut state = self.state.lock();
        state.offset = seconds.max(0.0);
        if state.anchor.is_some() {
            state.anchor = Some(Instant::now());
        }
        Ok(())
    }
}

/// Main application controller for subtitle playback
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Preference/progress store
    repository: Repository,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, repository: Repository) -> Result<Self> {
        Ok(Self { config, repository })
    }

    /// Play from local subtitle files
    pub async fn play_files(
        &self,
        video: &str,
        primary_path: &Path,
        secondary_path: Option<&Path>,
    ) -> Result<()> {
        let video_id = resolve_video_id(video)?;

        let primary_raw = read_subtitle_file(primary_path)?;
        let secondary_raw = match secondary_path {
            Some(path) => Some(read_subtitle_file(path)?),
            None => None,
        };

        let session = Session::build(&video_id, &primary_raw, secondary_raw.as_deref())?;
        self.play_session(session).await
    }

    /// Play a record from a playlist catalog
    pub async fn play_playlist_item(&self, location: &str, index: usize) -> Result<()> {
        let playlist = Playlist::load(location).await?;
        let item = playlist
            .get(index)
            .with_context(|| format!("Playlist has no record at index {}", index))?
            .clone();

        let video_id = resolve_video_id(&item.url)?;

        let primary_raw = playlist
            .fetch_subtitle_text(item.primary.as_deref())
            .await?
            .ok_or_else(|| AppError::EmptySubtitle(format!("playlist record {}", index)))?;
        let secondary_raw = playlist.fetch_subtitle_text(item.secondary.as_deref()).await?;

        if let Some(title) = &item.title {
            info!("Playing playlist record {}: {}", index, title);
        }

        let session = Session::build(&video_id, &primary_raw, secondary_raw.as_deref())?;
        self.play_session(session).await
    }

    /// Drive one session: restore progress, poll the clock, render, persist
    async fn play_session(&self, session: Session) -> Result<()> {
        let preferences = self.effective_preferences().await;

        let player = Arc::new(WallClockPlayer::new());

        // Restore prior progress before the clock starts
        let saved = self.repository.get_progress(&session.video_id).await?;
        if let Some(position) = saved {
            if position as f64 > RESUME_THRESHOLD_SECS {
                info!("Resuming '{}' from {}s", session.video_id, position);
                player.seek(position as f64).await?;
            }
        }

        let track_end = track_end_time(&session.primary_subs, &session.secondary_subs);
        info!("Session '{}' ({}), runs to {}", session.video_id, session.summary, format_clock(track_end));

        player.start();
        let poller = SyncPoller::start(
            Arc::clone(&player) as Arc<dyn PlaybackClock>,
            session.primary_subs.clone(),
            session.secondary_subs.clone(),
            Duration::from_millis(self.config.poll_interval_ms),
        );

        let mut last_rendered: Option<(Option<SubtitleEntry>, Option<SubtitleEntry>)> = None;
        let mut last_saved = 0.0f64;
        let mut last_time = 0.0f64;

        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut ctrl_c => {
                    info!("Interrupted, saving progress");
                    break;
                }
            }

            let Some(sample) = poller.latest() else {
                continue;
            };
            last_time = sample.time;

            let pair = visible_pair(&preferences, &sample);
            if last_rendered.as_ref() != Some(&pair) {
                render_pair(&preferences, sample.time, &pair);
                last_rendered = Some(pair);
            }

            if sample.time - last_saved >= PROGRESS_SAVE_INTERVAL_SECS {
                self.repository
                    .save_progress(&session.video_id, sample.time)
                    .await?;
                last_saved = sample.time;
            }

            if sample.time > track_end + 0.5 {
                debug!("Reached end of subtitle timeline");
                break;
            }
        }

        self.repository.save_progress(&session.video_id, last_time).await?;
        poller.stop();

        Ok(())
    }

    /// Parse-and-print the processed tracks without playing
    pub fn dump(&self, primary_path: &Path, secondary_path: Option<&Path>) -> Result<()> {
        let primary_raw = read_subtitle_file(primary_path)?;
        let raw_primary = parse_srt_string(&primary_raw);
        if raw_primary.is_empty() {
            return Err(AppError::EmptySubtitle(primary_path.display().to_string()).into());
        }

        match secondary_path {
            Some(path) => {
                let secondary_raw = read_subtitle_file(path)?;
                let raw_secondary = parse_srt_string(&secondary_raw);
                let aligned = align_entries(&raw_primary, &raw_secondary);

                println!("# primary ({} slots)", aligned.primary.len());
                print!("{}", SubtitleTrack::from_entries("primary", aligned.primary).to_srt_string());
                println!("# secondary ({} slots)", aligned.secondary.len());
                print!("{}", SubtitleTrack::from_entries("secondary", aligned.secondary).to_srt_string());
            }
            None => {
                let expanded = expand_entries(&raw_primary);
                print!("{}", SubtitleTrack::from_entries("primary", expanded).to_srt_string());
            }
        }

        Ok(())
    }

    /// List the records of a playlist catalog
    pub async fn list_playlist(&self, location: &str) -> Result<()> {
        let playlist = Playlist::load(location).await?;

        if playlist.is_empty() {
            warn!("Playlist has no playable records");
            return Ok(());
        }

        for (i, item) in playlist.items().iter().enumerate() {
            let title = item.title.as_deref().unwrap_or(&item.url);
            let group = item
                .group
                .as_deref()
                .map(|g| format!(" [{}]", g))
                .unwrap_or_default();
            let tracks = if item.secondary.is_some() { "bilingual" } else { "single" };
            println!("{:>3}. {}{} ({})", i, title, group, tracks);
        }

        Ok(())
    }

    /// Config preferences with any store-saved overrides applied on top
    async fn effective_preferences(&self) -> UserPreferences {
        let mut preferences = self.config.preferences.clone();
        match self.repository.load_preference_overrides().await {
            Ok(Some(saved)) => preferences.apply(saved),
            Ok(None) => {}
            Err(e) => warn!("Could not load saved preferences: {}", e),
        }
        preferences
    }
}

/// Accept a full video URL or a bare 11-character id
fn resolve_video_id(video: &str) -> Result<String, AppError> {
    if let Some(id) = extract_video_id(video) {
        return Ok(id);
    }

    let looks_bare = video.len() == 11
        && video
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if looks_bare {
        return Ok(video.to_string());
    }

    Err(AppError::Unknown(format!(
        "Could not extract a video id from '{}'",
        video
    )))
}

/// Latest end time across both tracks
fn track_end_time(primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> f64 {
    let p = primary.last().map_or(0.0, |e| e.end);
    let s = secondary.last().map_or(0.0, |e| e.end);
    p.max(s)
}

/// Apply the visibility mode to a resolved sample
fn visible_pair(
    preferences: &UserPreferences,
    sample: &SyncSample,
) -> (Option<SubtitleEntry>, Option<SubtitleEntry>) {
    let primary = preferences
        .subtitle_mode
        .shows_primary()
        .then(|| sample.primary.clone())
        .flatten();
    let secondary = preferences
        .subtitle_mode
        .shows_secondary()
        .then(|| sample.secondary.clone())
        .flatten();
    (primary, secondary)
}

/// Print the active pair, styled with the configured track colors
fn render_pair(
    preferences: &UserPreferences,
    time: f64,
    pair: &(Option<SubtitleEntry>, Option<SubtitleEntry>),
) {
    let clock = format_clock(time);
    match pair {
        (None, None) => println!("[{}]", clock),
        (primary, secondary) => {
            let mut line = format!("[{}]", clock);
            if let Some(entry) = primary {
                line.push(' ');
                line.push_str(&styled(&preferences.styles.primary, &entry.text));
            }
            if let Some(entry) = secondary {
                line.push_str(" | ");
                line.push_str(&styled(&preferences.styles.secondary, &entry.text));
            }
            println!("{}", line);
        }
    }
}

/// Wrap text in a truecolor escape derived from the style's hex color
fn styled(style: &SubtitleStyle, text: &str) -> String {
    match parse_hex_color(&style.color) {
        Some((r, g, b)) => format!("\x1B[38;2;{};{};{}m{}\x1B[0m", r, g, b, text),
        None => text.to_string(),
    }
}

/// Parse a `#rrggbb` color string
fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Format seconds as `H:MM:SS` or `M:SS`
fn format_clock(sec: f64) -> String {
    let total = sec.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{warn, debug};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle parsing and timecode handling

// @const: Time-range line regex. Hours may be one or more digits, the
// sub-second separator may be ',', '.' or ':', and the fractional part
// may be 1-3 digits.
static TIMERANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d{2}):(\d{2})[,.:](\d{1,3})\s*-->\s*(\d+):(\d{2}):(\d{2})[,.:](\d{1,3})")
        .unwrap()
});

// @const: Standalone timecode regex
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.:](\d{1,3})$").unwrap()
});

// @struct: Single timed caption unit
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Caption text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            start,
            end,
            text: text.into(),
        }
    }

    /// Duration of the entry in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Convert start time to formatted SRT timecode
    pub fn format_start(&self) -> String {
        sec_to_tc(self.start)
    }

    /// Convert end time to formatted SRT timecode
    pub fn format_end(&self) -> String {
        sec_to_tc(self.end)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} --> {}", self.format_start(), self.format_end())?;
        writeln!(f, "{}", self.text)
    }
}

/// Parse a timecode of the form `H:MM:SS<sep>mmm` to seconds.
///
/// The fractional part is right-padded to three digits before being read
/// as milliseconds, so `0:00:05,5` means 5.5s, not 5.005s.
pub fn tc_to_sec(tc: &str) -> Option<f64> {
    let caps = TIMECODE_REGEX.captures(tc.trim())?;
    Some(fields_to_sec(&caps, 1))
}

/// Format seconds as an SRT timecode `HH:MM:SS,mmm`
pub fn sec_to_tc(sec: f64) -> String {
    let total_ms = (sec.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Convert four capture groups starting at `start_idx` to seconds
fn fields_to_sec(caps: &regex::Captures, start_idx: usize) -> f64 {
    let field = |i: usize| -> u64 {
        caps.get(start_idx + i)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };
    let hours = field(0);
    let minutes = field(1);
    let seconds = field(2);

    // Right-pad the fractional part to milliseconds ("5" -> 500ms)
    let frac = caps.get(start_idx + 3).map_or("0", |m| m.as_str());
    let millis: u64 = format!("{:0<3}", frac).parse().unwrap_or(0);

    (hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0
}

/// Parse raw time-coded caption text into an ordered list of entries.
///
/// This is a structural-only parse: blocks lacking a valid time-range line
/// or ending up with empty text are silently dropped, block order is
/// preserved, and no re-sorting or overlap correction is applied.
pub fn parse_srt_string(raw: &str) -> Vec<SubtitleEntry> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut entries = Vec::new();

    for block in split_blocks(normalized.trim()) {
        let lines: Vec<&str> = block.trim().lines().collect();

        let Some(tc_idx) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        let Some(caps) = TIMERANGE_REGEX.captures(lines[tc_idx]) else {
            debug!("Skipping block with unparsable time range: {}", lines[tc_idx]);
            continue;
        };

        let start = fields_to_sec(&caps, 1);
        let end = fields_to_sec(&caps, 5);

        let text = lines[tc_idx + 1..].join(" ").trim().to_string();
        if text.is_empty() {
            continue;
        }

        entries.push(SubtitleEntry { start, end, text });
    }

    entries
}

/// Split normalized text into blocks separated by one or more blank lines
fn split_blocks(text: &str) -> Vec<&str> {
    static BLANK_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
    BLANK_LINE_REGEX
        .split(text)
        .filter(|b| !b.trim().is_empty())
        .collect()
}

/// An ordered sequence of entries for one subtitle language/channel
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    /// Language label for the track (advisory only)
    pub language: String,

    /// Time-ordered entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    /// Create a track by parsing raw caption text
    pub fn from_srt_string(language: &str, raw: &str) -> Self {
        let entries = parse_srt_string(raw);
        if entries.is_empty() {
            warn!("No parsable subtitle entries for track '{}'", language);
        }

        SubtitleTrack {
            language: language.to_string(),
            entries,
        }
    }

    /// Create a track from already-built entries
    pub fn from_entries(language: &str, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleTrack {
            language: language.to_string(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the track as SRT text with sequential numbering
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("{}\n{}\n", i + 1, entry));
        }
        out
    }

    /// Write the track to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} track ({} entries)", self.language, self.entries.len())
    }
}

/// Read a subtitle file to a string
pub fn read_subtitle_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path: PathBuf = path.as_ref().to_path_buf();
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read subtitle file: {}", path.display()))
}

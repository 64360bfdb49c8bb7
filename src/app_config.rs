use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including display
/// preferences, their defaults, and the field-by-field merge of saved
/// overrides over those defaults.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Display preferences (styling, mode, video sizing)
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Clock sampling cadence in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferences: UserPreferences::default(),
            poll_interval_ms: default_poll_interval_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and overriding
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be greater than zero"));
        }
        self.preferences.validate()
    }
}

/// Which of the resolved pair is shown by the rendering layer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleMode {
    // @mode: Hide both tracks
    Off,
    // @mode: Primary track only
    Primary,
    // @mode: Secondary track only
    Secondary,
    // @mode: Both tracks stacked
    #[default]
    Both,
}

impl SubtitleMode {
    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Off => "off".to_string(),
            Self::Primary => "primary".to_string(),
            Self::Secondary => "secondary".to_string(),
            Self::Both => "both".to_string(),
        }
    }

    /// Whether the primary track is visible in this mode
    pub fn shows_primary(&self) -> bool {
        matches!(self, Self::Primary | Self::Both)
    }

    /// Whether the secondary track is visible in this mode
    pub fn shows_secondary(&self) -> bool {
        matches!(self, Self::Secondary | Self::Both)
    }
}

impl std::fmt::Display for SubtitleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SubtitleMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "both" => Ok(Self::Both),
            _ => Err(anyhow!("Invalid subtitle mode: {}", s)),
        }
    }
}

/// Styling for one subtitle track, applied by the rendering layer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleStyle {
    /// Font size in pixels
    pub font_size: u32,

    /// Text color as a hex string
    pub color: String,

    /// Background color as an rgba() string
    pub background: String,
}

/// Per-track style pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrackStyles {
    /// Primary track style
    #[serde(default = "default_primary_style")]
    pub primary: SubtitleStyle,

    /// Secondary track style
    #[serde(default = "default_secondary_style")]
    pub secondary: SubtitleStyle,
}

impl Default for TrackStyles {
    fn default() -> Self {
        Self {
            primary: default_primary_style(),
            secondary: default_secondary_style(),
        }
    }
}

/// Player sizing settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoSettings {
    /// Player width as a percentage of the container
    #[serde(default = "default_video_width")]
    pub width_percent: u32,

    /// Aspect ratio in "W:H" form
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width_percent: default_video_width(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

/// User-facing display preferences, persisted across sessions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserPreferences {
    /// Subtitle visibility mode
    #[serde(default)]
    pub subtitle_mode: SubtitleMode,

    /// Per-track styling
    #[serde(default)]
    pub styles: TrackStyles,

    /// Video sizing
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            subtitle_mode: SubtitleMode::default(),
            styles: TrackStyles::default(),
            video: VideoSettings::default(),
        }
    }
}

impl UserPreferences {
    /// Merge saved overrides over the defaults, field by field.
    ///
    /// Fields absent from the saved payload keep their default value, so
    /// preference keys added after a payload was written are always present.
    pub fn merged_with_defaults(saved: PartialPreferences) -> Self {
        let mut prefs = Self::default();
        prefs.apply(saved);
        prefs
    }

    /// Apply a partial override in place
    pub fn apply(&mut self, saved: PartialPreferences) {
        if let Some(mode) = saved.subtitle_mode {
            self.subtitle_mode = mode;
        }
        if let Some(styles) = saved.styles {
            if let Some(primary) = styles.primary {
                apply_style(&mut self.styles.primary, primary);
            }
            if let Some(secondary) = styles.secondary {
                apply_style(&mut self.styles.secondary, secondary);
            }
        }
        if let Some(video) = saved.video {
            if let Some(width) = video.width_percent {
                self.video.width_percent = width;
            }
            if let Some(ratio) = video.aspect_ratio {
                self.video.aspect_ratio = ratio;
            }
        }
    }

    /// Validate preference values
    pub fn validate(&self) -> Result<()> {
        for (name, style) in [("primary", &self.styles.primary), ("secondary", &self.styles.secondary)] {
            if !(8..=96).contains(&style.font_size) {
                return Err(anyhow!(
                    "{} font size {} out of range (8-96)",
                    name, style.font_size
                ));
            }
        }

        if !(10..=100).contains(&self.video.width_percent) {
            return Err(anyhow!(
                "Video width {}% out of range (10-100)",
                self.video.width_percent
            ));
        }

        let parts: Vec<&str> = self.video.aspect_ratio.split(':').collect();
        let valid = parts.len() == 2
            && parts
                .iter()
                .all(|p| p.parse::<u32>().map_or(false, |v| v > 0));
        if !valid {
            return Err(anyhow!("Invalid aspect ratio: {}", self.video.aspect_ratio));
        }

        Ok(())
    }
}

fn apply_style(style: &mut SubtitleStyle, saved: PartialStyle) {
    if let Some(font_size) = saved.font_size {
        style.font_size = font_size;
    }
    if let Some(color) = saved.color {
        style.color = color;
    }
    if let Some(background) = saved.background {
        style.background = background;
    }
}

/// Saved preference payload where every field is optional
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PartialPreferences {
    /// Saved subtitle mode, if any
    #[serde(default)]
    pub subtitle_mode: Option<SubtitleMode>,

    /// Saved style overrides, if any
    #[serde(default)]
    pub styles: Option<PartialTrackStyles>,

    /// Saved video overrides, if any
    #[serde(default)]
    pub video: Option<PartialVideoSettings>,
}

/// Partial per-track style overrides
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PartialTrackStyles {
    #[serde(default)]
    pub primary: Option<PartialStyle>,

    #[serde(default)]
    pub secondary: Option<PartialStyle>,
}

/// Partial single-track style override
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PartialStyle {
    #[serde(default)]
    pub font_size: Option<u32>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub background: Option<String>,
}

/// Partial video settings override
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PartialVideoSettings {
    #[serde(default)]
    pub width_percent: Option<u32>,

    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_primary_style() -> SubtitleStyle {
    SubtitleStyle {
        font_size: 22,
        color: "#ffffff".to_string(),
        background: "rgba(0,0,0,0.78)".to_string(),
    }
}

fn default_secondary_style() -> SubtitleStyle {
    SubtitleStyle {
        font_size: 17,
        color: "#fde08d".to_string(),
        background: "rgba(0,0,0,0.65)".to_string(),
    }
}

fn default_video_width() -> u32 {
    100
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::PlaylistError;

// @module: Playlist/catalog retrieval

/// One catalog record: a playable video plus its subtitle-file references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Playable media reference (video URL)
    pub url: String,

    /// Primary subtitle reference; records without one are excluded
    #[serde(default)]
    pub primary: Option<String>,

    /// Optional secondary subtitle reference
    #[serde(default)]
    pub secondary: Option<String>,

    /// Optional grouping label
    #[serde(default)]
    pub group: Option<String>,
}

/// Where the playlist was loaded from, used to resolve relative references
#[derive(Debug, Clone)]
enum PlaylistSource {
    File(PathBuf),
    Remote(Url),
}

/// An ordered catalog of playable records
#[derive(Debug, Clone)]
pub struct Playlist {
    source: PlaylistSource,
    items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Load a playlist from a local path or an http(s) URL.
    ///
    /// Records without a primary subtitle reference are excluded up front.
    pub async fn load(location: &str) -> Result<Self, PlaylistError> {
        let (source, raw) = if is_remote(location) {
            let url = Url::parse(location)
                .map_err(|e| PlaylistError::Parse(e.to_string()))?;
            (PlaylistSource::Remote(url), fetch_remote(location).await?)
        } else {
            let path = PathBuf::from(location);
            let raw = std::fs::read_to_string(&path)
                .map_err(|_| PlaylistError::Fetch(location.to_string()))?;
            (PlaylistSource::File(path), raw)
        };

        let parsed: Vec<PlaylistItem> =
            serde_json::from_str(&raw).map_err(|e| PlaylistError::Parse(e.to_string()))?;

        let total = parsed.len();
        let items: Vec<PlaylistItem> = parsed
            .into_iter()
            .filter(|item| item.primary.as_deref().is_some_and(|p| !p.is_empty()))
            .collect();

        if items.len() < total {
            warn!(
                "Excluded {} playlist record(s) without a primary subtitle reference",
                total - items.len()
            );
        }
        debug!("Loaded playlist with {} playable record(s)", items.len());

        Ok(Playlist { source, items })
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    /// Fetch the text of a referenced subtitle file.
    ///
    /// Relative references resolve against the playlist location. A missing
    /// or unreadable file yields `Ok(None)` so an absent secondary track
    /// degrades silently; only transport-level failures surface as errors.
    pub async fn fetch_subtitle_text(
        &self,
        reference: Option<&str>,
    ) -> Result<Option<String>, PlaylistError> {
        let Some(reference) = reference.filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        if is_remote(reference) {
            return fetch_remote_optional(reference).await;
        }

        match &self.source {
            PlaylistSource::Remote(base) => {
                let resolved = base
                    .join(reference)
                    .map_err(|e| PlaylistError::Parse(e.to_string()))?;
                fetch_remote_optional(resolved.as_str()).await
            }
            PlaylistSource::File(path) => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                let resolved = base.join(reference);
                match std::fs::read_to_string(&resolved) {
                    Ok(text) => Ok(Some(text)),
                    Err(e) => {
                        warn!("Subtitle file not available: {} ({})", resolved.display(), e);
                        Ok(None)
                    }
                }
            }
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch a remote resource, treating any failure as fatal
async fn fetch_remote(location: &str) -> Result<String, PlaylistError> {
    let response = reqwest::get(location)
        .await
        .map_err(|e| PlaylistError::Fetch(format!("{}: {}", location, e)))?;

    if !response.status().is_success() {
        return Err(PlaylistError::Fetch(format!(
            "{}: HTTP {}",
            location,
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| PlaylistError::Fetch(format!("{}: {}", location, e)))
}

/// Fetch a remote resource, degrading a non-success status to `None`
async fn fetch_remote_optional(location: &str) -> Result<Option<String>, PlaylistError> {
    let response = reqwest::get(location)
        .await
        .map_err(|e| PlaylistError::Fetch(format!("{}: {}", location, e)))?;

    if !response.status().is_success() {
        warn!("Subtitle not available: {} (HTTP {})", location, response.status());
        return Ok(None);
    }

    let text = response
        .text()
        .await
        .map_err(|e| PlaylistError::Fetch(format!("{}: {}", location, e)))?;
    Ok(Some(text))
}

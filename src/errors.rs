/*!
 * Error types for the subsync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the external playback clock
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The player is not initialized yet; the current tick is skipped
    #[error("Playback clock not ready")]
    NotReady,

    /// A seek command was rejected or failed
    #[error("Seek failed: {0}")]
    SeekFailed(String),

    /// The player reported an unrecoverable playback error
    #[error("Playback error: {0}")]
    Playback(String),
}

/// Errors that can occur while loading the playlist catalog
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// Error fetching the playlist or a referenced subtitle file
    #[error("Failed to fetch {0}")]
    Fetch(String),

    /// Error parsing the playlist JSON
    #[error("Failed to parse playlist: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the playback clock
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// Error from playlist loading
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// No parsable subtitle entries in a required input
    #[error("No subtitle entries found in {0}")]
    EmptySubtitle(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

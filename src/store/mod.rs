/*!
 * Persistent storage for user preferences and playback progress.
 *
 * This module provides SQLite-based persistence keyed by opaque video
 * identifiers: last playback positions (for resume-on-load) and the
 * serialized display preferences payload.
 */

pub mod connection;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::StoreConnection;
pub use repository::Repository;

/*!
 * Repository layer for store operations.
 *
 * This module provides a high-level API over the progress and preference
 * tables, abstracting away the SQL details and enforcing the persistence
 * policies (minimum position threshold, whole-second storage, merge of
 * saved preference payloads over defaults).
 */

use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{params, OptionalExtension};

use super::connection::StoreConnection;
use crate::app_config::{PartialPreferences, UserPreferences};

/// Positions below this many seconds are never persisted, so an immediate
/// seek-away or a just-opened video leaves no noise in the store
pub const MIN_PERSIST_POSITION_SECS: f64 = 5.0;

/// Repository for preference and progress operations
#[derive(Clone)]
pub struct Repository {
    /// Store connection
    db: StoreConnection,
}

impl Repository {
    /// Create a new repository with the given store connection
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Create a repository at the default store location
    pub fn new_default() -> Result<Self> {
        let db = StoreConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory store (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = StoreConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    // =========================================================================
    // Progress Operations
    // =========================================================================

    /// Save the playback position for a video.
    ///
    /// Positions under [`MIN_PERSIST_POSITION_SECS`] are ignored; the stored
    /// value is floored to whole seconds.
    pub async fn save_progress(&self, video_id: &str, position_secs: f64) -> Result<()> {
        if video_id.is_empty() || position_secs < MIN_PERSIST_POSITION_SECS {
            debug!(
                "Skipping progress save for '{}' at {:.1}s",
                video_id, position_secs
            );
            return Ok(());
        }

        let video_id = video_id.to_string();
        let position = position_secs.floor() as i64;

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO progress (video_id, position_secs, updated_at)
                     VALUES (?1, ?2, ?3)",
                    params![video_id, position, Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
    }

    /// Get the saved playback position for a video, if any
    pub async fn get_progress(&self, video_id: &str) -> Result<Option<u64>> {
        let video_id = video_id.to_string();

        self.db
            .execute_async(move |conn| {
                let position: Option<i64> = conn
                    .query_row(
                        "SELECT position_secs FROM progress WHERE video_id = ?1",
                        [&video_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                Ok(position.map(|p| p.max(0) as u64))
            })
            .await
    }

    /// Remove the saved position for a video
    pub async fn clear_progress(&self, video_id: &str) -> Result<()> {
        let video_id = video_id.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM progress WHERE video_id = ?1", [&video_id])?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Preference Operations
    // =========================================================================

    /// Persist the display preferences payload
    pub async fn save_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        let payload = serde_json::to_string(preferences)?;

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO preferences (id, payload, updated_at)
                     VALUES (1, ?1, ?2)",
                    params![payload, Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
    }

    /// Load the raw saved preference payload, if one exists.
    ///
    /// An unreadable payload is discarded with a warning so a corrupt row
    /// can never block startup.
    pub async fn load_preference_overrides(&self) -> Result<Option<PartialPreferences>> {
        let payload: Option<String> = self
            .db
            .execute_async(|conn| {
                let payload = conn
                    .query_row("SELECT payload FROM preferences WHERE id = 1", [], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(payload)
            })
            .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<PartialPreferences>(&payload) {
            Ok(partial) => Ok(Some(partial)),
            Err(e) => {
                warn!("Discarding unreadable preference payload: {}", e);
                Ok(None)
            }
        }
    }

    /// Load display preferences, merging the saved payload over defaults.
    ///
    /// A missing or unreadable payload yields the defaults; fields the
    /// payload does not carry keep their default value.
    pub async fn load_preferences(&self) -> Result<UserPreferences> {
        match self.load_preference_overrides().await? {
            Some(partial) => Ok(UserPreferences::merged_with_defaults(partial)),
            None => Ok(UserPreferences::default()),
        }
    }
}

/*!
 * Store schema.
 *
 * Two tables: per-video playback positions and a single-row display
 * preference payload. The schema version rides in SQLite's `user_version`
 * pragma, so a fresh file and an up-to-date file look the same to callers.
 */

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS progress (
    video_id TEXT PRIMARY KEY,
    position_secs INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preferences (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Bring a connection up to the current schema.
///
/// Version 0 means a fresh file; a version above [`SCHEMA_VERSION`] means
/// the file was written by a newer build and is refused rather than risk
/// clobbering it.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let found: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("Failed to read store schema version")?;

    match found {
        0 => {
            info!("Creating store schema v{}", SCHEMA_VERSION);
            // WAL mode for crash recovery
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute_batch(CREATE_TABLES)
                .context("Failed to create store tables")?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        v if v == SCHEMA_VERSION => {
            debug!("Store schema is current (v{})", v);
        }
        v => bail!(
            "Store schema v{} is newer than this build supports (v{})",
            v,
            SCHEMA_VERSION
        ),
    }

    Ok(())
}

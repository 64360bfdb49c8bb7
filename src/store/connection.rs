/*!
 * Store connection handling.
 *
 * One SQLite connection shared behind a mutex; async callers go through
 * `spawn_blocking` so store work never occupies a runtime worker thread.
 */

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::info;
use rusqlite::Connection;

use super::schema;

/// Directory and filename of the store under the user data directory
const STORE_DIR: &str = "subsync";
const STORE_FILE: &str = "subsync.db";

/// Shared handle to the preference/progress store
#[derive(Clone)]
pub struct StoreConnection {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl StoreConnection {
    /// Open the store at the default location, creating it if needed
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_store_path()?)
    }

    /// Open the store at an explicit path, creating parent directories
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create store directory {}", dir.display()))?;
        }

        info!("Opening preference store {}", path.display());
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open store {}", path.display()))?;

        Self::wrap(path, conn)
    }

    /// Volatile store for tests
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        Self::wrap(PathBuf::from(":memory:"), conn)
    }

    fn wrap(path: PathBuf, conn: Connection) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default store path under the user's local data directory
    pub fn default_store_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
            .context("Could not determine a data directory for the store")?;

        Ok(base.join(STORE_DIR).join(STORE_FILE))
    }

    /// Store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a closure against the locked connection
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.conn.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        f(&guard)
    }

    /// Like [`Self::execute`], but moved onto the blocking pool so async
    /// callers never hold up the runtime on SQLite I/O
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
            f(&guard)
        })
        .await
        .context("Store task panicked")?
    }
}

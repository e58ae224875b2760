// src/db/image_db_conn.rs
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::CoreResult as Result;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS images (
        imageID      INTEGER PRIMARY KEY AUTOINCREMENT,
        Img          TEXT NOT NULL,
        encryptedImg TEXT NOT NULL,
        keyImg       TEXT NOT NULL,
        decryptedImg TEXT NOT NULL,
        createdAt    TEXT NOT NULL DEFAULT (datetime('now'))
    );
"#;

/// SQLite-backed registry. The connection is owned by this handle; share it
/// by wrapping the handle in an `Arc`, and call [`SqliteRegistry::close`]
/// on shutdown.
#[derive(Debug)]
pub struct SqliteRegistry {
    conn: Mutex<Connection>,
}

impl SqliteRegistry {
    /// Open (or create) the registry file, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| crate::error::CoreError::storage(parent, e))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    // A panic mid-statement leaves SQLite itself consistent, so a poisoned
    // lock is still usable
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

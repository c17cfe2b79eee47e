//! SQLite-backed slot: a single key → payload table.
//!
//! # Responsibility
//! - Open file or in-memory SQLite databases for slot storage.
//! - Bootstrap the slot table and verify the schema version.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Payloads newer than the supported schema version are refused, never
//!   silently reinterpreted.

use super::{check_key, DurableSlot, SlotError, SlotResult};
use log::{error, info};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const SLOT_SCHEMA_VERSION: u32 = 1;

const SLOT_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY NOT NULL,
    payload TEXT NOT NULL
);";

/// SQLite-backed slot persisting payloads in a `slots` table.
pub struct SqliteSlot {
    conn: Connection,
}

impl SqliteSlot {
    /// Opens a database file and bootstraps the slot schema.
    ///
    /// # Side effects
    /// - Emits `slot_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        Self::open_with(|| Connection::open(path), "file")
    }

    /// Opens an in-memory database and bootstraps the slot schema.
    ///
    /// # Side effects
    /// - Emits `slot_open` logging events with duration and status.
    pub fn open_in_memory() -> SlotResult<Self> {
        Self::open_with(Connection::open_in_memory, "memory")
    }

    fn open_with(
        open: impl FnOnce() -> rusqlite::Result<Connection>,
        mode: &str,
    ) -> SlotResult<Self> {
        let started_at = Instant::now();
        info!("event=slot_open module=slot status=start mode={mode}");

        let conn = match open() {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=slot_open module=slot status=error mode={mode} duration_ms={} error_code=slot_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match bootstrap_connection(&conn) {
            Ok(()) => {
                info!(
                    "event=slot_open module=slot status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=slot_open module=slot status=error mode={mode} duration_ms={} error_code=slot_bootstrap_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl DurableSlot for SqliteSlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        check_key(key)?;
        let payload = self
            .conn
            .query_row("SELECT payload FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(payload)
    }

    fn save(&self, key: &str, payload: &str) -> SlotResult<()> {
        check_key(key)?;
        self.conn.execute(
            "INSERT INTO slots (key, payload) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET payload = excluded.payload;",
            [key, payload],
        )?;
        Ok(())
    }
}

fn bootstrap_connection(conn: &Connection) -> SlotResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let db_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if db_version > SLOT_SCHEMA_VERSION {
        return Err(SlotError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: SLOT_SCHEMA_VERSION,
        });
    }

    conn.execute_batch(SLOT_SCHEMA_SQL)?;
    conn.execute_batch(&format!("PRAGMA user_version = {SLOT_SCHEMA_VERSION};"))?;
    Ok(())
}

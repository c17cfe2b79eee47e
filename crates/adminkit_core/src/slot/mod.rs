//! Durable slot abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key → serialized-collection persistence contract.
//! - Isolate storage backends from store/query orchestration.
//!
//! # Invariants
//! - A slot stores opaque payloads; it never inspects record contents.
//! - `save` replaces the whole payload for a key; there is no partial write
//!   visible to callers.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
mod memory;
mod sqlite;

pub use file::FileSlot;
pub use memory::MemorySlot;
pub use sqlite::SqliteSlot;

pub type SlotResult<T> = Result<T, SlotError>;

/// Persistence-layer failure surfaced to store callers unchanged.
#[derive(Debug)]
pub enum SlotError {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    InvalidKey(String),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::InvalidKey(_) => None,
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for SlotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Key-value persistence boundary for one serialized collection per key.
///
/// Implementations are not coordinated across processes: two writers sharing
/// one key overwrite each other whole-payload, last write wins.
pub trait DurableSlot {
    /// Loads the payload stored under `key`, or `None` when the key is absent.
    fn load(&self, key: &str) -> SlotResult<Option<String>>;

    /// Stores `payload` under `key`, replacing any previous payload.
    fn save(&self, key: &str, payload: &str) -> SlotResult<()>;
}

/// Rejects keys that cannot name a slot in every backend.
///
/// File-backed slots map keys to file names, so separators and blank keys are
/// refused uniformly rather than behaving per-backend.
pub(crate) fn check_key(key: &str) -> SlotResult<()> {
    if key.trim().is_empty() || key.contains(['/', '\\']) {
        return Err(SlotError::InvalidKey(key.to_string()));
    }
    Ok(())
}

//! File-backed slot: one JSON file per slot key.
//!
//! # Responsibility
//! - Map each slot key to `<key>.json` under a caller-chosen directory.
//! - Replace payloads atomically via a temp file and rename.
//!
//! # Invariants
//! - Readers never observe a half-written payload for a key.
//! - An absent file is reported as an absent key, not an error.

use super::{check_key, DurableSlot, SlotResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory-backed slot storing one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Creates a slot rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> SlotResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn payload_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableSlot for FileSlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        check_key(key)?;
        match fs::read_to_string(self.payload_path(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, payload: &str) -> SlotResult<()> {
        check_key(key)?;
        // Write-then-rename so a crash mid-save leaves the old payload intact.
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp_path, payload)?;
        fs::rename(&tmp_path, self.payload_path(key))?;
        Ok(())
    }
}

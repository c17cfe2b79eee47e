//! In-memory slot for tests and ephemeral stores.

use super::{check_key, DurableSlot, SlotResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Map-backed slot with shared state across clones.
///
/// Cloning yields a handle onto the same underlying map, so a test can hand a
/// clone to a store and later reopen the same data through another clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableSlot for MemorySlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        check_key(key)?;
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> SlotResult<()> {
        check_key(key)?;
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySlot;
    use crate::slot::DurableSlot;

    #[test]
    fn absent_key_loads_as_none() {
        let slot = MemorySlot::new();
        assert_eq!(slot.load("users").unwrap(), None);
    }

    #[test]
    fn clones_share_one_underlying_map() {
        let slot = MemorySlot::new();
        let handle = slot.clone();

        slot.save("users", "[]").unwrap();

        assert_eq!(handle.load("users").unwrap().as_deref(), Some("[]"));
    }
}

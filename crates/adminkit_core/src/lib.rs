//! Record store and list query pipeline for admin-panel data layers.
//! This crate is the single source of truth for collection invariants.

pub mod logging;
pub mod model;
pub mod query;
pub mod slot;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordId};
pub use model::schema::{FieldDescriptor, FieldKind, IdKind, Schema, SchemaError};
pub use query::pipeline::{ListQuery, PageResult, SortOrder};
pub use slot::{DurableSlot, FileSlot, MemorySlot, SlotError, SqliteSlot};
pub use store::record_store::{RecordStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Domain model for collection records.
//!
//! # Responsibility
//! - Define the canonical record shape shared by every collection.
//! - Define the per-collection schema that gates all write paths.
//!
//! # Invariants
//! - Every record is identified by a `RecordId` unique within its collection.
//! - Schema validation runs before any mutation reaches persistence.

pub mod record;
pub mod schema;

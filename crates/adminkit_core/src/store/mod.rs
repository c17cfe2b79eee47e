//! Record store: CRUD orchestration over one named collection.
//!
//! # Responsibility
//! - Own the in-memory collection and its durable-slot persistence.
//! - Surface semantic errors (`NotFound`) alongside transport errors.
//!
//! # Invariants
//! - Write paths validate against the collection schema before persisting.
//! - Every successful mutation has been written back to the slot in full.

pub mod record_store;

//! Read-only list query pipeline.
//!
//! # Responsibility
//! - Turn a collection snapshot plus a query descriptor into one result page.
//! - Keep every stage pure: no mutation, no I/O, no caching.
//!
//! # Invariants
//! - Stage order is fixed: normalize, search, filter, sort, paginate.
//! - The pipeline is total: malformed descriptors are normalized, never
//!   rejected.

pub mod pipeline;

//! CRUD store for one collection, persisted through a durable slot.
//!
//! # Responsibility
//! - Load the collection once, keep it in memory, write it back after every
//!   mutation.
//! - Assign identifiers on create and enforce their uniqueness.
//!
//! # Invariants
//! - Identifiers are unique within the collection at all times.
//! - A failed persist leaves the in-memory collection unchanged; callers
//!   never observe a half-applied mutation.
//! - Two stores sharing one slot key are not coordinated: the last writer
//!   overwrites the whole collection.

use crate::model::record::{Record, RecordId};
use crate::model::schema::{IdKind, Schema, SchemaError};
use crate::query::pipeline::{self, ListQuery, PageResult};
use crate::slot::{DurableSlot, SlotError};
use log::{debug, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for collection persistence and CRUD operations.
#[derive(Debug)]
pub enum StoreError {
    /// No record in the collection has the requested identifier.
    NotFound(RecordId),
    Schema(SchemaError),
    Slot(SlotError),
    /// Persisted or seeded collection data violates store invariants.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Slot(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid collection data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Schema(err) => Some(err),
            Self::Slot(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<SchemaError> for StoreError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

/// CRUD store for one named collection.
///
/// Constructed and owned by the caller; there is no process-wide registry of
/// stores, so tests can run isolated stores side by side.
pub struct RecordStore<S: DurableSlot> {
    slot: S,
    key: String,
    schema: Schema,
    records: Vec<Record>,
}

impl<S: DurableSlot> RecordStore<S> {
    /// Opens the collection stored under `key`, seeding it when absent.
    ///
    /// # Contract
    /// - An absent key falls back to `seed` and writes the seed back
    ///   immediately, so a later reader sees the same collection.
    /// - A payload that fails to parse, or a collection with missing or
    ///   duplicate identifiers, is refused rather than repaired.
    pub fn open(slot: S, key: impl Into<String>, schema: Schema, seed: Vec<Record>) -> StoreResult<Self> {
        let key = key.into();

        let (records, seeded) = match slot.load(&key)? {
            Some(payload) => {
                let records: Vec<Record> = serde_json::from_str(&payload).map_err(|err| {
                    StoreError::InvalidData(format!("slot `{key}` payload is not a record array: {err}"))
                })?;
                (records, false)
            }
            None => (seed, true),
        };

        check_identifiers(&key, &schema, &records)?;

        let mut store = Self {
            slot,
            key,
            schema,
            records,
        };
        if seeded {
            store.persist()?;
        }

        info!(
            "event=store_open module=store status=ok key={} records={} source={}",
            store.key,
            store.records.len(),
            if seeded { "seed" } else { "slot" }
        );
        Ok(store)
    }

    /// Collection key this store persists under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Schema the store validates writes against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of records currently in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Runs the query pipeline over a snapshot of the collection.
    ///
    /// Never fails and never mutates the collection; malformed pagination
    /// input is normalized inside the pipeline.
    pub fn list(&self, query: &ListQuery) -> PageResult {
        pipeline::run(&self.records, query)
    }

    /// Returns the record with the given identifier.
    pub fn read(&self, id: &RecordId) -> StoreResult<Record> {
        self.position(id)
            .map(|index| self.records[index].clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Validates `partial`, assigns a fresh identifier, persists, and returns
    /// the stored record.
    pub fn create(&mut self, partial: Record) -> StoreResult<Record> {
        self.schema.validate_create(&partial)?;

        let id = self.next_id();
        let mut record = Record::new();
        record.set(self.schema.id_field().to_string(), id.to_value());
        record.merge(&partial);

        self.records.push(record.clone());
        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }

        debug!(
            "event=record_create module=store status=ok key={} id={id}",
            self.key
        );
        Ok(record)
    }

    /// Shallow-merges `partial` onto the stored record and persists.
    ///
    /// Fields absent from `partial` keep their stored value.
    pub fn update(&mut self, id: &RecordId, partial: &Record) -> StoreResult<Record> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.schema.validate_partial(partial)?;

        let previous = self.records[index].clone();
        self.records[index].merge(partial);
        if let Err(err) = self.persist() {
            self.records[index] = previous;
            return Err(err);
        }

        debug!(
            "event=record_update module=store status=ok key={} id={id}",
            self.key
        );
        Ok(self.records[index].clone())
    }

    /// Removes the record with the given identifier and persists.
    pub fn delete(&mut self, id: &RecordId) -> StoreResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let removed = self.records.remove(index);
        if let Err(err) = self.persist() {
            self.records.insert(index, removed);
            return Err(err);
        }

        debug!(
            "event=record_delete module=store status=ok key={} id={id}",
            self.key
        );
        Ok(())
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        let id_field = self.schema.id_field();
        self.records
            .iter()
            .position(|record| record.id(id_field).as_ref() == Some(id))
    }

    fn next_id(&self) -> RecordId {
        match self.schema.id_kind() {
            IdKind::Serial => {
                let max = self
                    .records
                    .iter()
                    .filter_map(|record| record.id(self.schema.id_field()))
                    .filter_map(|id| match id {
                        RecordId::Int(n) => Some(n),
                        RecordId::Str(_) => None,
                    })
                    .max()
                    .unwrap_or(0);
                RecordId::Int(max + 1)
            }
            IdKind::Uuid => loop {
                let candidate = RecordId::Str(Uuid::new_v4().to_string());
                if self.position(&candidate).is_none() {
                    break candidate;
                }
            },
        }
    }

    /// Serializes and writes the whole collection to the slot.
    fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.records).map_err(|err| {
            StoreError::InvalidData(format!(
                "collection `{}` cannot be serialized: {err}",
                self.key
            ))
        })?;
        self.slot.save(&self.key, &payload)?;
        Ok(())
    }
}

fn check_identifiers(key: &str, schema: &Schema, records: &[Record]) -> StoreResult<()> {
    let id_field = schema.id_field();
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let id = record.id(id_field).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "record {index} in `{key}` has no `{id_field}` identifier"
            ))
        })?;
        if !seen.insert(id.clone()) {
            return Err(StoreError::InvalidData(format!(
                "duplicate identifier `{id}` in `{key}`"
            )));
        }
    }
    Ok(())
}

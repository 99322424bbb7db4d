//! Append-only in-memory store of captured records.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, Field, Level};

/// One captured log call: the entry plus its merged field context.
///
/// Fields are ordered: the writing adapter's accumulated context first,
/// then the call-site fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The entry as the facade constructed it.
    pub entry: Entry,

    /// Merged structured context.
    pub fields: Vec<Field>,
}

/// Ordered collection of every record a capture session has accepted.
///
/// The store is append-only; record order is the order in which appends
/// completed. All reads return independent snapshots, so holding or
/// mutating a returned `Vec` never affects the store or other snapshots.
#[derive(Default)]
pub struct RecordStore {
    records: RwLock<Vec<Record>>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Appends from any number of threads serialize on
    /// the write lock; completion order defines store order.
    pub(crate) fn add(&self, record: Record) {
        self.records.write().push(record);
    }

    /// Snapshot of all records in store order.
    pub fn records(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Snapshot of the records whose severity equals `level`, preserving
    /// relative store order.
    pub fn records_by_level(&self, level: Level) -> Vec<Record> {
        self.records
            .read()
            .iter()
            .filter(|record| record.entry.level == level)
            .cloned()
            .collect()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

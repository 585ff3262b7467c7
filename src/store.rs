//! In-memory record store, replaced wholesale on each feed refresh

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::models::LogRecord;

/// A consistent view of the store at one point in time.
///
/// The generation ties memoized derived values to the snapshot they
/// were computed from; a replacement bumps it, so cached results for an
/// older snapshot can never be served against a newer one.
#[derive(Debug)]
pub struct StoreSnapshot {
    pub generation: u64,
    pub records: Vec<LogRecord>,
}

/// Holds the raw record collection.
///
/// Records are populated in bulk, never mutated in place, and discarded
/// only when the store is replaced wholesale. Readers take lock-free
/// snapshots; the single writer is the feed refresh task.
pub struct RecordStore {
    current: ArcSwap<StoreSnapshot>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(StoreSnapshot {
                generation: 0,
                records: Vec::new(),
            }),
        }
    }

    /// Replace the whole collection, bumping the generation
    pub fn replace(&self, records: Vec<LogRecord>) {
        let generation = self.current.load().generation + 1;
        self.current.store(Arc::new(StoreSnapshot {
            generation,
            records,
        }));
    }

    /// Current `(generation, records)` snapshot
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.current.load_full()
    }

    pub fn len(&self) -> usize {
        self.current.load().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Table manager combining the record store with the key index.
//!
//! Writes touch the store first and the index second, always inside a single
//! method so no caller sees one structure updated without the other. Reads
//! resolve key to position through the index, then position to record through
//! the store, and finally drop tombstoned records.

use crate::index::{BstIndex, TraversalOrder};
use crate::store::RecordStore;
use recdb_common::{Position, RecDbError, Record, Result, TableConfig};
use tracing::{debug, warn};

/// A single table: one record store and one index kept in agreement.
///
/// Every indexed key maps to exactly one live record at the indexed position,
/// and every live record in the store has exactly one index entry.
#[derive(Debug)]
pub struct Table {
    store: RecordStore,
    index: BstIndex,
    config: TableConfig,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty table with default configuration.
    pub fn new() -> Self {
        Self::build(TableConfig::default())
    }

    /// Creates an empty table after validating `config`.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TableConfig) -> Self {
        Self {
            store: RecordStore::with_capacity(
                config.initial_capacity,
                config.clear_tombstoned_payload,
            ),
            index: BstIndex::with_capacity(config.initial_capacity),
            config,
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Appends a record and indexes it.
    ///
    /// The key is checked before the append, so a duplicate leaves both the
    /// store and the index untouched.
    pub fn insert(&mut self, record: Record) -> Result<Position> {
        if record.is_tombstoned() {
            return Err(RecDbError::InvalidParameter {
                name: "record".to_string(),
                value: "tombstoned".to_string(),
            });
        }
        if self.index.contains(record.key()) {
            warn!(key = record.key(), "duplicate key, insert rejected");
            return Err(RecDbError::DuplicateKey(record.key().to_string()));
        }

        let position = self.store.append(record.clone());
        self.index.insert(record, position)?;
        debug!(%position, "table insert");
        Ok(position)
    }

    /// Tombstones the record with `key` and removes it from the index.
    pub fn delete_by_key(&mut self, key: &str) -> Result<()> {
        let position = self
            .index
            .search(key)
            .map(|entry| entry.position())
            .ok_or_else(|| RecDbError::KeyNotFound(key.to_string()))?;

        self.tombstone_indexed(key, position)?;
        self.index.remove(key);
        debug!(key, %position, "table delete");
        Ok(())
    }

    /// Deletes every live record. Store slots remain as tombstones.
    pub fn clear(&mut self) -> Result<()> {
        let indexed: Vec<(String, Position)> = self
            .index
            .entries_in_order()
            .into_iter()
            .map(|entry| (entry.record().key().to_string(), entry.position()))
            .collect();
        for (key, position) in indexed {
            self.tombstone_indexed(&key, position)?;
        }
        self.index.destroy();
        debug!(slots = self.store.len(), "table cleared");
        Ok(())
    }

    /// Tombstones the slot an index entry points at. A bad position means the
    /// index and store have diverged.
    fn tombstone_indexed(&mut self, key: &str, position: Position) -> Result<()> {
        self.store.tombstone(position).map_err(|e| {
            RecDbError::IndexCorrupted(format!("key {:?} indexed at {}: {}", key, position, e))
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the live record stored under `key`.
    pub fn lookup_by_key(&self, key: &str) -> Option<&Record> {
        let entry = self.index.search(key)?;
        self.store
            .get(entry.position())
            .filter(|record| !record.is_tombstoned())
    }

    /// All live records in ascending key order.
    pub fn materialize_sorted(&self) -> Vec<&Record> {
        self.index
            .positions_in_order()
            .into_iter()
            .filter_map(|position| self.store.get(position))
            .collect()
    }

    /// Index traversal for diagnostics and reporting.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<&Record> {
        self.index.traverse(order)
    }

    /// Number of live records.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[inline]
    pub fn index(&self) -> &BstIndex {
        &self.index
    }

    #[inline]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Deep copy of the current index.
    pub fn snapshot_index(&self) -> BstIndex {
        self.index.clone()
    }

    /// Verifies the index invariants and store/index agreement.
    pub fn check_consistency(&self) -> Result<()> {
        self.index.check_invariants()?;

        for entry in self.index.entries_in_order() {
            let key = entry.record().key();
            match self.store.get(entry.position()) {
                Some(stored) if !stored.is_tombstoned() && stored.key() == key => {}
                _ => {
                    return Err(RecDbError::IndexCorrupted(format!(
                        "key {:?} points at {} which is not its live record",
                        key,
                        entry.position()
                    )));
                }
            }
        }

        let live = self.store.live_count();
        if live != self.index.len() {
            return Err(RecDbError::IndexCorrupted(format!(
                "{} live records but {} index entries",
                live,
                self.index.len()
            )));
        }
        Ok(())
    }
}

//! Thread-safe handle over a [`Table`].

use crate::index::{BstIndex, TraversalOrder};
use crate::table::Table;
use parking_lot::RwLock;
use recdb_common::{Position, Record, Result, TableConfig};
use std::sync::Arc;

/// Cloneable handle sharing one table between threads.
///
/// Each insert or delete holds the write lock for both the store and the
/// index step, so readers never see a tombstoned slot that is still indexed.
/// Reads return owned copies and release the lock before returning.
#[derive(Debug, Clone, Default)]
pub struct SharedTable {
    inner: Arc<RwLock<Table>>,
}

impl SharedTable {
    /// Wraps an existing table.
    pub fn new(table: Table) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Creates an empty shared table after validating `config`.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self::new(Table::with_config(config)?))
    }

    pub fn insert(&self, record: Record) -> Result<Position> {
        self.inner.write().insert(record)
    }

    pub fn delete_by_key(&self, key: &str) -> Result<()> {
        self.inner.write().delete_by_key(key)
    }

    pub fn lookup_by_key(&self, key: &str) -> Option<Record> {
        self.inner.read().lookup_by_key(key).cloned()
    }

    pub fn materialize_sorted(&self) -> Vec<Record> {
        self.inner
            .read()
            .materialize_sorted()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn traverse(&self, order: TraversalOrder) -> Vec<Record> {
        self.inner.read().traverse(order).into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn snapshot_index(&self) -> BstIndex {
        self.inner.read().snapshot_index()
    }

    pub fn check_consistency(&self) -> Result<()> {
        self.inner.read().check_consistency()
    }

    /// Runs `f` with shared access to the table.
    pub fn with_read<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        f(&self.inner.read())
    }
}

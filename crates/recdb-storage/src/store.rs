//! Append-only in-memory record store.

use recdb_common::{Position, RecDbError, Record, Result};
use tracing::{debug, warn};

/// Append-only record storage.
///
/// All records live in RAM in a Vec. Positions map directly to Vec indices.
/// Slots are never removed or reused; deletion only tombstones in place.
#[derive(Debug)]
pub struct RecordStore {
    /// Records stored by position (index = position).
    records: Vec<Record>,
    /// Wipe payload fields on tombstone.
    clear_on_tombstone: bool,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates a new empty store that clears payload on tombstone.
    pub fn new() -> Self {
        Self::with_capacity(0, true)
    }

    /// Creates an empty store with reserved slots.
    pub fn with_capacity(capacity: usize, clear_on_tombstone: bool) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            clear_on_tombstone,
        }
    }

    /// Appends a record and returns its permanent position.
    #[inline]
    pub fn append(&mut self, record: Record) -> Position {
        let position = Position(self.records.len());
        self.records.push(record);
        position
    }

    /// Gets the record at a position, live or tombstoned.
    #[inline]
    pub fn get(&self, position: Position) -> Option<&Record> {
        self.records.get(position.as_usize())
    }

    /// Tombstones the record at `position`.
    ///
    /// Tombstoning an already deleted slot is a no-op. Out-of-range positions
    /// return `InvalidPosition`.
    pub fn tombstone(&mut self, position: Position) -> Result<()> {
        let len = self.records.len();
        let clear = self.clear_on_tombstone;
        match self.records.get_mut(position.as_usize()) {
            Some(record) if record.is_tombstoned() => Ok(()),
            Some(record) => {
                record.tombstone(clear);
                debug!(%position, "tombstoned record");
                Ok(())
            }
            None => {
                warn!(%position, len, "tombstone past end of store");
                Err(RecDbError::InvalidPosition {
                    position: position.as_usize(),
                    len,
                })
            }
        }
    }

    /// Number of slots ever appended, including tombstoned ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of slots that are not tombstoned.
    pub fn live_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_tombstoned()).count()
    }

    /// Iterates all slots in position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (Position(i), record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(key: &str) -> Record {
        Record::new(key, format!("name {}", key), NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
    }

    #[test]
    fn test_append_assigns_sequential_positions() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.append(record("a")), Position(0));
        assert_eq!(store.append(record("b")), Position(1));
        assert_eq!(store.append(record("c")), Position(2));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_in_and_out_of_range() {
        let mut store = RecordStore::new();
        let pos = store.append(record("a"));
        assert_eq!(store.get(pos).unwrap().key(), "a");
        assert!(store.get(Position(1)).is_none());
        assert!(store.get(Position(usize::MAX)).is_none());
    }

    #[test]
    fn test_tombstone_keeps_slot() {
        let mut store = RecordStore::new();
        let p0 = store.append(record("a"));
        let p1 = store.append(record("b"));

        store.tombstone(p0).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.live_count(), 1);
        let dead = store.get(p0).unwrap();
        assert!(dead.is_tombstoned());
        assert_eq!(dead.key(), "");
        assert_eq!(dead.birth_date(), None);
        assert_eq!(store.get(p1).unwrap().key(), "b");

        // Positions are not reused after a tombstone
        assert_eq!(store.append(record("c")), Position(2));
    }

    #[test]
    fn test_tombstone_without_clearing() {
        let mut store = RecordStore::with_capacity(4, false);
        let pos = store.append(record("a"));
        store.tombstone(pos).unwrap();
        let dead = store.get(pos).unwrap();
        assert!(dead.is_tombstoned());
        assert_eq!(dead.key(), "a");
    }

    #[test]
    fn test_tombstone_invalid_position() {
        let mut store = RecordStore::new();
        store.append(record("a"));
        let result = store.tombstone(Position(5));
        assert!(matches!(
            result,
            Err(RecDbError::InvalidPosition { position: 5, len: 1 })
        ));
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_tombstone_twice_is_idempotent() {
        let mut store = RecordStore::new();
        let pos = store.append(record("a"));
        store.tombstone(pos).unwrap();
        store.tombstone(pos).unwrap();
        assert!(store.get(pos).unwrap().is_tombstoned());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_iter_in_position_order() {
        let mut store = RecordStore::new();
        for key in ["c", "a", "b"] {
            store.append(record(key));
        }
        store.tombstone(Position(1)).unwrap();

        let dump: Vec<(usize, bool)> = store
            .iter()
            .map(|(pos, rec)| (pos.as_usize(), rec.is_tombstoned()))
            .collect();
        assert_eq!(dump, vec![(0, false), (1, true), (2, false)]);
    }
}

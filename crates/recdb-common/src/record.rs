//! Record and position types shared by the store and the index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Permanent address of a record inside the record store.
///
/// Positions are assigned at append time, start at zero, and are never
/// reused or renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position(pub usize);

impl Position {
    /// Creates a new position.
    pub const fn new(pos: usize) -> Self {
        Self(pos)
    }

    /// Returns the position as a slot index.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single row of the table.
///
/// `key` orders records byte-wise. `birth_date` is `Some` for every live
/// record and only becomes `None` when a tombstone clears the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    key: String,
    name: String,
    birth_date: Option<NaiveDate>,
    tombstoned: bool,
}

impl Record {
    /// Creates a live record.
    pub fn new(key: impl Into<String>, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            birth_date: Some(birth_date),
            tombstoned: false,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Returns true once the record has been logically deleted.
    #[inline]
    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned
    }

    /// Marks the record deleted. With `clear_payload` the key, name, and
    /// birth date are wiped and cannot be recovered.
    ///
    /// There is no inverse operation.
    pub fn tombstone(&mut self, clear_payload: bool) {
        if clear_payload {
            self.key.clear();
            self.name.clear();
            self.birth_date = None;
        }
        self.tombstoned = true;
    }
}

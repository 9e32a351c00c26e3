//! Storage engine for RecDB.
//!
//! This crate provides:
//! - RecordStore: append-only, position-addressed record storage
//! - BstIndex: binary search tree index mapping keys to store positions
//! - Table: store and index composed into one consistent table
//! - SharedTable: reader/writer locked handle for multi-threaded callers

mod index;
mod shared;
mod store;
mod table;

pub use index::{BstIndex, IndexEntry, TraversalOrder};
pub use recdb_common::{Position, RecDbError, Record, Result, TableConfig};
pub use shared::SharedTable;
pub use store::RecordStore;
pub use table::Table;

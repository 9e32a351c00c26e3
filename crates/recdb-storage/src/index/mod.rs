//! Binary search tree index over record keys.
//!
//! The index maps each live key to the position of its record in the
//! [`RecordStore`](crate::RecordStore). Nodes live in a slot arena rather than
//! in individually boxed links:
//!
//! ```text
//! root ─► slot 0 [key "B", pos #0]
//!           left  ─► slot 1 [key "A", pos #1]
//!           right ─► slot 2 [key "D", pos #2]
//!                      left ─► slot 3 [key "C", pos #3]
//! ```
//!
//! - Lookup, insert and remove are O(height). The tree is never rebalanced,
//!   so sorted input degrades it to a list; all walks are iterative.
//! - Removing a node with two children moves its in-order successor's
//!   payload into the node and unlinks the successor.
//! - `destroy` clears the arena in one step. `Clone` builds a compacted,
//!   fully independent copy.

mod arena;
mod bst;
mod traversal;

pub use bst::{BstIndex, IndexEntry};
pub use traversal::TraversalOrder;

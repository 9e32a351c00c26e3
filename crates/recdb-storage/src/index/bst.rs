//! Arena-backed binary search tree keyed by record key.

use super::arena::{Node, NodeArena, NodeId};
use recdb_common::{Position, RecDbError, Record, Result};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Which child link of a parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Borrowed view of an index node returned by [`BstIndex::search`].
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry<'a> {
    record: &'a Record,
    position: Position,
}

impl<'a> IndexEntry<'a> {
    /// Record snapshot held by the index.
    #[inline]
    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Position of the full record in the store.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Unbalanced binary search tree mapping keys to store positions.
///
/// Keys are unique. Every tree walk is iterative, so a degenerate tree built
/// from sorted input cannot exhaust the call stack.
#[derive(Debug, Default)]
pub struct BstIndex {
    /// Node storage.
    pub(crate) arena: NodeArena,
    /// Root node handle.
    pub(crate) root: Option<NodeId>,
}

impl BstIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            root: None,
        }
    }

    /// Builds an index from `(record, position)` pairs in the given order.
    /// Pairs whose key is already present are skipped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Record, Position)>,
    {
        let mut index = Self::new();
        for (record, position) in entries {
            // Duplicate keys are logged by insert and dropped here.
            let _ = index.insert(record, position);
        }
        index
    }

    /// Number of keys in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // =========================================================================
    // Insert / Search
    // =========================================================================

    /// Inserts a record snapshot at `position`.
    ///
    /// Returns `DuplicateKey` and leaves the tree untouched if the key exists.
    pub fn insert(&mut self, record: Record, position: Position) -> Result<()> {
        let Some(mut current) = self.root else {
            debug!(key = record.key(), %position, "index root created");
            self.root = Some(self.arena.allocate(Node::leaf(record, position)));
            return Ok(());
        };

        loop {
            let node = &self.arena[current];
            let (left, right) = (node.left, node.right);
            match record.key().cmp(node.record.key()) {
                Ordering::Less => match left {
                    Some(next) => current = next,
                    None => {
                        debug!(key = record.key(), %position, "index insert");
                        let id = self.arena.allocate(Node::leaf(record, position));
                        self.arena[current].left = Some(id);
                        return Ok(());
                    }
                },
                Ordering::Greater => match right {
                    Some(next) => current = next,
                    None => {
                        debug!(key = record.key(), %position, "index insert");
                        let id = self.arena.allocate(Node::leaf(record, position));
                        self.arena[current].right = Some(id);
                        return Ok(());
                    }
                },
                Ordering::Equal => {
                    warn!(key = record.key(), "key already indexed, insert rejected");
                    return Err(RecDbError::DuplicateKey(record.key().to_string()));
                }
            }
        }
    }

    /// Looks up a key.
    pub fn search(&self, key: &str) -> Option<IndexEntry<'_>> {
        self.find(key).map(|(id, _)| {
            let node = &self.arena[id];
            IndexEntry {
                record: &node.record,
                position: node.position,
            }
        })
    }

    /// Returns true if the key is indexed.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Smallest key's entry.
    pub fn min(&self) -> Option<IndexEntry<'_>> {
        self.root.map(|root| self.entry(self.leftmost(root)))
    }

    /// Largest key's entry.
    pub fn max(&self) -> Option<IndexEntry<'_>> {
        self.root.map(|root| {
            let mut id = root;
            while let Some(right) = self.arena[id].right {
                id = right;
            }
            self.entry(id)
        })
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty tree).
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        max_depth
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Removes a key. Returns false if it was not indexed.
    ///
    /// A node with two children takes over the payload of its in-order
    /// successor, which is then unlinked from the right subtree.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some((target, parent)) = self.find(key) else {
            return false;
        };

        let (left, right) = (self.arena[target].left, self.arena[target].right);
        match (left, right) {
            (Some(_), Some(right)) => {
                let mut succ_link = (target, Side::Right);
                let mut succ = right;
                while let Some(next) = self.arena[succ].left {
                    succ_link = (succ, Side::Left);
                    succ = next;
                }
                // Successor has no left child.
                let succ_right = self.arena[succ].right;
                self.set_link(Some(succ_link), succ_right);
                let promoted = self.arena.free(succ);

                let node = &mut self.arena[target];
                node.record = promoted.record;
                node.position = promoted.position;
            }
            (child, None) | (None, child) => {
                self.set_link(parent, child);
                self.arena.free(target);
            }
        }

        debug!(key, "index remove");
        true
    }

    /// Drops the whole tree.
    pub fn destroy(&mut self) {
        debug!(nodes = self.arena.len(), "index destroyed");
        self.arena.clear();
        self.root = None;
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verifies ordering, reachability, and the absence of shared links.
    pub fn check_invariants(&self) -> Result<()> {
        let mut visited = 0usize;
        let mut stack: Vec<(NodeId, Option<&str>, Option<&str>)> =
            self.root.map(|r| (r, None, None)).into_iter().collect();

        while let Some((id, lower, upper)) = stack.pop() {
            visited += 1;
            if visited > self.arena.len() {
                return Err(RecDbError::IndexCorrupted(
                    "node reachable through more than one link".to_string(),
                ));
            }

            let node = &self.arena[id];
            let key = node.record.key();
            if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
                return Err(RecDbError::IndexCorrupted(format!(
                    "key {:?} violates bounds ({:?}, {:?})",
                    key, lower, upper
                )));
            }
            stack.extend(node.left.map(|l| (l, lower, Some(key))));
            stack.extend(node.right.map(|r| (r, Some(key), upper)));
        }

        if visited != self.arena.len() {
            return Err(RecDbError::IndexCorrupted(format!(
                "{} nodes allocated but {} reachable",
                self.arena.len(),
                visited
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Finds a key's node and the link it hangs from (None for the root).
    fn find(&self, key: &str) -> Option<(NodeId, Option<(NodeId, Side)>)> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            match key.cmp(node.record.key()) {
                Ordering::Equal => return Some((id, parent)),
                Ordering::Less => {
                    parent = Some((id, Side::Left));
                    current = node.left;
                }
                Ordering::Greater => {
                    parent = Some((id, Side::Right));
                    current = node.right;
                }
            }
        }
        None
    }

    /// Points `link` (or the root, when `None`) at `child`.
    fn set_link(&mut self, link: Option<(NodeId, Side)>, child: Option<NodeId>) {
        match link {
            None => self.root = child,
            Some((parent, Side::Left)) => self.arena[parent].left = child,
            Some((parent, Side::Right)) => self.arena[parent].right = child,
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn entry(&self, id: NodeId) -> IndexEntry<'_> {
        let node = &self.arena[id];
        IndexEntry {
            record: &node.record,
            position: node.position,
        }
    }
}

impl Clone for BstIndex {
    /// Copies the tree into a fresh, compacted arena. No node is shared with
    /// the source.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.arena.len());
        let mut stack: Vec<(NodeId, Option<(NodeId, Side)>)> =
            self.root.map(|r| (r, None)).into_iter().collect();

        while let Some((id, link)) = stack.pop() {
            let node = &self.arena[id];
            let new_id = copy
                .arena
                .allocate(Node::leaf(node.record.clone(), node.position));
            copy.set_link(link, Some(new_id));
            stack.extend(node.right.map(|r| (r, Some((new_id, Side::Right)))));
            stack.extend(node.left.map(|l| (l, Some((new_id, Side::Left)))));
        }
        copy
    }
}

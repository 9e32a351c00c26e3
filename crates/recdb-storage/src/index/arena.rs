//! Slot arena for binary search tree nodes.

use recdb_common::{Position, Record};
use std::ops::{Index, IndexMut};

/// Handle to a node slot inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Tree node: a record snapshot, its store position, and child links.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) record: Record,
    pub(crate) position: Position,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Node {
    /// Creates a node with no children.
    pub(crate) fn leaf(record: Record, position: Position) -> Self {
        Self {
            record,
            position,
            left: None,
            right: None,
        }
    }
}

/// Vec-backed node storage.
///
/// Freed slots are recycled through a free list. Dropping or clearing the
/// arena releases every node at once without walking the tree.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    /// Node slots, `None` when free.
    slots: Vec<Option<Node>>,
    /// Free slot handles for reuse.
    free_list: Vec<NodeId>,
    /// Number of occupied slots.
    live: usize,
}

impl NodeArena {
    /// Creates an arena with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Stores a node and returns its handle.
    pub(crate) fn allocate(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(id) = self.free_list.pop() {
            self.slots[id.0] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len());
            self.slots.push(Some(node));
            id
        }
    }

    /// Frees a slot and hands back the node it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Node {
        let node = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("double free of node slot {}", id.0));
        self.live -= 1;
        self.free_list.push(id);
        node
    }

    /// Drops all nodes.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.live = 0;
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("access to freed node slot {}", id.0))
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("access to freed node slot {}", id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn node(key: &str, pos: usize) -> Node {
        let date = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        Node::leaf(Record::new(key, "", date), Position(pos))
    }

    #[test]
    fn test_allocate_and_index() {
        let mut arena = NodeArena::with_capacity(4);
        let a = arena.allocate(node("a", 0));
        let b = arena.allocate(node("b", 1));
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a].record.key(), "a");
        assert_eq!(arena[b].position, Position(1));
    }

    #[test]
    fn test_free_recycles_slot() {
        let mut arena = NodeArena::default();
        let a = arena.allocate(node("a", 0));
        arena.allocate(node("b", 1));

        let freed = arena.free(a);
        assert_eq!(freed.record.key(), "a");
        assert_eq!(arena.len(), 1);

        let c = arena.allocate(node("c", 2));
        assert_eq!(c, a);
        assert_eq!(arena[c].record.key(), "c");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::default();
        for i in 0..10 {
            arena.allocate(node(&i.to_string(), i));
        }
        arena.clear();
        assert_eq!(arena.len(), 0);
        let id = arena.allocate(node("x", 0));
        assert_eq!(id, NodeId(0));
    }

    #[test]
    #[should_panic(expected = "freed node slot")]
    fn test_access_freed_slot_panics() {
        let mut arena = NodeArena::default();
        let a = arena.allocate(node("a", 0));
        arena.free(a);
        let _ = &arena[a];
    }
}

//! Tree traversals.
//!
//! All walks use an explicit stack or queue and leave the tree unchanged.

use super::arena::NodeId;
use super::bst::{BstIndex, IndexEntry};
use recdb_common::{Position, Record};
use std::collections::VecDeque;
use tracing::trace;

/// Node visitation order for [`BstIndex::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, node, right subtree. Ascending key order.
    InOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
    /// Level by level from the root, left to right within a level.
    BreadthFirst,
}

impl TraversalOrder {
    pub const ALL: [TraversalOrder; 4] = [
        TraversalOrder::PreOrder,
        TraversalOrder::InOrder,
        TraversalOrder::PostOrder,
        TraversalOrder::BreadthFirst,
    ];
}

impl BstIndex {
    /// Record snapshots in the requested order.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<&Record> {
        trace!(?order, nodes = self.len(), "index traversal");
        let ids = match order {
            TraversalOrder::PreOrder => self.pre_order_ids(),
            TraversalOrder::InOrder => self.in_order_ids(),
            TraversalOrder::PostOrder => self.post_order_ids(),
            TraversalOrder::BreadthFirst => self.breadth_first_ids(),
        };
        ids.into_iter().map(|id| &self.arena[id].record).collect()
    }

    pub fn pre_order(&self) -> Vec<&Record> {
        self.traverse(TraversalOrder::PreOrder)
    }

    /// Sorted view of the index.
    pub fn in_order(&self) -> Vec<&Record> {
        self.traverse(TraversalOrder::InOrder)
    }

    pub fn post_order(&self) -> Vec<&Record> {
        self.traverse(TraversalOrder::PostOrder)
    }

    pub fn breadth_first(&self) -> Vec<&Record> {
        self.traverse(TraversalOrder::BreadthFirst)
    }

    /// Index entries in ascending key order.
    pub fn entries_in_order(&self) -> Vec<IndexEntry<'_>> {
        self.in_order_ids()
            .into_iter()
            .map(|id| self.entry(id))
            .collect()
    }

    /// Store positions in ascending key order.
    pub fn positions_in_order(&self) -> Vec<Position> {
        self.in_order_ids()
            .into_iter()
            .map(|id| self.arena[id].position)
            .collect()
    }

    fn pre_order_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.arena[id];
            // Right first so left is popped first.
            stack.extend(node.right);
            stack.extend(node.left);
        }
        out
    }

    fn in_order_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.arena[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            out.push(id);
            current = self.arena[id].right;
        }
        out
    }

    fn post_order_ids(&self) -> Vec<NodeId> {
        // Node-right-left pre-order, reversed.
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.arena[id];
            stack.extend(node.left);
            stack.extend(node.right);
        }
        out.reverse();
        out
    }

    fn breadth_first_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            out.push(id);
            let node = &self.arena[id];
            queue.extend(node.left);
            queue.extend(node.right);
        }
        out
    }
}

//! In-memory node layout.
//!
//! A node is either a leaf (sorted keys plus leaf-chain links) or an internal
//! node (sorted separators plus owned child handles). All links are
//! [`NodeId`]s into the tree's arena; only the `children` list expresses
//! ownership.

use crate::common::NodeId;

/// Variant-specific node data.
#[derive(Debug)]
pub(crate) enum NodeKind {
    /// Leaf with navigation links to its chain neighbours.
    Leaf {
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },

    /// Internal node; `children.len() == keys.len() + 1`.
    Internal { children: Vec<NodeId> },
}

/// A single B+ tree node.
///
/// `children[i]` covers every key `k` with `keys[i - 1] <= k < keys[i]`,
/// with open ends at both sides.
#[derive(Debug)]
pub(crate) struct Node<K> {
    /// Strictly increasing keys (leaf) or separators (internal).
    pub(crate) keys: Vec<K>,

    /// Non-owning back-reference. `None` only for the current root.
    pub(crate) parent: Option<NodeId>,

    pub(crate) kind: NodeKind,
}

impl<K: Ord> Node<K> {
    /// Create an empty root leaf.
    pub(crate) fn empty_leaf() -> Self {
        Self {
            keys: Vec::new(),
            parent: None,
            kind: NodeKind::Leaf {
                prev: None,
                next: None,
            },
        }
    }

    pub(crate) fn leaf(
        keys: Vec<K>,
        parent: Option<NodeId>,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    ) -> Self {
        Self {
            keys,
            parent,
            kind: NodeKind::Leaf { prev, next },
        }
    }

    pub(crate) fn internal(keys: Vec<K>, children: Vec<NodeId>, parent: Option<NodeId>) -> Self {
        assert_eq!(
            children.len(),
            keys.len() + 1,
            "internal node needs exactly one more child than keys"
        );
        Self {
            keys,
            parent,
            kind: NodeKind::Internal { children },
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Index of the child that covers `key`.
    ///
    /// This is the first separator strictly greater than `key`, so a key
    /// equal to a separator routes to the right-hand child.
    #[inline]
    pub(crate) fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|sep| sep <= key)
    }

    /// Child handles of an internal node; empty for a leaf.
    #[inline]
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        match &mut self.kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf { .. } => panic!("children_mut called on a leaf"),
        }
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Leaf { next, .. } => next,
            NodeKind::Internal { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn prev(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Leaf { prev, .. } => prev,
            NodeKind::Internal { .. } => None,
        }
    }

    pub(crate) fn set_next(&mut self, id: Option<NodeId>) {
        match &mut self.kind {
            NodeKind::Leaf { next, .. } => *next = id,
            NodeKind::Internal { .. } => panic!("set_next called on an internal node"),
        }
    }

    pub(crate) fn set_prev(&mut self, id: Option<NodeId>) {
        match &mut self.kind {
            NodeKind::Leaf { prev, .. } => *prev = id,
            NodeKind::Internal { .. } => panic!("set_prev called on an internal node"),
        }
    }
}

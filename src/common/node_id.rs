//! Node identifier type.

use std::fmt;

/// Identifies a node slot in the tree's arena.
///
/// Using `usize` because nodes are stored in a `Vec` and the id indexes it
/// directly. Parent and leaf-chain links are plain `NodeId`s, so they never
/// own the node they point at.
///
/// # Example
/// ```
/// use bplustree::NodeId;
///
/// let id = NodeId::new(3);
/// assert_eq!(id.0, 3);
/// assert_eq!(id.to_string(), "Node(3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_new() {
        let id = NodeId::new(10);
        assert_eq!(id.0, 10);
    }

    #[test]
    fn test_node_id_equality() {
        assert_eq!(NodeId::new(5), NodeId::new(5));
        assert_ne!(NodeId::new(5), NodeId::new(6));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(42)), "Node(42)");
    }
}

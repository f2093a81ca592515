//! Structural invariant checker.
//!
//! Walks the whole tree and reports the first broken invariant. Used by the
//! test suites after every mutation; cheap enough for debugging, too slow
//! for hot paths.

use crate::common::{Error, NodeId, Result};
use crate::index::btree::tree::BPlusTree;

/// State accumulated during the walk.
#[derive(Default)]
struct Walk {
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    nodes: usize,
    keys: usize,
}

fn violation(msg: String) -> Error {
    Error::InvariantViolation(msg)
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks key ordering, separator bounds, child counts, parent links,
    /// occupancy bounds, uniform leaf depth, leaf-chain integrity, arena
    /// leaks and the cached length.
    ///
    /// # Errors
    /// Returns [`Error::InvariantViolation`] describing the first problem
    /// found.
    pub fn check_invariants(&self) -> Result<()> {
        if !self.arena.contains(self.root) {
            return Err(violation(format!("root {} is not allocated", self.root)));
        }
        if self.arena.get(self.root).parent.is_some() {
            return Err(violation(format!("root {} has a parent", self.root)));
        }

        let mut walk = Walk::default();
        self.check_node(self.root, None, None, 1, &mut walk)?;
        self.check_leaf_chain(&walk.leaves)?;

        if walk.nodes != self.arena.live_count() {
            return Err(violation(format!(
                "{} nodes reachable but {} allocated",
                walk.nodes,
                self.arena.live_count()
            )));
        }
        if walk.keys != self.len {
            return Err(violation(format!(
                "{} keys in leaves but len() is {}",
                walk.keys, self.len
            )));
        }
        Ok(())
    }

    fn check_node(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<()> {
        if !self.arena.contains(id) {
            return Err(violation(format!("{} is not allocated", id)));
        }
        let node = self.arena.get(id);
        walk.nodes += 1;

        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(violation(format!("{} keys are not strictly increasing", id)));
        }
        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first < lower {
                return Err(violation(format!("{} holds a key below its lower bound", id)));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.keys.last()) {
            if last >= upper {
                return Err(violation(format!("{} holds a key at or above its upper bound", id)));
            }
        }

        let threshold = self.config.threshold();
        if node.keys.len() > threshold {
            return Err(violation(format!(
                "{} holds {} keys, threshold is {}",
                id,
                node.keys.len(),
                threshold
            )));
        }
        if !node.is_root() {
            let min = if node.is_leaf() {
                self.config.min_leaf_keys()
            } else {
                self.config.min_internal_keys()
            };
            if node.keys.len() < min {
                return Err(violation(format!(
                    "{} holds {} keys, minimum is {}",
                    id,
                    node.keys.len(),
                    min
                )));
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(violation(format!(
                        "leaf {} at depth {}, expected {}",
                        id, depth, expected
                    )));
                }
                Some(_) => {}
            }
            walk.leaves.push(id);
            walk.keys += node.keys.len();
            return Ok(());
        }

        let children = node.children();
        if children.len() != node.keys.len() + 1 {
            return Err(violation(format!(
                "{} has {} keys but {} children",
                id,
                node.keys.len(),
                children.len()
            )));
        }
        if node.keys.is_empty() {
            return Err(violation(format!("internal {} has no separators", id)));
        }

        for (i, &child) in children.iter().enumerate() {
            if !self.arena.contains(child) {
                return Err(violation(format!("{} points at freed child {}", id, child)));
            }
            if self.arena.get(child).parent != Some(id) {
                return Err(violation(format!("{} does not point back at parent {}", child, id)));
            }
            let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let child_upper = node.keys.get(i).or(upper);
            self.check_node(child, child_lower, child_upper, depth + 1, walk)?;
        }
        Ok(())
    }

    /// The `next`/`prev` links must form one list over exactly the leaves
    /// found by the walk, in the same order.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let (Some(&first), Some(&last)) = (leaves.first(), leaves.last()) else {
            return Err(violation("tree has no leaves".to_string()));
        };
        if self.arena.get(first).prev().is_some() {
            return Err(violation(format!("first leaf {} has a predecessor", first)));
        }
        if self.arena.get(last).next().is_some() {
            return Err(violation(format!("last leaf {} has a successor", last)));
        }
        for pair in leaves.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if self.arena.get(left).next() != Some(right) {
                return Err(violation(format!("{}.next does not point at {}", left, right)));
            }
            if self.arena.get(right).prev() != Some(left) {
                return Err(violation(format!("{}.prev does not point at {}", right, left)));
            }
        }
        Ok(())
    }
}

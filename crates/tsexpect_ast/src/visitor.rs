//! Depth-first traversal over a [`SyntaxTree`].
//!
//! [`Preorder`] walks the whole tree parent-first with an explicit stack, so
//! deeply nested files do not recurse.

use crate::tree::{NodeId, SyntaxTree};

/// Pre-order iterator over every node below (and including) a start node.
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Preorder<'t> {
    pub fn new(tree: &'t SyntaxTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Reverse so the first child is popped next.
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl SyntaxTree {
    /// Walk every node, parent before children, children in source order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self, self.root())
    }
}

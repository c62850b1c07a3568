//! Structural queries over logic trees.
//!
//! All functions here are pure and recompute their answer from scratch. Trees never change
//! after parsing, so callers are free to ask repeatedly during a layout pass.

use crate::node::{Node, NodeKind};

/// Number of nodes in the subtree: `1 + Σ node_count(child)`.
pub fn node_count(node: &Node) -> usize {
    1 + node.children().iter().map(node_count).sum::<usize>()
}

/// Nesting depth as drawn in the schematic.
///
/// A NOT node is collapsed onto its connecting line, so it adds no level on top of its
/// operand. A bare variable counts as one level.
///
/// ```
/// use logic_schema::metrics::structural_height;
/// use logic_schema::node::Node;
///
/// let a = Node::var("A");
/// assert_eq!(structural_height(&a), 1);
/// assert_eq!(structural_height(&Node::not(a.clone())), 1);
/// assert_eq!(structural_height(&Node::and(vec![a, Node::var("B")])), 2);
/// ```
pub fn structural_height(node: &Node) -> usize {
    match node.kind() {
        NodeKind::Not => node.operand().map_or(0, structural_height),
        NodeKind::Var => 1,
        NodeKind::Op => 1 + node.children().iter().map(structural_height).max().unwrap_or(0),
    }
}

/// Plain height of the subtree, every node (NOT included) adds one level.
pub fn depth(node: &Node) -> usize {
    1 + node.children().iter().map(depth).max().unwrap_or(0)
}

/// Number of leaves in the subtree.
pub fn leaf_count(node: &Node) -> usize {
    if node.children().is_empty() {
        1
    } else {
        node.children().iter().map(leaf_count).sum()
    }
}

/// Number of VAR nodes in the subtree.
pub fn var_count(node: &Node) -> usize {
    let own = usize::from(node.is_var());
    own + node.children().iter().map(var_count).sum::<usize>()
}

//! Logic tree data model.
//!
//! A [`LogicTree`] owns an optional root [`Node`]. Nodes own their children, so the tree is
//! acyclic by construction and never changes after parsing.
//!
//! # Shape invariants
//!
//! For trees built from well-formed input:
//! - [`NodeKind::Var`] nodes have no children,
//! - [`NodeKind::Not`] nodes have exactly one child,
//! - [`NodeKind::Op`] nodes have at least two children, in source (left-to-right) order.
//!
//! The lenient parser may produce trees that violate these rules when fed malformed text
//! (for example, `A&` yields an operator with a single operand). Use [`Node::is_well_formed`]
//! to check, or parse in strict mode to reject such input up front.

use std::fmt;

use crate::metrics;

/// Kind of a node in the logic tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Named boolean variable (leaf).
    Var,
    /// Binary operator (`&`, `|`, `^`) applied left-to-right to all children.
    Op,
    /// Negation (`!`).
    Not,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Var => write!(f, "VAR"),
            NodeKind::Op => write!(f, "OP"),
            NodeKind::Not => write!(f, "NOT"),
        }
    }
}

/// Binary operator symbols recognised by the parser.
pub const OPERATORS: [char; 3] = ['&', '|', '^'];

/// Symbol stored in every NOT node.
pub const NOT_SYMBOL: &str = "!";

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    kind: NodeKind,
    value: String,
    children: Vec<Node>,
}

// Constructors
impl Node {
    pub fn var(name: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Var,
            value: name.into(),
            children: Vec::new(),
        }
    }

    pub fn not(child: Node) -> Self {
        Node {
            kind: NodeKind::Not,
            value: NOT_SYMBOL.to_string(),
            children: vec![child],
        }
    }

    pub fn op(symbol: char, children: Vec<Node>) -> Self {
        Node {
            kind: NodeKind::Op,
            value: symbol.to_string(),
            children,
        }
    }

    pub fn and(children: Vec<Node>) -> Self {
        Node::op('&', children)
    }

    pub fn or(children: Vec<Node>) -> Self {
        Node::op('|', children)
    }

    pub fn xor(children: Vec<Node>) -> Self {
        Node::op('^', children)
    }

    /// NOT node with an arbitrary (possibly empty) list of operands.
    ///
    /// Only the lenient parser needs this, to keep the legacy shape of `!` with no operand.
    pub(crate) fn not_with(children: Vec<Node>) -> Self {
        Node {
            kind: NodeKind::Not,
            value: NOT_SYMBOL.to_string(),
            children,
        }
    }
}

// Getters
impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Variable name, or the operator symbol (`&`, `|`, `^`, `!`).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_var(&self) -> bool {
        self.kind == NodeKind::Var
    }

    pub fn is_op(&self) -> bool {
        self.kind == NodeKind::Op
    }

    pub fn is_not(&self) -> bool {
        self.kind == NodeKind::Not
    }

    /// The single operand of a NOT node, if present.
    pub fn operand(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Not => self.children.first(),
            _ => None,
        }
    }

    /// Checks the shape invariants recursively.
    pub fn is_well_formed(&self) -> bool {
        let shape_ok = match self.kind {
            NodeKind::Var => self.children.is_empty() && !self.value.is_empty(),
            NodeKind::Not => self.children.len() == 1,
            NodeKind::Op => self.children.len() >= 2,
        };
        shape_ok && self.children.iter().all(Node::is_well_formed)
    }
}

/// Fully parenthesised infix form, e.g. `(A & !(B | C))`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Var => write!(f, "{}", self.value),
            NodeKind::Not => match self.children.first() {
                Some(child) => write!(f, "!{}", child),
                None => write!(f, "!"),
            },
            NodeKind::Op => {
                write!(f, "(")?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", self.value)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parsed expression: an optional root node.
///
/// The tree is empty exactly when the source text was blank.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LogicTree {
    root: Option<Node>,
}

impl LogicTree {
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes (0 for an empty tree).
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, metrics::node_count)
    }

    /// Plain height of the tree, counting every node as a level.
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, metrics::depth)
    }

    /// Number of leaves.
    pub fn width(&self) -> usize {
        self.root.as_ref().map_or(0, metrics::leaf_count)
    }

    /// Number of variable taps the diagram will have.
    pub fn var_count(&self) -> usize {
        self.root.as_ref().map_or(0, metrics::var_count)
    }
}

impl From<Node> for LogicTree {
    fn from(root: Node) -> Self {
        LogicTree::new(root)
    }
}

impl fmt::Display for LogicTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => write!(f, "<empty>"),
        }
    }
}

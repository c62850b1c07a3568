//! Debug utilities for inspecting logic trees.
//!
//! These are primarily useful in tests, logs and the demo binary.

use std::fmt::Write;

use crate::node::{LogicTree, Node};

/// Renders the tree as an indented listing, one `value (KIND)` per line.
///
/// ```
/// use logic_schema::debug::format_tree;
/// use logic_schema::parser::parse;
///
/// let listing = format_tree(&parse("A & !B"));
/// assert_eq!(listing, "& (OP)\n   ├─ A (VAR)\n   └─ ! (NOT)\n      └─ B (VAR)\n");
/// ```
pub fn format_tree(tree: &LogicTree) -> String {
    let mut out = String::new();
    match tree.root() {
        Some(root) => format_node(&mut out, root, "", true),
        None => out.push_str("(empty tree)\n"),
    }
    out
}

fn format_node(out: &mut String, node: &Node, prefix: &str, is_last: bool) {
    let connector = match (prefix.is_empty(), is_last) {
        (true, _) => "",
        (false, true) => "└─ ",
        (false, false) => "├─ ",
    };
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}{}{} ({})", prefix, connector, node.value(), node.kind());

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let n = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        format_node(out, child, &child_prefix, i + 1 == n);
    }
}

//! Infix boolean expression parser.
//!
//! # Grammar
//!
//! - binary operators: `&` (AND), `|` (OR), `^` (XOR),
//! - prefix `!` (NOT),
//! - parentheses for grouping,
//! - variables: any maximal run of characters that are not operators, parentheses or whitespace.
//!
//! Whitespace is dropped before parsing.
//!
//! # Algorithm
//!
//! Parsing is a recursive descent driven by a scan for operators at parenthesis depth zero,
//! rather than classic precedence climbing:
//!
//! 1. Scan the (sub)expression left to right, recording every binary operator found at depth 0.
//! 2. If there are none, the subexpression is atomic: a `!`-prefixed operand, a parenthesised
//!    group (outer parentheses are stripped), or a variable.
//! 3. Otherwise split at the chosen operator occurrences, producing one n-ary OP node whose
//!    children are the operands in source order.
//!
//! Which occurrences are split points is decided by [`Grouping`]. With [`Grouping::Legacy`]
//! every depth-0 operator is a split point and the node takes the symbol of the first one, so
//! `A&B|C` becomes `&(A, B, C)`. With [`Grouping::Precedence`] only the lowest-precedence
//! operator present splits, giving `|(&(A, B), C)`.
//!
//! # Modes
//!
//! [`ParseMode::Lenient`] never fails: malformed text degrades into a partial tree, the way
//! the legacy tool did. [`ParseMode::Strict`] reports the first problem as a [`ParseError`]
//! carrying a character position in the original input.
//!
//! Recursion is bounded by [`ParseOptions::max_depth`]. Past it, strict mode fails with
//! [`ParseError::TooDeep`] and lenient mode drops the deeper subtree.
//!
//! ```
//! use logic_schema::parser::parse;
//!
//! let tree = parse("!(A | B) & C");
//! assert_eq!(tree.to_string(), "(!(A | B) & C)");
//! ```

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::node::{LogicTree, Node, OPERATORS};

/// Error reported by the strict parser.
///
/// Every position is a 0-based `char` index into the original input (whitespace included).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    /// Opening parenthesis without a matching `)`.
    UnmatchedOpen { position: usize },
    /// Closing parenthesis without a matching `(`.
    UnmatchedClose { position: usize },
    /// Operator or `!` with an empty operand slot next to it.
    MissingOperand { position: usize },
    /// Empty parenthesised group `()`.
    EmptyGroup { position: usize },
    /// Character that cannot appear here, e.g. `(` inside a variable name.
    UnexpectedCharacter { position: usize, found: char },
    /// Subexpression nested deeper than [`ParseOptions::max_depth`].
    TooDeep { position: usize },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match *self {
            ParseError::UnmatchedOpen { position }
            | ParseError::UnmatchedClose { position }
            | ParseError::MissingOperand { position }
            | ParseError::EmptyGroup { position }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::TooDeep { position } => position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnmatchedOpen { position } => {
                write!(f, "unmatched '(' at position {}", position)
            }
            ParseError::UnmatchedClose { position } => {
                write!(f, "unmatched ')' at position {}", position)
            }
            ParseError::MissingOperand { position } => {
                write!(f, "missing operand for operator at position {}", position)
            }
            ParseError::EmptyGroup { position } => {
                write!(f, "empty group at position {}", position)
            }
            ParseError::UnexpectedCharacter { position, found } => {
                write!(f, "unexpected '{}' at position {}", found, position)
            }
            ParseError::TooDeep { position } => {
                write!(f, "expression nested too deeply at position {}", position)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// How malformed input is handled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ParseMode {
    /// Accept anything, degrading malformed input into a partial tree.
    #[default]
    Lenient,
    /// Reject malformed input with a positional [`ParseError`].
    Strict,
}

/// How mixed operators at the same nesting depth are grouped.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Grouping {
    /// All depth-0 operators are split points, keyed on the first operator seen.
    #[default]
    Legacy,
    /// Split on the lowest-precedence operator present: `|` < `&` < `^`.
    Precedence,
}

impl Grouping {
    /// Binding strength of an operator symbol under [`Grouping::Precedence`].
    fn precedence(symbol: char) -> u8 {
        match symbol {
            '|' => 0,
            '&' => 1,
            _ => 2,
        }
    }
}

/// Default bound on parser recursion, see [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ParseOptions {
    pub mode: ParseMode,
    pub grouping: Grouping,
    /// Maximum recursion depth of the parser.
    ///
    /// Every operator level, parenthesised group and negation takes one level, so a parsed tree
    /// is never more than `max_depth + 1` nodes deep.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            grouping: Grouping::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_grouping(self, grouping: Grouping) -> Self {
        Self { grouping, ..self }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

/// Character of the input together with its position in the original text.
type Tok = (usize, char);

#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    options: ParseOptions,
}

impl ExpressionParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    fn is_strict(&self) -> bool {
        self.options.mode == ParseMode::Strict
    }

    /// Parses one line of text into a [`LogicTree`].
    ///
    /// Blank input yields an empty tree in both modes. In lenient mode this never returns `Err`.
    pub fn parse(&self, text: &str) -> Result<LogicTree, ParseError> {
        debug!("parse(text = {:?}, options = {:?})", text, self.options);

        let expr: Vec<Tok> = text.chars().enumerate().filter(|(_, c)| !c.is_whitespace()).collect();
        if expr.is_empty() {
            return Ok(LogicTree::empty());
        }

        if self.is_strict() {
            check_balanced(&expr)?;
        }

        let root = if is_global_negation(&expr) {
            debug!("global negation detected");
            let inside = &expr[2..expr.len() - 1];
            if self.is_strict() && inside.is_empty() {
                return Err(ParseError::EmptyGroup { position: expr[1].0 });
            }
            Some(Node::not_with(self.parse_node(inside, 1)?.into_iter().collect()))
        } else {
            self.parse_node(&expr, 0)?
        };

        let tree = root.map_or_else(LogicTree::empty, LogicTree::new);
        if let Some(root) = tree.root() {
            if !root.is_well_formed() {
                warn!("malformed expression {:?} accepted as {}", text, root);
            }
        }
        Ok(tree)
    }

    fn parse_node(&self, expr: &[Tok], depth: usize) -> Result<Option<Node>, ParseError> {
        if expr.is_empty() {
            return Ok(None);
        }

        if depth > self.options.max_depth {
            let position = expr[0].0;
            if self.is_strict() {
                return Err(ParseError::TooDeep { position });
            }
            warn!(
                "expression nested deeper than {} levels, dropping subtree at position {}",
                self.options.max_depth, position
            );
            return Ok(None);
        }

        let ops = top_level_operators(expr);
        if ops.is_empty() {
            return self.parse_atom(expr, depth);
        }

        let (symbol, splits) = self.split_points(expr, &ops);
        debug!(
            "split {:?} at {} '{}' operator(s)",
            as_string(expr),
            splits.len(),
            symbol
        );

        let mut children = Vec::with_capacity(splits.len() + 1);
        let mut start = 0;
        for (k, end) in splits.iter().copied().chain(std::iter::once(expr.len())).enumerate() {
            let part = &expr[start..end];
            if part.is_empty() && self.is_strict() {
                // Blame the operator on the left of the slot, or the first one for a leading slot.
                let blame = splits[k.saturating_sub(1)];
                return Err(ParseError::MissingOperand { position: expr[blame].0 });
            }
            children.extend(self.parse_node(part, depth + 1)?);
            start = end + 1;
        }

        Ok(Some(Node::op(symbol, children)))
    }

    /// Chooses the operator symbol of the node and the indices where the expression is split.
    fn split_points(&self, expr: &[Tok], ops: &[usize]) -> (char, Vec<usize>) {
        match self.options.grouping {
            Grouping::Legacy => (expr[ops[0]].1, ops.to_vec()),
            Grouping::Precedence => {
                let symbol = ops
                    .iter()
                    .map(|&i| expr[i].1)
                    .min_by_key(|&c| Grouping::precedence(c))
                    .unwrap_or(expr[ops[0]].1);
                let splits = ops.iter().copied().filter(|&i| expr[i].1 == symbol).collect();
                (symbol, splits)
            }
        }
    }

    fn parse_atom(&self, expr: &[Tok], depth: usize) -> Result<Option<Node>, ParseError> {
        let first = expr[0];
        let last = expr[expr.len() - 1];

        if first.1 == '!' {
            let mut inside = &expr[1..];
            if self.is_strict() && inside.is_empty() {
                return Err(ParseError::MissingOperand { position: first.0 });
            }
            if inside.len() >= 2 && inside[0].1 == '(' && inside[inside.len() - 1].1 == ')' {
                if self.is_strict() {
                    self.check_single_group(inside)?;
                }
                inside = &inside[1..inside.len() - 1];
            }
            let operand = self.parse_node(inside, depth + 1)?;
            return Ok(Some(Node::not_with(operand.into_iter().collect())));
        }

        if expr.len() >= 2 && first.1 == '(' && last.1 == ')' {
            if self.is_strict() {
                self.check_single_group(expr)?;
            }
            return self.parse_node(&expr[1..expr.len() - 1], depth + 1);
        }

        if self.is_strict() {
            check_variable(expr)?;
        }
        Ok(Some(Node::var(as_string(expr))))
    }

    /// Strict check that `expr` is exactly one non-empty parenthesised group.
    fn check_single_group(&self, expr: &[Tok]) -> Result<(), ParseError> {
        let close = matching_close(expr).ok_or(ParseError::UnmatchedOpen { position: expr[0].0 })?;
        if close + 1 < expr.len() {
            let (position, found) = expr[close + 1];
            return Err(ParseError::UnexpectedCharacter { position, found });
        }
        if close == 1 {
            return Err(ParseError::EmptyGroup { position: expr[0].0 });
        }
        Ok(())
    }
}

impl FromStr for LogicTree {
    type Err = ParseError;

    /// Parses in strict mode with legacy grouping.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpressionParser::new(ParseOptions::strict()).parse(s)
    }
}

/// Parses `text` leniently with legacy grouping.
pub fn parse(text: &str) -> LogicTree {
    ExpressionParser::default().parse(text).unwrap_or_default()
}

/// Parses `text` in strict mode with legacy grouping.
pub fn parse_strict(text: &str) -> Result<LogicTree, ParseError> {
    ExpressionParser::new(ParseOptions::strict()).parse(text)
}

/// Checks whether the whole (whitespace-free) expression is `!( ... )` with the group closing
/// only at the very last character.
///
/// `!(A|B)` is a global negation; `!(A)&(B)` and `!A` are not.
pub fn is_global_negation_str(text: &str) -> bool {
    let expr: Vec<Tok> = text.chars().enumerate().filter(|(_, c)| !c.is_whitespace()).collect();
    is_global_negation(&expr)
}

fn is_global_negation(expr: &[Tok]) -> bool {
    match expr {
        [(_, '!'), (_, '('), ..] => matching_close(&expr[1..]) == Some(expr.len() - 2),
        _ => false,
    }
}

/// Index of the parenthesis closing the one at `expr[0]`.
fn matching_close(expr: &[Tok]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, &(_, c)) in expr.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

/// Indices of binary operators at parenthesis depth zero.
fn top_level_operators(expr: &[Tok]) -> Vec<usize> {
    let mut depth = 0i32;
    let mut ops = Vec::new();
    for (i, &(_, c)) in expr.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if depth == 0 && OPERATORS.contains(&c) => ops.push(i),
            _ => {}
        }
    }
    ops
}

fn check_balanced(expr: &[Tok]) -> Result<(), ParseError> {
    let mut open = Vec::new();
    for &(position, c) in expr {
        match c {
            '(' => open.push(position),
            ')' => {
                if open.pop().is_none() {
                    return Err(ParseError::UnmatchedClose { position });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(ParseError::UnmatchedOpen { position }),
        None => Ok(()),
    }
}

fn check_variable(expr: &[Tok]) -> Result<(), ParseError> {
    if expr[0].1 == '(' {
        // A group followed by more text, e.g. `(A)B`.
        if let Some(close) = matching_close(expr) {
            if let Some(&(position, found)) = expr.get(close + 1) {
                return Err(ParseError::UnexpectedCharacter { position, found });
            }
        }
    }
    match expr.iter().find(|(_, c)| matches!(c, '(' | ')' | '!')) {
        Some(&(position, found)) => Err(ParseError::UnexpectedCharacter { position, found }),
        None => Ok(()),
    }
}

fn as_string(expr: &[Tok]) -> String {
    expr.iter().map(|&(_, c)| c).collect()
}

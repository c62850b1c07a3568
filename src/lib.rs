//! # logic-schema: logic-gate schematics from boolean expressions
//!
//! **`logic-schema`** turns a textual infix boolean expression into a renderer-agnostic
//! description of a logic-gate schematic: nested operator boxes, inversion bubbles, a column of
//! variable taps and a labelled output stub.
//!
//! ## Pipeline
//!
//! ```text
//! text --parse--> LogicTree --layout--> LayoutResult --render--> any surface
//! ```
//!
//! - **Parsing** ([`parser`]) produces an immutable n-ary tree of variables, operators and
//!   negations ([`node`]).
//! - **Layout** ([`layout`]) maps the tree and a canvas size to absolute-coordinate
//!   [`Primitive`][crate::primitive::Primitive]s. Width encodes nesting depth, height encodes
//!   node count, and every variable tap sits on one shared column.
//! - **Rendering** is left to the caller, through the [`Renderer`][crate::primitive::Renderer]
//!   trait.
//!
//! ## Basic Usage
//!
//! ```rust
//! use logic_schema::label::LabelGenerator;
//! use logic_schema::layout::layout;
//! use logic_schema::parser::parse;
//!
//! // 1. Parse the expression
//! let tree = parse("!((A | B) & !C)");
//! assert_eq!(tree.node_count(), 7);
//!
//! // 2. Lay it out on the default 800x600 canvas, with reproducible labels
//! let mut labels = LabelGenerator::with_seed(42);
//! let result = layout(&tree, None, &mut labels);
//!
//! // 3. Inspect the geometry
//! let metrics = result.metrics.unwrap();
//! assert!(metrics.global_not);
//! assert_eq!(metrics.total_depth, 3);
//! assert!(!result.primitives.is_empty());
//! ```
//!
//! ## Core Components
//!
//! - **[`parser`]**: lenient and strict parsing, with legacy or precedence grouping.
//! - **[`metrics`]**: node counts and structural heights.
//! - **[`layout`]**: the layout engine.
//! - **[`label`]**: generated identifiers shown next to taps and outputs.

pub mod debug;
pub mod label;
pub mod layout;
pub mod metrics;
pub mod node;
pub mod parser;
pub mod primitive;

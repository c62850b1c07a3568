//! Schematic layout engine.
//!
//! Converts a [`LogicTree`] and a canvas size into an ordered list of [`Primitive`]s with
//! absolute coordinates. Nothing here paints; see [`crate::primitive::Renderer`].
//!
//! # Geometry
//!
//! Every size derives from a single `unit_height`:
//!
//! ```text
//! unit_height     = (canvas_height - margin) / node_count(central)
//! unit_width      = unit_height * width_factor
//! circle_diameter = unit_height * 0.4 * width_factor
//! tap_box_size    = max(unit_height * 0.35, 10)
//! ```
//!
//! The central group is a rectangle `structural_height(central) * unit_width` wide and
//! `node_count(central) * unit_height` tall, centred on the canvas. Width therefore encodes
//! nesting depth and height encodes node count.
//!
//! A NOT at the root is peeled off and drawn once, as a bubble on the right edge of the central
//! group; the central subtree is its operand.
//!
//! Inside the group each operator divides its vertical band among its children in source
//! order, proportionally to their node counts (see [`child_bands`]). Variables are drawn as taps
//! on one shared column left of the group, whatever their depth. Inner NOTs are drawn as bubbles
//! on the connecting line and occupy no nesting level.
//!
//! # Label order
//!
//! Label text is the only non-deterministic input. The engine asks its [`LabelSource`] for one
//! [`LabelKind::NumericPrefix`] per variable tap, in depth-first source order, then for the
//! output stub's numeric, logic-suffixed and letter-prefixed ids, in that order.

use std::fmt;

use log::{debug, warn};

use crate::label::{LabelKind, LabelSource};
use crate::metrics::{node_count, structural_height};
use crate::node::{LogicTree, Node, NodeKind};
use crate::primitive::{Color, Primitive, Rect, Renderer, Stroke};

/// Canvas size in drawing units (pixels for on-screen renderers).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Layout constants.
///
/// Use `LayoutConfig::default()` for the standard schematic proportions.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Canvas used when the caller supplies none (default: 800×600)
    pub default_canvas: Size,
    /// Vertical space reserved around the central group (default: 50)
    pub margin: f64,
    /// Horizontal stretch of one nesting level relative to `unit_height` (default: 2.0)
    pub width_factor: f64,
    /// Inversion bubble diameter per `unit_height * width_factor` (default: 0.4)
    pub circle_coefficient: f64,
    /// Tap box side per `unit_height` (default: 0.35)
    pub tap_box_coefficient: f64,
    /// Lower bound for the tap box side (default: 10)
    pub min_tap_box: f64,
    /// Length of the output line (default: 100)
    pub output_line_length: f64,
    /// Distance from the central group's left edge to the variable column (default: 100)
    pub var_column_offset: f64,
    /// Padding of operator labels from the rectangle's top-right corner (default: 5)
    pub text_padding: f64,
    /// Gap between the "Y" label and the output bubble slot (default: 5)
    pub output_label_offset: f64,
    /// Height of the top and bottom bands holding the output ids (default: 25)
    pub edge_band: f64,
    /// Horizontal offset of a variable name right of the variable column (default: 105)
    pub var_name_offset: f64,
    /// Gap between a tap box and its generated number (default: 10)
    pub var_number_offset: f64,
    /// Gap between the output box and the output id (default: 10)
    pub output_id_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_canvas: Size::new(800.0, 600.0),
            margin: 50.0,
            width_factor: 2.0,
            circle_coefficient: 0.4,
            tap_box_coefficient: 0.35,
            min_tap_box: 10.0,
            output_line_length: 100.0,
            var_column_offset: 100.0,
            text_padding: 5.0,
            output_label_offset: 5.0,
            edge_band: 25.0,
            var_name_offset: 105.0,
            var_number_offset: 10.0,
            output_id_gap: 10.0,
        }
    }
}

/// Text extents as reported by the painting backend.
pub trait TextMeasure {
    /// Returns `(width, height)` of the rendered text.
    fn measure(&self, text: &str) -> (f64, f64);
}

/// Fixed-pitch approximation of text extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> (f64, f64) {
        (text.chars().count() as f64 * self.char_width, self.line_height)
    }
}

/// Derived geometry of one layout pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub unit_height: f64,
    pub unit_width: f64,
    pub circle_diameter: f64,
    pub tap_box_size: f64,
    /// Shared x-coordinate of every variable tap.
    pub var_column_x: f64,
    /// Outline of the central group.
    pub central: Rect,
    /// Structural height of the central subtree.
    pub total_depth: usize,
    /// Right end of the central group, including the global NOT bubble if any.
    pub rightmost_x: f64,
    /// Whether the root NOT was peeled off and drawn as the output bubble.
    pub global_not: bool,
}

/// Non-fatal conditions reported by a layout pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LayoutDiagnostic {
    /// The tree has no root (blank input).
    EmptyTree,
    /// The tree has a root but nothing to draw inside the central group, e.g. `!()`.
    DegenerateTree,
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDiagnostic::EmptyTree => write!(f, "empty tree, nothing to draw"),
            LayoutDiagnostic::DegenerateTree => write!(f, "degenerate tree, nothing to draw"),
        }
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Canvas bounds, always `(0, 0, width, height)`.
    pub bounds: Rect,
    /// Draw requests in painting order.
    pub primitives: Vec<Primitive>,
    /// Derived geometry, absent when nothing was drawn.
    pub metrics: Option<LayoutMetrics>,
    /// Set when the tree could not be drawn.
    pub diagnostic: Option<LayoutDiagnostic>,
}

impl LayoutResult {
    fn bare(bounds: Rect, diagnostic: LayoutDiagnostic) -> Self {
        Self {
            bounds,
            primitives: Vec::new(),
            metrics: None,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Replays all primitives into `renderer`, in order.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.begin(self.bounds);
        for primitive in &self.primitives {
            renderer.draw(primitive);
        }
    }
}

/// Vertical bands assigned to the children of `node`, as `(top, height)` pairs.
///
/// The band `[top, top + height)` of the parent is split in source order, each child receiving
/// `height * node_count(child) / (node_count(node) - 1)`. The bands tile the parent band exactly.
pub fn child_bands(node: &Node, top: f64, height: f64) -> Vec<(f64, f64)> {
    let total_child_nodes = node_count(node) - 1;
    let mut current = top;
    node.children()
        .iter()
        .map(|child| {
            let alloc = if total_child_nodes > 0 {
                node_count(child) as f64 / total_child_nodes as f64 * height
            } else {
                height
            };
            let band = (current, alloc);
            current += alloc;
            band
        })
        .collect()
}

/// Display text of an operator inside its rectangle.
///
/// Follows ladder-logic annotation: OR is shown as `1`, XOR as `=1`.
pub fn operator_label(symbol: &str) -> &str {
    match symbol {
        "|" => "1",
        "^" => "=1",
        other => other,
    }
}

const LINE: Stroke = Stroke::new(Color::Black, 2.0);
const GROUP: Stroke = Stroke::new(Color::DarkBlue, 1.0);

/// Per-pass state shared, read-only, by every recursive call.
struct Context<'a> {
    config: &'a LayoutConfig,
    metrics: LayoutMetrics,
}

/// Collects primitives and pulls label text.
struct Emitter<'a, L: ?Sized, M: ?Sized> {
    primitives: Vec<Primitive>,
    labels: &'a mut L,
    measure: &'a M,
}

impl<L, M> Emitter<'_, L, M>
where
    L: LabelSource + ?Sized,
    M: TextMeasure + ?Sized,
{
    fn rect(&mut self, rect: Rect, stroke: Stroke) {
        self.primitives.push(Primitive::Rectangle { rect, stroke });
    }

    fn ellipse(&mut self, rect: Rect, stroke: Stroke) {
        self.primitives.push(Primitive::Ellipse { rect, stroke });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.primitives.push(Primitive::Line { x1, y1, x2, y2, stroke });
    }

    fn label(&mut self, x: f64, y: f64, text: String, color: Color) {
        self.primitives.push(Primitive::Label { x, y, text, color });
    }

    fn measure(&self, text: &str) -> (f64, f64) {
        self.measure.measure(text)
    }

    fn generate(&mut self, kind: LabelKind) -> String {
        self.labels.generate(kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine<M = MonospaceMeasure> {
    config: LayoutConfig,
    measure: M,
}

impl LayoutEngine<MonospaceMeasure> {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            measure: MonospaceMeasure::default(),
        }
    }
}

impl<M: TextMeasure> LayoutEngine<M> {
    pub fn with_measure(config: LayoutConfig, measure: M) -> Self {
        Self { config, measure }
    }

    /// Lays out `tree` on a canvas of `canvas` size (or the configured default).
    ///
    /// Never fails: blank and degenerate trees produce bare canvas bounds plus a
    /// [`LayoutDiagnostic`].
    pub fn layout<L>(&self, tree: &LogicTree, canvas: Option<Size>, labels: &mut L) -> LayoutResult
    where
        L: LabelSource + ?Sized,
    {
        let size = canvas.unwrap_or(self.config.default_canvas);
        let bounds = Rect::new(0.0, 0.0, size.width, size.height);

        let Some(root) = tree.root() else {
            debug!("layout: empty tree");
            return LayoutResult::bare(bounds, LayoutDiagnostic::EmptyTree);
        };

        let global_not = root.is_not();
        let central = if global_not { root.operand() } else { Some(root) };
        let Some(central) = central else {
            warn!("layout: negation without operand, nothing to draw");
            return LayoutResult::bare(bounds, LayoutDiagnostic::DegenerateTree);
        };

        let metrics = self.derive_metrics(central, size, global_not);
        debug!("layout: {:?}", metrics);

        let ctx = Context {
            config: &self.config,
            metrics,
        };
        let mut out = Emitter {
            primitives: Vec::new(),
            labels,
            measure: &self.measure,
        };

        ctx.draw_central_group(&mut out);
        ctx.draw_central_node(&mut out, central);
        ctx.draw_output_group(&mut out);

        LayoutResult {
            bounds,
            primitives: out.primitives,
            metrics: Some(metrics),
            diagnostic: None,
        }
    }

    fn derive_metrics(&self, central: &Node, size: Size, global_not: bool) -> LayoutMetrics {
        let config = &self.config;

        let total_nodes = node_count(central);
        let total_depth = structural_height(central);

        let unit_height = (size.height - config.margin) / total_nodes as f64;
        let unit_width = unit_height * config.width_factor;
        let circle_diameter = unit_height * config.circle_coefficient * config.width_factor;
        let tap_box_size = (unit_height * config.tap_box_coefficient).max(config.min_tap_box);

        let central_height = total_nodes as f64 * unit_height;
        let central_width = total_depth as f64 * unit_width;
        let central = Rect::new(
            size.width / 2.0 - central_width / 2.0,
            size.height / 2.0 - central_height / 2.0,
            central_width,
            central_height,
        );

        let rightmost_x = if global_not {
            central.right() + circle_diameter
        } else {
            central.right()
        };

        LayoutMetrics {
            unit_height,
            unit_width,
            circle_diameter,
            tap_box_size,
            var_column_x: central.x - config.var_column_offset,
            central,
            total_depth,
            rightmost_x,
            global_not,
        }
    }
}

impl Context<'_> {
    fn draw_central_group<L, M>(&self, out: &mut Emitter<'_, L, M>)
    where
        L: LabelSource + ?Sized,
        M: TextMeasure + ?Sized,
    {
        let m = &self.metrics;
        out.rect(m.central, GROUP);

        if m.global_not {
            let d = m.circle_diameter;
            let (_, center_y) = m.central.center();
            out.ellipse(Rect::new(m.central.right(), center_y - d / 2.0, d, d), LINE);
        }
    }

    fn draw_central_node<L, M>(&self, out: &mut Emitter<'_, L, M>, central: &Node)
    where
        L: LabelSource + ?Sized,
        M: TextMeasure + ?Sized,
    {
        let rect = self.metrics.central;
        let (center_x, center_y) = rect.center();

        match central.kind() {
            NodeKind::Var => {
                let (w, h) = out.measure(central.value());
                out.label(
                    center_x - w / 2.0,
                    center_y - h / 2.0,
                    central.value().to_string(),
                    Color::Green,
                );
            }
            NodeKind::Op => {
                // The outermost operator keeps its raw symbol.
                let (w, _) = out.measure(central.value());
                out.label(
                    rect.right() - w - self.config.text_padding,
                    rect.y + self.config.text_padding,
                    central.value().to_string(),
                    Color::Blue,
                );
                self.draw_children(out, central, rect.x, rect.y, rect.h, 1);
            }
            NodeKind::Not => {
                // Doubly negated root: the remaining NOT sits on the group's input.
                self.draw_node(out, central, rect.x, center_y, rect.h, 1);
            }
        }
    }

    fn draw_children<L, M>(
        &self,
        out: &mut Emitter<'_, L, M>,
        node: &Node,
        connect_x: f64,
        top: f64,
        height: f64,
        level: usize,
    ) where
        L: LabelSource + ?Sized,
        M: TextMeasure + ?Sized,
    {
        for (child, (band_top, alloc)) in node.children().iter().zip(child_bands(node, top, height)) {
            self.draw_node(out, child, connect_x, band_top + alloc / 2.0, alloc, level);
        }
    }

    fn draw_node<L, M>(
        &self,
        out: &mut Emitter<'_, L, M>,
        node: &Node,
        connect_x: f64,
        connect_y: f64,
        alloc_height: f64,
        level: usize,
    ) where
        L: LabelSource + ?Sized,
        M: TextMeasure + ?Sized,
    {
        debug!(
            "draw_node({} '{}', connect = ({:.2}, {:.2}), alloc = {:.2}, level = {})",
            node.kind(),
            node.value(),
            connect_x,
            connect_y,
            alloc_height,
            level
        );

        let m = &self.metrics;
        match node.kind() {
            NodeKind::Var => {
                let column_x = m.var_column_x;
                let box_size = m.tap_box_size;

                let number = out.generate(LabelKind::NumericPrefix);
                let (_, name_h) = out.measure(node.value());
                let (number_w, _) = out.measure(&number);
                let text_y = connect_y - name_h / 2.0;

                out.label(
                    column_x + self.config.var_name_offset,
                    text_y,
                    node.value().to_string(),
                    Color::Black,
                );
                out.label(
                    column_x - self.config.var_number_offset - number_w - box_size,
                    text_y,
                    number,
                    Color::DarkGreen,
                );
                out.rect(
                    Rect::new(
                        column_x - box_size / 2.0,
                        connect_y - box_size / 2.0,
                        box_size,
                        box_size,
                    ),
                    LINE,
                );
                out.line(connect_x, connect_y, column_x, connect_y, LINE);
            }
            NodeKind::Not => {
                let d = m.circle_diameter;
                let circle_x = connect_x - d;
                out.ellipse(Rect::new(circle_x, connect_y - d / 2.0, d, d), LINE);

                // Same level: the bubble takes no nesting slot.
                if let Some(operand) = node.operand() {
                    self.draw_node(out, operand, circle_x, connect_y, alloc_height, level);
                }
            }
            NodeKind::Op => {
                let width = m.total_depth.saturating_sub(level) as f64 * m.unit_width;
                let rect = Rect::new(connect_x, connect_y - alloc_height / 2.0, width, alloc_height);
                out.rect(rect, GROUP);

                let text = operator_label(node.value());
                let (text_w, _) = out.measure(text);
                out.label(
                    rect.right() - text_w - self.config.text_padding,
                    rect.y + self.config.text_padding,
                    text.to_string(),
                    Color::Blue,
                );

                self.draw_children(out, node, rect.x, rect.y, rect.h, level + 1);
            }
        }
    }

    fn draw_output_group<L, M>(&self, out: &mut Emitter<'_, L, M>)
    where
        L: LabelSource + ?Sized,
        M: TextMeasure + ?Sized,
    {
        let config = self.config;
        let m = &self.metrics;
        let (_, center_y) = m.central.center();
        let start_x = m.rightmost_x;
        let end_x = start_x + config.output_line_length;

        out.line(start_x, center_y, end_x, center_y, LINE);

        let output_id = out.generate(LabelKind::NumericPrefix);
        let logic_id = out.generate(LabelKind::LogicSuffix);
        let letter_id = out.generate(LabelKind::LetterPrefix);

        let (y_w, y_h) = out.measure("Y");
        out.label(
            start_x - config.output_label_offset - y_w - m.circle_diameter,
            center_y - y_h / 2.0,
            "Y".to_string(),
            Color::Black,
        );

        let box_size = m.tap_box_size;
        out.label(
            end_x + box_size + config.output_id_gap,
            center_y - y_h / 2.0,
            output_id,
            Color::DarkGreen,
        );

        let (_, logic_h) = out.measure(&logic_id);
        out.label(
            start_x,
            center_y * 2.0 - config.edge_band + (config.edge_band - logic_h) / 2.0,
            logic_id,
            Color::Black,
        );

        let (_, letter_h) = out.measure(&letter_id);
        out.label(start_x, (config.edge_band - letter_h) / 2.0, letter_id, Color::Black);

        out.rect(
            Rect::new(end_x - box_size / 2.0, center_y - box_size / 2.0, box_size, box_size),
            LINE,
        );
    }
}

/// Lays out `tree` with the default configuration.
pub fn layout<L>(tree: &LogicTree, canvas: Option<Size>, labels: &mut L) -> LayoutResult
where
    L: LabelSource + ?Sized,
{
    LayoutEngine::new(LayoutConfig::default()).layout(tree, canvas, labels)
}

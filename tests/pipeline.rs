//! End-to-end tests: text -> tree -> primitives -> renderer.

use logic_schema::label::{LabelGenerator, LabelKind, LabelSource};
use logic_schema::layout::{child_bands, layout, LayoutDiagnostic, LayoutEngine, LayoutConfig, Size};
use logic_schema::metrics::{node_count, structural_height, var_count};
use logic_schema::node::{LogicTree, Node, NodeKind};
use logic_schema::parser::{parse, parse_strict, ExpressionParser, Grouping, ParseError, ParseOptions};
use logic_schema::primitive::{Color, Primitive, Rect, Renderer, Stroke};
use test_log::test;

const EPS: f64 = 1e-9;

const CORPUS: &[&str] = &[
    "A&B",
    "!A|B",
    "!(A|B)",
    "A^B^C^D",
    "(A|B)&(C|D)",
    "!((A|B)&!C)",
    "A & (B | (C ^ (D & !E)))",
    "!(!A & !(B | !C)) | D",
    "((X1 & X2) | (X3 & X4)) ^ !(X5 | X6 | X7)",
    "a_long_name & !!b & (c | d | e | f) & g",
];

// ─── Parser ─────────────────────────────────────────────────────────────────────

#[test]
fn parse_reference_shapes() {
    assert_eq!(parse("A").into_root(), Some(Node::var("A")));
    assert_eq!(parse("!A").into_root(), Some(Node::not(Node::var("A"))));
    assert_eq!(
        parse("A&B").into_root(),
        Some(Node::and(vec![Node::var("A"), Node::var("B")]))
    );
    assert_eq!(
        parse("!(A|B)").into_root(),
        Some(Node::not(Node::or(vec![Node::var("A"), Node::var("B")])))
    );
    assert_eq!(
        parse("!A|B").into_root(),
        Some(Node::or(vec![Node::not(Node::var("A")), Node::var("B")]))
    );
}

#[test]
fn parse_mixed_operators_legacy_and_precedence() {
    let legacy = parse("A&B|C").into_root().unwrap();
    assert_eq!(legacy.kind(), NodeKind::Op);
    assert_eq!(legacy.value(), "&");
    assert_eq!(legacy.children().len(), 3);

    let parser = ExpressionParser::new(ParseOptions::default().with_grouping(Grouping::Precedence));
    let precedence = parser.parse("A&B|C").unwrap();
    assert_eq!(precedence.to_string(), "((A & B) | C)");
}

#[test]
fn strict_and_lenient_agree_on_well_formed_input() {
    for text in CORPUS {
        let lenient = parse(text);
        let strict = parse_strict(text).unwrap();
        assert_eq!(lenient, strict, "{}", text);
        assert!(strict.root().unwrap().is_well_formed(), "{}", text);
    }
}

#[test]
fn display_round_trips_through_parser() {
    for text in CORPUS {
        let tree = parse(text);
        let reparsed: LogicTree = tree.to_string().parse().unwrap();
        assert_eq!(tree, reparsed, "{}", text);
    }
}

// ─── Metrics ────────────────────────────────────────────────────────────────────

fn check_counts(node: &Node) {
    let children: usize = node.children().iter().map(node_count).sum();
    assert_eq!(node_count(node), 1 + children);
    if let Some(operand) = node.operand() {
        assert_eq!(structural_height(node), structural_height(operand));
    }
    node.children().iter().for_each(check_counts);
}

#[test]
fn metrics_hold_for_corpus() {
    for text in CORPUS {
        check_counts(parse(text).root().unwrap());
    }
}

// ─── Layout ─────────────────────────────────────────────────────────────────────

fn check_partition(node: &Node, top: f64, height: f64) {
    if node.is_op() {
        let bands = child_bands(node, top, height);
        let total: f64 = bands.iter().map(|&(_, h)| h).sum();
        assert!((total - height).abs() < EPS * height.max(1.0));
        let mut expected_top = top;
        for (child, &(band_top, band_height)) in node.children().iter().zip(&bands) {
            assert!((band_top - expected_top).abs() < EPS * height.max(1.0));
            assert!(band_height > 0.0);
            check_partition(child, band_top, band_height);
            expected_top += band_height;
        }
    } else {
        for child in node.children() {
            check_partition(child, top, height);
        }
    }
}

#[test]
fn sibling_bands_partition_parent_band() {
    for text in CORPUS {
        let tree = parse(text);
        let result = layout(&tree, None, &mut LabelGenerator::with_seed(1));
        let central = result.metrics.unwrap().central;
        let root = tree.root().unwrap();
        let node = root.operand().unwrap_or(root);
        check_partition(node, central.y, central.h);
    }
}

/// Bands the layout should give every operator group, in drawing order.
fn expected_group_bands(node: &Node, top: f64, height: f64, out: &mut Vec<(f64, f64)>) {
    match node.kind() {
        NodeKind::Op => {
            out.push((top, height));
            for (child, (band_top, band_height)) in node.children().iter().zip(child_bands(node, top, height)) {
                expected_group_bands(child, band_top, band_height, out);
            }
        }
        NodeKind::Not => {
            if let Some(operand) = node.operand() {
                expected_group_bands(operand, top, height, out);
            }
        }
        NodeKind::Var => {}
    }
}

#[test]
fn group_rectangles_sit_on_their_bands() {
    let group = Stroke::new(Color::DarkBlue, 1.0);
    for text in CORPUS {
        let tree = parse(text);
        let result = layout(&tree, None, &mut LabelGenerator::with_seed(1));
        let central = result.metrics.unwrap().central;
        let root = tree.root().unwrap();
        let node = root.operand().unwrap_or(root);

        let mut expected = vec![(central.y, central.h)];
        if node.is_op() {
            for (child, (top, height)) in node.children().iter().zip(child_bands(node, central.y, central.h)) {
                expected_group_bands(child, top, height, &mut expected);
            }
        } else {
            expected_group_bands(node, central.y, central.h, &mut expected);
        }

        let emitted: Vec<Rect> = result
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Rectangle { rect, stroke } if *stroke == group => Some(*rect),
                _ => None,
            })
            .collect();

        assert_eq!(emitted.len(), expected.len(), "{}", text);
        for (rect, &(top, height)) in emitted.iter().zip(&expected) {
            assert!((rect.y - top).abs() < EPS, "{}: {:?} vs top {}", text, rect, top);
            assert!((rect.bottom() - (top + height)).abs() < EPS, "{}: {:?} vs height {}", text, rect, height);
            assert!(rect.bottom() <= central.bottom() + EPS, "{}", text);
        }
    }
}

#[test]
fn var_taps_share_one_column() {
    for text in CORPUS {
        let tree = parse(text);
        let result = layout(&tree, None, &mut LabelGenerator::with_seed(2));
        let m = result.metrics.unwrap();

        let taps: Vec<Rect> = result
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Rectangle { rect, .. } if (rect.center().0 - m.var_column_x).abs() < EPS => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(taps.len(), tree.var_count(), "{}", text);
        for tap in &taps {
            assert!((tap.w - m.tap_box_size).abs() < EPS);
        }

        let feeds = result
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { x2, .. } if (*x2 - m.var_column_x).abs() < EPS))
            .count();
        assert_eq!(feeds, tree.var_count(), "{}", text);
    }
}

#[test]
fn negations_are_bubbles() {
    for text in CORPUS {
        let tree = parse(text);
        let nots = count_kind(tree.root().unwrap(), NodeKind::Not);
        let result = layout(&tree, None, &mut LabelGenerator::with_seed(3));
        let bubbles = result.primitives.iter().filter(|p| p.is_ellipse()).count();
        assert_eq!(bubbles, nots, "{}", text);
    }
}

fn count_kind(node: &Node, kind: NodeKind) -> usize {
    usize::from(node.kind() == kind) + node.children().iter().map(|c| count_kind(c, kind)).sum::<usize>()
}

#[test]
fn single_var_scenario() {
    let result = layout(&parse("A"), None, &mut LabelGenerator::with_seed(4));
    let m = result.metrics.unwrap();
    assert_eq!(m.unit_height, 550.0);
    assert_eq!(m.tap_box_size, 192.5);
    assert_eq!(m.central.center(), (400.0, 300.0));
    assert_eq!(m.central.h, 550.0);
    assert_eq!(m.central.w, 1100.0);
}

#[test]
fn layout_is_reproducible_with_seed() {
    for text in CORPUS {
        let tree = parse(text);
        let size = Some(Size::new(1024.0, 768.0));
        let a = layout(&tree, size, &mut LabelGenerator::with_seed(5));
        let b = layout(&tree, size, &mut LabelGenerator::with_seed(5));
        assert_eq!(a, b, "{}", text);
    }
}

/// Counts requests per label kind.
#[derive(Default)]
struct CountingLabels {
    numeric: usize,
    letter: usize,
    logic: usize,
}

impl LabelSource for CountingLabels {
    fn generate(&mut self, kind: LabelKind) -> String {
        match kind {
            LabelKind::NumericPrefix => self.numeric += 1,
            LabelKind::LetterPrefix => self.letter += 1,
            LabelKind::LogicSuffix => self.logic += 1,
        }
        String::from("x")
    }
}

#[test]
fn label_requests_per_tap_and_output() {
    let tree = parse("(A|B)&(C|!D)");
    let mut labels = CountingLabels::default();
    layout(&tree, None, &mut labels);
    assert_eq!(labels.numeric, var_count(tree.root().unwrap()) + 1);
    assert_eq!(labels.letter, 1);
    assert_eq!(labels.logic, 1);
}

#[test]
fn blank_and_degenerate_input() {
    let mut labels = CountingLabels::default();

    let empty = layout(&parse(""), None, &mut labels);
    assert_eq!(empty.diagnostic, Some(LayoutDiagnostic::EmptyTree));
    assert!(empty.primitives.is_empty());
    assert_eq!(empty.bounds, Rect::new(0.0, 0.0, 800.0, 600.0));

    let degenerate = layout(&parse("!()"), None, &mut labels);
    assert_eq!(degenerate.diagnostic, Some(LayoutDiagnostic::DegenerateTree));
    assert!(degenerate.primitives.is_empty());

    // Nothing drawn, nothing asked.
    assert_eq!(labels.numeric + labels.letter + labels.logic, 0);
}

#[test]
fn deep_nesting_parses_and_lays_out() {
    let mut text = "(".repeat(10_000);
    text.push('A');
    for i in 0..10_000 {
        text.push_str(&format!("|B{})", i));
    }

    let tree = parse(&text);
    assert!(!tree.is_empty());
    assert!(tree.height() < 10_000);
    assert!(matches!(parse_strict(&text), Err(ParseError::TooDeep { .. })));

    let result = layout(&tree, None, &mut LabelGenerator::with_seed(9));
    assert!(result.diagnostic.is_none());
    assert_eq!(result.primitives.iter().filter(|p| p.is_ellipse()).count(), 0);
    assert!(!result.is_empty());
}

#[test]
fn custom_width_factor() {
    let config = LayoutConfig {
        width_factor: 1.0,
        ..LayoutConfig::default()
    };
    let engine = LayoutEngine::new(config);
    let result = engine.layout(&parse("A|B"), None, &mut LabelGenerator::with_seed(6));
    let m = result.metrics.unwrap();
    assert_eq!(m.unit_width, m.unit_height);
    assert!((m.central.w - 2.0 * m.unit_height).abs() < EPS);
}

// ─── Renderer boundary ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    bounds: Option<Rect>,
    rectangles: usize,
    ellipses: usize,
    lines: usize,
    labels: Vec<(String, Color)>,
}

impl Renderer for Recorder {
    fn begin(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    fn rectangle(&mut self, _rect: Rect, _stroke: Stroke) {
        self.rectangles += 1;
    }

    fn ellipse(&mut self, _rect: Rect, _stroke: Stroke) {
        self.ellipses += 1;
    }

    fn line(&mut self, _from: (f64, f64), _to: (f64, f64), _stroke: Stroke) {
        self.lines += 1;
    }

    fn label(&mut self, _at: (f64, f64), text: &str, color: Color) {
        self.labels.push((text.to_string(), color));
    }
}

#[test]
fn renderer_receives_every_primitive_in_order() {
    let tree = parse("!(A & !B)");
    let result = layout(&tree, None, &mut LabelGenerator::with_seed(8));
    let mut recorder = Recorder::default();
    result.render(&mut recorder);

    assert_eq!(recorder.bounds, Some(result.bounds));
    assert_eq!(recorder.rectangles, result.primitives.iter().filter(|p| p.is_rectangle()).count());
    assert_eq!(recorder.lines, result.primitives.iter().filter(|p| p.is_line()).count());
    // Central group, two taps, output box.
    assert_eq!(recorder.rectangles, 4);
    // Global bubble and the bubble in front of B.
    assert_eq!(recorder.ellipses, 2);
    // Two tap feeds and the output line.
    assert_eq!(recorder.lines, 3);

    let texts: Vec<&str> = recorder.labels.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts[0], "&");
    assert_eq!(texts[1], "A");
    assert_eq!(texts[3], "B");
    assert!(texts.contains(&"Y"));
    assert_eq!(recorder.labels[0].1, Color::Blue);
}

//! Lay out a boolean expression and dump the resulting primitives.
//!
//! Run with:
//!   cargo run --example schema -- "!((A|B)&!C)"
//!   cargo run --example schema -- "A&B|C" --precedence --strict --seed 42

use clap::Parser;
use color_eyre::eyre::eyre;
use logic_schema::debug::format_tree;
use logic_schema::label::LabelGenerator;
use logic_schema::layout::{LayoutConfig, LayoutEngine, Size};
use logic_schema::parser::{ExpressionParser, Grouping, ParseMode, ParseOptions, DEFAULT_MAX_DEPTH};

#[derive(Debug, Parser)]
#[command(name = "schema")]
#[command(about = "Logic-gate schematic layout for a boolean expression")]
struct Cli {
    /// Expression, e.g. "!((A|B)&!C)"
    expression: String,

    /// Canvas width
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Seed for generated labels (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Reject malformed expressions instead of accepting a partial tree
    #[arg(long)]
    strict: bool,

    /// Group mixed operators by precedence instead of the first operator found
    #[arg(long)]
    precedence: bool,

    /// Deepest nesting the parser accepts
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let options = ParseOptions {
        mode: if cli.strict { ParseMode::Strict } else { ParseMode::Lenient },
        grouping: if cli.precedence { Grouping::Precedence } else { Grouping::Legacy },
        max_depth: cli.max_depth,
    };
    let tree = ExpressionParser::new(options)
        .parse(&cli.expression)
        .map_err(|e| eyre!("cannot parse {:?}: {}", cli.expression, e))?;

    println!("Expression: {}", tree);
    println!("Nodes: {}, height: {}, width: {}", tree.node_count(), tree.height(), tree.width());
    print!("{}", format_tree(&tree));
    println!();

    let mut labels = match cli.seed {
        Some(seed) => LabelGenerator::with_seed(seed),
        None => LabelGenerator::from_entropy(),
    };
    let engine = LayoutEngine::new(LayoutConfig::default());
    let result = engine.layout(&tree, Some(Size::new(cli.width, cli.height)), &mut labels);

    if let Some(diagnostic) = result.diagnostic {
        log::warn!("{}", diagnostic);
    }
    if let Some(m) = &result.metrics {
        println!(
            "unit height = {:.2}, unit width = {:.2}, bubble = {:.2}, tap box = {:.2}, var column x = {:.2}",
            m.unit_height, m.unit_width, m.circle_diameter, m.tap_box_size, m.var_column_x
        );
    }

    println!(
        "Canvas: {}x{}, {} primitives",
        result.bounds.w,
        result.bounds.h,
        result.primitives.len()
    );
    for primitive in &result.primitives {
        println!("  {}", primitive);
    }

    Ok(())
}

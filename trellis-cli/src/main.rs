//! Trellis CLI
//!
//! Lays out a document described as JSON and prints its box tree, display
//! list or hit-test results.

mod document_spec;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use trellis_layout::{Frame, Point, RenderingContext, StyleMap, dump_tree};

use document_spec::DocumentSpec;

/// Lay out a JSON-described document and print its box tree
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the box tree
    trellis page.json

    # Narrow viewport, with the display list
    trellis page.json --width 320 --display-list

    # What is under the pointer at (12, 40)?
    trellis page.json --hit 12,40
"#)]
struct Cli {
    /// Path to the JSON document description
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: f32,

    /// Print the display list as JSON instead of the box tree
    #[arg(long)]
    display_list: bool,

    /// Outline every line-box fragment in the display list
    #[arg(long)]
    line_box_borders: bool,

    /// Hit-test the point X,Y after layout
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    hit: Option<Point>,

    /// Hover the element with this id before layout
    #[arg(long, value_name = "ID")]
    hover: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{s}': {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.path)
        .with_context(|| format!("cannot read {}", cli.path.display()))?;
    let (document, styles) = DocumentSpec::from_json(&json)?.build()?;
    let mut frame = Frame::new(document, styles, cli.width, cli.height);

    if let Some(id) = &cli.hover {
        let Some(node) = frame.document().get_element_by_id(id) else {
            bail!("no element with id '{id}'");
        };
        let _ = frame.set_hovered_node(Some(node));
    }
    frame.layout();
    let (content_width, content_height) = frame.content_size();
    log::debug!(
        "laid out {} at {}x{}, content {content_width}x{content_height}",
        cli.path.display(),
        cli.width,
        cli.height
    );

    if cli.display_list {
        let mut ctx = RenderingContext::new(frame.viewport());
        ctx.show_line_box_borders = cli.line_box_borders;
        frame.render(&mut ctx);
        println!("{}", serde_json::to_string_pretty(&ctx.display_list)?);
    } else {
        print_box_tree(&frame, !cli.no_color);
    }

    if let Some(point) = cli.hit {
        let result = frame.hit_test(point);
        let target = result.node.map_or_else(
            || if result.is_empty() { "nothing".to_string() } else { "(anonymous)".to_string() },
            |node| format!("{} ({node:?})", frame.document().tag_name(node)),
        );
        println!("hit ({}, {}): {target}", point.x, point.y);
    }

    Ok(())
}

fn print_box_tree(frame: &Frame<StyleMap>, color: bool) {
    let Some(tree) = frame.box_tree() else {
        println!("No box tree available");
        return;
    };
    let (width, height) = (frame.viewport().width, frame.viewport().height);
    println!("=== Box Tree (viewport: {width}x{height}) ===\n");

    for line in dump_tree(tree, frame.document()).lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        match trimmed.split_once(' ') {
            Some((class, rest)) if color && class.starts_with("Layout") => {
                println!("{indent}{} {rest}", class.cyan().bold());
            }
            Some((label, rest)) if color && label == "line" => {
                println!("{indent}{} {rest}", label.dimmed());
            }
            _ => println!("{line}"),
        }
    }
}

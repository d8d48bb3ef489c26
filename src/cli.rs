//! # Command Line Interface
//!
//! Argument definitions and the conversion pipeline: read a DXF drawing,
//! flatten it into paths, join and order them, and write the toolpath JSON
//! (plus an optional SVG preview).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use dxfkit_core::constants::{DEFAULT_MAX_ERROR, DEFAULT_MAX_POINTS};
use dxfkit_core::units::known_units;
use dxfkit_core::{FixedPathConfig, Unit};
use dxfkit_import::Drawing;
use dxfkit_route::{join_paths, optimize_route, RouteOptions};

use crate::{json, svg};

#[derive(Parser, Debug)]
#[command(name = "dxfkit")]
#[command(about = "Converts 2D DXF drawings into travel-optimized toolpath JSON")]
#[command(version)]
pub struct Cli {
    /// Path to the .dxf input file
    #[arg(required_unless_present = "list_units")]
    pub dxf_path: Option<PathBuf>,

    /// Path to the .json toolpath output file
    #[arg(required_unless_present = "list_units")]
    pub json_path: Option<PathBuf>,

    /// Add a string attribute with the given name and value to the top of
    /// the JSON object (repeatable)
    #[arg(short = 'a', long = "attr", num_args = 2, value_names = ["NAME", "VALUE"])]
    pub attr: Vec<String>,

    /// Maximum error for curved elements, in mm. Sampled points stay within
    /// this distance of the ideal curve
    #[arg(short = 'e', long = "max-error", value_name = "MM", default_value_t = DEFAULT_MAX_ERROR, value_parser = positive_mm)]
    pub max_error: f64,

    /// Maximum distance between successive sampled points, in mm
    #[arg(short = 'd', long = "max-dist", value_name = "MM", value_parser = positive_mm)]
    pub max_dist: Option<f64>,

    /// Physical unit of the imported geometry. By default the unit is taken
    /// from the DXF file header and must be present there
    #[arg(short = 'u', long = "unit", value_name = "NAME")]
    pub unit: Option<String>,

    /// List known unit names and exit
    #[arg(long = "list-units")]
    pub list_units: bool,

    /// Allow the optimizer to reverse the direction of non-cyclic paths
    #[arg(long = "optimize-direction")]
    pub optimize_direction: bool,

    /// Allow the optimizer to choose any vertex of a cyclic path as its
    /// starting point. Starting positions of circles and ellipses are always
    /// chosen by the optimizer
    #[arg(long = "optimize-start")]
    pub optimize_start: bool,

    /// Also write an SVG preview of the optimized route to this path
    #[arg(long = "svg", value_name = "PATH")]
    pub svg: Option<PathBuf>,
}

/// Rejects non-numeric and non-positive threshold values.
fn positive_mm(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err("value must be positive".to_string())
    }
}

/// The `--list-units` output: one line per unit, aliases joined by commas.
fn unit_listing() -> String {
    let mut out = String::from("Known units for option --unit:\n  ");
    let mut prev: Option<Unit> = None;
    for (name, unit) in known_units() {
        if let Some(prev) = prev {
            if prev != *unit {
                out.push_str("\n  ");
            } else {
                out.push_str(", ");
            }
        }
        prev = Some(*unit);
        out.push_str(name);
    }
    out.push('\n');
    out
}

/// Parses the process arguments and runs the pipeline.
pub fn run() -> anyhow::Result<()> {
    execute(Cli::parse())
}

/// Runs the conversion described by `cli`.
///
/// Output files are only written once the whole pipeline has succeeded, so
/// a failed run never leaves a partial toolpath behind.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    if cli.list_units {
        print!("{}", unit_listing());
        return Ok(());
    }

    let dxf_path = cli.dxf_path.as_deref().context("missing DXF input path")?;
    let json_path = cli
        .json_path
        .as_deref()
        .context("missing JSON output path")?;

    let unit = cli
        .unit
        .as_deref()
        .map(str::parse::<Unit>)
        .transpose()
        .context("invalid value for --unit")?;

    let drawing = Drawing::from_path(dxf_path)?;
    let mut cfg = FixedPathConfig::new(cli.max_error, cli.max_dist);
    let paths = drawing.create_paths(unit, &mut cfg, DEFAULT_MAX_POINTS)?;
    debug!("Generated {} paths from {}", paths.len(), dxf_path.display());

    let outcome = join_paths(&paths, cli.max_error);
    for p in &outcome.ambiguous_positions {
        warn!("Ambiguous path pairing near ({}, {})", p.x, p.y);
    }
    for p in &outcome.ambiguous_directions {
        warn!("Arbitrary direction for joined path near ({}, {})", p.x, p.y);
    }

    let options = RouteOptions {
        optimize_direction: cli.optimize_direction,
        optimize_start: cli.optimize_start,
    };
    let route = optimize_route(outcome.paths, options)?;

    let attrs: Vec<(String, String)> = cli
        .attr
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();

    json::write_toolpath(json_path, &attrs, &route)?;

    if let Some(svg_path) = &cli.svg {
        svg::write_preview(svg_path, &route)?;
    }

    Ok(())
}

//! # DxfKit
//!
//! Converts 2D DXF drawings into travel-optimized toolpaths for laser and
//! marking equipment.
//!
//! ## Architecture
//!
//! DxfKit is organized as a workspace with multiple crates:
//!
//! 1. **dxfkit-core** - Geometry primitives, sampling, units, errors
//! 2. **dxfkit-import** - DXF reading, entity parsing, path generation
//! 3. **dxfkit-route** - Path joining and travel optimization
//! 4. **dxfkit** - CLI binary plus the JSON and SVG writers
//!
//! The pipeline reads a drawing, flattens every entity into millimeter
//! polyline paths under a configurable error bound, joins paths whose
//! endpoints touch, orders them along a space-filling curve, refines the
//! order with local search, and writes the result as a toolpath JSON file
//! (optionally with an SVG preview).

pub mod cli;
pub mod json;
pub mod svg;

pub use dxfkit_core::{
    AdaptiveStepper, ConfigError, DxfError, Error, FixedPathConfig, Frnn2D, GeomError, Path,
    PathConfig, Point2, PointBudget, Result, Transform2, Unit, Vec2,
};
pub use dxfkit_import::{AsciiRecordReader, BSpline, Drawing, RecordReader};
pub use dxfkit_route::{
    join_paths, optimize_route, route_optimized, sierpinski_index, JoinOutcome, RouteOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

//! # DxfKit Core
//!
//! Geometry primitives and format-independent utilities for DxfKit.
//! Provides the plane algebra, the adaptive curve stepper, the
//! fixed-radius neighbor index, physical units, and the shared error
//! taxonomy used by the import and routing crates.

pub mod budget;
pub mod circular;
pub mod config;
pub mod constants;
pub mod error;
pub mod frnn;
pub mod geom;
pub mod path;
pub mod stepper;
pub mod units;

pub use budget::PointBudget;
pub use circular::{CircularDesc, CircularInfo};
pub use config::{FixedPathConfig, PathConfig};
pub use error::{ConfigError, DxfError, Error, GeomError, Result};
pub use frnn::Frnn2D;
pub use geom::{Point2, Transform2, Vec2, Vec3};
pub use path::Path;
pub use stepper::AdaptiveStepper;
pub use units::{known_units, Unit};

//! # Path Generation Configuration
//!
//! Sampling parameters are queried per generated path, so callers can vary
//! precision or point spacing across one import. Most users just want the
//! same numbers everywhere, which [`FixedPathConfig`] provides.

use crate::circular::CircularDesc;
use crate::constants::DEFAULT_MAX_ERROR;

/// Per-path sampling parameters.
///
/// `path_idx` is the index the path will have in the generated output.
/// Implementations may keep state, hence `&mut self`.
pub trait PathConfig {
    /// Start angle in degrees for a full circle or ellipse about to be
    /// sampled. The shape is described by `desc`.
    fn circle_start_angle(&mut self, path_idx: usize, desc: &CircularDesc) -> f64;

    /// Upper bound on the distance between consecutive sampled points, or
    /// `None` for no bound.
    fn max_dist(&mut self, path_idx: usize) -> Option<f64>;

    /// Chord error bound for curve flattening, in output units.
    fn max_error(&mut self, path_idx: usize) -> f64;
}

/// The same sampling parameters for every path.
#[derive(Debug, Clone, Copy)]
pub struct FixedPathConfig {
    pub max_error: f64,
    pub max_dist: Option<f64>,
    pub start_angle: f64,
}

impl Default for FixedPathConfig {
    fn default() -> Self {
        FixedPathConfig {
            max_error: DEFAULT_MAX_ERROR,
            max_dist: None,
            start_angle: 0.0,
        }
    }
}

impl FixedPathConfig {
    pub fn new(max_error: f64, max_dist: Option<f64>) -> Self {
        FixedPathConfig {
            max_error,
            max_dist,
            start_angle: 0.0,
        }
    }
}

impl PathConfig for FixedPathConfig {
    fn circle_start_angle(&mut self, _path_idx: usize, _desc: &CircularDesc) -> f64 {
        self.start_angle
    }

    fn max_dist(&mut self, _path_idx: usize) -> Option<f64> {
        self.max_dist
    }

    fn max_error(&mut self, _path_idx: usize) -> f64 {
        self.max_error
    }
}

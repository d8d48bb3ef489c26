//! # Shared Constants
//!
//! Defaults and tuning values used across the import and routing crates.

use std::f64::consts::FRAC_PI_2;

/// Default chord error bound in output units (millimeters).
pub const DEFAULT_MAX_ERROR: f64 = 0.5;

/// Default cap on the total number of generated path points.
pub const DEFAULT_MAX_POINTS: usize = 100 * 1000;

/// Smallest parameter step the adaptive stepper will take.
pub const MIN_PARAM_STEP: f64 = 0.0000001;

/// Largest parameter step on angular curves, a quarter turn.
pub const MAX_ANGLE_STEP: f64 = FRAC_PI_2;

/// Largest parameter step when sampling splines over their knot domain.
pub const MAX_SPLINE_STEP: f64 = 1.0;

//! # Circular Path Descriptions
//!
//! Full circles and ellipses keep an analytic description next to their
//! sampled points so later stages can recognize geometrically equal shapes
//! no matter how the axes were oriented or signed in the input file.

use crate::geom::{Point2, Vec2};

/// Analytic description of a circle or ellipse in output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularDesc {
    pub center: Point2,
    /// Vector from the center to one end of the major axis.
    pub major: Vec2,
    /// Vector from the center to one end of the minor axis.
    pub minor: Vec2,
}

/// A [`CircularDesc`] plus the angle the sampled path starts at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularInfo {
    pub desc: CircularDesc,
    /// Start angle in degrees, measured from the positive x axis.
    pub start_angle: f64,
}

/// Picks a canonical sign for an axis so that mirrored axes compare equal.
fn canonical_axis(v: Vec2) -> Vec2 {
    if v.x.abs() > v.y.abs() {
        if v.x < 0.0 {
            return v * -1.0;
        }
    } else if v.y < 0.0 {
        return v * -1.0;
    }
    v
}

impl CircularDesc {
    /// Tests whether two descriptions denote the same shape within
    /// `max_error`.
    ///
    /// Circles of equal radius match regardless of where their axes point.
    /// Ellipses match when their axes agree after sign and order
    /// normalization, so swapped or negated axis vectors do not matter.
    pub fn approx_eq(&self, other: &CircularDesc, max_error: f64) -> bool {
        debug_assert!(max_error > 0.0);
        let sq_me = max_error * max_error;
        if self.center.sq_distance(other.center) > sq_me {
            return false;
        }

        // Equal-radius circles: all axis orientations describe the same shape.
        let sq_ra = self.minor.sq_length();
        let sq_rb = other.minor.sq_length();
        if (sq_ra - sq_rb).abs() <= sq_me
            && (sq_ra - self.major.sq_length()).abs() <= sq_me
            && (sq_rb - other.major.sq_length()).abs() <= sq_me
            && self.minor.dot(self.major).abs() <= sq_me
            && other.minor.dot(other.major).abs() <= sq_me
        {
            return true;
        }

        let sort_by_length = |a: Vec2, b: Vec2| {
            if a.sq_length() > b.sq_length() {
                (b, a)
            } else {
                (a, b)
            }
        };
        let (a1, a2) = sort_by_length(canonical_axis(self.minor), canonical_axis(self.major));
        let (b1, b2) = sort_by_length(canonical_axis(other.minor), canonical_axis(other.major));
        (a1 - b1).sq_length() <= sq_me && (a2 - b2).sq_length() <= sq_me
    }
}

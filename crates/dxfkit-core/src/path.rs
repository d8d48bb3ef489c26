//! # Toolpath Representation
//!
//! A [`Path`] is a polyline in output coordinates (millimeters) plus the
//! flags the joining and routing stages need: whether the path closes on
//! itself, whether its direction or start vertex may be changed, and which
//! input paths it was merged from.

use std::collections::BTreeSet;

use crate::circular::CircularInfo;
use crate::geom::Point2;

/// A flattened path through the drawing plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Vertices in traversal order. Never empty for generated paths.
    pub points: Vec<Point2>,
    /// The last vertex connects back to the first; the closing point is not
    /// stored again.
    pub cyclic: bool,
    /// Set when the path traces a full circle or ellipse, carrying its
    /// analytic description for downstream matching.
    pub circular: Option<CircularInfo>,
    /// The path is an exact circle (not merely elliptic).
    pub is_circle: bool,
    /// Routing may pick a different start vertex.
    pub optimize_start: bool,
    /// Traversal direction is meaningful and must not be reversed unless
    /// the caller explicitly allows it.
    pub directed: bool,
    /// At least one segment was sampled from a curve.
    pub curved: bool,
    /// Indices of the originally imported paths this one covers.
    pub source_path_indices: BTreeSet<usize>,
}

impl Default for Path {
    fn default() -> Self {
        Path {
            points: Vec::new(),
            cyclic: false,
            circular: None,
            is_circle: false,
            optimize_start: false,
            directed: true,
            curved: false,
            source_path_indices: BTreeSet::new(),
        }
    }
}

impl Path {
    /// First vertex. Panics if the path has no points.
    pub fn start_point(&self) -> Point2 {
        self.points[0]
    }

    /// Where traversal ends: the first vertex for cyclic paths, the last
    /// one otherwise. Panics if the path has no points.
    pub fn end_point(&self) -> Point2 {
        if self.cyclic {
            self.points[0]
        } else {
            self.points[self.points.len() - 1]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let path = Path::default();
        assert!(!path.cyclic);
        assert!(!path.is_circle);
        assert!(!path.optimize_start);
        assert!(path.directed);
        assert!(!path.curved);
        assert!(path.circular.is_none());
        assert!(path.source_path_indices.is_empty());
    }

    #[test]
    fn test_end_point_open_path() {
        let path = Path {
            points: vec![Point2::new(0.0, 0.0), Point2::new(2.0, 3.0)],
            ..Path::default()
        };
        assert_eq!(path.start_point(), Point2::new(0.0, 0.0));
        assert_eq!(path.end_point(), Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_end_point_cyclic_path() {
        let path = Path {
            points: vec![
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 1.0),
                Point2::new(2.0, 2.0),
            ],
            cyclic: true,
            ..Path::default()
        };
        assert_eq!(path.end_point(), path.start_point());
    }
}

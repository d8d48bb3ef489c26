//! # B-Spline Evaluation
//!
//! Cox-de Boor evaluation of the non-rational B-splines found in SPLINE
//! entities. The knot vector comes straight from the file, so the curve is
//! evaluated over its stated knot domain rather than a normalized one.

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::geom::Point2;

/// A planar B-spline defined by degree, control points, and knots.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    ctl: Vec<Point2>,
    knots: Vec<f64>,
}

/// Degree-`p` basis function `i`, by the Cox-de Boor recursion. The final
/// span is treated as closed on the right so the domain end evaluates to
/// the curve end instead of zero.
fn basis(i: usize, p: usize, u: f64, knots: &[f64], dmax: f64) -> f64 {
    if p == 0 {
        let inside = u >= knots[i] && u < knots[i + 1]
            || u == dmax && knots[i] < u && u <= knots[i + 1];
        return if inside { 1.0 } else { 0.0 };
    }
    let denom1 = knots[i + p] - knots[i];
    let denom2 = knots[i + p + 1] - knots[i + 1];
    let term1 = if denom1.abs() < f64::EPSILON {
        0.0
    } else {
        (u - knots[i]) / denom1 * basis(i, p - 1, u, knots, dmax)
    };
    let term2 = if denom2.abs() < f64::EPSILON {
        0.0
    } else {
        (knots[i + p + 1] - u) / denom2 * basis(i + 1, p - 1, u, knots, dmax)
    };
    term1 + term2
}

impl BSpline {
    /// Validates the spline data and builds an evaluator.
    pub fn new(degree: i32, ctl: Vec<Point2>, knots: Vec<f64>) -> Result<Self> {
        if degree < 0 {
            return Err(DxfError::InvalidSpline {
                reason: format!("negative degree {}", degree),
            }
            .into());
        }
        let degree = degree as usize;
        if ctl.len() <= degree {
            return Err(DxfError::InvalidSpline {
                reason: format!(
                    "{} control points cannot support degree {}",
                    ctl.len(),
                    degree
                ),
            }
            .into());
        }
        if knots.len() != ctl.len() + degree + 1 {
            return Err(DxfError::InvalidSpline {
                reason: format!(
                    "expected {} knot values, found {}",
                    ctl.len() + degree + 1,
                    knots.len()
                ),
            }
            .into());
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(DxfError::InvalidSpline {
                reason: "knot values must not decrease".to_string(),
            }
            .into());
        }
        Ok(BSpline { degree, ctl, knots })
    }

    /// The parameter interval the curve is defined over.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.knots.len() - 1 - self.degree],
        )
    }

    /// Point on the curve at parameter `u`, which must lie within
    /// [`domain`](Self::domain).
    pub fn eval(&self, u: f64) -> Point2 {
        let (_, dmax) = self.domain();
        let mut x = 0.0;
        let mut y = 0.0;
        for (i, p) in self.ctl.iter().enumerate() {
            let b = basis(i, self.degree, u, &self.knots, dmax);
            x += b * p.x;
            y += b * p.y;
        }
        Point2::new(x, y)
    }
}

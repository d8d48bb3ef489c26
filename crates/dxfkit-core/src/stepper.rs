//! # Adaptive Curve Sampling
//!
//! Walks a parametric curve with a self-adjusting parameter step. A step is
//! accepted when the curve point at the middle of the step lies within the
//! error bound of the sampled chord's midpoint. Failed steps are halved,
//! and after a clean step the walker probes whether doubling still holds
//! the bound, so flat stretches are crossed in few samples while tight
//! curvature gets dense ones.

use crate::geom::Point2;

/// Adaptive sampler over a parametric curve `f`.
///
/// The parameter grows monotonically from the start position. The current
/// sample is available through [`cur_point`](Self::cur_point) and
/// [`cur_pos`](Self::cur_pos); [`advance`](Self::advance) moves to the next
/// sample. The caller decides when to stop, usually once the parameter
/// passes the end of the curve's domain.
pub struct AdaptiveStepper<F> {
    esq: f64,
    max_dist: Option<f64>,
    min_step: f64,
    max_step: f64,
    pos: f64,
    step: f64,
    point: Point2,
    f: F,
}

impl<F: FnMut(f64) -> Point2> AdaptiveStepper<F> {
    /// Creates a stepper positioned at `start_pos`.
    ///
    /// `max_error` bounds the chord deviation, `max_dist` optionally bounds
    /// the spatial distance between consecutive samples, and the step is
    /// kept within `min_step..=max_step`.
    pub fn new(
        max_error: f64,
        max_dist: Option<f64>,
        min_step: f64,
        max_step: f64,
        start_pos: f64,
        mut f: F,
    ) -> Self {
        debug_assert!(max_error > 0.0);
        debug_assert!(min_step > 0.0 && min_step <= max_step);
        let point = f(start_pos);
        AdaptiveStepper {
            esq: max_error * max_error,
            max_dist,
            min_step,
            max_step,
            pos: start_pos,
            step: max_step,
            point,
            f,
        }
    }

    /// The current sample point.
    pub fn cur_point(&self) -> Point2 {
        self.point
    }

    /// The parameter value of the current sample.
    pub fn cur_pos(&self) -> f64 {
        self.pos
    }

    /// Moves to the next sample.
    pub fn advance(&mut self) {
        let old_point = self.point;
        let old_pos = self.pos;
        self.curve_step();
        if let Some(max_dist) = self.max_dist {
            if old_point.distance(self.point) > max_dist {
                // Bisect the parameter interval until the spatial distance
                // to the previous sample drops to the bound.
                let mut a = old_pos;
                let mut b = self.pos;
                for _ in 0..32 {
                    self.pos = (a + b) * 0.5;
                    self.point = (self.f)(self.pos);
                    if old_point.distance(self.point) > max_dist {
                        b = self.pos;
                    } else {
                        a = self.pos;
                    }
                }
            }
        }
    }

    fn curve_step(&mut self) {
        let mut next = (self.f)(self.pos + self.step);
        let mut ideal_mid = (self.f)(self.pos + self.step * 0.5);
        let mut line_mid = self.point.midpoint(next);
        let mut decreased = false;
        while ideal_mid.sq_distance(line_mid) > self.esq {
            self.step *= 0.5;
            if self.step <= self.min_step {
                self.step = self.min_step;
                self.pos += self.step;
                self.point = (self.f)(self.pos);
                return;
            }
            decreased = true;
            next = ideal_mid;
            ideal_mid = (self.f)(self.pos + self.step * 0.5);
            line_mid = self.point.midpoint(next);
        }
        if decreased {
            self.pos += self.step;
            self.point = next;
            return;
        }

        // The current step held the bound without shrinking; probe growth.
        let mut next = (self.f)(self.pos + 2.0 * self.step);
        let mut ideal_mid = (self.f)(self.pos + self.step);
        let mut line_mid = self.point.midpoint(next);
        let mut last_len = 0.0;
        loop {
            let cur_len = ideal_mid.sq_distance(line_mid);
            if cur_len > self.esq {
                break;
            }
            // A non-growing deviation means the curve is locally straight
            // or degenerate; growing further gains nothing.
            if cur_len <= last_len {
                break;
            }
            last_len = cur_len;
            self.step *= 2.0;
            if self.step >= self.max_step {
                self.step = self.max_step;
                self.pos += self.step;
                self.point = (self.f)(self.pos);
                return;
            }
            ideal_mid = next;
            next = (self.f)(self.pos + 2.0 * self.step);
            line_mid = self.point.midpoint(next);
        }
        self.pos += self.step;
        self.point = ideal_mid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_starts_at_curve_start() {
        let stepper = AdaptiveStepper::new(0.1, None, 1e-7, 1.0, 2.5, |u| {
            Point2::new(u, 2.0 * u)
        });
        assert_eq!(stepper.cur_pos(), 2.5);
        assert_eq!(stepper.cur_point(), Point2::new(2.5, 5.0));
    }

    #[test]
    fn test_straight_line_advances_by_max_step() {
        let mut stepper =
            AdaptiveStepper::new(0.01, None, 1e-7, 0.25, 0.0, |u| Point2::new(u, 0.0));
        stepper.advance();
        assert!((stepper.cur_pos() - 0.25).abs() < 1e-12);
        stepper.advance();
        assert!((stepper.cur_pos() - 0.5).abs() < 1e-12);
        assert_eq!(stepper.cur_point(), Point2::new(stepper.cur_pos(), 0.0));
    }

    #[test]
    fn test_circle_chords_stay_within_error_bound() {
        let radius = 5.0;
        let max_error = 0.1;
        let mut stepper = AdaptiveStepper::new(max_error, None, 1e-7, FRAC_PI_2, 0.0, |u| {
            Point2::new(radius * u.cos(), radius * u.sin())
        });

        let mut positions = vec![stepper.cur_pos()];
        while stepper.cur_pos() < 2.0 * PI {
            stepper.advance();
            positions.push(stepper.cur_pos());
        }

        // Sagitta of each accepted arc segment must respect the bound.
        for pair in positions.windows(2) {
            let theta = pair[1] - pair[0];
            assert!(theta > 0.0);
            let sagitta = radius * (1.0 - (theta * 0.5).cos());
            assert!(
                sagitta <= max_error * 1.0001,
                "sagitta {} exceeds bound",
                sagitta
            );
        }
        // Must subdivide a full turn into a reasonable number of chords.
        assert!(positions.len() >= 10 && positions.len() <= 40);
    }

    #[test]
    fn test_step_clamped_to_min_on_sharp_curvature() {
        // Steep parabola whose chord error stays above the bound for any
        // step larger than the floor.
        let mut stepper = AdaptiveStepper::new(1e-9, None, 0.01, 1.0, 0.0, |u| {
            Point2::new(u, 1e6 * u * u)
        });
        stepper.advance();
        assert!((stepper.cur_pos() - 0.01).abs() < 1e-15);
        assert!((stepper.cur_point().x - 0.01).abs() < 1e-15);
        assert!((stepper.cur_point().y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_grows_on_flattening_curve() {
        // Hyperbola branch that straightens out as u grows.
        let mut stepper = AdaptiveStepper::new(0.1, None, 1e-7, 64.0, 1.0, |u| {
            Point2::new(u, 100.0 / u)
        });
        let mut deltas = Vec::new();
        let mut last = stepper.cur_pos();
        for _ in 0..25 {
            stepper.advance();
            deltas.push(stepper.cur_pos() - last);
            last = stepper.cur_pos();
        }
        let first = deltas[0];
        let max = deltas.iter().cloned().fold(0.0_f64, f64::max);
        assert!(
            max > first * 2.0,
            "expected growth, first {} max {}",
            first,
            max
        );
    }

    #[test]
    fn test_max_dist_bisects_long_jumps() {
        // Spatially fast curve: one parameter unit covers ten units of
        // distance, so the distance cap cuts each step to about a tenth.
        let mut stepper = AdaptiveStepper::new(10.0, Some(1.0), 1e-9, 1.0, 0.0, |u| {
            Point2::new(10.0 * u, 0.0)
        });
        stepper.advance();
        assert!((stepper.cur_point().x - 1.0).abs() < 1e-6);

        let prev = stepper.cur_point();
        stepper.advance();
        let dist = prev.distance(stepper.cur_point());
        assert!(dist <= 1.0 + 1e-6);
    }

    proptest! {
        #[test]
        fn test_chord_deviation_respects_the_bound(
            radius in 0.5f64..40.0,
            max_error in 0.01f64..0.5,
        ) {
            let mut stepper = AdaptiveStepper::new(max_error, None, 1e-7, FRAC_PI_2, 0.0, |u| {
                Point2::new(radius * u.cos(), radius * u.sin())
            });
            let mut prev = stepper.cur_pos();
            while stepper.cur_pos() < 2.0 * PI {
                stepper.advance();
                let theta = stepper.cur_pos() - prev;
                prop_assert!(theta > 0.0);
                let sagitta = radius * (1.0 - (theta * 0.5).cos());
                prop_assert!(
                    sagitta <= max_error * 1.0001,
                    "sagitta {} exceeds bound {}",
                    sagitta,
                    max_error
                );
                prev = stepper.cur_pos();
            }
        }
    }
}

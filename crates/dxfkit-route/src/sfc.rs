//! # Space-Filling Curve
//!
//! Discretized Sierpinski curve index over the unit square. Sorting points
//! by this index gives an ordering in which spatial neighbors tend to be
//! adjacent, which seeds the route optimizer with a decent tour at almost
//! no cost.

use dxfkit_core::Vec2;

/// Position of a point along a discretized Sierpinski space-filling curve
/// over the unit square.
///
/// Both coordinates must lie in `[0, 1]`. The curve is resolved to 2^30
/// cells per axis, so points closer together than that may map to the same
/// index.
///
/// See <https://www2.isye.gatech.edu/~jjb/research/mow/mow.pdf>.
pub fn sierpinski_index(v: Vec2) -> u64 {
    const MAX_INPUT: u64 = 1 << 30;

    debug_assert!((0.0..=1.0).contains(&v.x));
    debug_assert!((0.0..=1.0).contains(&v.y));

    let limit = MAX_INPUT as f64;
    let mut x = v.x * limit;
    let mut y = v.y * limit;

    let mut loop_index = MAX_INPUT;
    let mut result: u64 = 0;

    if x > y {
        result += 1;
        x = limit - x;
        y = limit - y;
    }

    while loop_index > 0 {
        result *= 2;

        if x + y > limit {
            result += 1;
            let old_x = x;
            x = limit - y;
            y = old_x;
        }

        x *= 2.0;
        y *= 2.0;

        result *= 2;

        if y > limit {
            result += 1;
            let old_x = x;
            x = y - limit;
            y = limit - old_x;
        }

        loop_index /= 2;
    }

    result
}

//! # Route Optimization
//!
//! Orders paths to minimize the travel between them. A space-filling-curve
//! pass seeds the ordering; local search passes then swap neighbors, flip
//! directions and rotate start vertices while that keeps reducing the
//! total overhead.

use dxfkit_core::{GeomError, Path, Point2, Result};
use tracing::debug;

use crate::sfc::sierpinski_index;

/// Upper bound on improvement passes in [`optimize_route`].
const MAX_IMPROVEMENT_PASSES: usize = 100;

/// What the local improvement passes are allowed to touch.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    /// Allow reversing the direction of open paths.
    pub optimize_direction: bool,
    /// Allow any vertex of a cyclic path as its starting point.
    pub optimize_start: bool,
}

/// Travel needed to visit every path in order, including the hop from the
/// last path back to the first.
pub fn overhead(paths: &[Path]) -> f64 {
    let mut sum = 0.0;
    if let Some(last) = paths.last() {
        let mut prev = last.end_point();
        for path in paths {
            sum += prev.distance(path.start_point());
            prev = path.end_point();
        }
    }
    sum
}

/// Returns the paths ordered along a space-filling curve, rotated to the
/// best candidate start vertex where allowed.
///
/// Candidate entry points are every vertex for rotatable cyclic paths and
/// the nominal start (plus the far end when the direction is free) for
/// everything else. Sorting the candidates by their curve index and taking
/// each path at its first appearance interleaves start selection with
/// ordering. Fails when all points coincide, since the curve needs a
/// nonzero bounding box to normalize against.
pub fn route_optimized(paths: &[Path]) -> Result<Vec<Path>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let mut min = paths[0].start_point();
    let mut max = min;
    for path in paths {
        for p in &path.points {
            min = min.component_min(*p);
            max = max.component_max(*p);
        }
    }

    let size = max - min;
    let d = size.x.max(size.y);
    if d == 0.0 {
        return Err(GeomError::ZeroExtent.into());
    }
    let s = 1.0 / d;

    let serp = |p: Point2| sierpinski_index((p - min) * s);

    // (curve index, path, vertex)
    let mut candidates: Vec<(u64, usize, usize)> = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        if path.cyclic {
            for (j, p) in path.points.iter().enumerate() {
                candidates.push((serp(*p), i, j));
                if !path.optimize_start {
                    break;
                }
            }
        } else {
            candidates.push((serp(path.start_point()), i, 0));
            if path.optimize_start {
                candidates.push((serp(path.end_point()), i, path.points.len() - 1));
            }
        }
    }

    candidates.sort_by_key(|&(idx, _, _)| idx);

    let mut used = vec![false; paths.len()];
    let mut ret = Vec::with_capacity(paths.len());
    for (_, i, j) in candidates {
        if used[i] || (!paths[i].optimize_start && j != 0) {
            continue;
        }
        used[i] = true;

        let path = &paths[i];
        if path.optimize_start && path.cyclic {
            let mut opt = path.clone();
            opt.points.rotate_left(j);
            ret.push(opt);
        } else {
            ret.push(path.clone());
        }
    }
    debug_assert_eq!(ret.len(), paths.len());

    Ok(ret)
}

/// Swaps a path with its successor wherever that shortens the travel
/// between the surrounding paths. Returns whether any swap was applied.
pub fn improve_order_locally(paths: &mut [Path]) -> bool {
    if paths.len() < 3 {
        return false;
    }

    let n = paths.len();
    // Travel between four paths visited in the given order.
    let window = |paths: &[Path], idxs: [usize; 4]| {
        let mut sum = 0.0;
        for w in idxs.windows(2) {
            sum += paths[w[0]].end_point().distance(paths[w[1]].start_point());
        }
        sum
    };

    let mut was_useful = false;
    for i in 0..n {
        let a = [i, (i + 1) % n, (i + 2) % n, (i + 3) % n];
        let b = [i, (i + 2) % n, (i + 1) % n, (i + 3) % n];

        if window(paths, a) > window(paths, b) {
            paths.swap(a[1], a[2]);
            was_useful = true;
        }
    }

    was_useful
}

/// Reverses each open path that allows start optimization when the flipped
/// direction sits better between its two neighbors.
pub fn improve_dirs_locally(paths: &mut [Path]) {
    if paths.len() < 2 {
        return;
    }

    let n = paths.len();
    for i in 0..n {
        if !paths[i].optimize_start
            || paths[i].cyclic
            || paths[i].start_point() == paths[i].end_point()
        {
            continue;
        }

        let prev_end = paths[(i + n - 1) % n].end_point();
        let next_start = paths[(i + 1) % n].start_point();
        let start = paths[i].start_point();
        let end = paths[i].end_point();

        let keep = prev_end.distance(start) + end.distance(next_start);
        let flip = prev_end.distance(end) + start.distance(next_start);

        if flip < keep {
            paths[i].points.reverse();
        }
    }
}

/// Rotates the start vertex of cyclic paths that allow it, one step at a
/// time while the travel to the surrounding paths keeps shrinking.
/// Returns adjusted copies of all paths.
pub fn improve_start_positions(paths: &[Path]) -> Vec<Path> {
    if paths.len() < 2 {
        return paths.to_vec();
    }

    let n = paths.len();
    let mut rotations = vec![0usize; n];

    // Travel through the candidate start vertex of the middle path, from
    // the effective end of its predecessor to the chosen start of its
    // successor.
    let length = |rotations: &[usize], i: usize, rotation: usize| {
        let i_left = (i + n - 1) % n;
        let i_right = (i + 1) % n;
        let left = &paths[i_left];
        let mid = &paths[i];
        let right = &paths[i_right];

        debug_assert!(mid.cyclic && mid.optimize_start);
        debug_assert!(rotation < mid.points.len());

        let a = if left.cyclic {
            left.points[rotations[i_left]]
        } else {
            left.end_point()
        };
        let b = mid.points[rotation];
        let c = right.points[rotations[i_right]];

        a.distance(b) + b.distance(c)
    };

    loop {
        let mut made_progress = false;

        for i in 0..n {
            let path = &paths[i];
            if !path.cyclic || !path.optimize_start {
                continue;
            }
            let len = path.points.len();

            let org = length(&rotations, i, rotations[i]);
            for rot in [(rotations[i] + len - 1) % len, (rotations[i] + 1) % len] {
                if length(&rotations, i, rot) < org {
                    rotations[i] = rot;
                    made_progress = true;
                    break;
                }
            }
        }

        if !made_progress {
            break;
        }
    }

    paths
        .iter()
        .zip(&rotations)
        .map(|(path, &rot)| {
            let mut opt = path.clone();
            opt.points.rotate_left(rot);
            opt
        })
        .collect()
}

/// Full optimization driver: seeds the order along the space-filling
/// curve, applies the per-path start policy from `options`, then repeats
/// the start, order and direction passes while the total overhead keeps
/// strictly decreasing, up to a fixed pass limit.
pub fn optimize_route(paths: Vec<Path>, options: RouteOptions) -> Result<Vec<Path>> {
    let mut paths = route_optimized(&paths)?;

    for path in &mut paths {
        path.optimize_start =
            options.optimize_direction || (path.cyclic && options.optimize_start);
    }

    let mut best = overhead(&paths);
    for _ in 0..MAX_IMPROVEMENT_PASSES {
        let mut opt = if options.optimize_start {
            improve_start_positions(&paths)
        } else {
            paths.clone()
        };
        improve_order_locally(&mut opt);
        improve_dirs_locally(&mut opt);

        let x = overhead(&opt);
        if x >= best {
            break;
        }
        paths = opt;
        best = x;
    }

    debug!("Route settled at a travel overhead of {}", best);
    Ok(paths)
}

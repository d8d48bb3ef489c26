//! # Path Generation
//!
//! Flattens drawing entities into polyline [`Path`]s in millimeter
//! coordinates. Curved entities are sampled adaptively against the
//! configured chord error, INSERT entities are expanded recursively with
//! their block transform, and every generated point counts against a hard
//! budget so dense inputs cannot exhaust memory.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use dxfkit_core::budget::PointBudget;
use dxfkit_core::circular::{CircularDesc, CircularInfo};
use dxfkit_core::config::PathConfig;
use dxfkit_core::constants::{MAX_ANGLE_STEP, MAX_SPLINE_STEP, MIN_PARAM_STEP};
use dxfkit_core::error::{ConfigError, DxfError, Result};
use dxfkit_core::geom::{Point2, Transform2, Vec2};
use dxfkit_core::path::Path;
use dxfkit_core::stepper::AdaptiveStepper;
use dxfkit_core::units::Unit;

use crate::drawing::Drawing;
use crate::entity::{Arc, Block, Circle, Ellipse, Entities, Insert, Line, PlVertex, PolyLine, Spline};
use crate::spline::BSpline;

/// Generates paths for every entity in the drawing.
///
/// `unit` overrides the unit stated in the file header; without either the
/// geometry has no physical dimension and generation fails. Paths come out
/// in entity order with their index recorded in `source_path_indices`.
pub(crate) fn create_paths(
    drawing: &Drawing,
    unit: Option<Unit>,
    cfg: &mut dyn PathConfig,
    max_points: usize,
) -> Result<Vec<Path>> {
    let scale = match unit.or(drawing.unit) {
        Some(u) => u.to_millimeters(),
        None => return Err(ConfigError::MissingUnit.into()),
    };
    debug!("Scaling drawing units to millimeters with factor {}", scale);

    let blocks: HashMap<&str, &Block> = drawing
        .blocks
        .iter()
        .map(|b| (b.name.as_str(), b))
        .collect();

    let mut st = BuildState {
        cfg,
        budget: PointBudget::new(max_points),
        active_blocks: Vec::new(),
        paths: Vec::new(),
    };
    flatten_into(
        &drawing.entities,
        Transform2::scaling(scale),
        &blocks,
        &mut st,
    )?;
    debug!(
        "Generated {} paths using {} points",
        st.paths.len(),
        st.budget.used()
    );

    let mut paths = st.paths;
    for (i, path) in paths.iter_mut().enumerate() {
        path.source_path_indices.insert(i);
    }
    Ok(paths)
}

/// Mutable state threaded through entity flattening.
struct BuildState<'a> {
    cfg: &'a mut dyn PathConfig,
    budget: PointBudget,
    /// Names of the blocks currently being expanded, used to detect
    /// self-referential INSERT chains.
    active_blocks: Vec<String>,
    paths: Vec<Path>,
}

fn flatten_into(
    ents: &Entities,
    trans: Transform2,
    blocks: &HashMap<&str, &Block>,
    st: &mut BuildState<'_>,
) -> Result<()> {
    flatten_inserts(&ents.inserts, trans, blocks, st)?;
    flatten_lines(&ents.lines, trans, st)?;
    flatten_polylines(&ents.polylines, trans, st)?;
    flatten_circles(&ents.circles, trans, st)?;
    flatten_arcs(&ents.arcs, trans, st)?;
    flatten_ellipses(&ents.ellipses, trans, st)?;
    flatten_splines(&ents.splines, trans, st)?;
    Ok(())
}

fn flatten_inserts(
    inserts: &[Insert],
    trans: Transform2,
    blocks: &HashMap<&str, &Block>,
    st: &mut BuildState<'_>,
) -> Result<()> {
    for ins in inserts {
        let block = blocks
            .get(ins.block_name.as_str())
            .copied()
            .ok_or_else(|| DxfError::UnknownBlock {
                name: ins.block_name.clone(),
            })?;
        if st.active_blocks.iter().any(|n| *n == ins.block_name) {
            return Err(DxfError::CyclicBlock {
                name: ins.block_name.clone(),
            }
            .into());
        }

        let a = ins.rotation.to_radians();
        let x = Vec2::new(a.cos(), a.sin());
        let y = x.ortho();

        st.active_blocks.push(ins.block_name.clone());
        for col in 0..ins.cols {
            for row in 0..ins.rows {
                let bt = Transform2 {
                    x: x * ins.x_scale,
                    y: y * ins.y_scale,
                    base: ins.pos
                        + x * (col as f64 * ins.col_spacing)
                        + y * (row as f64 * ins.row_spacing),
                };
                flatten_into(&block.ents, trans * bt, blocks, st)?;
            }
        }
        st.active_blocks.pop();
    }
    Ok(())
}

fn flatten_lines(lines: &[Line], trans: Transform2, st: &mut BuildState<'_>) -> Result<()> {
    for line in lines {
        let mut path = Path::default();
        let start = trans * line.start;
        st.budget.take()?;
        path.points.push(start);
        let max_dist = st.cfg.max_dist(st.paths.len());
        sample_line(
            &mut path.points,
            max_dist,
            start,
            trans * line.end,
            &mut st.budget,
        )?;
        st.paths.push(path);
    }
    Ok(())
}

fn flatten_polylines(
    polylines: &[PolyLine],
    trans: Transform2,
    st: &mut BuildState<'_>,
) -> Result<()> {
    for pl in polylines {
        if pl.points.is_empty() {
            continue;
        }
        let path_idx = st.paths.len();
        let mut path = Path::default();
        st.budget.take()?;
        path.points.push(trans * pl.points[0].pos);
        for i in 1..pl.points.len() {
            polyline_segment(&mut path, &pl.points[i - 1], &pl.points[i], trans, path_idx, st)?;
        }
        if pl.closed {
            let last = pl.points.len() - 1;
            polyline_segment(&mut path, &pl.points[last], &pl.points[0], trans, path_idx, st)?;
            path.cyclic = true;
            path.points.pop();
        }
        // A closed single-vertex polyline can collapse to nothing.
        if path.points.is_empty() {
            continue;
        }
        st.paths.push(path);
    }
    Ok(())
}

/// Appends the segment from `prev` to `next`, either as a sampled straight
/// line or as a bulge arc. The bulge is the tangent of a quarter of the
/// included angle; its sign selects the side the arc bows out to.
fn polyline_segment(
    path: &mut Path,
    prev: &PlVertex,
    next: &PlVertex,
    trans: Transform2,
    path_idx: usize,
    st: &mut BuildState<'_>,
) -> Result<()> {
    if prev.bulge == 0.0 {
        let max_dist = st.cfg.max_dist(path_idx);
        sample_line(
            &mut path.points,
            max_dist,
            trans * prev.pos,
            trans * next.pos,
            &mut st.budget,
        )?;
        return Ok(());
    }

    path.curved = true;
    let bulge = prev.bulge;
    let mid = next.pos.midpoint(prev.pos);
    let tip = mid + (mid - next.pos).ortho() * bulge;
    let cc = (tip - next.pos).sq_length();
    let a = mid.distance(tip);
    let r = 0.5 * cc / a;
    let beta = PI - (a / cc.sqrt()).acos() * 2.0;

    let y = (mid - tip).normalized();
    let x = y.ortho();
    let center = tip + y * r;

    let max_error = st.cfg.max_error(path_idx);
    let max_dist = st.cfg.max_dist(path_idx);
    let mut stepper = AdaptiveStepper::new(
        max_error,
        max_dist,
        MIN_PARAM_STEP,
        MAX_ANGLE_STEP,
        0.0,
        |su| {
            let u = if bulge > 0.0 { beta - su } else { su - beta };
            let bx = (u - FRAC_PI_2).cos() * r;
            let by = (u - FRAC_PI_2).sin() * r;
            trans * (center + x * bx + y * by)
        },
    );
    stepper.advance();

    while stepper.cur_pos() < 2.0 * beta {
        st.budget.take()?;
        path.points.push(stepper.cur_point());
        stepper.advance();
    }

    st.budget.take()?;
    path.points.push(trans * next.pos);
    Ok(())
}

fn flatten_circles(circles: &[Circle], trans: Transform2, st: &mut BuildState<'_>) -> Result<()> {
    for c in circles {
        let desc = CircularDesc {
            center: trans * c.center,
            major: trans * Vec2::new(c.radius, 0.0),
            minor: trans * Vec2::new(0.0, c.radius),
        };
        let start_angle = st.cfg.circle_start_angle(st.paths.len(), &desc);
        let max_error = st.cfg.max_error(st.paths.len());
        let max_dist = st.cfg.max_dist(st.paths.len());
        let start_rad = start_angle.to_radians();

        let mut stepper = AdaptiveStepper::new(
            max_error,
            max_dist,
            MIN_PARAM_STEP,
            MAX_ANGLE_STEP,
            0.0,
            |u| trans * c.plot(u + start_rad),
        );
        let mut path = Path::default();
        while stepper.cur_pos() < 2.0 * PI {
            st.budget.take()?;
            path.points.push(stepper.cur_point());
            stepper.advance();
        }

        path.cyclic = true;
        path.circular = Some(CircularInfo { desc, start_angle });
        path.is_circle = true;
        path.optimize_start = true;
        path.directed = false;
        path.curved = true;
        st.paths.push(path);
    }
    Ok(())
}

fn flatten_arcs(arcs: &[Arc], trans: Transform2, st: &mut BuildState<'_>) -> Result<()> {
    for arc in arcs {
        let start = arc.start_angle % 360.0;
        let mut end = arc.end_angle % 360.0;
        if end <= start {
            end += 360.0;
        }
        let start = start.to_radians();
        let end = end.to_radians();

        let max_error = st.cfg.max_error(st.paths.len());
        let max_dist = st.cfg.max_dist(st.paths.len());
        let mut stepper = AdaptiveStepper::new(
            max_error,
            max_dist,
            MIN_PARAM_STEP,
            MAX_ANGLE_STEP,
            start,
            |u| trans * arc.plot(u),
        );

        let mut path = Path::default();
        path.curved = true;
        while stepper.cur_pos() < end {
            st.budget.take()?;
            path.points.push(stepper.cur_point());
            stepper.advance();
        }
        st.budget.take()?;
        path.points.push(trans * arc.plot(end));
        st.paths.push(path);
    }
    Ok(())
}

fn flatten_ellipses(ellipses: &[Ellipse], trans: Transform2, st: &mut BuildState<'_>) -> Result<()> {
    for e in ellipses {
        let start = e.start;
        let mut end = e.end;
        while end < start {
            end += 2.0 * PI;
        }

        let max_error = st.cfg.max_error(st.paths.len());
        let max_dist = st.cfg.max_dist(st.paths.len());
        let mut stepper = AdaptiveStepper::new(
            max_error,
            max_dist,
            MIN_PARAM_STEP,
            MAX_ANGLE_STEP,
            start,
            |u| trans * e.plot(u),
        );

        let mut path = Path::default();
        path.curved = true;
        while stepper.cur_pos() < end {
            st.budget.take()?;
            path.points.push(stepper.cur_point());
            stepper.advance();
        }

        let endpoint = trans * e.plot(e.end);
        if !path.points.is_empty() && path.start_point().distance(endpoint) <= max_error {
            // The sweep comes back onto its own start, close the path.
            path.cyclic = true;
            path.circular = Some(CircularInfo {
                desc: CircularDesc {
                    center: trans * e.center,
                    major: trans * e.maj_end,
                    minor: trans * (e.maj_end.ortho() * e.ratio),
                },
                start_angle: 0.0,
            });
            path.optimize_start = true;
            path.directed = false;
        } else {
            st.budget.take()?;
            path.points.push(endpoint);
        }
        st.paths.push(path);
    }
    Ok(())
}

fn flatten_splines(splines: &[Spline], trans: Transform2, st: &mut BuildState<'_>) -> Result<()> {
    for sp in splines {
        if sp.ctl_points.is_empty() {
            continue;
        }
        let ctl: Vec<Point2> = sp.ctl_points.iter().map(|&p| trans * p).collect();
        let curve_end = trans * sp.ctl_points[sp.ctl_points.len() - 1];
        let bspline = BSpline::new(sp.degree, ctl, sp.knot_values.clone())?;
        let (dmin, dmax) = bspline.domain();

        let max_error = st.cfg.max_error(st.paths.len());
        let max_dist = st.cfg.max_dist(st.paths.len());
        let mut stepper = AdaptiveStepper::new(
            max_error,
            max_dist,
            MIN_PARAM_STEP,
            MAX_SPLINE_STEP,
            0.0,
            |u| {
                if u < dmin || u > dmax {
                    curve_end
                } else {
                    bspline.eval(u)
                }
            },
        );

        let mut path = Path::default();
        path.curved = true;
        while stepper.cur_pos() < dmax {
            st.budget.take()?;
            path.points.push(stepper.cur_point());
            stepper.advance();
        }

        if sp.flags & Spline::CLOSED != 0 {
            path.cyclic = true;
        } else {
            st.budget.take()?;
            path.points.push(curve_end);
        }
        st.paths.push(path);
    }
    Ok(())
}

/// Appends samples along the straight segment from `start` to `end`.
///
/// Without a finite `max_dist` only the endpoint is pushed. With one, the
/// segment is cut into equal parts no longer than `max_dist`; the endpoint
/// still ends the run unless the cut happens to land on it exactly.
fn sample_line(
    points: &mut Vec<Point2>,
    max_dist: Option<f64>,
    start: Point2,
    end: Point2,
    budget: &mut PointBudget,
) -> Result<()> {
    let max_dist = match max_dist {
        Some(d) if d.is_finite() => d,
        _ => {
            budget.take()?;
            points.push(end);
            return Ok(());
        }
    };

    let v = end - start;
    let n = v.length() / max_dist;
    let whole = n.trunc();
    let s = 1.0 / n;
    let mut i = 1.0;
    while i <= whole {
        budget.take()?;
        points.push(start + v * (s * i));
        i += 1.0;
    }
    if whole < n {
        budget.take()?;
        points.push(end);
    }
    Ok(())
}

//! # DXF Entities
//!
//! Plain data for the entity types the importer understands, collected per
//! type so generation can process them in a fixed order. Curved entities
//! know how to evaluate themselves at a parameter value; everything else is
//! left to the path builder.

use std::f64::consts::PI;

use dxfkit_core::geom::{Point2, Transform2, Vec2, Vec3};

/// Object coordinate system for an extrusion direction, following the DXF
/// arbitrary axis algorithm: the OCS x axis is the world axis most
/// perpendicular to the extrusion, see
/// <https://help.autodesk.com/view/OARX/2018/ENU/?guid=GUID-E19E5B42-0CC7-4EBA-B29F-5E1D595149EE>.
///
/// Only the planar part is kept. For the default extrusion (0, 0, 1) this
/// is the identity; for (0, 0, -1) it mirrors the x axis.
pub fn ocs(extrusion: Vec3) -> Transform2 {
    let z = extrusion.normalized();

    let inv64 = 1.0 / 64.0;
    let reference = if z.x.abs() < inv64 && z.y.abs() < inv64 {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, 1.0)
    };
    let x = reference.cross(z);
    let y = z.cross(x).normalized();

    Transform2 {
        x: x.truncated(),
        y: y.truncated(),
        base: Point2::new(0.0, 0.0),
    }
}

/// CIRCLE entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
    pub ocs: Transform2,
}

impl Circle {
    /// Point at angle `u` (radians), in world coordinates.
    pub fn plot(&self, u: f64) -> Point2 {
        self.ocs
            * Point2::new(
                self.center.x + u.cos() * self.radius,
                self.center.y + u.sin() * self.radius,
            )
    }
}

/// ARC entity: a circle restricted to an angle range in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub ocs: Transform2,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    /// Point at angle `u` (radians), in world coordinates.
    pub fn plot(&self, u: f64) -> Point2 {
        self.ocs
            * Point2::new(
                self.center.x + u.cos() * self.radius,
                self.center.y + u.sin() * self.radius,
            )
    }
}

/// ELLIPSE entity. The major axis is given as the vector from the center
/// to its endpoint; the minor axis is derived from the axis ratio. Angles
/// are in radians.
#[derive(Debug, Clone, Copy)]
pub struct Ellipse {
    pub center: Point2,
    /// Endpoint of the major axis, relative to the center.
    pub maj_end: Vec2,
    /// Ratio of minor to major axis length.
    pub ratio: f64,
    pub start: f64,
    pub end: f64,
}

impl Default for Ellipse {
    fn default() -> Self {
        Ellipse {
            center: Point2::new(0.0, 0.0),
            maj_end: Vec2::new(0.0, 0.0),
            ratio: 0.0,
            start: 0.0,
            end: 2.0 * PI,
        }
    }
}

impl Ellipse {
    /// Point at parameter `u` (radians).
    pub fn plot(&self, u: f64) -> Point2 {
        let x = self.maj_end;
        let y = x.ortho() * self.ratio;
        self.center + x * u.cos() + y * u.sin()
    }
}

/// LINE entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

/// One vertex of a polyline, with the bulge of the segment that starts
/// here. A bulge of zero means a straight segment; otherwise it is the
/// tangent of a quarter of the arc's included angle, negative for
/// clockwise arcs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlVertex {
    pub pos: Point2,
    pub bulge: f64,
}

/// LWPOLYLINE entity, also the final form of POLYLINE/VERTEX sequences.
#[derive(Debug, Clone, Default)]
pub struct PolyLine {
    pub points: Vec<PlVertex>,
    pub closed: bool,
}

/// SPLINE entity: a non-rational B-spline given by degree, knot vector,
/// and control points.
#[derive(Debug, Clone)]
pub struct Spline {
    /// Bitwise combination of the `Spline::*` flag constants.
    pub flags: i32,
    pub degree: i32,
    pub knot_values: Vec<f64>,
    pub ctl_points: Vec<Point2>,
}

impl Spline {
    pub const CLOSED: i32 = 1;
    pub const PERIODIC: i32 = 2;
    pub const RATIONAL: i32 = 4;
    pub const PLANAR: i32 = 8;
    /// Planar bit is also set for linear splines.
    pub const LINEAR: i32 = 16;
}

impl Default for Spline {
    fn default() -> Self {
        Spline {
            flags: 0,
            degree: 3,
            knot_values: Vec::new(),
            ctl_points: Vec::new(),
        }
    }
}

/// INSERT entity: places a block, possibly as a grid of copies.
#[derive(Debug, Clone)]
pub struct Insert {
    pub block_name: String,
    pub pos: Point2,
    pub x_scale: f64,
    pub y_scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub cols: i32,
    pub rows: i32,
    pub col_spacing: f64,
    pub row_spacing: f64,
}

impl Default for Insert {
    fn default() -> Self {
        Insert {
            block_name: String::new(),
            pos: Point2::new(0.0, 0.0),
            x_scale: 1.0,
            y_scale: 1.0,
            rotation: 0.0,
            cols: 1,
            rows: 1,
            col_spacing: 0.0,
            row_spacing: 0.0,
        }
    }
}

/// All entities of one entity space, grouped by type.
#[derive(Debug, Clone, Default)]
pub struct Entities {
    pub lines: Vec<Line>,
    pub circles: Vec<Circle>,
    pub arcs: Vec<Arc>,
    pub ellipses: Vec<Ellipse>,
    pub polylines: Vec<PolyLine>,
    pub splines: Vec<Spline>,
    pub inserts: Vec<Insert>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.circles.is_empty()
            && self.arcs.is_empty()
            && self.ellipses.is_empty()
            && self.polylines.is_empty()
            && self.splines.is_empty()
            && self.inserts.is_empty()
    }
}

/// BLOCK definition with its own entity space.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub name: String,
    /// Block-type flags as stored in the file; not interpreted here.
    pub flags: i32,
    pub base: Point2,
    pub path: String,
    pub description: String,
    pub ents: Entities,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(p: Point2, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-12, "x: {} vs {}", p.x, x);
        assert!((p.y - y).abs() < 1e-12, "y: {} vs {}", p.y, y);
    }

    #[test]
    fn test_default_extrusion_is_identity() {
        let t = ocs(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(t, Transform2::IDENTITY);
        // Scaling the extrusion must not matter.
        let t = ocs(Vec3::new(0.0, 0.0, 7.5));
        assert_eq!(t, Transform2::IDENTITY);
    }

    #[test]
    fn test_downward_extrusion_mirrors_x() {
        let t = ocs(Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(t * Point2::new(2.0, 3.0), Point2::new(-2.0, 3.0));
    }

    #[test]
    fn test_circle_plot() {
        let c = Circle {
            center: Point2::new(1.0, 2.0),
            radius: 5.0,
            ocs: Transform2::IDENTITY,
        };
        assert_close(c.plot(0.0), 6.0, 2.0);
        assert_close(c.plot(FRAC_PI_2), 1.0, 7.0);
        assert_close(c.plot(PI), -4.0, 2.0);
    }

    #[test]
    fn test_ellipse_plot() {
        let e = Ellipse {
            center: Point2::new(0.0, 0.0),
            maj_end: Vec2::new(2.0, 0.0),
            ratio: 0.5,
            ..Ellipse::default()
        };
        assert_close(e.plot(0.0), 2.0, 0.0);
        assert_close(e.plot(FRAC_PI_2), 0.0, 1.0);
        assert!((e.end - 2.0 * PI).abs() < 1e-15);
    }

    #[test]
    fn test_insert_defaults_single_copy() {
        let ins = Insert::default();
        assert_eq!(ins.x_scale, 1.0);
        assert_eq!(ins.y_scale, 1.0);
        assert_eq!(ins.cols, 1);
        assert_eq!(ins.rows, 1);
    }
}

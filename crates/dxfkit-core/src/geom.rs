//! Plane algebra for the drawing pipeline
//!
//! Points, displacement vectors, and affine transforms over f64. A
//! `Transform2` stores the images of the unit axes plus an origin, so block
//! inserts with non-uniform scale, rotation, and translation compose with
//! plain multiplication. Basis vectors are not required to be orthonormal.

use std::ops::{Add, Mul, Neg, Sub};

/// A position in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// A displacement in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A direction in 3D space. Only used for extrusion normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn distance(self, other: Point2) -> f64 {
        (other - self).length()
    }

    pub fn sq_distance(self, other: Point2) -> f64 {
        (other - self).sq_length()
    }

    /// Componentwise minimum, used for bounding boxes.
    pub fn component_min(self, other: Point2) -> Point2 {
        Point2::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum, used for bounding boxes.
    pub fn component_max(self, other: Point2) -> Point2 {
        Point2::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.sq_length().sqrt()
    }

    pub fn sq_length(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Counter-clockwise quarter turn.
    pub fn ortho(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn normalized(self) -> Vec2 {
        self * (1.0 / self.length())
    }
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        let s = 1.0 / self.length();
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Drops the z component.
    pub fn truncated(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Sub for Point2 {
    type Output = Vec2;

    fn sub(self, other: Point2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Add<Vec2> for Point2 {
    type Output = Point2;

    fn add(self, v: Vec2) -> Point2 {
        Point2::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub<Vec2> for Point2 {
    type Output = Point2;

    fn sub(self, v: Vec2) -> Point2 {
        Point2::new(self.x - v.x, self.y - v.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Affine transform of the drawing plane: the images of the unit x and y
/// axes plus the image of the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    /// Image of the unit x axis.
    pub x: Vec2,
    /// Image of the unit y axis.
    pub y: Vec2,
    /// Image of the origin.
    pub base: Point2,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Transform2 = Transform2 {
        x: Vec2::new(1.0, 0.0),
        y: Vec2::new(0.0, 1.0),
        base: Point2::new(0.0, 0.0),
    };

    /// Rotation about the origin by `angle` radians, counter-clockwise.
    pub fn rotation(angle: f64) -> Transform2 {
        let (sin, cos) = angle.sin_cos();
        Transform2 {
            x: Vec2::new(cos, sin),
            y: Vec2::new(-sin, cos),
            base: Point2::new(0.0, 0.0),
        }
    }

    /// Uniform scaling about the origin.
    pub fn scaling(s: f64) -> Transform2 {
        Transform2 {
            x: Vec2::new(s, 0.0),
            y: Vec2::new(0.0, s),
            base: Point2::new(0.0, 0.0),
        }
    }
}

impl Mul<Point2> for Transform2 {
    type Output = Point2;

    fn mul(self, p: Point2) -> Point2 {
        self.base + self.x * p.x + self.y * p.y
    }
}

impl Mul<Vec2> for Transform2 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Vec2 {
        self.x * v.x + self.y * v.y
    }
}

impl Mul for Transform2 {
    type Output = Transform2;

    fn mul(self, other: Transform2) -> Transform2 {
        Transform2 {
            x: self * other.x,
            y: self * other.y,
            base: self * other.base,
        }
    }
}

//! # Fixed-Radius Near Neighbors
//!
//! Hash grid over the plane for radius-bounded neighbor lookups. Cells are
//! sized to the radius; a query walks the 2x2 cell block on the query
//! point's side. Every value within half the radius is guaranteed to be
//! reported, and values up to roughly two radii away may be reported as
//! well, so callers always re-check exact distances.

use std::collections::HashMap;

use crate::geom::Point2;

struct Node<V> {
    value: V,
    /// Next node in the same cell, if any.
    next: Option<u32>,
}

/// Spatial index over points with values attached.
pub struct Frnn2D<V> {
    radius: f64,
    nodes: Vec<Node<V>>,
    heads: HashMap<(i64, i64), u32>,
}

impl<V> Frnn2D<V> {
    pub fn new(radius: f64) -> Self {
        debug_assert!(radius > 0.0);
        Frnn2D {
            radius,
            nodes: Vec::new(),
            heads: HashMap::new(),
        }
    }

    fn cell(&self, at: Point2) -> (i64, i64) {
        (
            (at.x / self.radius).round() as i64,
            (at.y / self.radius).round() as i64,
        )
    }

    /// Stores `value` at position `at`.
    pub fn insert(&mut self, at: Point2, value: V) {
        let key = self.cell(at);
        let id = self.nodes.len() as u32;
        let next = self.heads.insert(key, id);
        self.nodes.push(Node { value, next });
    }

    /// Calls `f` for every stored value that may lie within the radius of
    /// `at`. The visited set is a superset of the true neighbors within
    /// half the radius.
    pub fn query_candidates<F: FnMut(&V)>(&self, at: Point2, mut f: F) {
        let tx = at.x / self.radius;
        let ty = at.y / self.radius;
        let fx = tx.round();
        let fy = ty.round();
        let sx: i64 = if tx - fx >= 0.0 { 1 } else { -1 };
        let sy: i64 = if ty - fy >= 0.0 { 1 } else { -1 };
        let kx = fx as i64;
        let ky = fy as i64;
        for dx in [0, sx] {
            for dy in [0, sy] {
                let mut cur = self.heads.get(&(kx + dx, ky + dy)).copied();
                while let Some(id) = cur {
                    let node = &self.nodes[id as usize];
                    f(&node.value);
                    cur = node.next;
                }
            }
        }
    }
}

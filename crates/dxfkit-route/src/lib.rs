//! # DxfKit Route
//!
//! Joins flattened paths into chains and orders them for short travel.
//! The joiner merges paths whose endpoints coincide within a tolerance;
//! the optimizer seeds an ordering along a space-filling curve and
//! refines it with local search passes.

pub mod join;
pub mod optimize;
pub mod sfc;

pub use join::{join_paths, JoinOutcome};
pub use optimize::{
    improve_dirs_locally, improve_order_locally, improve_start_positions, optimize_route,
    overhead, route_optimized, RouteOptions,
};
pub use sfc::sierpinski_index;

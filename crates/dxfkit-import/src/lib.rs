//! # DxfKit Import
//!
//! DXF reading for DxfKit. A [`RecordReader`] exposes the two-line
//! group-code/value stream of a text DXF file, the section parser turns it
//! into typed entities and block definitions, and path generation flattens
//! those into sampled millimeter [`Path`](dxfkit_core::path::Path)s ready
//! for joining and routing.

mod builder;
pub mod drawing;
pub mod entity;
pub mod parser;
pub mod record;
pub mod spline;

pub use drawing::Drawing;
pub use record::{AsciiRecordReader, RecordReader};
pub use spline::BSpline;

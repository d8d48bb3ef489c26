//! # Error Handling
//!
//! Unified error types for DXF import, unit handling, and path generation.
//! The domain enums convert into [`Error`] so every stage of the pipeline
//! can return the same [`Result`] type.

use thiserror::Error;

/// Errors raised while reading and interpreting DXF input.
#[derive(Error, Debug)]
pub enum DxfError {
    /// Input file could not be opened
    #[error("Failed to open input file: {path}")]
    OpenFile {
        /// Path passed to the importer
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The input ended before the first record line
    #[error("Failed to read first line")]
    MissingFirstLine,

    /// The underlying stream failed mid-read
    #[error("Failed to read next line")]
    Read(#[source] std::io::Error),

    /// The input starts with the binary DXF sentinel
    #[error("Attempt to read binary DXF file with ASCII reader")]
    BinaryFile,

    /// A group code line could not be parsed as an integer
    #[error("Failed to read integer value")]
    InvalidInt,

    /// A value line could not be parsed as a number
    #[error("Failed to read numeric value")]
    InvalidNumber,

    /// Wraps any read error with the input position it occurred at
    #[error("Read error at {position}")]
    At {
        /// Human-readable position, e.g. "line 42"
        position: String,
        /// The wrapped failure
        #[source]
        source: Box<Error>,
    },

    /// An INSERT references a block the file never defines
    #[error("Insertion of non-existent block: {name}")]
    UnknownBlock {
        /// Name the INSERT entity asked for
        name: String,
    },

    /// Block definitions insert each other in a cycle
    #[error("Cyclic insertion of block: {name}")]
    CyclicBlock {
        /// Name of the first block seen twice while expanding inserts
        name: String,
    },

    /// A SPLINE entity carries inconsistent control or knot data
    #[error("Invalid spline: {reason}")]
    InvalidSpline {
        /// What exactly was inconsistent
        reason: String,
    },
}

/// Errors in unit selection and pipeline configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The $INSUNITS header names a unit the pipeline cannot scale
    #[error("Unsupported physical unit ($INSUNITS = {code})")]
    UnsupportedUnit {
        /// Raw $INSUNITS value from the header or the unit override
        code: i32,
    },

    /// Neither the file header nor the caller provided a physical unit
    #[error(
        "Unknown dimension for geometry, input file does not define the used physical unit and no explicit unit was set"
    )]
    MissingUnit,

    /// A unit name did not match any known alias
    #[error("Unknown unit: {name}")]
    UnknownUnit {
        /// The name as given
        name: String,
    },
}

/// Errors raised while generating or routing paths.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Flattening produced more points than the configured cap
    #[error("Imported geometry exceeds the maximum of {limit} points with the current configuration")]
    PointBudgetExceeded {
        /// The configured cap
        limit: usize,
    },

    /// All path points coincide, so no routing order can be derived
    #[error("Paths have a total length of zero")]
    ZeroExtent,
}

/// Unified error type for the toolkit.
#[derive(Error, Debug)]
pub enum Error {
    /// DXF reading errors
    #[error(transparent)]
    Dxf(#[from] DxfError),

    /// Unit and configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Geometry generation errors
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if this error means the input never declared a physical unit
    pub fn is_missing_unit(&self) -> bool {
        matches!(self, Error::Config(ConfigError::MissingUnit))
    }

    /// Check if this error is the generated point cap being hit
    pub fn is_point_budget(&self) -> bool {
        matches!(self, Error::Geom(GeomError::PointBudgetExceeded { .. }))
    }
}

/// Result type alias using the unified error
pub type Result<T> = std::result::Result<T, Error>;

//! # Drawing Document
//!
//! The parsed content of a DXF file: entities, block definitions, and the
//! physical unit declared in the header. This is also the entry point for
//! reading a file and generating paths from it.

use std::fs::File;
use std::io::{BufRead, BufReader};

use dxfkit_core::config::PathConfig;
use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::path::Path;
use dxfkit_core::units::Unit;

use crate::builder;
use crate::entity::{Block, Entities};
use crate::parser;
use crate::record::AsciiRecordReader;

/// A parsed DXF drawing.
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    /// Entities of the model space.
    pub entities: Entities,
    /// Block definitions, referenced by INSERT entities.
    pub blocks: Vec<Block>,
    /// Unit from the $INSUNITS header variable, when the file declares one.
    pub unit: Option<Unit>,
}

impl Drawing {
    /// Reads a text DXF file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Drawing> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DxfError::OpenFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads text DXF content from a buffered reader.
    pub fn from_reader<R: BufRead>(input: R) -> Result<Drawing> {
        let mut records = AsciiRecordReader::new(input);
        parser::parse(&mut records)
    }

    /// Generates paths for every entity, in millimeter coordinates.
    ///
    /// `unit` overrides the unit from the file header; without either the
    /// geometry has no physical dimension and generation fails.
    /// `max_points` caps the total number of generated points.
    pub fn create_paths(
        &self,
        unit: Option<Unit>,
        cfg: &mut dyn PathConfig,
        max_points: usize,
    ) -> Result<Vec<Path>> {
        builder::create_paths(self, unit, cfg, max_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfkit_core::config::FixedPathConfig;
    use dxfkit_core::geom::Point2;
    use std::io::Cursor;

    #[test]
    fn test_read_and_generate_in_header_units() {
        let input = "0
SECTION
2
HEADER
9
$INSUNITS
70
6
0
ENDSEC
0
SECTION
2
ENTITIES
0
LINE
10
1.0
20
0.0
11
2.0
21
0.0
0
ENDSEC
0
EOF
";
        let drawing = Drawing::from_reader(Cursor::new(input.as_bytes())).unwrap();
        assert_eq!(drawing.unit, Some(Unit::Meters));

        let mut cfg = FixedPathConfig::default();
        let paths = drawing.create_paths(None, &mut cfg, 1000).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points[0], Point2::new(1000.0, 0.0));
        assert_eq!(paths[0].points[1], Point2::new(2000.0, 0.0));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Drawing::from_path("/nonexistent/input.dxf").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to open input file: /nonexistent/input.dxf"
        );
    }
}

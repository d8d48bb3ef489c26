// Integration tests for DXF import: file reading, parsing, and path
// generation working together on complete documents.

use std::io::{Cursor, Write};

use dxfkit_core::config::FixedPathConfig;
use dxfkit_core::geom::Point2;
use dxfkit_core::units::Unit;
use dxfkit_import::Drawing;

fn parse(input: &str) -> Drawing {
    Drawing::from_reader(Cursor::new(input.as_bytes())).unwrap()
}

#[test]
fn test_reads_drawing_from_disk() {
    let content = "0
SECTION
2
HEADER
9
$INSUNITS
70
4
0
ENDSEC
0
SECTION
2
ENTITIES
0
CIRCLE
10
0.0
20
0.0
40
5.0
0
ENDSEC
0
EOF
";
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let drawing = Drawing::from_path(file.path()).unwrap();
    assert_eq!(drawing.unit, Some(Unit::Millimeters));

    let mut cfg = FixedPathConfig::new(0.1, None);
    let paths = drawing.create_paths(None, &mut cfg, 10_000).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].is_circle);
    assert!(paths[0].cyclic);
}

#[test]
fn test_mixed_drawing_generates_paths_per_entity_kind() {
    let drawing = parse(
        "0
SECTION
2
ENTITIES
0
LINE
10
0.0
20
0.0
11
10.0
21
0.0
0
CIRCLE
10
20.0
20
0.0
40
2.0
0
LWPOLYLINE
90
4
70
1
10
0.0
20
10.0
10
4.0
20
10.0
10
4.0
20
14.0
10
0.0
20
14.0
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::default();
    let paths = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap();

    // Lines come first, then polylines, then circles.
    assert_eq!(paths.len(), 3);
    assert_eq!(paths[0].points.len(), 2);
    assert!(paths[1].cyclic);
    assert_eq!(paths[1].points.len(), 4);
    assert!(paths[2].is_circle);

    for (i, path) in paths.iter().enumerate() {
        assert!(path.source_path_indices.contains(&i));
    }
}

#[test]
fn test_block_insert_expands_to_grid() {
    let drawing = parse(
        "0
SECTION
2
BLOCKS
0
BLOCK
2
STAMP
0
LINE
10
0.0
20
0.0
11
1.0
21
0.0
0
ENDBLK
0
ENDSEC
0
SECTION
2
ENTITIES
0
INSERT
2
STAMP
10
10.0
20
0.0
70
2
44
5.0
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::default();
    let paths = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap();

    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].points[0], Point2::new(10.0, 0.0));
    assert_eq!(paths[0].points[1], Point2::new(11.0, 0.0));
    assert_eq!(paths[1].points[0], Point2::new(15.0, 0.0));
    assert_eq!(paths[1].points[1], Point2::new(16.0, 0.0));
}

#[test]
fn test_missing_unit_without_override_fails() {
    let drawing = parse(
        "0
SECTION
2
ENTITIES
0
LINE
10
0.0
20
0.0
11
1.0
21
0.0
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::default();
    let err = drawing.create_paths(None, &mut cfg, 10_000).unwrap_err();
    assert!(err.is_missing_unit());
}

#[test]
fn test_header_unit_scales_coordinates() {
    let input = "0
SECTION
2
HEADER
9
$INSUNITS
70
5
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
    let drawing = parse(input);
    assert_eq!(drawing.unit, Some(Unit::Centimeters));

    let mut cfg = FixedPathConfig::default();
    let paths = drawing.create_paths(None, &mut cfg, 10_000).unwrap();
    assert_eq!(paths[0].points[0], Point2::new(10.0, 0.0));
    assert_eq!(paths[0].points[1], Point2::new(20.0, 0.0));

    // An explicit unit takes precedence over the header.
    let paths = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap();
    assert_eq!(paths[0].points[1], Point2::new(2.0, 0.0));
}

#[test]
fn test_legacy_polyline_with_seqend() {
    let drawing = parse(
        "0
SECTION
2
ENTITIES
0
POLYLINE
70
1
0
VERTEX
10
0.0
20
0.0
0
VERTEX
10
3.0
20
0.0
0
VERTEX
10
0.0
20
3.0
0
SEQEND
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::default();
    let paths = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap();

    assert_eq!(paths.len(), 1);
    assert!(paths[0].cyclic);
    assert_eq!(
        paths[0].points,
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 3.0),
        ]
    );
}

#[test]
fn test_spline_samples_follow_curve() {
    let drawing = parse(
        "0
SECTION
2
ENTITIES
0
SPLINE
70
8
71
2
72
6
73
3
40
0.0
40
0.0
40
0.0
40
1.0
40
1.0
40
1.0
10
0.0
20
0.0
10
5.0
20
10.0
10
10.0
20
0.0
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::new(0.05, None);
    let paths = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap();

    let p = &paths[0];
    assert!(p.curved);
    assert_eq!(p.points[0], Point2::new(0.0, 0.0));
    assert_eq!(*p.points.last().unwrap(), Point2::new(10.0, 0.0));
    for pt in &p.points {
        let expect = 2.0 * pt.x - pt.x * pt.x / 5.0;
        assert!((pt.y - expect).abs() < 1e-9);
    }
}

#[test]
fn test_parse_error_reports_line_number() {
    let err = Drawing::from_reader(Cursor::new(
        "0
SECTION
2
ENTITIES
0
LINE
10
abc
"
        .as_bytes(),
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "Read error at line 8");
    let source = std::error::Error::source(&err).map(|s| s.to_string());
    assert_eq!(source, Some("Failed to read numeric value".to_string()));
}

#[test]
fn test_insert_of_undefined_block_fails() {
    let drawing = parse(
        "0
SECTION
2
ENTITIES
0
INSERT
2
NOWHERE
10
0.0
20
0.0
0
ENDSEC
0
EOF
",
    );
    let mut cfg = FixedPathConfig::default();
    let err = drawing
        .create_paths(Some(Unit::Millimeters), &mut cfg, 10_000)
        .unwrap_err();
    assert_eq!(err.to_string(), "Insertion of non-existent block: NOWHERE");
}

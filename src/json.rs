//! # Toolpath JSON Output
//!
//! Writes the final route as the JSON object consumed by the marking
//! controller: user attributes first, then a flat `"Figure"` array with one
//! element per path point. Power and velocity fields are left at -1 for the
//! controller to fill in.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use serde_json::{json, Map, Value};

use dxfkit_core::Path;

/// Builds the toolpath document for `paths` with `attrs` on top.
pub fn toolpath_value(attrs: &[(String, String)], paths: &[Path]) -> Value {
    let mut root = Map::new();
    for (name, value) in attrs {
        root.insert(name.clone(), Value::String(value.clone()));
    }

    let mut figure = Vec::new();
    for path in paths {
        for p in &path.points {
            figure.push(json!({
                "EndPosition": [p.x, p.y],
                "Power": -1,
                "RingPower": -1,
                "Velocity": -1,
            }));
        }
    }
    root.insert("Figure".to_string(), Value::Array(figure));

    Value::Object(root)
}

/// Writes the toolpath document to `path`, pretty-printed.
pub fn write_toolpath(
    path: &std::path::Path,
    attrs: &[(String, String)],
    paths: &[Path],
) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &toolpath_value(attrs, paths))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfkit_core::Point2;

    fn path(points: &[(f64, f64)]) -> Path {
        Path {
            points: points.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
            ..Path::default()
        }
    }

    #[test]
    fn test_attributes_come_first_in_insertion_order() {
        let attrs = vec![
            ("Zeta".to_string(), "1".to_string()),
            ("Alpha".to_string(), "two".to_string()),
        ];
        let doc = toolpath_value(&attrs, &[]);
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Zeta", "Alpha", "Figure"]);
        assert_eq!(doc["Zeta"], "1");
        assert_eq!(doc["Alpha"], "two");
    }

    #[test]
    fn test_figure_flattens_all_paths() {
        let paths = vec![path(&[(0.0, 0.0), (1.0, 0.0)]), path(&[(5.0, 5.0)])];
        let doc = toolpath_value(&[], &paths);
        let figure = doc["Figure"].as_array().unwrap();
        assert_eq!(figure.len(), 3);
        assert_eq!(figure[0]["EndPosition"], json!([0.0, 0.0]));
        assert_eq!(figure[1]["EndPosition"], json!([1.0, 0.0]));
        assert_eq!(figure[2]["EndPosition"], json!([5.0, 5.0]));
        for element in figure {
            assert_eq!(element["Power"], json!(-1));
            assert_eq!(element["RingPower"], json!(-1));
            assert_eq!(element["Velocity"], json!(-1));
        }
    }

    #[test]
    fn test_point_element_key_order() {
        let doc = toolpath_value(&[], &[path(&[(2.5, -3.0)])]);
        let element = doc["Figure"][0].as_object().unwrap();
        let keys: Vec<&String> = element.keys().collect();
        assert_eq!(keys, ["EndPosition", "Power", "RingPower", "Velocity"]);
    }

    #[test]
    fn test_empty_route_still_has_figure() {
        let doc = toolpath_value(&[], &[]);
        assert_eq!(doc["Figure"], json!([]));
    }

    #[test]
    fn test_write_reports_unwritable_path() {
        let err = write_toolpath(std::path::Path::new("/nonexistent/dir/out.json"), &[], &[])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to open output file: /nonexistent/dir/out.json"
        );
    }
}

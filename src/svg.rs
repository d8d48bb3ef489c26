//! # SVG Preview Output
//!
//! Renders the optimized route for visual inspection: each path as a faint
//! black polyline with direction markers, travel moves between paths as
//! green lines. The Y axis is negated relative to the drawing so the
//! preview matches the usual screen orientation.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;

use dxfkit_core::{Path, Point2};

/// Closes the `<svg>` open tag and defines the direction markers
/// referenced by every polyline.
static MARKER_DEFS: &str = r#"
  xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
  xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
  xmlns="http://www.w3.org/2000/svg"
  xmlns:svg="http://www.w3.org/2000/svg">
  <defs
     id="defs98666">
    <marker
       style="overflow:visible"
       id="Arrow1"
       refX="0"
       refY="0"
       orient="auto-start-reverse"
       inkscape:stockid="Arrow1"
       markerWidth="4.0606604"
       markerHeight="6.7071066"
       viewBox="0 0 4.0606602 6.7071068"
       inkscape:isstock="true"
       inkscape:collect="always"
       preserveAspectRatio="xMidYMid">
      <path
         style="fill:none;stroke:context-stroke;stroke-width:1;stroke-linecap:butt"
         d="M 3,-3 0,0 3,3"
         id="path5057"
         transform="rotate(180,0.125,0)"
         sodipodi:nodetypes="ccc" />
    </marker>
    <marker
       style="overflow:visible"
       id="TriangleStart"
       refX="0"
       refY="0"
       orient="auto-start-reverse"
       inkscape:stockid="TriangleStart"
       markerWidth="5.3244081"
       markerHeight="6.155385"
       viewBox="0 0 5.3244081 6.1553851"
       inkscape:isstock="true"
       inkscape:collect="always"
       preserveAspectRatio="xMidYMid">
      <path
         transform="scale(0.5)"
         style="fill:context-stroke;fill-rule:evenodd;stroke:context-stroke;stroke-width:1pt"
         d="M 5.77,0 -2.88,5 V -5 Z"
         id="path135" />
    </marker>
    <marker
       style="overflow:visible"
       id="Stop"
       refX="0"
       refY="0"
       orient="auto"
       inkscape:stockid="Stop"
       markerWidth="1"
       markerHeight="8"
       viewBox="0 0 1 8"
       inkscape:isstock="true"
       inkscape:collect="always"
       preserveAspectRatio="xMidYMid">
      <path
         style="fill:none;stroke:context-stroke;stroke-width:1"
         d="M 0,4 V -4"
         id="path171" />
    </marker>
  </defs>
"#;

/// Writes the SVG preview of `paths` to the given file.
pub fn write_preview(path: &std::path::Path, paths: &[Path]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open SVG output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    render(&mut out, paths)?;
    out.flush()?;
    Ok(())
}

fn render<W: Write>(out: &mut W, paths: &[Path]) -> std::io::Result<()> {
    // Bounding box over the Y-flipped points.
    let mut min = Point2::default();
    let mut max = Point2::default();
    let mut first = true;
    for path in paths {
        for p in &path.points {
            let flipped = Point2::new(p.x, -p.y);
            if first {
                min = flipped;
                max = flipped;
                first = false;
            } else {
                min = min.component_min(flipped);
                max = max.component_max(flipped);
            }
        }
    }

    let width = max.x - min.x;
    let height = max.y - min.y;
    // The larger dimension maps to 100 mm. An empty route has no extent,
    // any scale gives the same blank document then.
    let larger = width.max(height);
    let scale = if larger > 0.0 { 100.0 / larger } else { 1.0 };

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>")?;
    writeln!(out, "<svg")?;
    writeln!(out, "  version=\"1.1\"")?;
    writeln!(
        out,
        "  width=\"{}mm\" height=\"{}mm\"",
        width * scale,
        height * scale
    )?;
    write!(out, "  viewBox=\"{} {} {} {}\"", min.x, min.y, width, height)?;
    out.write_all(MARKER_DEFS.as_bytes())?;

    for path in paths {
        let Some(&p0) = path.points.first() else {
            continue;
        };
        writeln!(out, "<polyline fill=\"none\" stroke=\"black\"")?;
        writeln!(
            out,
            "style=\"opacity:0.1;stroke-width:{};marker-start:url(#Stop);marker-mid:url(#Arrow1);marker-end:url(#TriangleStart)\"",
            0.3 / scale
        )?;
        write!(out, "points=\"{},{}", p0.x, -p0.y)?;
        for p in &path.points[1..] {
            write!(out, "\n{},{}", p.x, -p.y)?;
        }
        if path.cyclic {
            write!(out, "\n{},{}", p0.x, -p0.y)?;
        }
        writeln!(out, "\"/>")?;
    }

    if let Some(last) = paths.last() {
        let mut prev = last.end_point();
        for path in paths {
            let Some(&p0) = path.points.first() else {
                continue;
            };
            if prev != p0 {
                writeln!(out, "<polyline fill=\"none\" stroke=\"green\"")?;
                writeln!(
                    out,
                    "style=\"stroke-width:{};marker-start:url(#Stop);marker-mid:url(#Arrow1);marker-end:url(#TriangleStart)\"",
                    0.1 / scale
                )?;
                writeln!(
                    out,
                    "points=\"{},{} {},{}\"/>",
                    prev.x, -prev.y, p0.x, -p0.y
                )?;
            }

            // A cyclic path returns to its start before the next travel.
            prev = if path.cyclic {
                path.start_point()
            } else {
                path.end_point()
            };
        }
    }

    writeln!(out, "</svg>")?;
    Ok(())
}

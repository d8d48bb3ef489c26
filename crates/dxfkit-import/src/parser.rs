//! # DXF Section Parsing
//!
//! Walks the record stream section by section. HEADER yields the drawing
//! unit, BLOCKS yields named entity spaces, ENTITIES yields the main
//! entity space; everything else is skipped. Entity records accumulate in
//! an [`EntityAcc`] because most entities span many records and some, like
//! POLYLINE, interleave with child records until an end marker.

use tracing::debug;

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::geom::{Point2, Vec3};
use dxfkit_core::units::Unit;

use crate::drawing::Drawing;
use crate::entity::{Arc, Block, Circle, Ellipse, Entities, Insert, Line, PlVertex, PolyLine, Spline};
use crate::record::RecordReader;

/// Parses a whole DXF document from a record stream.
///
/// Any failure is wrapped with the stream position it occurred at.
pub fn parse<R: RecordReader>(r: &mut R) -> Result<Drawing> {
    let mut drawing = Drawing::default();
    if let Err(e) = read_sections(r, &mut drawing) {
        return Err(DxfError::At {
            position: r.position(),
            source: Box::new(e),
        }
        .into());
    }
    debug!(
        "Parsed DXF document: {} blocks, unit {:?}",
        drawing.blocks.len(),
        drawing.unit
    );
    Ok(drawing)
}

fn at_endsec<R: RecordReader>(r: &R) -> bool {
    r.matches(0, "ENDSEC")
}

fn read_sections<R: RecordReader>(r: &mut R, drawing: &mut Drawing) -> Result<()> {
    while r.next_record()? {
        if r.matches(0, "SECTION") {
            r.next_record()?;
            if r.matches(2, "HEADER") {
                read_header(r, drawing)?;
            } else if r.matches(2, "BLOCKS") {
                read_blocks(r, &mut drawing.blocks)?;
            } else if r.matches(2, "ENTITIES") {
                read_entities(r, &mut drawing.entities)?;
            } else {
                if r.gc() == 2 {
                    debug!("Skipping DXF section: {}", r.str_value());
                }
                skip_section(r)?;
            }
        }
    }
    Ok(())
}

fn skip_section<R: RecordReader>(r: &mut R) -> Result<()> {
    while r.next_record()? && !at_endsec(r) {}
    Ok(())
}

/// Reads header variables. Only `$INSUNITS` matters; its value is
/// validated right away so an unusable unit fails at the line that
/// declares it.
fn read_header<R: RecordReader>(r: &mut R, drawing: &mut Drawing) -> Result<()> {
    let mut name = String::new();
    while r.next_record()? && !at_endsec(r) {
        match r.gc() {
            9 => name = r.str_value().to_string(),
            70 => {
                if name == "$INSUNITS" {
                    let code = r.int()?;
                    drawing.unit = Some(Unit::from_insunits(code)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_entities<R: RecordReader>(r: &mut R, ents: &mut Entities) -> Result<()> {
    let mut acc = EntityAcc::new();
    while r.next_record()? {
        // ENDSEC is fed to the accumulator first: its type code closes
        // whatever entity is still open.
        acc.read_record(r, ents)?;
        if at_endsec(r) {
            break;
        }
    }
    acc.finish(ents);
    Ok(())
}

enum BlockState {
    Idle,
    /// Between the BLOCK record and the first entity: records describe the
    /// block itself.
    Header(Block),
    /// Inside the block's entity space.
    Body(Block, EntityAcc),
}

fn finish_block(state: &mut BlockState, blocks: &mut Vec<Block>) {
    match std::mem::replace(state, BlockState::Idle) {
        BlockState::Idle => {}
        BlockState::Header(block) => blocks.push(block),
        BlockState::Body(mut block, mut acc) => {
            acc.finish(&mut block.ents);
            blocks.push(block);
        }
    }
}

fn read_blocks<R: RecordReader>(r: &mut R, blocks: &mut Vec<Block>) -> Result<()> {
    let mut state = BlockState::Idle;
    while r.next_record()? {
        state = match state {
            BlockState::Header(mut block) => match r.gc() {
                0 => BlockState::Body(block, EntityAcc::new()),
                1 => {
                    block.path = r.str_value().to_string();
                    BlockState::Header(block)
                }
                2 | 3 => {
                    block.name = r.str_value().to_string();
                    BlockState::Header(block)
                }
                4 => {
                    block.description = r.str_value().to_string();
                    BlockState::Header(block)
                }
                10 => {
                    block.base.x = r.dbl()?;
                    BlockState::Header(block)
                }
                20 => {
                    block.base.y = r.dbl()?;
                    BlockState::Header(block)
                }
                70 => {
                    block.flags = r.int()?;
                    BlockState::Header(block)
                }
                _ => BlockState::Header(block),
            },
            other => other,
        };
        if let BlockState::Body(block, acc) = &mut state {
            acc.read_record(r, &mut block.ents)?;
        }
        if r.matches(0, "BLOCK") {
            finish_block(&mut state, blocks);
            state = BlockState::Header(Block::default());
        }
        if r.matches(0, "ENDBLK") {
            finish_block(&mut state, blocks);
        }
        if at_endsec(r) {
            break;
        }
    }
    finish_block(&mut state, blocks);
    Ok(())
}

#[derive(Default)]
struct LwAcc {
    poly: PolyLine,
    xs: Vec<f64>,
    ys: Vec<f64>,
    bulges: Vec<f64>,
}

impl LwAcc {
    /// Emits exactly the vertices whose coordinates are present; a vertex
    /// count announced in the file only sizes the buffers.
    fn into_polyline(self) -> PolyLine {
        let n = self.xs.len().min(self.ys.len());
        let mut bulges = self.bulges;
        bulges.resize(n, 0.0);
        let mut poly = self.poly;
        poly.points = (0..n)
            .map(|i| PlVertex {
                pos: Point2::new(self.xs[i], self.ys[i]),
                bulge: bulges[i],
            })
            .collect();
        poly
    }
}

#[derive(Default)]
struct SplineAcc {
    spline: Spline,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SplineAcc {
    fn into_spline(self) -> Spline {
        let n = self.xs.len().min(self.ys.len());
        let mut spline = self.spline;
        spline.ctl_points = (0..n).map(|i| Point2::new(self.xs[i], self.ys[i])).collect();
        spline
    }
}

#[derive(Default)]
struct PolyVert {
    pos: Point2,
    flags: i32,
    bulge: f64,
}

#[derive(Default)]
struct PolyAcc {
    closed: bool,
    verts: Vec<PolyVert>,
}

impl PolyAcc {
    fn into_polyline(self) -> PolyLine {
        // Vertices synthesized by curve or spline fitting are markers for
        // the original CAD system, not real path vertices.
        const OMIT_BITS: i32 = 1 | 8 | 16;
        PolyLine {
            closed: self.closed,
            points: self
                .verts
                .iter()
                .filter(|v| v.flags & OMIT_BITS == 0)
                .map(|v| PlVertex {
                    pos: v.pos,
                    bulge: v.bulge,
                })
                .collect(),
        }
    }
}

/// What the records following an entity type record currently describe.
enum Target {
    None,
    Line(Line),
    LwPolyline(LwAcc),
    /// Records describe the open POLYLINE itself.
    PolyHeader,
    /// Records describe the latest VERTEX of the open POLYLINE.
    PolyVertex,
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Spline(SplineAcc),
    Insert(Insert),
}

/// Accumulates entities across records.
///
/// A type record (group code 0) closes the previous entity and may open a
/// new one. POLYLINE is special: it stays open across its VERTEX children
/// until SEQEND, even if unrelated entities appear in between.
struct EntityAcc {
    target: Target,
    poly: Option<PolyAcc>,
    extrusion: Vec3,
}

impl EntityAcc {
    fn new() -> Self {
        EntityAcc {
            target: Target::None,
            poly: None,
            extrusion: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Commits whatever the current target holds. Circles and arcs pick up
    /// the extrusion that was in effect while they were open.
    fn finalize_target(&mut self, ents: &mut Entities) {
        match std::mem::replace(&mut self.target, Target::None) {
            Target::None | Target::PolyHeader | Target::PolyVertex => {}
            Target::Line(line) => ents.lines.push(line),
            Target::Circle(mut circle) => {
                circle.ocs = crate::entity::ocs(self.extrusion);
                ents.circles.push(circle);
            }
            Target::Arc(mut arc) => {
                arc.ocs = crate::entity::ocs(self.extrusion);
                ents.arcs.push(arc);
            }
            Target::Ellipse(ellipse) => ents.ellipses.push(ellipse),
            Target::LwPolyline(acc) => ents.polylines.push(acc.into_polyline()),
            Target::Spline(acc) => ents.splines.push(acc.into_spline()),
            Target::Insert(insert) => ents.inserts.push(insert),
        }
    }

    /// Commits any open entity at the end of a section or stream.
    fn finish(&mut self, ents: &mut Entities) {
        self.finalize_target(ents);
        if self.poly.take().is_some() {
            debug!("Dropping POLYLINE without SEQEND");
        }
    }

    fn read_record<R: RecordReader>(&mut self, r: &mut R, ents: &mut Entities) -> Result<()> {
        match r.gc() {
            0 => {
                self.finalize_target(ents);
                self.extrusion = Vec3::new(0.0, 0.0, 1.0);
                if r.matches(0, "SEQEND") {
                    if let Some(poly) = self.poly.take() {
                        ents.polylines.push(poly.into_polyline());
                    }
                }
            }
            102 => {
                // Application-specific group; skip to the closing 102.
                while r.next_record()? && r.gc() != 102 {}
                return Ok(());
            }
            _ => {}
        }

        if r.matches(0, "LINE") {
            self.target = Target::Line(Line::default());
        } else if r.matches(0, "LWPOLYLINE") {
            self.target = Target::LwPolyline(LwAcc::default());
        } else if r.matches(0, "POLYLINE") {
            self.poly = Some(PolyAcc::default());
            self.target = Target::PolyHeader;
        } else if r.matches(0, "VERTEX") {
            if let Some(poly) = self.poly.as_mut() {
                poly.verts.push(PolyVert::default());
                self.target = Target::PolyVertex;
            }
        } else if r.matches(0, "CIRCLE") {
            self.target = Target::Circle(Circle::default());
        } else if r.matches(0, "ARC") {
            self.target = Target::Arc(Arc::default());
        } else if r.matches(0, "ELLIPSE") {
            self.target = Target::Ellipse(Ellipse::default());
        } else if r.matches(0, "SPLINE") {
            self.target = Target::Spline(SplineAcc::default());
        } else if r.matches(0, "INSERT") {
            self.target = Target::Insert(Insert::default());
        } else {
            match &mut self.target {
                Target::None => {}
                Target::Line(line) => match r.gc() {
                    10 => line.start.x = r.dbl()?,
                    20 => line.start.y = r.dbl()?,
                    11 => line.end.x = r.dbl()?,
                    21 => line.end.y = r.dbl()?,
                    _ => {}
                },
                Target::LwPolyline(acc) => match r.gc() {
                    10 => acc.xs.push(r.dbl()?),
                    20 => acc.ys.push(r.dbl()?),
                    42 => {
                        // The bulge belongs to the vertex whose coordinates
                        // were read last; vertices without a bulge record
                        // get zero.
                        let n = acc.xs.len().max(acc.ys.len());
                        if acc.bulges.len() >= n {
                            acc.bulges.push(r.dbl()?);
                        } else {
                            acc.bulges.resize(n, 0.0);
                            let value = r.dbl()?;
                            if let Some(last) = acc.bulges.last_mut() {
                                *last = value;
                            }
                        }
                    }
                    70 => {
                        if r.int()? & 1 != 0 {
                            acc.poly.closed = true;
                        }
                    }
                    90 => {
                        let n = r.int()?.max(0) as usize;
                        acc.xs.reserve(n);
                        acc.ys.reserve(n);
                    }
                    _ => {}
                },
                Target::PolyHeader => {
                    if r.gc() == 70 {
                        if let Some(poly) = self.poly.as_mut() {
                            poly.closed = r.int()? & 1 != 0;
                        }
                    }
                }
                Target::PolyVertex => {
                    if let Some(vert) = self.poly.as_mut().and_then(|p| p.verts.last_mut()) {
                        match r.gc() {
                            10 => vert.pos.x = r.dbl()?,
                            20 => vert.pos.y = r.dbl()?,
                            42 => vert.bulge = r.dbl()?,
                            70 => vert.flags = r.int()?,
                            _ => {}
                        }
                    }
                }
                Target::Circle(circle) => match r.gc() {
                    10 => circle.center.x = r.dbl()?,
                    20 => circle.center.y = r.dbl()?,
                    40 => circle.radius = r.dbl()?,
                    210 => self.extrusion.x = r.dbl()?,
                    220 => self.extrusion.y = r.dbl()?,
                    230 => self.extrusion.z = r.dbl()?,
                    _ => {}
                },
                Target::Arc(arc) => match r.gc() {
                    10 => arc.center.x = r.dbl()?,
                    20 => arc.center.y = r.dbl()?,
                    40 => arc.radius = r.dbl()?,
                    50 => arc.start_angle = r.dbl()?,
                    51 => arc.end_angle = r.dbl()?,
                    210 => self.extrusion.x = r.dbl()?,
                    220 => self.extrusion.y = r.dbl()?,
                    230 => self.extrusion.z = r.dbl()?,
                    _ => {}
                },
                Target::Ellipse(ellipse) => match r.gc() {
                    10 => ellipse.center.x = r.dbl()?,
                    20 => ellipse.center.y = r.dbl()?,
                    11 => ellipse.maj_end.x = r.dbl()?,
                    21 => ellipse.maj_end.y = r.dbl()?,
                    40 => ellipse.ratio = r.dbl()?,
                    41 => ellipse.start = r.dbl()?,
                    42 => ellipse.end = r.dbl()?,
                    _ => {}
                },
                Target::Spline(acc) => match r.gc() {
                    10 => acc.xs.push(r.dbl()?),
                    20 => acc.ys.push(r.dbl()?),
                    40 => acc.spline.knot_values.push(r.dbl()?),
                    70 => acc.spline.flags = r.int()?,
                    71 => acc.spline.degree = r.int()?,
                    73 => {
                        let n = r.int()?.max(0) as usize;
                        acc.xs.reserve(n);
                        acc.ys.reserve(n);
                    }
                    _ => {}
                },
                Target::Insert(insert) => match r.gc() {
                    2 => insert.block_name = r.str_value().to_string(),
                    10 => insert.pos.x = r.dbl()?,
                    20 => insert.pos.y = r.dbl()?,
                    41 => insert.x_scale = r.dbl()?,
                    42 => insert.y_scale = r.dbl()?,
                    44 => insert.col_spacing = r.dbl()?,
                    45 => insert.row_spacing = r.dbl()?,
                    50 => insert.rotation = r.dbl()?,
                    70 => insert.cols = r.int()?,
                    71 => insert.rows = r.int()?,
                    _ => {}
                },
            }
        }
        Ok(())
    }
}

//! KiCad board text for optimized magnetorquers.
//!
//! The output is a list of `(segment ...)` and `(via ...)` s-expressions,
//! one per line, ready to paste into the body of a `.kicad_pcb` file. Every
//! spiral is drawn centered on `(outer_radius + 20, outer_radius + 20)` so
//! the whole coil lands in positive board coordinates.
//!
//! Adjacent layers are wound in opposite directions by reflecting every odd
//! layer across the diagonal `x = y`. This lines up the ends of consecutive
//! layers so they can be joined with vias.

use std::{
    f64::consts::{PI, TAU},
    fmt,
};

use thiserror::Error;
use tracing::debug;
use uom::si::f64::Length;

use crate::{
    config::BoardConfig,
    models::magnetorquer::{
        allocation::LayerAllocation,
        comparison::DesignKind,
        design::{LayerDesign, TraceLayout},
        spiral::SpiralFamily,
        variable_width::{MarchError, Point, SpiralShape, VariableWidthSpiral},
    },
    support::{
        constraint::ConstraintError,
        units::{from_mm, mm},
    },
};

/// Clearance between the board origin and the spiral's bounding square.
const MARGIN_MM: f64 = 20.0;

/// Angular step of the polyline approximating a circular spiral.
const ARC_STEP: f64 = PI / 16.0;

/// Vias closer than this are treated as the same via.
const VIA_TOLERANCE_MM: f64 = 1e-6;

/// Errors that can occur while exporting an allocation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid board: {0}")]
    Board(#[from] ConstraintError),

    /// Redrawing a variable-width layer failed.
    #[error("failed to redraw variable-width spiral")]
    March(#[from] MarchError),

    #[error("a {kind} design cannot be drawn from layout {layout:?}")]
    LayoutMismatch { kind: DesignKind, layout: TraceLayout },

    #[error("layer {index} is an interior layer but the allocation has no interior design")]
    MissingInterior { index: usize },
}

/// KiCad name of copper layer `index` on a board with `layers` layers.
#[must_use]
pub fn layer_name(index: usize, layers: usize) -> String {
    match index {
        0 => "F.Cu".to_string(),
        i if i + 1 == layers => "B.Cu".to_string(),
        i => format!("In{i}.Cu"),
    }
}

/// A polyline of uniform width.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Copper width of every segment.
    pub width: Length,

    /// Vertices in drawing order.
    pub points: Vec<Point>,
}

impl Track {
    /// Consecutive point pairs, one per straight segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Tracks of a constant-width square spiral centered on the origin.
///
/// Only whole coils are drawn. Coil `i` sits at radius `outer − i·spacing`
/// and starts where coil `i − 1` ended.
#[must_use]
pub fn square_tracks(
    outer_radius: Length,
    spacing: Length,
    width: Length,
    coils: usize,
) -> Vec<Track> {
    let o = mm(outer_radius);
    let s = mm(spacing);
    let point = |x: f64, y: f64| Point::new(from_mm(x), from_mm(y));

    (0..coils)
        .map(|i| {
            let r = o - i as f64 * s;
            Track {
                width,
                points: vec![
                    point(-s - r, -r),
                    point(r, -r),
                    point(r, r),
                    point(-r, r),
                    point(-r, s - r),
                ],
            }
        })
        .collect()
}

/// A single track tracing a constant-width circular spiral centered on the
/// origin.
///
/// The spiral starts at `(outer_radius, 0)` and winds `turns` times, moving
/// inward by `spacing` per turn. Returns no tracks when `turns` is zero.
#[must_use]
pub fn circular_tracks(
    outer_radius: Length,
    spacing: Length,
    width: Length,
    turns: f64,
) -> Vec<Track> {
    let o = mm(outer_radius);
    let b = mm(spacing) / TAU;
    let theta_end = turns * TAU;
    if theta_end.is_nan() || theta_end <= 0.0 {
        return Vec::new();
    }

    let steps = (theta_end / ARC_STEP).ceil() as usize;
    let points = (0..=steps)
        .map(|k| {
            let theta = (k as f64 * ARC_STEP).min(theta_end);
            let r = o - b * theta;
            let (sin, cos) = theta.sin_cos();
            Point::new(from_mm(r * cos), from_mm(r * sin))
        })
        .collect();

    vec![Track { width, points }]
}

/// Tracks of a variable-width spiral, one per coil, centered on the origin.
///
/// `outer_radius` must be the radius the shape was wound from.
#[must_use]
pub fn shape_tracks(shape: &SpiralShape, outer_radius: Length) -> Vec<Track> {
    let o = mm(outer_radius);
    shape
        .coils()
        .iter()
        .map(|coil| Track {
            width: coil.width,
            points: coil
                .points
                .iter()
                .map(|p| Point::new(from_mm(mm(p.x) - o), from_mm(mm(p.y) - o)))
                .collect(),
        })
        .collect()
}

/// A straight copper segment on one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start of the segment, in board coordinates.
    pub start: Point,

    /// End of the segment, in board coordinates.
    pub end: Point,

    /// Copper width.
    pub width: Length,

    /// KiCad layer name, such as `F.Cu` or `In1.Cu`.
    pub layer: String,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(segment (start {} {}) (end {} {}) (width {}) (layer {}) (net 0))",
            fmt_mm(self.start.x),
            fmt_mm(self.start.y),
            fmt_mm(self.end.x),
            fmt_mm(self.end.y),
            fmt_mm(self.width),
            self.layer,
        )
    }
}

/// A through-hole via connecting every layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Via {
    /// Center of the via, in board coordinates.
    pub at: Point,

    /// Outer diameter of the annular ring.
    pub size: Length,

    /// Drill diameter.
    pub drill: Length,
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(via (at {} {}) (size {}) (drill {}) (layers F.Cu B.Cu) (net 0))",
            fmt_mm(self.at.x),
            fmt_mm(self.at.y),
            fmt_mm(self.size),
            fmt_mm(self.drill),
        )
    }
}

/// Segments and vias of a multi-layer magnetorquer.
///
/// Displays as KiCad text: every segment in layer order, then every via.
#[derive(Debug, Clone, PartialEq)]
pub struct KicadBoard {
    layers: usize,
    offset: f64,
    via_size: Length,
    via_drill: Length,
    segments: Vec<Segment>,
    vias: Vec<Via>,
}

impl KicadBoard {
    /// Starts an empty board with the layer count and via dimensions of
    /// `board`.
    #[must_use]
    pub fn new(board: &BoardConfig) -> Self {
        Self {
            layers: board.layers,
            offset: mm(board.outer_radius) + MARGIN_MM,
            via_size: board.via_size,
            via_drill: board.via_drill,
            segments: Vec::new(),
            vias: Vec::new(),
        }
    }

    /// Places origin-centered `tracks` on copper layer `index`.
    ///
    /// Vias are added at both ends of the layer's trace unless one already
    /// exists there.
    pub fn add_layer(&mut self, index: usize, tracks: &[Track]) {
        let layer = layer_name(index, self.layers);
        let place = |p: Point| {
            let placed = Point::new(
                from_mm(mm(p.x) + self.offset),
                from_mm(mm(p.y) + self.offset),
            );
            if index % 2 == 1 {
                placed.transposed()
            } else {
                placed
            }
        };

        let mut segments = Vec::new();
        for track in tracks {
            for (start, end) in track.segments() {
                segments.push(Segment {
                    start: place(start),
                    end: place(end),
                    width: track.width,
                    layer: layer.clone(),
                });
            }
        }

        let start = tracks.first().and_then(|t| t.points.first()).copied();
        let end = tracks.last().and_then(|t| t.points.last()).copied();
        let ends: Vec<_> = start.into_iter().chain(end).map(place).collect();

        debug!(layer = %layer, segments = segments.len(), "placed layer");
        self.segments.extend(segments);
        for at in ends {
            self.add_via(at);
        }
    }

    fn add_via(&mut self, at: Point) {
        let exists = self.vias.iter().any(|via| {
            (mm(via.at.x) - mm(at.x)).abs() < VIA_TOLERANCE_MM
                && (mm(via.at.y) - mm(at.y)).abs() < VIA_TOLERANCE_MM
        });
        if !exists {
            self.vias.push(Via {
                at,
                size: self.via_size,
                drill: self.via_drill,
            });
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn vias(&self) -> &[Via] {
        &self.vias
    }
}

impl fmt::Display for KicadBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(f, "{segment}")?;
        }
        for via in &self.vias {
            writeln!(f, "{via}")?;
        }
        Ok(())
    }
}

/// Draws every layer of an allocated board.
///
/// `kind` must be the design strategy the allocation was optimized with.
/// Exterior layers use the exterior design and every other layer the
/// interior design.
///
/// # Errors
///
/// Returns [`ExportError`] if a layer's layout does not match `kind`, an
/// interior design is missing, or a variable-width layer cannot be redrawn.
pub fn export_allocation(
    board: &BoardConfig,
    allocation: &LayerAllocation,
    kind: DesignKind,
) -> Result<KicadBoard, ExportError> {
    let exterior = layer_tracks(board, &allocation.exterior, kind)?;
    let interior = allocation
        .interior
        .as_ref()
        .map(|design| layer_tracks(board, design, kind))
        .transpose()?;

    let mut kicad = KicadBoard::new(board);
    for index in 0..board.layers {
        let tracks = if index == 0 || index + 1 == board.layers {
            &exterior
        } else {
            interior
                .as_ref()
                .ok_or(ExportError::MissingInterior { index })?
        };
        kicad.add_layer(index, tracks);
    }

    debug!(
        segments = kicad.segments().len(),
        vias = kicad.vias().len(),
        "exported board"
    );
    Ok(kicad)
}

fn layer_tracks(
    board: &BoardConfig,
    design: &LayerDesign,
    kind: DesignKind,
) -> Result<Vec<Track>, ExportError> {
    let o = board.outer_radius;
    let coils = design.properties.num_of_coils;

    match (kind, design.layout) {
        (DesignKind::Constant(SpiralFamily::Square), TraceLayout::Spacing(spacing)) => {
            let whole = coils.floor().max(0.0) as usize;
            Ok(square_tracks(o, spacing, spacing - board.gap, whole))
        }
        (DesignKind::Constant(SpiralFamily::Circular), TraceLayout::Spacing(spacing)) => {
            Ok(circular_tracks(o, spacing, spacing - board.gap, coils))
        }
        (DesignKind::VariableWidth(rule), TraceLayout::WidthMultiplier(multiplier)) => {
            let spiral = VariableWidthSpiral::new(board, design.layer, rule.relation(board))?;
            let (_, shape) = spiral.shape(multiplier)?;
            Ok(shape_tracks(&shape, o))
        }
        (kind, layout) => Err(ExportError::LayoutMismatch { kind, layout }),
    }
}

/// Millimetres with four decimals, without a negative zero.
fn fmt_mm(length: Length) -> String {
    let v = (mm(length) * 1e4).round() / 1e4;
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        models::magnetorquer::{
            spiral::SpiralProperties,
            test_support::{board, ohms},
            variable_width::{Coil, WidthRule},
        },
        support::{trace::Layer, units::from_mm2},
    };

    fn xy(point: Point) -> (f64, f64) {
        (mm(point.x), mm(point.y))
    }

    fn assert_xy(point: Point, x: f64, y: f64) {
        assert_relative_eq!(mm(point.x), x, epsilon = 1e-9);
        assert_relative_eq!(mm(point.y), y, epsilon = 1e-9);
    }

    fn constant_design(layer: Layer, spacing: f64, coils: f64) -> LayerDesign {
        LayerDesign {
            layer,
            resistance: ohms(5.0),
            layout: TraceLayout::Spacing(from_mm(spacing)),
            length: from_mm(1000.0),
            properties: SpiralProperties::from_mm(1e4, 30.0, coils),
        }
    }

    fn square_allocation() -> LayerAllocation {
        LayerAllocation {
            exterior_resistance: ohms(5.0),
            interior_resistance: Some(ohms(6.25)),
            exterior: constant_design(Layer::Exterior, 2.0, 3.6),
            interior: Some(constant_design(Layer::Interior, 4.0, 2.2)),
            total_area_sum: from_mm2(6e4),
        }
    }

    #[test]
    fn layer_names() {
        assert_eq!(layer_name(0, 4), "F.Cu");
        assert_eq!(layer_name(1, 4), "In1.Cu");
        assert_eq!(layer_name(2, 4), "In2.Cu");
        assert_eq!(layer_name(3, 4), "B.Cu");
        assert_eq!(layer_name(1, 2), "B.Cu");
    }

    #[test]
    fn square_coils_chain_inward() {
        let tracks = square_tracks(from_mm(10.0), from_mm(2.0), from_mm(1.85), 2);

        assert_eq!(tracks.len(), 2);
        let first = &tracks[0].points;
        assert_xy(first[0], -12.0, -10.0);
        assert_xy(first[1], 10.0, -10.0);
        assert_xy(first[2], 10.0, 10.0);
        assert_xy(first[3], -10.0, 10.0);
        assert_xy(first[4], -10.0, -8.0);

        // Each coil starts where the previous one ended.
        assert_eq!(xy(tracks[1].points[0]), xy(first[4]));
        assert_xy(tracks[1].points[4], -8.0, -6.0);
    }

    #[test]
    fn circular_track_steps_by_sixteenth_turns() {
        let tracks = circular_tracks(from_mm(10.0), from_mm(1.0), from_mm(0.85), 1.0);

        assert_eq!(tracks.len(), 1);
        let points = &tracks[0].points;
        assert_eq!(points.len(), 33);
        assert_xy(points[0], 10.0, 0.0);
        assert_xy(points[8], 0.0, 9.75);
        assert_xy(points[32], 9.0, 0.0);
    }

    #[test]
    fn circular_track_ends_on_partial_turn() {
        let tracks = circular_tracks(from_mm(10.0), from_mm(1.0), from_mm(0.85), 0.25 + 1e-3);

        let points = &tracks[0].points;
        assert_eq!(points.len(), 10);
        let end = points[9];
        let radius = mm(end.x).hypot(mm(end.y));
        assert_relative_eq!(radius, 10.0 - 0.251, epsilon = 1e-9);
    }

    #[test]
    fn no_turns_no_tracks() {
        assert!(circular_tracks(from_mm(10.0), from_mm(1.0), from_mm(0.85), 0.0).is_empty());
        assert!(square_tracks(from_mm(10.0), from_mm(1.0), from_mm(0.85), 0).is_empty());
    }

    #[test]
    fn shape_is_recentered() {
        let point = |x: f64, y: f64| Point::new(from_mm(x), from_mm(y));
        let mut shape = SpiralShape::default();
        shape.push(Coil {
            width: from_mm(1.0),
            points: [
                point(0.0, 0.0),
                point(20.0, 0.0),
                point(20.0, 20.0),
                point(0.0, 20.0),
                point(0.0, 2.0),
            ],
        });

        let tracks = shape_tracks(&shape, from_mm(10.0));

        assert_eq!(tracks.len(), 1);
        assert_xy(tracks[0].points[0], -10.0, -10.0);
        assert_xy(tracks[0].points[2], 10.0, 10.0);
        assert_xy(tracks[0].points[4], -10.0, -8.0);
    }

    #[test]
    fn odd_layers_are_mirrored() {
        let board = board();
        let tracks = square_tracks(from_mm(40.0), from_mm(2.0), from_mm(1.85), 1);

        let mut kicad = KicadBoard::new(&board);
        kicad.add_layer(0, &tracks);
        kicad.add_layer(1, &tracks);

        let front = &kicad.segments()[0];
        let inner = &kicad.segments()[4];
        assert_eq!(front.layer, "F.Cu");
        assert_eq!(inner.layer, "In1.Cu");
        assert_eq!(xy(inner.start), (xy(front.start).1, xy(front.start).0));
        assert_eq!(xy(inner.end), (xy(front.end).1, xy(front.end).0));
    }

    #[test]
    fn square_allocation_segments_and_vias() {
        let board = board();
        let kind = DesignKind::Constant(SpiralFamily::Square);

        let kicad = export_allocation(&board, &square_allocation(), kind).unwrap();

        // Three whole exterior coils and two whole interior coils per layer.
        assert_eq!(kicad.segments().len(), 2 * 3 * 4 + 4 * 2 * 4);

        // Interior layers 1 and 3 (and 2 and 4) share both ends.
        assert_eq!(kicad.vias().len(), 8);
        assert_xy(kicad.vias()[0].at, 18.0, 20.0);
        assert_xy(kicad.vias()[1].at, 24.0, 26.0);
    }

    #[test]
    fn exact_text() {
        let board = board();
        let kind = DesignKind::Constant(SpiralFamily::Square);

        let kicad = export_allocation(&board, &square_allocation(), kind).unwrap();
        let text = kicad.to_string();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("(segment (start 18.0000 20.0000) (end 100.0000 20.0000) (width 1.8500) (layer F.Cu) (net 0))")
        );
        assert_eq!(
            text.lines().last(),
            Some("(via (at 26.0000 24.0000) (size 0.6000) (drill 0.3000) (layers F.Cu B.Cu) (net 0))")
        );
        assert_eq!(text.lines().count(), 56 + 8);
    }

    #[test]
    fn variable_width_allocation_redraws_shape() {
        let board = board();
        let multiplier = 1.0;
        let relation = WidthRule::Constant.relation(&board);
        let exterior = VariableWidthSpiral::new(&board, Layer::Exterior, relation)
            .unwrap()
            .wind(multiplier)
            .unwrap();
        let design = |layer| LayerDesign {
            layer,
            resistance: exterior.resistance,
            layout: TraceLayout::WidthMultiplier(multiplier),
            length: exterior.length,
            properties: exterior.properties(),
        };
        let allocation = LayerAllocation {
            exterior_resistance: exterior.resistance,
            interior_resistance: Some(exterior.resistance * 2.0),
            exterior: design(Layer::Exterior),
            interior: Some(design(Layer::Interior)),
            total_area_sum: exterior.area_sum * 6.0,
        };

        let kind = DesignKind::VariableWidth(WidthRule::Constant);
        let kicad = export_allocation(&board, &allocation, kind).unwrap();

        assert_eq!(kicad.segments().len(), 6 * 4 * exterior.num_of_coils);
        assert_relative_eq!(mm(kicad.segments()[0].width), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn mismatched_layout_is_rejected() {
        let board = board();
        let mut allocation = square_allocation();
        allocation.exterior.layout = TraceLayout::WidthMultiplier(3.0);

        let kind = DesignKind::Constant(SpiralFamily::Square);
        assert!(matches!(
            export_allocation(&board, &allocation, kind),
            Err(ExportError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn interior_layers_need_an_interior_design() {
        let board = board();
        let mut allocation = square_allocation();
        allocation.interior = None;

        let kind = DesignKind::Constant(SpiralFamily::Square);
        assert!(matches!(
            export_allocation(&board, &allocation, kind),
            Err(ExportError::MissingInterior { index: 1 })
        ));
    }
}

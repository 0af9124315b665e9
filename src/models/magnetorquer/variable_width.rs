//! Square spirals whose trace width varies with radius.
//!
//! Instead of a fixed spacing, each ring's width comes from a
//! [`WidthRelation`] evaluated at the ring's radius. The spiral is built by
//! marching inward one ring at a time, starting at the board's outer radius,
//! until the next ring would cross the inner radius. Area-sum, trace length
//! and resistance accumulate along the way.
//!
//! A ring at radius `r` entered from `prev` and left toward `next` is drawn
//! as five corners around the center `(o, o)`, where `o` is the outer radius:
//!
//! ```text
//! a = (o − prev, o − r)    b = (o + r, o − r)    c = (o + r, o + r)
//! d = (o − r,    o + r)    e = (o − r, o − next)
//! ```
//!
//! Its length is `6r + prev + next` and it sweeps half its length times `r`.

mod config;
mod error;
mod relation;
mod shape;

pub use config::MarchConfig;
pub use error::MarchError;
pub use relation::{
    AnyRelation, BoundedInverseRadius, ConstantWidth, InverseRadius, InverseRadiusLessGap,
    WidthRelation, WidthRule,
};
pub use shape::{Coil, Point, SpiralShape};

use tracing::trace;
use twine_core::Model;
use uom::si::{
    electrical_resistance::ohm,
    f64::{Area, ElectricalResistance, Length},
};

use crate::{
    config::BoardConfig,
    support::{
        constraint::ConstraintResult,
        trace::{Layer, TraceResistance},
        units::{from_mm, from_mm2, mm},
    },
};

use super::spiral::SpiralProperties;

/// A variable-width square spiral on one layer of a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableWidthSpiral<R> {
    relation: R,
    trace: TraceResistance,
    outer_radius: Length,
    inner_radius: Length,
    gap: Length,
    config: MarchConfig,
}

/// Totals of one march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winding {
    /// Width multiplier the spiral was wound with.
    pub multiplier: f64,

    /// Sum of the areas enclosed by each ring.
    pub area_sum: Area,

    /// Resistance of the whole trace.
    pub resistance: ElectricalResistance,

    /// Total trace length.
    pub length: Length,

    /// Radius of the innermost ring drawn, or the outer radius if none was.
    pub inner_radius: Length,

    /// Number of rings drawn.
    pub num_of_coils: usize,
}

impl Winding {
    /// Geometry of the winding in the form shared with constant-width spirals.
    #[must_use]
    pub fn properties(&self) -> SpiralProperties {
        SpiralProperties {
            area_sum: self.area_sum,
            inner_radius: self.inner_radius,
            num_of_coils: self.num_of_coils as f64,
        }
    }
}

impl<R: WidthRelation> VariableWidthSpiral<R> {
    /// Creates a spiral spanning the board from its outer to its inner radius.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the board's copper on `layer` has no positive
    /// resistivity or thickness.
    pub fn new(board: &BoardConfig, layer: Layer, relation: R) -> ConstraintResult<Self> {
        Ok(Self {
            relation,
            trace: board.trace(layer)?,
            outer_radius: board.outer_radius,
            inner_radius: board.inner_radius,
            gap: board.gap,
            config: MarchConfig::default(),
        })
    }

    /// Overrides the radius at which the march stops.
    #[must_use]
    pub fn with_inner_radius(mut self, inner_radius: Length) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: MarchConfig) -> Self {
        self.config = config;
        self
    }

    /// Winds the spiral with the given width multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`MarchError`] if a ring's width cannot be drawn or the coil
    /// limit is exceeded.
    pub fn wind(&self, multiplier: f64) -> Result<Winding, MarchError> {
        self.march(multiplier, |_| {})
    }

    /// Winds the spiral and records every ring for drawing.
    ///
    /// # Errors
    ///
    /// Same as [`VariableWidthSpiral::wind`].
    pub fn shape(&self, multiplier: f64) -> Result<(Winding, SpiralShape), MarchError> {
        let mut shape = SpiralShape::default();
        let winding = self.march(multiplier, |coil| shape.push(coil))?;
        Ok((winding, shape))
    }

    fn march(
        &self,
        multiplier: f64,
        mut on_coil: impl FnMut(Coil),
    ) -> Result<Winding, MarchError> {
        let o = mm(self.outer_radius);
        let inner = mm(self.inner_radius);
        let gap = mm(self.gap);

        let width = |radius: f64| self.relation.width(multiplier, radius);
        let infeasible = |radius: f64, width: f64| MarchError::Infeasible {
            radius: from_mm(radius),
            width: from_mm(width),
        };

        let mut r = o;
        let mut prev = o;
        let mut w = width(r);
        if w.is_nan() {
            return Err(infeasible(r, w));
        }

        let mut area_sum = 0.0;
        let mut ohms = 0.0;
        let mut length = 0.0;
        let mut coils = 0;

        while r + 0.5 * w > inner {
            if coils >= self.config.max_coils {
                return Err(MarchError::TooManyCoils {
                    limit: self.config.max_coils,
                });
            }
            let ohms_per_mm = self.trace.ohms_per_mm(w).ok_or_else(|| infeasible(r, w))?;

            let mut next = r - 0.5 * w - gap;
            let next_width = width(next);
            if next_width.is_nan() {
                return Err(infeasible(next, next_width));
            }
            next -= 0.5 * next_width;

            let coil_length = 6.0 * r + prev + next;
            area_sum += 0.5 * coil_length * r;
            ohms += ohms_per_mm * coil_length;
            length += coil_length;
            coils += 1;

            let point = |x: f64, y: f64| Point::new(from_mm(x), from_mm(y));
            on_coil(Coil {
                width: from_mm(w),
                points: [
                    point(o - prev, o - r),
                    point(o + r, o - r),
                    point(o + r, o + r),
                    point(o - r, o + r),
                    point(o - r, o - next),
                ],
            });

            prev = r;
            r = next;
            w = next_width;
        }

        trace!(multiplier, coils, ohms, area_sum, "wound variable-width spiral");

        Ok(Winding {
            multiplier,
            area_sum: from_mm2(area_sum),
            resistance: ElectricalResistance::new::<ohm>(ohms),
            length: from_mm(length),
            inner_radius: from_mm(if coils == 0 { o } else { prev }),
            num_of_coils: coils,
        })
    }
}

impl<R: WidthRelation> Model for VariableWidthSpiral<R> {
    type Input = f64;
    type Output = Winding;
    type Error = MarchError;

    fn call(&self, multiplier: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.wind(*multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::area::square_millimeter;

    use crate::models::magnetorquer::test_support::board;

    /// Outer radius 10, inner radius 5, gap 1.
    fn small_board() -> BoardConfig {
        BoardConfig {
            outer_radius: from_mm(10.0),
            inner_radius: from_mm(5.0),
            gap: from_mm(1.0),
            ..board()
        }
    }

    #[test]
    fn constant_width_hand_calculation() {
        let board = small_board();
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, ConstantWidth).unwrap();

        // Rings at radius 10, 8 and 6 with lengths 78, 64 and 48.
        let winding = spiral.wind(1.0).unwrap();

        assert_eq!(winding.num_of_coils, 3);
        assert_relative_eq!(mm(winding.length), 190.0, max_relative = 1e-12);
        assert_relative_eq!(
            winding.area_sum.get::<square_millimeter>(),
            790.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(mm(winding.inner_radius), 6.0, max_relative = 1e-12);

        let per_mm = board.trace(Layer::Exterior).unwrap().ohms_per_mm(1.0).unwrap();
        assert_relative_eq!(
            winding.resistance.get::<ohm>(),
            per_mm * 190.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn interior_layer_has_higher_resistance() {
        let board = board();
        let wind = |layer| {
            VariableWidthSpiral::new(&board, layer, BoundedInverseRadius)
                .unwrap()
                .wind(2.0)
                .unwrap()
        };
        let (exterior, interior) = (wind(Layer::Exterior), wind(Layer::Interior));

        assert_eq!(exterior.num_of_coils, interior.num_of_coils);
        assert_relative_eq!(
            interior.resistance.get::<ohm>(),
            2.0 * exterior.resistance.get::<ohm>(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn shape_is_ordered_outside_in() {
        let board = small_board();
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, ConstantWidth).unwrap();

        let (winding, shape) = spiral.shape(1.0).unwrap();
        assert_eq!(shape.len(), winding.num_of_coils);

        let first = shape.coils()[0];
        let expected = [(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0), (0.0, 2.0)];
        for (point, (x, y)) in first.points.iter().zip(expected) {
            assert_relative_eq!(mm(point.x), x, epsilon = 1e-12);
            assert_relative_eq!(mm(point.y), y, epsilon = 1e-12);
        }

        for pair in shape.coils().windows(2) {
            // Rings shrink, and each starts where the previous one ended.
            assert!(pair[1].points[1].x < pair[0].points[1].x);
            assert_eq!(pair[1].points[0], pair[0].points[4]);
        }

        assert_eq!(shape.start(), Some(first.points[0]));
        assert_eq!(shape.end(), Some(shape.coils()[2].points[4]));
    }

    #[test]
    fn negative_width_is_infeasible() {
        let board = board();
        let relation = WidthRule::InverseRadiusLessGap.relation(&board);
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, relation).unwrap();

        assert!(matches!(
            spiral.wind(1e-3),
            Err(MarchError::Infeasible { .. })
        ));
    }

    #[test]
    fn nan_multiplier_is_infeasible() {
        let board = board();
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, InverseRadius).unwrap();

        assert!(matches!(
            spiral.wind(f64::NAN),
            Err(MarchError::Infeasible { .. })
        ));
    }

    #[test]
    fn coil_limit_is_enforced() {
        let board = BoardConfig {
            gap: from_mm(0.0),
            ..board()
        };
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, ConstantWidth)
            .unwrap()
            .with_config(MarchConfig { max_coils: 1000 });

        assert_eq!(
            spiral.wind(1e-3),
            Err(MarchError::TooManyCoils { limit: 1000 })
        );
    }

    #[test]
    fn nothing_drawn_inside_inner_radius() {
        let board = small_board();
        let spiral = VariableWidthSpiral::new(&board, Layer::Exterior, ConstantWidth)
            .unwrap()
            .with_inner_radius(from_mm(11.0));

        let winding = spiral.wind(1.0).unwrap();
        assert_eq!(winding.num_of_coils, 0);
        assert_eq!(winding.area_sum.get::<square_millimeter>(), 0.0);
        assert_relative_eq!(mm(winding.inner_radius), 10.0, max_relative = 1e-12);
    }

    #[test]
    fn model_call_matches_wind() {
        let board = board();
        let spiral = VariableWidthSpiral::new(&board, Layer::Interior, InverseRadius).unwrap();

        assert_eq!(spiral.call(&12.0), spiral.wind(12.0));
    }
}

//! Square spiral model.

use uom::si::f64::Length;

use crate::support::{
    constraint::{Constrained, ConstraintResult, StrictlyPositive},
    units::mm,
};

use super::{SpiralError, SpiralFit, SpiralGeometry, SpiralProperties};

/// A square spiral of nested rings.
///
/// Each ring is drawn two edges (half a turn) at a time. An edge at distance
/// `r` from the center adds `r²` to the area-sum, so a full square ring of
/// "radius" `r` encloses `4r²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareSpiral {
    outer_radius: Constrained<Length, StrictlyPositive>,
}

impl SquareSpiral {
    /// Creates a square spiral model with the given outer radius.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the outer radius is not strictly positive.
    pub fn new(outer_radius: Length) -> ConstraintResult<Self> {
        Ok(Self {
            outer_radius: StrictlyPositive::new(outer_radius)?,
        })
    }
}

impl SpiralGeometry for SquareSpiral {
    fn outer_radius(&self) -> Length {
        self.outer_radius.into_inner()
    }

    fn evaluate(&self, length: Length, spacing: Length) -> Result<SpiralFit, SpiralError> {
        Ok(wind(mm(length), mm(spacing), mm(self.outer_radius())))
    }
}

/// Area added by drawing one edge at distance `radius` from the center.
#[inline]
fn area_added_by_edge(radius: f64) -> f64 {
    radius * radius
}

fn wind(length: f64, spacing: f64, outer_radius: f64) -> SpiralFit {
    if !(length >= 0.0 && length.is_finite() && spacing >= 0.0 && spacing.is_finite()) {
        return SpiralFit::DoesNotFit;
    }

    let mut r = outer_radius;

    // The first, outermost edge.
    let mut num_of_coils = 0.25;
    let mut remaining = length - 2.0 * r;
    let mut area_sum = area_added_by_edge(r);

    if remaining > 0.0 {
        r += spacing / 2.0;
    }
    while remaining > 0.0 {
        r -= spacing / 2.0;
        if r < 0.0 {
            return SpiralFit::DoesNotFit;
        }

        remaining -= 4.0 * r;
        area_sum += 2.0 * area_added_by_edge(r);
        num_of_coils += 0.5;
    }

    // The last half-turn overshot by at least a whole edge; drop that edge.
    if remaining <= -2.0 * r {
        area_sum -= area_added_by_edge(r);
        remaining += 2.0 * r;
        num_of_coils -= 0.25;
    }

    // Only part of the final edge is drawn.
    area_sum -= -remaining * r / 2.0;

    SpiralFit::Fits(SpiralProperties::from_mm(area_sum, r, num_of_coils))
}

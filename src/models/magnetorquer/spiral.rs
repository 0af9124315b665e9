//! Constant-width spiral geometry.
//!
//! Two spiral families are modeled, both starting at the outer radius and
//! winding inward with a fixed center-to-center spacing:
//!
//! - [`CircularSpiral`]: an Archimedean spiral `r(θ) = a − bθ`.
//! - [`SquareSpiral`]: nested square rings, one edge at a time.
//!
//! Given a total trace length and a spacing, each model reports the
//! [`SpiralProperties`] of the resulting coil, or [`SpiralFit::DoesNotFit`]
//! if the trace cannot be wound inside the outer radius.

mod circular;
mod error;
mod properties;
mod square;

pub use circular::{ArcLengthConfig, CircularSpiral};
pub use error::SpiralError;
pub use properties::{SpiralFit, SpiralProperties};
pub use square::SquareSpiral;

use serde::Deserialize;
use uom::si::f64::Length;

use crate::support::constraint::ConstraintResult;

/// A constant-width spiral family evaluated at a fixed outer radius.
pub trait SpiralGeometry {
    /// Radius of the outermost ring.
    fn outer_radius(&self) -> Length;

    /// Winds a trace of `length` with the given center-to-center `spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`SpiralError`] if an internal solve fails. A trace that simply
    /// does not fit is reported as [`SpiralFit::DoesNotFit`], not as an error.
    fn evaluate(&self, length: Length, spacing: Length) -> Result<SpiralFit, SpiralError>;
}

/// Runtime selection of a constant-width spiral family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiralFamily {
    Circular,
    Square,
}

/// A [`SpiralGeometry`] chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnySpiral {
    Circular(CircularSpiral),
    Square(SquareSpiral),
}

impl AnySpiral {
    /// Builds the selected family at the given outer radius.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the outer radius is not strictly positive.
    pub fn new(family: SpiralFamily, outer_radius: Length) -> ConstraintResult<Self> {
        Ok(match family {
            SpiralFamily::Circular => Self::Circular(CircularSpiral::new(outer_radius)?),
            SpiralFamily::Square => Self::Square(SquareSpiral::new(outer_radius)?),
        })
    }
}

impl SpiralGeometry for AnySpiral {
    fn outer_radius(&self) -> Length {
        match self {
            Self::Circular(spiral) => spiral.outer_radius(),
            Self::Square(spiral) => spiral.outer_radius(),
        }
    }

    fn evaluate(&self, length: Length, spacing: Length) -> Result<SpiralFit, SpiralError> {
        match self {
            Self::Circular(spiral) => spiral.evaluate(length, spacing),
            Self::Square(spiral) => spiral.evaluate(length, spacing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::units::{from_mm, mm};

    #[test]
    fn square_encloses_more_than_circle_for_same_trace() {
        let square = AnySpiral::new(SpiralFamily::Square, from_mm(40.0)).unwrap();
        let circle = AnySpiral::new(SpiralFamily::Circular, from_mm(40.0)).unwrap();

        let length = from_mm(3000.0);
        let spacing = from_mm(1.0);

        let square = square.evaluate(length, spacing).unwrap().properties().unwrap();
        let circle = circle.evaluate(length, spacing).unwrap().properties().unwrap();

        assert!(square.area_sum > circle.area_sum);
    }

    #[test]
    fn dispatch_reports_outer_radius() {
        let spiral = AnySpiral::new(SpiralFamily::Circular, from_mm(12.0)).unwrap();
        assert_relative_eq!(mm(spiral.outer_radius()), 12.0, max_relative = 1e-12);

        assert!(AnySpiral::new(SpiralFamily::Square, from_mm(-1.0)).is_err());
    }
}

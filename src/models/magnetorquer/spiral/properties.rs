use uom::si::f64::{Area, Length};

use crate::support::units::{from_mm, from_mm2};

/// Geometric properties of a wound spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralProperties {
    /// Sum of the areas enclosed by each coil.
    pub area_sum: Area,

    /// Radius at which the trace ends.
    pub inner_radius: Length,

    /// Number of turns, possibly fractional.
    pub num_of_coils: f64,
}

impl SpiralProperties {
    pub(crate) fn from_mm(area_sum: f64, inner_radius: f64, num_of_coils: f64) -> Self {
        Self {
            area_sum: from_mm2(area_sum),
            inner_radius: from_mm(inner_radius),
            num_of_coils,
        }
    }
}

/// Outcome of winding a spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpiralFit {
    /// The trace fits inside the outer radius.
    Fits(SpiralProperties),

    /// The trace cannot be wound inside the outer radius, or the requested
    /// length or spacing is degenerate (negative or not a number).
    DoesNotFit,
}

impl SpiralFit {
    /// Returns the properties if the spiral fits.
    #[must_use]
    pub fn properties(self) -> Option<SpiralProperties> {
        match self {
            Self::Fits(properties) => Some(properties),
            Self::DoesNotFit => None,
        }
    }

    /// Returns `true` if the spiral fits.
    #[must_use]
    pub fn fits(&self) -> bool {
        matches!(self, Self::Fits(_))
    }

    /// Returns the area-sum if the spiral fits.
    #[must_use]
    pub fn area_sum(&self) -> Option<Area> {
        match self {
            Self::Fits(properties) => Some(properties.area_sum),
            Self::DoesNotFit => None,
        }
    }
}

//! Electrical properties of copper PCB traces.
//!
//! A trace's resistance per unit length depends on its width and on the
//! copper thickness of the layer it is etched on. Exterior (front/back)
//! layers are usually plated thicker than interior layers, so the same
//! width yields a different resistance on each.

use serde::Deserialize;
use uom::si::f64::{ElectricalResistance, ElectricalResistivity, Length};

use crate::support::{
    constraint::{Constrained, ConstraintResult, StrictlyPositive},
    units::{ResistancePerLength, from_mm, mm},
};

/// Position of a copper layer within the board stack-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Front or back copper.
    Exterior,
    /// Any copper layer between the front and back.
    Interior,
}

/// Resistance model for traces of a single copper thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResistance {
    resistivity: Constrained<ElectricalResistivity, StrictlyPositive>,
    thickness: Constrained<Length, StrictlyPositive>,
}

impl TraceResistance {
    /// Creates a trace resistance model.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the resistivity or thickness is not strictly positive.
    pub fn new(resistivity: ElectricalResistivity, thickness: Length) -> ConstraintResult<Self> {
        Ok(Self {
            resistivity: StrictlyPositive::new(resistivity)?,
            thickness: StrictlyPositive::new(thickness)?,
        })
    }

    /// Resistance per unit length of a trace of the given width.
    ///
    /// Returns `None` if the width is not strictly positive, since no
    /// trace can be drawn.
    #[must_use]
    pub fn per_length(&self, width: Length) -> Option<ResistancePerLength> {
        let width_mm = mm(width);
        if width_mm.is_nan() || width_mm <= 0.0 {
            return None;
        }
        Some(self.resistivity.into_inner() / (self.thickness.into_inner() * width))
    }

    /// Resistance of a trace of the given width and length.
    #[must_use]
    pub fn resistance(&self, width: Length, length: Length) -> Option<ElectricalResistance> {
        self.per_length(width).map(|per_length| per_length * length)
    }

    /// Resistance per millimetre, in ohms, for a width in millimetres.
    ///
    /// Raw form of [`TraceResistance::per_length`] used in marching loops.
    pub(crate) fn ohms_per_mm(&self, width_mm: f64) -> Option<f64> {
        self.per_length(from_mm(width_mm))
            .map(|per_length| (per_length * from_mm(1.0)).value)
    }

    /// Width a trace of `length` needs to have exactly `resistance`.
    ///
    /// The result is infinite for a zero resistance and `NaN` when both
    /// length and resistance are zero.
    #[must_use]
    pub fn width_for(&self, length: Length, resistance: ElectricalResistance) -> Length {
        self.resistivity.into_inner() * length / (self.thickness.into_inner() * resistance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{electrical_resistance::ohm, electrical_resistivity::ohm_meter};

    fn one_ounce() -> TraceResistance {
        TraceResistance::new(
            ElectricalResistivity::new::<ohm_meter>(1.72e-8),
            from_mm(0.0347),
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_physical_copper() {
        let rho = ElectricalResistivity::new::<ohm_meter>(1.72e-8);
        assert!(TraceResistance::new(rho, from_mm(0.0)).is_err());
        assert!(TraceResistance::new(-rho, from_mm(0.0347)).is_err());
    }

    #[test]
    fn ohms_per_mm_matches_hand_calculation() {
        let trace = one_ounce();

        // rho / (t * w) with t in metres and w in millimetres gives ohm/mm.
        let expected = 1.72e-8 / (0.0347e-3 * 0.25);
        assert_relative_eq!(
            trace.ohms_per_mm(0.25).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn no_resistance_for_non_positive_width() {
        let trace = one_ounce();
        assert!(trace.ohms_per_mm(0.0).is_none());
        assert!(trace.ohms_per_mm(-0.1).is_none());
        assert!(trace.ohms_per_mm(f64::NAN).is_none());
    }

    #[test]
    fn width_for_inverts_resistance() {
        let trace = one_ounce();
        let length = from_mm(1500.0);
        let target = ElectricalResistance::new::<ohm>(12.0);

        let width = trace.width_for(length, target);
        let back = trace.resistance(width, length).unwrap();

        assert_relative_eq!(back.get::<ohm>(), 12.0, max_relative = 1e-12);
    }
}

//! Shared fixtures for magnetorquer model tests.

use uom::si::{
    electrical_resistance::ohm,
    electrical_resistivity::ohm_meter,
    f64::{ElectricalResistance, ElectricalResistivity},
};

use crate::{config::BoardConfig, support::units::from_mm};

/// A six-layer board with 1 oz exterior and 0.5 oz interior copper.
pub(crate) fn board() -> BoardConfig {
    BoardConfig {
        outer_radius: from_mm(40.0),
        inner_radius: from_mm(5.0),
        gap: from_mm(0.15),
        resistivity: ElectricalResistivity::new::<ohm_meter>(1.72e-8),
        exterior_copper_oz: 1.0,
        interior_copper_oz: 0.5,
        thickness_per_oz: from_mm(0.0347),
        layers: 6,
        resistance: ElectricalResistance::new::<ohm>(35.0),
        via_size: from_mm(0.6),
        via_drill: from_mm(0.3),
    }
}

/// [`board`] with the same copper weight on every layer.
pub(crate) fn uniform_board() -> BoardConfig {
    BoardConfig {
        interior_copper_oz: 1.0,
        ..board()
    }
}

pub(crate) fn ohms(value: f64) -> ElectricalResistance {
    ElectricalResistance::new::<ohm>(value)
}

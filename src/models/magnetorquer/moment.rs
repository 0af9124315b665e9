//! Magnetic dipole moment of a driven coil.
//!
//! A coil dissipating power `P` through resistance `R` carries a current
//! `I = √(P/R)`, and its dipole moment is that current times the area-sum.

use uom::si::{
    electric_current::ampere,
    electrical_resistance::ohm,
    f64::{Area, ElectricCurrent, ElectricalResistance, Power},
    power::watt,
};

use crate::support::{
    constraint::{Constrained, NonNegative, StrictlyPositive},
    units::MagneticMoment,
};

/// Current through `resistance` when it dissipates `power`.
#[must_use]
pub fn drive_current(
    resistance: Constrained<ElectricalResistance, StrictlyPositive>,
    power: Constrained<Power, NonNegative>,
) -> ElectricCurrent {
    let amps_squared = power.into_inner().get::<watt>() / resistance.into_inner().get::<ohm>();
    ElectricCurrent::new::<ampere>(amps_squared.sqrt())
}

/// Dipole moment of a coil with the given area-sum and resistance when it
/// dissipates `power`.
#[must_use]
pub fn dipole_moment(
    area_sum: Area,
    resistance: Constrained<ElectricalResistance, StrictlyPositive>,
    power: Constrained<Power, NonNegative>,
) -> MagneticMoment {
    drive_current(resistance, power) * area_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::area::square_millimeter;

    #[test]
    fn moment_is_current_times_area_sum() {
        let resistance = StrictlyPositive::new(ElectricalResistance::new::<ohm>(25.0)).unwrap();
        let power = NonNegative::new(Power::new::<watt>(1.0)).unwrap();

        assert_relative_eq!(
            drive_current(resistance, power).get::<ampere>(),
            0.2,
            max_relative = 1e-12
        );

        // 0.2 A around 0.01 m².
        let moment = dipole_moment(Area::new::<square_millimeter>(1e4), resistance, power);
        assert_relative_eq!(moment.value, 0.002, max_relative = 1e-12);
    }

    #[test]
    fn no_power_no_moment() {
        let resistance = StrictlyPositive::new(ElectricalResistance::new::<ohm>(10.0)).unwrap();
        let power = NonNegative::new(Power::new::<watt>(0.0)).unwrap();

        let moment = dipole_moment(Area::new::<square_millimeter>(5e4), resistance, power);
        assert_eq!(moment.value, 0.0);
    }
}

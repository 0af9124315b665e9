//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for physical quantities at its public boundaries.
//! The quantities below are used by the trace and moment calculations but
//! have no named type in [`uom::si::f64`].
//!
//! Spiral geometry works in raw millimetres internally. The helpers here
//! convert between those raw values and [`uom`] quantities in one place.

use uom::{
    si::{
        ISQ, Quantity, SI,
        area::square_millimeter,
        f64::{Area, Length},
        length::millimeter,
    },
    typenum::{N2, N3, P1, P2, Z0},
};

/// Electrical resistance per unit length, Ω/m in SI.
pub type ResistancePerLength = Quantity<ISQ<P1, P1, N3, N2, Z0, Z0, Z0>, SI<f64>, f64>;

/// Magnetic dipole moment, A·m² in SI.
pub type MagneticMoment = Quantity<ISQ<P2, Z0, Z0, P1, Z0, Z0, Z0>, SI<f64>, f64>;

/// Returns `length` in millimetres.
#[inline]
pub(crate) fn mm(length: Length) -> f64 {
    length.get::<millimeter>()
}

/// Creates a length from millimetres.
#[inline]
pub(crate) fn from_mm(value: f64) -> Length {
    Length::new::<millimeter>(value)
}

/// Creates an area from square millimetres.
#[inline]
pub(crate) fn from_mm2(value: f64) -> Area {
    Area::new::<square_millimeter>(value)
}

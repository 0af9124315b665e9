//! Problem formulations for iterative resistance matching.

use std::convert::Infallible;

use thiserror::Error;
use twine_core::{EquationProblem, Model};
use uom::si::{
    electrical_resistance::ohm,
    f64::{ElectricalResistance, Length},
};

use crate::{
    models::magnetorquer::variable_width::Winding,
    support::{trace::TraceResistance, units::from_mm},
};

use super::SpacingMatch;

/// The spacing leaves no room for copper once the gap is subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("spacing {spacing:?} leaves a non-positive trace width")]
pub(super) struct NonPositiveWidth {
    spacing: Length,
}

/// Resistance of a fixed-length trace as a function of its spacing.
pub(super) struct SpacingModel {
    trace: TraceResistance,
    gap: Length,
    length: Length,
}

impl SpacingModel {
    pub(super) fn new(trace: TraceResistance, gap: Length, length: Length) -> Self {
        Self { trace, gap, length }
    }
}

impl Model for SpacingModel {
    type Input = Length;
    type Output = SpacingMatch;
    type Error = NonPositiveWidth;

    fn call(&self, spacing: &Self::Input) -> Result<Self::Output, Self::Error> {
        let width = *spacing - self.gap;
        let resistance = self
            .trace
            .resistance(width, self.length)
            .ok_or(NonPositiveWidth { spacing: *spacing })?;

        Ok(SpacingMatch {
            spacing: *spacing,
            width,
            resistance,
        })
    }
}

/// Equation problem for spacing matching.
///
/// Computes the residual as `achieved - target`.
pub(super) struct SpacingProblem {
    target: ElectricalResistance,
}

impl SpacingProblem {
    pub(super) fn new(target: ElectricalResistance) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for SpacingProblem {
    type Input = Length;
    type Output = SpacingMatch;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(from_mm(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(output.resistance - self.target).get::<ohm>()])
    }
}

/// Equation problem for width-multiplier matching.
///
/// Computes the residual as `achieved - target`.
pub(super) struct MultiplierProblem {
    target: ElectricalResistance,
}

impl MultiplierProblem {
    pub(super) fn new(target: ElectricalResistance) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for MultiplierProblem {
    type Input = f64;
    type Output = Winding;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(output.resistance - self.target).get::<ohm>()])
    }
}

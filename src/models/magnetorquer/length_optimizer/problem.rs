//! Problem formulation for area-sum maximization over trace length.

use std::convert::Infallible;

use twine_core::{Model, OptimizationProblem};
use uom::si::{
    area::square_millimeter,
    f64::{ElectricalResistance, Length},
};

use crate::{
    models::magnetorquer::spiral::{SpiralError, SpiralFit, SpiralGeometry},
    support::{trace::Layer, units::from_mm},
};

use super::ConstantWidthOptimizer;

/// A constant-width spiral on one layer, wound at a trace length.
///
/// The spacing follows from the length and the layer resistance.
pub(super) struct LengthModel<'o, 'a, S> {
    optimizer: &'o ConstantWidthOptimizer<'a, S>,
    layer: Layer,
    resistance: ElectricalResistance,
}

impl<'o, 'a, S> LengthModel<'o, 'a, S> {
    pub(super) fn new(
        optimizer: &'o ConstantWidthOptimizer<'a, S>,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Self {
        Self {
            optimizer,
            layer,
            resistance,
        }
    }
}

impl<S: SpiralGeometry> Model for LengthModel<'_, '_, S> {
    type Input = Length;
    type Output = SpiralFit;
    type Error = SpiralError;

    fn call(&self, length: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.optimizer.evaluate(self.layer, self.resistance, *length)
    }
}

/// Optimization problem for the area-sum of a spiral, in mm².
///
/// A spiral that does not fit has an objective of `-∞`.
pub(super) struct AreaSumProblem;

impl OptimizationProblem<1> for AreaSumProblem {
    type Input = Length;
    type Output = SpiralFit;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(from_mm(x[0]))
    }

    fn objective(&self, _input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error> {
        Ok(output
            .area_sum()
            .map_or(f64::NEG_INFINITY, |area| area.get::<square_millimeter>()))
    }
}

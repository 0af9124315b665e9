//! Problem formulation for the resistance budget split.

use std::convert::Infallible;

use twine_core::{Model, OptimizationProblem};
use uom::{
    ConstZero,
    si::{
        area::square_millimeter,
        electrical_resistance::ohm,
        f64::{Area, ElectricalResistance},
    },
};

use crate::{
    config::BoardConfig,
    models::magnetorquer::{design::LayerOptimizer, length_optimizer::OptimizeError},
    support::trace::Layer,
};

use super::LayerAllocation;

/// Every layer of a board designed for one exterior layer resistance.
pub(super) struct AllocationModel<'a, O> {
    board: &'a BoardConfig,
    optimizer: &'a O,
}

impl<'a, O> AllocationModel<'a, O> {
    pub(super) fn new(board: &'a BoardConfig, optimizer: &'a O) -> Self {
        Self { board, optimizer }
    }
}

impl<O: LayerOptimizer> Model for AllocationModel<'_, O> {
    type Input = ElectricalResistance;
    type Output = LayerAllocation;
    type Error = OptimizeError;

    fn call(&self, exterior_resistance: &Self::Input) -> Result<Self::Output, Self::Error> {
        let exterior = self
            .optimizer
            .optimize(Layer::Exterior, *exterior_resistance)?;
        let interior = self
            .board
            .interior_resistance(*exterior_resistance)
            .map(|resistance| self.optimizer.optimize(Layer::Interior, resistance))
            .transpose()?;

        let interior_area = interior.map_or(Area::ZERO, |design| {
            design.properties.area_sum * self.board.interior_layers() as f64
        });

        Ok(LayerAllocation {
            exterior_resistance: exterior.resistance,
            interior_resistance: interior.map(|design| design.resistance),
            exterior,
            interior,
            total_area_sum: exterior.properties.area_sum * 2.0 + interior_area,
        })
    }
}

/// Optimization problem for the total area-sum of a board, in mm².
pub(super) struct TotalAreaProblem;

impl OptimizationProblem<1> for TotalAreaProblem {
    type Input = ElectricalResistance;
    type Output = LayerAllocation;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ElectricalResistance::new::<ohm>(x[0]))
    }

    fn objective(&self, _input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error> {
        Ok(output.total_area_sum.get::<square_millimeter>())
    }
}

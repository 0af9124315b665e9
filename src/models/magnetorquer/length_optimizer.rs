//! Trace-length optimization for constant-width spirals.
//!
//! At a fixed resistance, a longer trace must be wider, so its spacing grows
//! with its length. Short traces leave the board mostly empty and long ones
//! stop fitting. The optimizer first bisects for the longest trace that still
//! fits, then maximizes the area-sum over lengths up to that bound.

mod config;
mod error;
mod problem;

pub use config::LengthSearchConfig;
pub use error::OptimizeError;

use tracing::{debug, warn};
use twine_solvers::optimization::golden_section;
use uom::si::f64::{ElectricalResistance, Length};

use crate::{
    config::BoardConfig,
    support::{
        search,
        trace::Layer,
        units::{from_mm, mm},
    },
};

use super::{
    design::{LayerDesign, LayerOptimizer, TraceLayout, layer_resistance},
    spiral::{SpiralError, SpiralFit, SpiralGeometry},
};

use problem::{AreaSumProblem, LengthModel};

/// Optimizes the trace length of a constant-width spiral on each layer.
#[derive(Debug, Clone, Copy)]
pub struct ConstantWidthOptimizer<'a, S> {
    board: &'a BoardConfig,
    spiral: S,
    config: LengthSearchConfig,
}

impl<'a, S: SpiralGeometry> ConstantWidthOptimizer<'a, S> {
    #[must_use]
    pub fn new(board: &'a BoardConfig, spiral: S) -> Self {
        Self {
            board,
            spiral,
            config: LengthSearchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LengthSearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Winds a trace of `length` at the spacing that gives it `resistance`.
    ///
    /// # Errors
    ///
    /// Returns [`SpiralError`] if the spiral evaluation fails.
    pub fn evaluate(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
        length: Length,
    ) -> Result<SpiralFit, SpiralError> {
        let spacing = self.board.spacing_from_length(length, resistance, layer);
        self.spiral.evaluate(length, spacing)
    }

    /// Longest trace with the given resistance that still fits on the board.
    ///
    /// The result is within the configured relative tolerance of the true
    /// boundary and always fits.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError`] if the resistance is invalid or a spiral
    /// evaluation fails.
    pub fn max_trace_length(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Result<Length, OptimizeError> {
        let resistance = layer_resistance(resistance)?.into_inner();

        let frontier = search::feasible_frontier(
            |length| {
                let fit = self.evaluate(layer, resistance, from_mm(length))?;
                Ok::<_, SpiralError>(fit.fits())
            },
            [0.0, mm(self.config.upper_bound)],
            &self.config.frontier,
        )?;

        if frontier.status == search::Status::MaxIters {
            warn!(
                iters = frontier.iters,
                feasible = frontier.feasible,
                "trace length bisection stopped before reaching tolerance"
            );
        }

        debug!(
            feasible = frontier.feasible,
            infeasible = frontier.infeasible,
            iters = frontier.iters,
            "found longest fitting trace"
        );
        Ok(from_mm(frontier.feasible))
    }
}

impl<S: SpiralGeometry> LayerOptimizer for ConstantWidthOptimizer<'_, S> {
    fn optimize(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Result<LayerDesign, OptimizeError> {
        let max_length = self.max_trace_length(layer, resistance)?;
        let model = LengthModel::new(self, layer, resistance);

        let solution = golden_section::maximize(
            &model,
            &AreaSumProblem,
            [0.0, mm(max_length)],
            &self.config.golden_section()?,
            |event: &golden_section::Event<'_, LengthModel<'_, '_, S>, AreaSumProblem>| match event {
                // Too long to fit, or a failed solve: steer toward shorter traces.
                golden_section::Event::Evaluated { output, .. } if !output.fits() => {
                    Some(golden_section::Action::AssumeWorse)
                }
                golden_section::Event::ModelFailed { .. } => {
                    Some(golden_section::Action::AssumeWorse)
                }
                _ => None,
            },
        )?;

        if solution.status == golden_section::Status::MaxIters {
            warn!(
                iters = solution.iters,
                length = solution.x,
                "area-sum maximization stopped before reaching tolerance"
            );
        }

        let length = solution.snapshot.input;
        let SpiralFit::Fits(properties) = solution.snapshot.output else {
            return Err(OptimizeError::Infeasible { length });
        };

        debug!(
            length = solution.x,
            area_sum = solution.objective,
            iters = solution.iters,
            "optimized trace length"
        );

        let spacing = self.board.spacing_from_length(length, resistance, layer);
        Ok(LayerDesign {
            layer,
            resistance,
            layout: TraceLayout::Spacing(spacing),
            length,
            properties,
        })
    }
}

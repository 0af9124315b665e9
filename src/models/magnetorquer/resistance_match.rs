//! Iterative solvers for a target trace resistance.
//!
//! Both solvers bisect a single design variable until the trace resistance
//! matches the target:
//!
//! - [`match_spacing`] varies the center-to-center spacing of a uniform trace
//!   of fixed length.
//! - [`match_multiplier`] varies the width multiplier of a
//!   [`VariableWidthSpiral`].
//!
//! Points where the trace cannot be drawn (no copper left after the gap, or
//! an infeasible width) lie on the narrow, high-resistance side of the
//! solution and are treated as a positive residual.

mod config;
mod error;
mod problem;

pub use config::MatchConfig;
pub use error::MatchError;

use tracing::debug;
use twine_solvers::equation::bisection;
use uom::si::{
    electrical_resistance::ohm,
    f64::{ElectricalResistance, Length},
};

use crate::{
    config::BoardConfig,
    support::{
        constraint::{Constrained, ConstraintResult, StrictlyPositive},
        trace::Layer,
    },
};

use super::{
    design::{LayerDesign, LayerOptimizer, TraceLayout, layer_resistance},
    length_optimizer::OptimizeError,
    variable_width::{SpiralShape, VariableWidthSpiral, Winding, WidthRelation},
};

use problem::{MultiplierProblem, SpacingModel, SpacingProblem};

/// A uniform trace matched to a resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingMatch {
    /// Center-to-center spacing of adjacent turns.
    pub spacing: Length,

    /// Copper width, the spacing less the board gap.
    pub width: Length,

    /// Resistance achieved by the trace.
    pub resistance: ElectricalResistance,
}

/// Finds the spacing at which a trace of `length` on `layer` has the target
/// resistance.
///
/// The closed form is [`BoardConfig::spacing_from_length`]; this solver
/// reaches the same answer iteratively.
///
/// # Errors
///
/// Returns [`MatchError`] if the board's copper is not physical, the bracket
/// does not contain a solution, or the solver fails to converge.
pub fn match_spacing(
    board: &BoardConfig,
    layer: Layer,
    length: Length,
    target: Constrained<ElectricalResistance, StrictlyPositive>,
    config: &MatchConfig,
) -> Result<SpacingMatch, MatchError> {
    let model = SpacingModel::new(board.trace(layer)?, board.gap, length);
    let problem = SpacingProblem::new(target.into_inner());

    let solution = bisection::solve(
        &model,
        &problem,
        config.bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // No copper left after the gap: the spacing is too small.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(MatchError::MaxIters {
            residual: ElectricalResistance::new::<ohm>(solution.residual),
            iters: solution.iters,
        });
    }

    debug!(
        iters = solution.iters,
        residual = solution.residual,
        "matched spacing"
    );
    Ok(solution.snapshot.output)
}

/// Finds the width multiplier at which `spiral` has the target resistance.
///
/// Resistance jumps each time a ring is gained or lost, so a target that
/// falls inside a jump is approached from the nearest ring count.
///
/// # Errors
///
/// Returns [`MatchError`] if the bracket does not contain a solution or the
/// solver fails to converge.
pub fn match_multiplier<R: WidthRelation>(
    spiral: &VariableWidthSpiral<R>,
    target: Constrained<ElectricalResistance, StrictlyPositive>,
    config: &MatchConfig,
) -> Result<Winding, MatchError> {
    let problem = MultiplierProblem::new(target.into_inner());

    let solution = bisection::solve(
        spiral,
        &problem,
        config.bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // Infeasible widths only occur for multipliers that are too small.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(MatchError::MaxIters {
            residual: ElectricalResistance::new::<ohm>(solution.residual),
            iters: solution.iters,
        });
    }

    debug!(
        multiplier = solution.snapshot.output.multiplier,
        coils = solution.snapshot.output.num_of_coils,
        iters = solution.iters,
        residual = solution.residual,
        "matched width multiplier"
    );
    Ok(solution.snapshot.output)
}

/// Matches `spiral` to the target resistance and records its rings.
///
/// # Errors
///
/// Returns [`MatchError`] if matching fails or the matched spiral cannot be
/// redrawn.
pub fn match_shape<R: WidthRelation>(
    spiral: &VariableWidthSpiral<R>,
    target: Constrained<ElectricalResistance, StrictlyPositive>,
    config: &MatchConfig,
) -> Result<(Winding, SpiralShape), MatchError> {
    let winding = match_multiplier(spiral, target, config)?;
    Ok(spiral.shape(winding.multiplier)?)
}

/// Designs a variable-width spiral for each layer by matching its resistance.
#[derive(Debug, Clone, Copy)]
pub struct VariableWidthDesigner<'a, R> {
    board: &'a BoardConfig,
    relation: R,
    config: MatchConfig,
}

impl<'a, R: WidthRelation + Copy> VariableWidthDesigner<'a, R> {
    #[must_use]
    pub fn new(board: &'a BoardConfig, relation: R) -> Self {
        Self {
            board,
            relation,
            config: MatchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// The spiral this designer winds on `layer`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the board's copper on `layer` is not physical.
    pub fn spiral(&self, layer: Layer) -> ConstraintResult<VariableWidthSpiral<R>> {
        VariableWidthSpiral::new(self.board, layer, self.relation)
    }
}

impl<R: WidthRelation + Copy> LayerOptimizer for VariableWidthDesigner<'_, R> {
    fn optimize(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Result<LayerDesign, OptimizeError> {
        let target = layer_resistance(resistance)?;
        let spiral = self.spiral(layer)?;
        let winding = match_multiplier(&spiral, target, &self.config)?;

        Ok(LayerDesign {
            layer,
            resistance: winding.resistance,
            layout: TraceLayout::WidthMultiplier(winding.multiplier),
            length: winding.length,
            properties: winding.properties(),
        })
    }
}

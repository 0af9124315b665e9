//! Resistance budget allocation across the layers of a board.
//!
//! A board has two exterior layers and `N − 2` interior layers, all wired in
//! series. Given a total resistance `R` and an exterior resistance `x` per
//! exterior layer, each interior layer gets `(R − 2x)/(N − 2)`. The combined
//! area-sum
//!
//! ```text
//! total(x) = 2·area(x, exterior) + (N − 2)·area((R − 2x)/(N − 2), interior)
//! ```
//!
//! is maximized over `x ∈ [0, R/2]`, where `area` is the best single-layer
//! design produced by a [`LayerOptimizer`].

mod config;
mod problem;

pub use config::AllocationConfig;

use thiserror::Error;
use tracing::{debug, warn};
use twine_core::Model;
use twine_solvers::optimization::golden_section;
use uom::si::{
    area::square_millimeter,
    electrical_resistance::ohm,
    f64::{Area, ElectricalResistance},
};

use crate::config::BoardConfig;

use super::{
    design::{LayerDesign, LayerOptimizer},
    length_optimizer::OptimizeError,
};

use problem::{AllocationModel, TotalAreaProblem};

/// Optimal split of a board's resistance budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAllocation {
    /// Resistance of each exterior layer.
    pub exterior_resistance: ElectricalResistance,

    /// Resistance of each interior layer, if the board has any.
    pub interior_resistance: Option<ElectricalResistance>,

    /// Design shared by both exterior layers.
    pub exterior: LayerDesign,

    /// Design shared by every interior layer, if the board has any.
    pub interior: Option<LayerDesign>,

    /// Area-sum of all layers together.
    pub total_area_sum: Area,
}

/// Errors that can occur while allocating a resistance budget.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("a board needs at least two layers, got {0}")]
    TooFewLayers(usize),

    /// Designing one of the layers failed.
    #[error("layer design failed")]
    Layer(#[from] OptimizeError),

    /// The golden section search could not be configured.
    #[error("invalid search configuration")]
    SearchConfig(#[from] golden_section::ConfigError),

    /// The golden section search failed at both of its starting points.
    #[error("golden section search error")]
    Search(#[from] golden_section::Error),
}

/// Splits `board.resistance` across its layers to maximize total area-sum.
///
/// # Errors
///
/// Returns [`AllocationError`] if the board has fewer than two layers, the
/// search is misconfigured, or the layer designs fail.
pub fn allocate(
    board: &BoardConfig,
    optimizer: &impl LayerOptimizer,
    config: &AllocationConfig,
) -> Result<LayerAllocation, AllocationError> {
    if board.layers < 2 {
        return Err(AllocationError::TooFewLayers(board.layers));
    }

    let model = AllocationModel::new(board, optimizer);
    let half_budget = board.resistance / 2.0;

    let allocation = if board.interior_layers() == 0 {
        model.call(&half_budget)?
    } else {
        let solution = golden_section::maximize(
            &model,
            &TotalAreaProblem,
            [0.0, half_budget.get::<ohm>()],
            &config.golden_section()?,
            |event: &golden_section::Event<'_, _, _>| {
                // A layer that cannot be designed makes the split worse.
                if matches!(event, golden_section::Event::ModelFailed { .. }) {
                    return Some(golden_section::Action::AssumeWorse);
                }
                None
            },
        )?;

        if solution.status == golden_section::Status::MaxIters {
            warn!(
                iters = solution.iters,
                exterior_resistance = solution.x,
                "allocation search stopped before reaching tolerance"
            );
        }
        solution.snapshot.output
    };

    debug!(
        exterior_resistance = allocation.exterior_resistance.get::<ohm>(),
        total_area_sum = allocation.total_area_sum.get::<square_millimeter>(),
        "allocated resistance budget"
    );
    Ok(allocation)
}

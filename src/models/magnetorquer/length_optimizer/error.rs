use thiserror::Error;
use twine_solvers::optimization::golden_section;
use uom::si::f64::{ElectricalResistance, Length};

use crate::{
    models::magnetorquer::{resistance_match::MatchError, spiral::SpiralError},
    support::constraint::ConstraintError,
};

/// Errors that can occur while optimizing a single layer.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The layer resistance is not finite and strictly positive.
    #[error("invalid layer resistance: {0:?}")]
    InvalidResistance(ElectricalResistance),

    /// The board's copper parameters are not physical.
    #[error("invalid board parameters")]
    Board(#[from] ConstraintError),

    /// A spiral evaluation failed.
    #[error("spiral evaluation failed")]
    Spiral(#[from] SpiralError),

    /// The golden section search could not be configured.
    #[error("invalid search configuration")]
    SearchConfig(#[from] golden_section::ConfigError),

    /// The golden section search failed at both of its starting points.
    #[error("golden section search error")]
    Search(#[from] golden_section::Error),

    /// No trace length reached by the search fits on the board.
    #[error("best trace length {length:?} does not fit")]
    Infeasible { length: Length },

    /// Matching a variable-width spiral to the resistance failed.
    #[error("resistance match failed")]
    Match(#[from] MatchError),
}

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::ElectricalResistance;

use crate::{
    models::magnetorquer::variable_width::MarchError, support::constraint::ConstraintError,
};

/// Errors that can occur while matching a target resistance.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The board's copper parameters are not physical.
    #[error("invalid board parameters")]
    Board(#[from] ConstraintError),

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best resistance residual achieved.
        residual: ElectricalResistance,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// Redrawing the matched spiral failed.
    #[error("variable-width march failed")]
    March(#[from] MarchError),
}

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::Length;

/// Errors that can occur while evaluating a spiral model.
#[derive(Debug, Error)]
pub enum SpiralError {
    /// The arc-length bisection could not be set up or failed.
    #[error("arc-length bisection error")]
    Bisection(#[from] bisection::Error),

    /// The arc-length solve reached its iteration limit without converging.
    #[error("arc-length solve hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best trace-length residual achieved.
        residual: Length,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

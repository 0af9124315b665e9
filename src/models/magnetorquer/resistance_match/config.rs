use twine_solvers::equation::bisection;
use uom::si::{electrical_resistance::ohm, f64::ElectricalResistance};

/// Solver configuration for iterative resistance matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Search interval for the spacing (mm) or width multiplier.
    pub bracket: [f64; 2],

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Relative tolerance for the search variable.
    pub x_rel_tol: f64,

    /// Absolute tolerance for the resistance residual (achieved - target).
    pub resistance_tol: ElectricalResistance,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            bracket: [1e-9, 1e9],
            max_iters: 200,
            x_rel_tol: 1e-12,
            resistance_tol: ElectricalResistance::new::<ohm>(1e-10),
        }
    }
}

impl MatchConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: 0.0,
            x_rel_tol: self.x_rel_tol,
            residual_tol: self.resistance_tol.get::<ohm>(),
        }
    }
}

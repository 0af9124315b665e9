use twine_solvers::optimization::golden_section;
use uom::si::f64::Length;

use crate::support::{
    search::FrontierConfig,
    units::{from_mm, mm},
};

/// Configuration for the trace-length search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthSearchConfig {
    /// Longest trace considered when bracketing the feasible lengths.
    pub upper_bound: Length,

    /// Bisection for the longest trace that fits.
    pub frontier: FrontierConfig,

    /// Maximum iteration count for the area-sum maximization.
    pub max_iters: usize,

    /// Absolute tolerance on the optimal trace length.
    pub length_tol: Length,
}

impl Default for LengthSearchConfig {
    fn default() -> Self {
        Self {
            upper_bound: from_mm(1e6),
            frontier: FrontierConfig::default(),
            max_iters: 200,
            length_tol: from_mm(1e-5),
        }
    }
}

impl LengthSearchConfig {
    /// Converts this configuration into a golden section solver configuration.
    pub(super) fn golden_section(
        &self,
    ) -> Result<golden_section::Config, golden_section::ConfigError> {
        golden_section::Config::new(self.max_iters, mm(self.length_tol), 0.0)
    }
}

use twine_solvers::optimization::golden_section;
use uom::si::{electrical_resistance::ohm, f64::ElectricalResistance};

/// Solver configuration for the resistance budget split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationConfig {
    /// Maximum iteration count for the golden section search.
    pub max_iters: usize,

    /// Absolute tolerance on the exterior layer resistance.
    pub resistance_tol: ElectricalResistance,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            resistance_tol: ElectricalResistance::new::<ohm>(1e-5),
        }
    }
}

impl AllocationConfig {
    /// Converts this configuration into a golden section solver configuration.
    pub(super) fn golden_section(
        &self,
    ) -> Result<golden_section::Config, golden_section::ConfigError> {
        golden_section::Config::new(self.max_iters, self.resistance_tol.get::<ohm>(), 0.0)
    }
}

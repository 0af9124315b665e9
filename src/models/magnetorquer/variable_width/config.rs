/// Bounds on a single inward march.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarchConfig {
    /// Maximum number of coils before the march is abandoned.
    pub max_coils: usize,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self { max_coils: 100_000 }
    }
}

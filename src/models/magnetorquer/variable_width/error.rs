use thiserror::Error;
use uom::si::f64::Length;

/// Errors that can occur while marching a variable-width spiral inward.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MarchError {
    /// The width relation produced a width that cannot be drawn.
    #[error("infeasible trace width {width:?} at radius {radius:?}")]
    Infeasible {
        /// Radius of the coil being drawn.
        radius: Length,

        /// Width requested by the relation (non-positive or `NaN`).
        width: Length,
    },

    /// The march did not reach the inner radius within the coil limit.
    #[error("spiral exceeds {limit} coils")]
    TooManyCoils { limit: usize },
}

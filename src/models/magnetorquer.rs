//! Planar spiral magnetorquers etched on printed-circuit boards.
//!
//! The models are layered, each building on the one before:
//!
//! 1. [`spiral`]: constant-width circular and square spiral geometry.
//! 2. [`variable_width`]: square spirals whose width varies with radius.
//! 3. [`resistance_match`]: solvers that hit a target trace resistance.
//! 4. [`length_optimizer`]: the trace length that maximizes area-sum.
//! 5. [`allocation`]: the split of a board's resistance budget across layers.
//!
//! [`comparison`] and [`moment`] summarize finished designs.

pub mod allocation;
pub mod comparison;
pub mod design;
pub mod length_optimizer;
pub mod moment;
pub mod resistance_match;
pub mod spiral;
pub mod variable_width;

#[cfg(test)]
pub(crate) mod test_support;

pub use allocation::{AllocationConfig, AllocationError, LayerAllocation, allocate};
pub use comparison::{Comparison, DesignKind, compare};
pub use design::{LayerDesign, LayerOptimizer, TraceLayout};
pub use length_optimizer::{ConstantWidthOptimizer, LengthSearchConfig, OptimizeError};
pub use resistance_match::{MatchConfig, MatchError, VariableWidthDesigner};
pub use spiral::{
    AnySpiral, CircularSpiral, SpiralError, SpiralFamily, SpiralFit, SpiralGeometry,
    SpiralProperties, SquareSpiral,
};
pub use variable_width::{MarchConfig, MarchError, VariableWidthSpiral, WidthRelation, WidthRule};

//! Optimized single-layer designs and the strategies that produce them.

use uom::si::{
    electrical_resistance::ohm,
    f64::{ElectricalResistance, Length},
};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    trace::Layer,
};

use super::{length_optimizer::OptimizeError, spiral::SpiralProperties};

/// How the trace width of a layer is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceLayout {
    /// Uniform width with the given center-to-center spacing.
    Spacing(Length),

    /// Width from a width relation with the given multiplier.
    WidthMultiplier(f64),
}

/// One optimized copper layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDesign {
    /// Position of the layer in the stack-up.
    pub layer: Layer,

    /// Resistance of the layer's trace.
    pub resistance: ElectricalResistance,

    /// Spacing or width multiplier the trace is drawn with.
    pub layout: TraceLayout,

    /// Total trace length.
    pub length: Length,

    /// Area-sum, inner radius and coil count of the wound spiral.
    pub properties: SpiralProperties,
}

/// A strategy that designs the best spiral for one layer at a resistance.
pub trait LayerOptimizer {
    /// Designs a spiral on `layer` whose trace has `resistance`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError`] if the resistance is invalid or a nested
    /// solve fails.
    fn optimize(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Result<LayerDesign, OptimizeError>;
}

impl<T: LayerOptimizer + ?Sized> LayerOptimizer for &T {
    fn optimize(
        &self,
        layer: Layer,
        resistance: ElectricalResistance,
    ) -> Result<LayerDesign, OptimizeError> {
        (**self).optimize(layer, resistance)
    }
}

/// Accepts only finite, strictly positive layer resistances.
pub(super) fn layer_resistance(
    resistance: ElectricalResistance,
) -> Result<Constrained<ElectricalResistance, StrictlyPositive>, OptimizeError> {
    if !resistance.get::<ohm>().is_finite() {
        return Err(OptimizeError::InvalidResistance(resistance));
    }
    StrictlyPositive::new(resistance).map_err(|_| OptimizeError::InvalidResistance(resistance))
}

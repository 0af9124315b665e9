//! Side-by-side evaluation of every spiral design at one resistance.

use std::fmt;

use tracing::debug;
use uom::si::f64::ElectricalResistance;

use crate::{
    config::BoardConfig,
    support::{constraint::ConstraintResult, trace::Layer},
};

use super::{
    design::{LayerDesign, LayerOptimizer},
    length_optimizer::{ConstantWidthOptimizer, OptimizeError},
    resistance_match::VariableWidthDesigner,
    spiral::{AnySpiral, SpiralFamily},
    variable_width::WidthRule,
};

/// A spiral design strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignKind {
    Constant(SpiralFamily),
    VariableWidth(WidthRule),
}

impl fmt::Display for DesignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(SpiralFamily::Circular) => f.write_str("circular"),
            Self::Constant(SpiralFamily::Square) => f.write_str("square"),
            Self::VariableWidth(rule) => {
                let name = match rule {
                    WidthRule::InverseRadius => "inverse-radius",
                    WidthRule::InverseRadiusLessGap => "inverse-radius-less-gap",
                    WidthRule::Constant => "constant",
                    WidthRule::BoundedInverseRadius => "bounded-inverse-radius",
                };
                write!(f, "variable ({name})")
            }
        }
    }
}

/// Outcome of one design in a comparison.
#[derive(Debug)]
pub struct Comparison {
    /// Design that was evaluated.
    pub kind: DesignKind,

    /// The design, or why it could not be produced.
    pub result: Result<LayerDesign, OptimizeError>,
}

/// Designs `layer` at `resistance` with the circular spiral, the square
/// spiral, and a variable-width spiral for each of `rules`.
///
/// A design that fails is reported in its entry rather than aborting the
/// comparison.
///
/// # Errors
///
/// Returns `Err` if the board's outer radius is not strictly positive.
pub fn compare(
    board: &BoardConfig,
    resistance: ElectricalResistance,
    layer: Layer,
    rules: &[WidthRule],
) -> ConstraintResult<Vec<Comparison>> {
    let mut comparisons = Vec::with_capacity(2 + rules.len());

    for family in [SpiralFamily::Circular, SpiralFamily::Square] {
        let spiral = AnySpiral::new(family, board.outer_radius)?;
        let optimizer = ConstantWidthOptimizer::new(board, spiral);
        comparisons.push(Comparison {
            kind: DesignKind::Constant(family),
            result: optimizer.optimize(layer, resistance),
        });
    }

    for &rule in rules {
        let designer = VariableWidthDesigner::new(board, rule.relation(board));
        comparisons.push(Comparison {
            kind: DesignKind::VariableWidth(rule),
            result: designer.optimize(layer, resistance),
        });
    }

    for comparison in &comparisons {
        match &comparison.result {
            Ok(design) => debug!(
                kind = %comparison.kind,
                area_sum = ?design.properties.area_sum,
                "compared design"
            ),
            Err(error) => debug!(kind = %comparison.kind, %error, "design failed"),
        }
    }

    Ok(comparisons)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::magnetorquer::test_support::{board, ohms};

    #[test]
    fn reports_every_design_in_order() {
        let board = board();
        let rules = [WidthRule::BoundedInverseRadius, WidthRule::Constant];

        let comparisons = compare(&board, ohms(8.0), Layer::Exterior, &rules).unwrap();

        let kinds: Vec<_> = comparisons.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                DesignKind::Constant(SpiralFamily::Circular),
                DesignKind::Constant(SpiralFamily::Square),
                DesignKind::VariableWidth(WidthRule::BoundedInverseRadius),
                DesignKind::VariableWidth(WidthRule::Constant),
            ]
        );
        assert!(comparisons.iter().all(|c| c.result.is_ok()));
    }

    #[test]
    fn invalid_resistance_fails_each_entry() {
        let board = board();
        let comparisons = compare(&board, ohms(-1.0), Layer::Exterior, &WidthRule::ALL).unwrap();

        assert_eq!(comparisons.len(), 6);
        assert!(comparisons.iter().all(|c| c.result.is_err()));
    }

    #[test]
    fn display_names() {
        assert_eq!(DesignKind::Constant(SpiralFamily::Square).to_string(), "square");
        assert_eq!(
            DesignKind::VariableWidth(WidthRule::InverseRadius).to_string(),
            "variable (inverse-radius)"
        );
    }
}

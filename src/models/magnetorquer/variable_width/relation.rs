use serde::Deserialize;
use uom::si::f64::Length;

use crate::{config::BoardConfig, support::units::mm};

/// Trace width as a function of the local radius.
///
/// Radius and width are in millimetres, matching the march that draws the
/// rings. `multiplier` is the free parameter tuned to hit a resistance
/// target. Its unit depends on the relation (e.g. mm² for [`InverseRadius`]).
pub trait WidthRelation {
    fn width(&self, multiplier: f64, radius_mm: f64) -> f64;
}

/// `w = m / r`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InverseRadius;

impl WidthRelation for InverseRadius {
    fn width(&self, multiplier: f64, radius_mm: f64) -> f64 {
        multiplier / radius_mm
    }
}

/// `w = m / r − gap`, so that the spacing rather than the width is inversely
/// proportional to the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseRadiusLessGap {
    /// Copper-to-copper gap subtracted from every width.
    pub gap: Length,
}

impl WidthRelation for InverseRadiusLessGap {
    fn width(&self, multiplier: f64, radius_mm: f64) -> f64 {
        multiplier / radius_mm - mm(self.gap)
    }
}

/// `w = m`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstantWidth;

impl WidthRelation for ConstantWidth {
    fn width(&self, multiplier: f64, _radius_mm: f64) -> f64 {
        multiplier
    }
}

/// Width of a ring whose band `[r − w, r]` has area proportional to `m`.
///
/// Solves `r² − (r − w)² = 2m` for `w`, clamped to `w = r` once the whole
/// remaining disc is needed. The width never exceeds the radius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundedInverseRadius;

impl WidthRelation for BoundedInverseRadius {
    fn width(&self, multiplier: f64, radius_mm: f64) -> f64 {
        let r = radius_mm;
        if r * r <= 2.0 * multiplier {
            r
        } else {
            (r - (r * r - 2.0 * multiplier).sqrt()).min(r)
        }
    }
}

/// Named selection of a [`WidthRelation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidthRule {
    InverseRadius,
    InverseRadiusLessGap,
    Constant,
    BoundedInverseRadius,
}

impl WidthRule {
    /// Every rule, in a stable order.
    pub const ALL: [Self; 4] = [
        Self::InverseRadius,
        Self::InverseRadiusLessGap,
        Self::Constant,
        Self::BoundedInverseRadius,
    ];

    /// Builds the relation, taking any board-dependent parameter from `board`.
    #[must_use]
    pub fn relation(self, board: &BoardConfig) -> AnyRelation {
        match self {
            Self::InverseRadius => AnyRelation::InverseRadius(InverseRadius),
            Self::InverseRadiusLessGap => {
                AnyRelation::InverseRadiusLessGap(InverseRadiusLessGap { gap: board.gap })
            }
            Self::Constant => AnyRelation::Constant(ConstantWidth),
            Self::BoundedInverseRadius => AnyRelation::BoundedInverseRadius(BoundedInverseRadius),
        }
    }
}

/// A [`WidthRelation`] chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyRelation {
    InverseRadius(InverseRadius),
    InverseRadiusLessGap(InverseRadiusLessGap),
    Constant(ConstantWidth),
    BoundedInverseRadius(BoundedInverseRadius),
}

impl AnyRelation {
    /// The rule this relation was built from.
    #[must_use]
    pub fn rule(&self) -> WidthRule {
        match self {
            Self::InverseRadius(_) => WidthRule::InverseRadius,
            Self::InverseRadiusLessGap(_) => WidthRule::InverseRadiusLessGap,
            Self::Constant(_) => WidthRule::Constant,
            Self::BoundedInverseRadius(_) => WidthRule::BoundedInverseRadius,
        }
    }
}

impl WidthRelation for AnyRelation {
    fn width(&self, multiplier: f64, radius_mm: f64) -> f64 {
        match self {
            Self::InverseRadius(relation) => relation.width(multiplier, radius_mm),
            Self::InverseRadiusLessGap(relation) => relation.width(multiplier, radius_mm),
            Self::Constant(relation) => relation.width(multiplier, radius_mm),
            Self::BoundedInverseRadius(relation) => relation.width(multiplier, radius_mm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{models::magnetorquer::test_support::board, support::units::from_mm};

    fn width(relation: &impl WidthRelation, multiplier: f64, radius: f64) -> f64 {
        relation.width(multiplier, radius)
    }

    #[test]
    fn inverse_radius_relations() {
        assert_relative_eq!(width(&InverseRadius, 2.0, 4.0), 0.5, max_relative = 1e-12);

        let less_gap = InverseRadiusLessGap { gap: from_mm(0.15) };
        assert_relative_eq!(width(&less_gap, 2.0, 4.0), 0.35, max_relative = 1e-12);
    }

    #[test]
    fn constant_ignores_radius() {
        assert_relative_eq!(width(&ConstantWidth, 0.3, 1.0), 0.3, max_relative = 1e-12);
        assert_relative_eq!(width(&ConstantWidth, 0.3, 30.0), 0.3, max_relative = 1e-12);
    }

    #[test]
    fn bounded_inverse_radius_clamps_to_radius() {
        assert_relative_eq!(width(&BoundedInverseRadius, 10.0, 4.0), 4.0, max_relative = 1e-12);
        assert_relative_eq!(
            width(&BoundedInverseRadius, 2.0, 4.0),
            4.0 - 12.0_f64.sqrt(),
            max_relative = 1e-12
        );

        for i in 1..100 {
            let r = f64::from(i) * 0.4;
            assert!(width(&BoundedInverseRadius, 7.5, r) <= r, "w > r at r = {r}");
        }
    }

    #[test]
    fn bounded_inverse_radius_at_the_clamp_boundary() {
        // r² = 2m exactly: the whole disc is one ring.
        let r = 3.6;
        let m = r * r / 2.0;
        assert_eq!(width(&BoundedInverseRadius, m, r), r);

        // Just inside the unclamped branch the width still never exceeds r.
        let w = width(&BoundedInverseRadius, m * (1.0 - 1e-15), r);
        assert!(w <= r);
        assert!(w > 0.0);
    }

    #[test]
    fn bounded_inverse_radius_band_area_is_proportional_to_multiplier() {
        let (m, r) = (3.0, 20.0);
        let w = width(&BoundedInverseRadius, m, r);
        assert_relative_eq!(r * r - (r - w) * (r - w), 2.0 * m, max_relative = 1e-9);
    }

    #[test]
    fn rule_dispatch_uses_board_gap() {
        let board = board();
        for rule in WidthRule::ALL {
            assert_eq!(rule.relation(&board).rule(), rule);
        }

        let relation = WidthRule::InverseRadiusLessGap.relation(&board);
        assert_relative_eq!(
            width(&relation, 8.0, 10.0),
            0.8 - mm(board.gap),
            max_relative = 1e-12
        );
    }
}

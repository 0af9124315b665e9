//! Circular (Archimedean) spiral model.

mod arc_length;

use std::f64::consts::TAU;

use tracing::trace;
use twine_solvers::equation::bisection;
use uom::si::f64::Length;

use crate::support::{
    constraint::{Constrained, ConstraintResult, StrictlyPositive},
    units::{from_mm, mm},
};

use super::{SpiralError, SpiralFit, SpiralGeometry, SpiralProperties};

use arc_length::{ArcLengthModel, ArcLengthProblem, Archimedean};

/// An Archimedean spiral `r(θ) = a − bθ`.
///
/// `a` is the outer radius and `b = spacing / 2π`, so the radius shrinks by
/// one spacing per turn. Trace length and area-sum are the integrals
///
/// ```text
/// length(θ)   = ∫₀^θ √((a − bt)² + b²) dt
/// area_sum(θ) = ∫₀^θ ½(a − bt)² dt
/// ```
///
/// both evaluated in closed form. The winding angle for a requested length
/// is found by bisection on `[0, a/b]`, where the length is monotonic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularSpiral {
    outer_radius: Constrained<Length, StrictlyPositive>,
    config: ArcLengthConfig,
}

impl CircularSpiral {
    /// Creates a circular spiral model with the default solver configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the outer radius is not strictly positive.
    pub fn new(outer_radius: Length) -> ConstraintResult<Self> {
        Ok(Self {
            outer_radius: StrictlyPositive::new(outer_radius)?,
            config: ArcLengthConfig::default(),
        })
    }

    /// Replaces the arc-length solver configuration.
    #[must_use]
    pub fn with_config(mut self, config: ArcLengthConfig) -> Self {
        self.config = config;
        self
    }

    /// Winding angle, in radians, for a trace of `length` millimetres.
    ///
    /// Returns `None` if the trace does not fit.
    fn winding_angle(&self, spiral: Archimedean, length: f64) -> Result<Option<f64>, SpiralError> {
        if spiral.b == 0.0 {
            // A perfect circle.
            return Ok(Some(length / spiral.a));
        }

        // At a/b the radius reaches zero.
        let theta_max = spiral.a / spiral.b;
        if spiral.length(theta_max) < length {
            return Ok(None);
        }
        if length == 0.0 {
            return Ok(Some(0.0));
        }

        let model = ArcLengthModel::new(spiral);
        let problem = ArcLengthProblem::new(length);

        let solution = bisection::solve_unobserved(
            &model,
            &problem,
            [0.0, theta_max],
            &self.config.bisection(),
        )?;

        if solution.status != bisection::Status::Converged {
            return Err(SpiralError::MaxIters {
                residual: from_mm(solution.residual),
                iters: solution.iters,
            });
        }

        trace!(
            theta = solution.snapshot.output.theta,
            iters = solution.iters,
            "solved arc length"
        );
        Ok(Some(solution.snapshot.output.theta))
    }
}

impl SpiralGeometry for CircularSpiral {
    fn outer_radius(&self) -> Length {
        self.outer_radius.into_inner()
    }

    fn evaluate(&self, length: Length, spacing: Length) -> Result<SpiralFit, SpiralError> {
        let (length, spacing) = (mm(length), mm(spacing));
        if !(length >= 0.0 && length.is_finite() && spacing >= 0.0 && spacing.is_finite()) {
            return Ok(SpiralFit::DoesNotFit);
        }

        let spiral = Archimedean {
            a: mm(self.outer_radius()),
            b: spacing / TAU,
        };

        let Some(theta) = self.winding_angle(spiral, length)? else {
            return Ok(SpiralFit::DoesNotFit);
        };

        Ok(SpiralFit::Fits(SpiralProperties::from_mm(
            spiral.area_sum(theta),
            spiral.radius(theta),
            theta / TAU,
        )))
    }
}

/// Solver configuration for the arc-length inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengthConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the winding angle, in radians.
    pub theta_tol: f64,

    /// Absolute tolerance on the trace-length residual.
    pub length_tol: Length,
}

impl Default for ArcLengthConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            theta_tol: 1e-13,
            length_tol: from_mm(1e-10),
        }
    }
}

impl ArcLengthConfig {
    /// Converts this configuration into a bisection solver configuration.
    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.theta_tol,
            x_rel_tol: 0.0,
            residual_tol: mm(self.length_tol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use uom::si::area::square_millimeter;

    fn circle(length: f64, spacing: f64, outer_radius: f64) -> SpiralFit {
        CircularSpiral::new(from_mm(outer_radius))
            .unwrap()
            .evaluate(from_mm(length), from_mm(spacing))
            .unwrap()
    }

    #[test]
    fn zero_spacing_is_a_circle() {
        let p = circle(4.0 * PI, 0.0, 1.0).properties().unwrap();

        assert_relative_eq!(p.num_of_coils, 2.0, epsilon = 1e-9);
        assert_relative_eq!(mm(p.inner_radius), 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.area_sum.get::<square_millimeter>(), 2.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn circle_area_sum_is_turns_times_disc_area() {
        for (turns, radius) in [(1.0, 3.0), (2.5, 0.5), (7.0, 12.0)] {
            let length = 2.0 * turns * PI * radius;
            let p = circle(length, 0.0, radius).properties().unwrap();

            assert_relative_eq!(p.num_of_coils, turns, max_relative = 1e-9);
            assert_relative_eq!(
                p.area_sum.get::<square_millimeter>(),
                turns * PI * radius * radius,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn archimedean_reference_spiral() {
        let p = circle(100.0, 1.0, 10.0).properties().unwrap();

        assert_relative_eq!(p.num_of_coils, 1.743_253_477_393_1, epsilon = 1e-7);
        assert_relative_eq!(mm(p.inner_radius), 8.256_746_522_61, epsilon = 1e-7);
        assert_relative_eq!(
            p.area_sum.get::<square_millimeter>(),
            457.736_010_902_549_37,
            epsilon = 1e-5
        );
    }

    #[test]
    fn inner_radius_follows_turns() {
        let p = circle(500.0, 0.8, 20.0).properties().unwrap();

        assert_relative_eq!(
            mm(p.inner_radius),
            20.0 - 0.8 * p.num_of_coils,
            max_relative = 1e-9
        );
    }

    #[test]
    fn too_long_does_not_fit() {
        // A spacing of 1 fits about pi * a^2 / s of trace.
        assert_eq!(circle(1000.0, 1.0, 10.0), SpiralFit::DoesNotFit);
    }

    #[test]
    fn zero_length_has_no_coils() {
        let p = circle(0.0, 1.0, 10.0).properties().unwrap();

        assert_eq!(p.num_of_coils, 0.0);
        assert_relative_eq!(mm(p.inner_radius), 10.0, epsilon = 1e-12);
        assert_eq!(p.area_sum.get::<square_millimeter>(), 0.0);
    }

    #[test]
    fn degenerate_inputs_do_not_fit() {
        assert_eq!(circle(-1.0, 1.0, 10.0), SpiralFit::DoesNotFit);
        assert_eq!(circle(10.0, -1.0, 10.0), SpiralFit::DoesNotFit);
        assert_eq!(circle(10.0, f64::NAN, 10.0), SpiralFit::DoesNotFit);
    }

    #[test]
    fn arc_length_solve_reports_iteration_limit() {
        let spiral = CircularSpiral::new(from_mm(10.0))
            .unwrap()
            .with_config(ArcLengthConfig {
                max_iters: 2,
                ..ArcLengthConfig::default()
            });

        assert!(matches!(
            spiral.evaluate(from_mm(100.0), from_mm(1.0)),
            Err(SpiralError::MaxIters { iters: 2, .. })
        ));
    }
}

//! Closed-form arc length of an Archimedean spiral and its inversion problem.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

/// Spiral `r(θ) = a − bθ` in millimetres.
#[derive(Debug, Clone, Copy)]
pub(super) struct Archimedean {
    pub(super) a: f64,
    pub(super) b: f64,
}

impl Archimedean {
    pub(super) fn radius(self, theta: f64) -> f64 {
        self.a - self.b * theta
    }

    /// Trace length from the outer end to angle `theta`.
    ///
    /// Requires `b > 0`.
    pub(super) fn length(self, theta: f64) -> f64 {
        let b = self.b;
        // Antiderivative of √(u² + b²) with u = a − bt.
        let g = |u: f64| 0.5 * (u * (u * u + b * b).sqrt() + b * b * (u / b).asinh());
        (g(self.a) - g(self.radius(theta))) / b
    }

    /// Sum of swept areas from the outer end to angle `theta`.
    pub(super) fn area_sum(self, theta: f64) -> f64 {
        let Self { a, b } = self;
        0.5 * (a * a * theta - a * b * theta * theta + b * b * theta.powi(3) / 3.0)
    }
}

/// Output of one arc-length evaluation.
#[derive(Debug, Clone, Copy)]
pub(super) struct Arc {
    pub(super) theta: f64,
    pub(super) length: f64,
}

/// Model adapter exposing the winding angle as the sole input.
pub(super) struct ArcLengthModel {
    spiral: Archimedean,
}

impl ArcLengthModel {
    pub(super) fn new(spiral: Archimedean) -> Self {
        Self { spiral }
    }
}

impl Model for ArcLengthModel {
    type Input = f64;
    type Output = Arc;
    type Error = Infallible;

    fn call(&self, theta: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(Arc {
            theta: *theta,
            length: self.spiral.length(*theta),
        })
    }
}

/// Residual is `length(θ) − target`.
pub(super) struct ArcLengthProblem {
    target: f64,
}

impl ArcLengthProblem {
    pub(super) fn new(target: f64) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for ArcLengthProblem {
    type Input = f64;
    type Output = Arc;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.length - self.target])
    }
}

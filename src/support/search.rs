//! Feasibility frontier bisection.
//!
//! [`feasible_frontier`] bisects for the boundary between a feasible lower
//! region and an infeasible upper region, with an explicit iteration budget
//! so that nested use stays predictable.

use tracing::trace;

/// Termination status of [`feasible_frontier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The requested tolerance was reached.
    Converged,
    /// The iteration budget ran out first.
    MaxIters,
}

/// Configuration for [`feasible_frontier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierConfig {
    /// Stop once the bracket width is at most this fraction of its upper end.
    pub rel_tol: f64,

    /// Maximum number of bisection steps.
    pub max_iters: usize,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1e-3,
            max_iters: 64,
        }
    }
}

/// Result of [`feasible_frontier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frontier {
    /// Largest point known to be feasible.
    pub feasible: f64,

    /// Smallest point known to be infeasible (or the initial upper bound).
    pub infeasible: f64,

    /// Number of bisection steps performed.
    pub iters: usize,

    /// Whether the tolerance was reached.
    pub status: Status,
}

/// Bisects for the boundary of a feasible region `[lower, boundary)`.
///
/// Assumes `is_feasible` holds at `bounds[0]` and that feasibility is
/// monotone: once a point fails, every larger point fails too. Neither
/// endpoint is evaluated.
///
/// # Errors
///
/// Propagates the first error returned by `is_feasible`.
pub fn feasible_frontier<E>(
    mut is_feasible: impl FnMut(f64) -> Result<bool, E>,
    bounds: [f64; 2],
    config: &FrontierConfig,
) -> Result<Frontier, E> {
    let [mut lower, mut upper] = bounds;
    let mut iters = 0;

    while upper - lower > upper * config.rel_tol {
        if iters >= config.max_iters {
            return Ok(Frontier {
                feasible: lower,
                infeasible: upper,
                iters,
                status: Status::MaxIters,
            });
        }

        let guess = 0.5 * (lower + upper);
        let feasible = is_feasible(guess)?;
        trace!(guess, feasible, "frontier evaluation");
        if feasible {
            lower = guess;
        } else {
            upper = guess;
        }
        iters += 1;
    }

    Ok(Frontier {
        feasible: lower,
        infeasible: upper,
        iters,
        status: Status::Converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    #[test]
    fn frontier_brackets_boundary() {
        let frontier = feasible_frontier(
            |x| Ok::<_, Infallible>(x < 1234.5),
            [0.0, 1e6],
            &FrontierConfig::default(),
        )
        .unwrap();

        assert_eq!(frontier.status, Status::Converged);
        assert!(frontier.feasible < 1234.5);
        assert!(frontier.infeasible >= 1234.5);
        assert!(frontier.infeasible - frontier.feasible <= 1e-3 * frontier.infeasible);
    }

    #[test]
    fn frontier_stays_at_lower_bound_when_nothing_fits() {
        let frontier = feasible_frontier(
            |_| Ok::<_, Infallible>(false),
            [0.0, 1e6],
            &FrontierConfig::default(),
        )
        .unwrap();

        assert_eq!(frontier.feasible, 0.0);
    }

    #[test]
    fn frontier_reports_exhausted_budget() {
        let config = FrontierConfig {
            rel_tol: 1e-12,
            max_iters: 4,
        };
        let frontier =
            feasible_frontier(|x| Ok::<_, Infallible>(x < 3.0), [0.0, 16.0], &config).unwrap();

        assert_eq!(frontier.status, Status::MaxIters);
        assert_eq!(frontier.iters, 4);
        assert!(frontier.feasible < 3.0);
        assert!(frontier.infeasible >= 3.0);
    }

    #[test]
    fn frontier_propagates_errors() {
        let result = feasible_frontier(
            |_| Err::<bool, _>("boom"),
            [0.0, 1.0],
            &FrontierConfig::default(),
        );
        assert_eq!(result, Err("boom"));
    }
}

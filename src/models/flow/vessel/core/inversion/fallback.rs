//! Bisection retry for a failed Brent search.
//!
//! Bisection cannot lose its bracket, so it serves as a slower but sturdier
//! second attempt. It searches `log10(A)` through the Twine model/problem API.

use std::{convert::Infallible, f64::consts::LN_10};

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use crate::models::flow::vessel::core::{SolveError, SolverConfig};

use super::{Bracket, Forward};

/// Transfer time as a function of `log10(A)`.
struct LogAreaModel<'a> {
    forward: &'a Forward<'a>,
}

impl Model for LogAreaModel<'_> {
    type Input = f64;
    type Output = f64;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.forward.time(10_f64.powf(*input))
    }
}

/// Residual `t(A) − target`, in seconds.
struct TargetTime {
    target: f64,
}

impl EquationProblem<1> for TargetTime {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output - self.target])
    }
}

/// Returns the area solving `t(A) = target` inside `bracket`, if bisection converges.
pub(crate) fn solve(
    forward: &Forward<'_>,
    bracket: &Bracket,
    target: f64,
    config: &SolverConfig,
) -> Option<f64> {
    let model = LogAreaModel { forward };
    let problem = TargetTime { target };
    let [low, high] = bracket.ordered();

    let solution = bisection::solve(
        &model,
        &problem,
        [low.log10(), high.log10()],
        &bisection::Config {
            max_iters: config.fallback_max_iters,
            x_abs_tol: config.brent.x_abs_tol / LN_10,
            x_rel_tol: 0.0,
            residual_tol: 0.0,
        },
        |event: &bisection::Event<'_, _, _>| {
            // Treat a failed evaluation as too slow, moving toward larger areas.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )
    .ok()?;

    (solution.status == bisection::Status::Converged).then(|| 10_f64.powf(solution.x))
}

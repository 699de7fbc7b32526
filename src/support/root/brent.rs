//! Brent's method for bracketed scalar roots.
//!
//! Each iteration chooses between inverse quadratic interpolation, the secant
//! step, and bisection, falling back to bisection whenever an interpolated step
//! would leave the bracket or shrink it too slowly. The bracket `[b, c]`
//! always has residuals of opposite sign; an update that breaks this invariant
//! is reported as [`Error::BracketLost`] rather than silently continued.

mod config;
mod error;
mod event;
mod solution;

pub use config::Config;
pub use error::Error;
pub use event::{Action, Event, Step};
pub use solution::{Solution, Status};

use crate::support::observe::Observer;

/// Finds a root of `f` inside `bracket` using Brent's method.
///
/// The bracket may be given in either order. Observers see every iteration
/// and may stop the search early.
///
/// # Errors
///
/// Returns an error if the config or bracket is invalid, the endpoints do not
/// bracket a sign change, a residual is not finite, the bracket invariant is
/// lost, or `f` itself fails.
pub fn solve<F, E, Obs>(
    mut f: F,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
    Obs: Observer<Event, Action>,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let (mut a, mut b) = validate_bracket(bracket)?;
    let mut fa = evaluate(&mut f, a)?;
    let mut fb = evaluate(&mut f, b)?;

    for (x, residual) in [(a, fa), (b, fb)] {
        if residual == 0.0 || residual.abs() <= config.residual_tol {
            return Ok(Solution {
                status: Status::Converged,
                x,
                residual,
                bracket: [a, b],
                iters: 0,
            });
        }
    }

    if same_sign(fa, fb) {
        return Err(Error::NoSignChange {
            left: a,
            right: b,
            left_residual: fa,
            right_residual: fb,
        });
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for iter in 1..=config.max_iters {
        // Keep `b` as the best estimate.
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.x_abs_tol;
        let xm = 0.5 * (c - b);

        if xm.abs() <= tol || fb == 0.0 || fb.abs() <= config.residual_tol {
            return Ok(Solution {
                status: Status::Converged,
                x: b,
                residual: fb,
                bracket: ordered(b, c),
                iters: iter - 1,
            });
        }

        let step = if e.abs() >= tol && fa.abs() > fb.abs() {
            let (mut p, mut q, kind) = interpolate(a, b, c, fa, fb, fc, xm);
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
                kind
            } else {
                d = xm;
                e = d;
                Step::Bisection
            }
        } else {
            d = xm;
            e = d;
            Step::Bisection
        };

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = evaluate(&mut f, b)?;

        if same_sign(fb, fc) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }

        if same_sign(fb, fc) {
            return Err(Error::BracketLost {
                left: b.min(c),
                right: b.max(c),
                iter,
            });
        }

        let event = Event {
            iter,
            bracket: ordered(b, c),
            x: b,
            residual: fb,
            step,
        };

        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(best(b, fb, c, fc, Status::StoppedByObserver, iter));
        }
    }

    Ok(best(b, fb, c, fc, Status::MaxIters, config.max_iters))
}

/// Runs Brent's method without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F, E>(f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    solve(f, bracket, config, ())
}

/// Computes the interpolated step numerator and denominator.
///
/// Uses the secant step when only two distinct points are available and
/// inverse quadratic interpolation otherwise.
fn interpolate(a: f64, b: f64, c: f64, fa: f64, fb: f64, fc: f64, xm: f64) -> (f64, f64, Step) {
    let s = fb / fa;

    #[allow(clippy::float_cmp)]
    if a == c {
        return (2.0 * xm * s, 1.0 - s, Step::Secant);
    }

    let q = fa / fc;
    let r = fb / fc;
    let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
    let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
    (p, q, Step::InverseQuadratic)
}

fn evaluate<F, E>(f: &mut F, x: f64) -> Result<f64, Error<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let residual = f(x).map_err(Error::Function)?;
    if residual.is_finite() {
        Ok(residual)
    } else {
        Err(Error::NonFiniteResidual { x, residual })
    }
}

/// Validates bracket values and returns them in ascending order.
fn validate_bracket<E>(bracket: [f64; 2]) -> Result<(f64, f64), Error<E>> {
    let [left, right] = bracket;

    for value in [left, right] {
        if !value.is_finite() {
            return Err(Error::NonFiniteBracket { value });
        }
    }

    #[allow(clippy::float_cmp)]
    if left == right {
        return Err(Error::ZeroWidthBracket { value: left });
    }

    Ok((left.min(right), left.max(right)))
}

fn same_sign(x: f64, y: f64) -> bool {
    (x > 0.0 && y > 0.0) || (x < 0.0 && y < 0.0)
}

fn ordered(x: f64, y: f64) -> [f64; 2] {
    [x.min(y), x.max(y)]
}

fn best(b: f64, fb: f64, c: f64, fc: f64, status: Status, iters: usize) -> Solution {
    let (x, residual) = if fc.abs() < fb.abs() { (c, fc) } else { (b, fb) };
    Solution {
        status,
        x,
        residual,
        bracket: ordered(b, c),
        iters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    fn ok(value: f64) -> Result<f64, Infallible> {
        Ok(value)
    }

    fn tight() -> Config {
        Config {
            x_abs_tol: 1e-14,
            ..Config::default()
        }
    }

    #[test]
    fn finds_square_root() {
        let solution =
            solve_unobserved(|x| ok(x * x - 2.0), [0.0, 2.0], &tight()).expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, std::f64::consts::SQRT_2, epsilon = 1e-12);
        assert!(solution.iters < 20);
    }

    #[test]
    fn finds_root_of_decreasing_function() {
        // Shaped like a transfer time: t ∝ 1/A.
        let target = 175.0;
        let solution = solve_unobserved(|x: f64| ok(1.19e-8 / x - target), [1e-12, 1e-2], &tight())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 1.19e-8 / target, max_relative = 1e-6);
    }

    #[test]
    fn linear_function_converges_quickly() {
        let solution =
            solve_unobserved(|x| ok(3.0 * x - 1.0), [-5.0, 5.0], &tight()).expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 1.0 / 3.0, epsilon = 1e-12);
        assert!(solution.iters <= 4, "iters = {}", solution.iters);
    }

    #[test]
    fn normalizes_reversed_bracket() {
        let solution =
            solve_unobserved(|x| ok(x * x * x - 27.0), [10.0, 0.0], &tight()).expect("should solve");
        assert_relative_eq!(solution.x, 3.0, epsilon = 1e-10);
        assert!(solution.bracket[0] <= solution.bracket[1]);
    }

    #[test]
    fn endpoint_root_returns_immediately() {
        let solution =
            solve_unobserved(|x| ok(x - 1.0), [1.0, 4.0], &Config::default()).expect("should solve");
        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.iters, 0);
        assert_relative_eq!(solution.x, 1.0);
    }

    #[test]
    fn residual_tolerance_stops_early() {
        let config = Config {
            residual_tol: 1e-3,
            x_abs_tol: 0.0,
            ..Config::default()
        };
        let solution = solve_unobserved(|x| ok(x.exp() - 2.0), [0.0, 3.0], &config)
            .expect("should solve");
        assert!(solution.residual.abs() <= 1e-3);
    }

    #[test]
    fn bracket_always_contains_root() {
        let mut brackets = Vec::new();
        let observer = |event: &Event| -> Option<Action> {
            brackets.push(event.bracket);
            None
        };

        solve(|x: f64| ok(x.cos() - x), [0.0, 1.5], &tight(), observer).expect("should solve");

        let root = 0.739_085_133_215_160_6;
        assert!(!brackets.is_empty());
        for [lo, hi] in brackets {
            assert!(lo <= root + 1e-12 && root - 1e-12 <= hi, "[{lo}, {hi}]");
        }
    }

    #[test]
    fn observer_can_stop_iteration() {
        let mut calls = 0usize;
        let observer = |event: &Event| {
            calls += 1;
            (event.iter >= 2).then_some(Action::StopEarly)
        };

        let solution = solve(|x: f64| ok(x.powi(5) - 3.0), [0.0, 10.0], &tight(), observer)
            .expect("should stop cleanly");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn zero_iters_returns_best_endpoint() {
        let config = Config {
            max_iters: 0,
            ..Config::default()
        };
        let solution =
            solve_unobserved(|x| ok(x * x - 9.0), [2.0, 10.0], &config).expect("should return");

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 0);
        assert_relative_eq!(solution.x, 2.0);
    }

    #[test]
    fn errors_on_invalid_brackets() {
        let result = solve_unobserved(|x| ok(x * x - 9.0), [5.0, 10.0], &Config::default());
        assert!(matches!(result, Err(Error::NoSignChange { .. })));

        let result = solve_unobserved(|x| ok(x), [2.0, 2.0], &Config::default());
        assert!(matches!(result, Err(Error::ZeroWidthBracket { .. })));

        let result = solve_unobserved(|x| ok(x), [f64::NAN, 2.0], &Config::default());
        assert!(matches!(result, Err(Error::NonFiniteBracket { .. })));
    }

    #[test]
    fn errors_on_non_finite_residual() {
        let result = solve_unobserved(|x: f64| ok(x.ln()), [0.0, 2.0], &Config::default());
        assert!(matches!(result, Err(Error::NonFiniteResidual { x, .. }) if x == 0.0));
    }

    #[test]
    fn propagates_function_errors() {
        #[derive(Debug, PartialEq)]
        struct Boom;
        impl std::fmt::Display for Boom {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "boom")
            }
        }
        impl std::error::Error for Boom {}

        let result = solve_unobserved(
            |x: f64| if x > 0.5 { Err(Boom) } else { Ok(x - 0.75) },
            [0.0, 1.0],
            &Config::default(),
        );
        assert!(matches!(result, Err(Error::Function(Boom))));
    }

    #[test]
    fn errors_on_invalid_config() {
        let config = Config {
            x_abs_tol: -1.0,
            ..Config::default()
        };
        let result = solve_unobserved(|x| ok(x), [-1.0, 1.0], &config);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}

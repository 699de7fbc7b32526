//! Adaptive Simpson quadrature.
//!
//! The integrator recursively halves `[a, b]` and accepts a panel once the
//! Richardson error estimate satisfies `|S_fine − S_coarse| ≤ 15·tol`, where the
//! local tolerance `tol` starts at `max(rel_tol·|S|, abs_tol)` and halves with
//! each split. Accepted panels return the extrapolated value
//! `S_fine + (S_fine − S_coarse)/15`.
//!
//! Recursion depth is an explicit parameter and is capped by
//! [`Config::max_depth`]. A panel that still fails the error test at the cap is
//! reported as [`Error::MaxDepth`] instead of contributing an unstable value.
//! This is how a singular neighborhood that cannot be resolved shows up.
//!
//! ```
//! use twine_gas_transfer::support::quadrature::{Config, integrate};
//!
//! let result = integrate(|x| x * x, 0.0, 3.0, &Config::default()).unwrap();
//! assert!((result.value - 9.0).abs() < 1e-12);
//! ```

use thiserror::Error;

use crate::support::constraint::{Constraint, NonNegative};

/// Configuration for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub rel_tol: f64,
    pub abs_tol: f64,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rel_tol: 1e-7,
            abs_tol: 1e-12,
            max_depth: 20,
        }
    }
}

impl Config {
    /// Validates that all tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns a static reason if a tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.rel_tol.is_finite() || NonNegative::check(&self.rel_tol).is_err() {
            return Err("rel_tol must be finite and non-negative");
        }
        if !self.abs_tol.is_finite() || NonNegative::check(&self.abs_tol).is_err() {
            return Err("abs_tol must be finite and non-negative");
        }
        Ok(())
    }
}

/// Errors that can occur during adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("non-finite integration bound: [{a}, {b}]")]
    NonFiniteBound { a: f64, b: f64 },

    #[error("integrand is not finite at x={x}: {value}")]
    NonFiniteIntegrand { x: f64, value: f64 },

    /// A panel did not meet its error tolerance at the depth cap.
    #[error("no convergence on [{left}, {right}] at depth {depth}: error estimate {estimate:e}")]
    MaxDepth {
        left: f64,
        right: f64,
        depth: usize,
        estimate: f64,
    },
}

/// The value of an integral and the work spent computing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    pub evaluations: usize,
}

/// Integrates `f` over `[a, b]`.
///
/// An empty or inverted interval (`b ≤ a`) integrates to zero.
///
/// # Errors
///
/// Returns an [`Error`] if the config or bounds are invalid, the integrand is
/// not finite at a sample point, or a panel fails to converge at the depth cap.
pub fn integrate<F>(f: F, a: f64, b: f64, config: &Config) -> Result<Quadrature, Error>
where
    F: Fn(f64) -> f64,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    if !a.is_finite() || !b.is_finite() {
        return Err(Error::NonFiniteBound { a, b });
    }
    if b <= a {
        return Ok(Quadrature {
            value: 0.0,
            evaluations: 0,
        });
    }

    let sample = |x: f64| -> Result<f64, Error> {
        let value = f(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::NonFiniteIntegrand { x, value })
        }
    };

    let fa = sample(a)?;
    let fm = sample(0.5 * (a + b))?;
    let fb = sample(b)?;
    let whole = simpson(a, b, fa, fm, fb);
    let tol = (config.rel_tol * whole.abs()).max(config.abs_tol);

    let mut evaluations = 3;
    let panel = Panel {
        a,
        b,
        fa,
        fm,
        fb,
        whole,
    };
    let value = refine(&sample, panel, tol, 0, config.max_depth, &mut evaluations)?;

    Ok(Quadrature { value, evaluations })
}

/// A Simpson panel with its endpoint and midpoint samples.
#[derive(Debug, Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

fn refine<S>(
    sample: &S,
    panel: Panel,
    tol: f64,
    depth: usize,
    max_depth: usize,
    evaluations: &mut usize,
) -> Result<f64, Error>
where
    S: Fn(f64) -> Result<f64, Error>,
{
    let Panel {
        a,
        b,
        fa,
        fm,
        fb,
        whole,
    } = panel;
    let m = 0.5 * (a + b);

    let flm = sample(0.5 * (a + m))?;
    let frm = sample(0.5 * (m + b))?;
    *evaluations += 2;

    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if delta.abs() <= 15.0 * tol {
        return Ok(left + right + delta / 15.0);
    }

    if depth >= max_depth {
        return Err(Error::MaxDepth {
            left: a,
            right: b,
            depth,
            estimate: delta.abs() / 15.0,
        });
    }

    let left_panel = Panel {
        a,
        b: m,
        fa,
        fm: flm,
        fb: fm,
        whole: left,
    };
    let right_panel = Panel {
        a: m,
        b,
        fa: fm,
        fm: frm,
        fb,
        whole: right,
    };

    let left = refine(sample, left_panel, 0.5 * tol, depth + 1, max_depth, evaluations)?;
    let right = refine(sample, right_panel, 0.5 * tol, depth + 1, max_depth, evaluations)?;
    Ok(left + right)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn polynomials_are_exact() {
        let result = integrate(|x| 4.0 * x.powi(3) - x, -1.0, 2.0, &Config::default())
            .expect("cubic integrates");
        // x⁴ − x²/2 from −1 to 2
        assert_relative_eq!(result.value, 15.0 - 1.5, epsilon = 1e-12);
        assert_eq!(result.evaluations, 5);
    }

    #[test]
    fn smooth_transcendental() {
        let result = integrate(f64::exp, 0.0, 1.0, &Config::default()).expect("exp integrates");
        assert_relative_eq!(result.value, std::f64::consts::E - 1.0, max_relative = 1e-9);
    }

    #[test]
    fn steep_endpoint_is_resolved() {
        // ∫ dx/√(1−x) from 0 to 1−1e-4 = 2(1 − 1e-2)
        let result = integrate(|x| 1.0 / (1.0 - x).sqrt(), 0.0, 1.0 - 1e-4, &Config::default())
            .expect("integrable endpoint");
        assert_relative_eq!(result.value, 1.98, max_relative = 1e-7);
    }

    #[test]
    fn collapsed_interval_contributes_zero() {
        let config = Config::default();
        let empty = integrate(|_| 1.0, 0.5, 0.5, &config).expect("empty interval");
        let inverted = integrate(|_| 1.0, 0.7, 0.2, &config).expect("inverted interval");
        assert_relative_eq!(empty.value, 0.0);
        assert_relative_eq!(inverted.value, 0.0);
        assert_eq!(inverted.evaluations, 0);
    }

    #[test]
    fn depth_cap_is_reported() {
        let config = Config {
            max_depth: 2,
            ..Config::default()
        };
        let result = integrate(|x| 1.0 / (1.0 - x).sqrt(), 0.0, 1.0 - 1e-9, &config);
        assert!(matches!(result, Err(Error::MaxDepth { depth: 2, .. })));
    }

    #[test]
    fn non_finite_integrand_is_reported() {
        let result = integrate(|x| 1.0 / x, 0.0, 1.0, &Config::default());
        assert!(matches!(
            result,
            Err(Error::NonFiniteIntegrand { x, .. }) if x == 0.0
        ));
    }

    #[test]
    fn rejects_non_finite_bounds_and_bad_config() {
        let result = integrate(|x| x, 0.0, f64::INFINITY, &Config::default());
        assert!(matches!(result, Err(Error::NonFiniteBound { .. })));

        let config = Config {
            rel_tol: -1.0,
            ..Config::default()
        };
        let result = integrate(|x| x, 0.0, 1.0, &config);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}

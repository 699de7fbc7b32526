use crate::support::constraint::{Constraint, NonNegative};

/// Configuration for the Brent solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_iters: usize,
    /// Absolute tolerance on the search variable.
    pub x_abs_tol: f64,
    /// Residual magnitude at or below which the search stops early.
    ///
    /// Zero disables the residual test, leaving only the `x` tolerance.
    pub residual_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 200,
            x_abs_tol: 1e-6,
            residual_tol: 0.0,
        }
    }
}

impl Config {
    /// Validates that all tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns a static reason if any tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.x_abs_tol.is_finite() || NonNegative::check(&self.x_abs_tol).is_err() {
            return Err("x_abs_tol must be finite and non-negative");
        }
        if !self.residual_tol.is_finite() || NonNegative::check(&self.residual_tol).is_err() {
            return Err("residual_tol must be finite and non-negative");
        }
        Ok(())
    }
}

//! Subcritical time integrals after removing the pressure singularity.
//!
//! In pressure form both integrands blow up where the pressure ratio across
//! the restriction reaches one. Substituting a power of that ratio leaves an
//! integrand that is finite everywhere except one endpoint, and the stopping
//! margin keeps that endpoint out of the interval.

use crate::support::quadrature::{self, integrate};

/// Blowdown: `γ ∫ dy / (y² √(1 − y^(γ−1)))` with `y = (P2/P)^(1/γ)`.
///
/// Singular at `y = 1`, where vessel pressure reaches back pressure.
pub(super) fn blowdown(
    gamma: f64,
    lower: f64,
    upper: f64,
    config: &quadrature::Config,
) -> Result<f64, quadrature::Error> {
    let exponent = gamma - 1.0;
    let integrand = |y: f64| 1.0 / (y * y * (1.0 - y.powf(exponent)).sqrt());
    Ok(gamma * integrate(integrand, lower, upper, config)?.value)
}

/// Filling: `γ ∫ z^(γ−2) / √(1 − z^(γ−1)) dz` with `z = (P/Ps)^(1/γ)`.
///
/// Singular at `z = 1`, where vessel pressure reaches supply pressure.
pub(super) fn filling(
    gamma: f64,
    lower: f64,
    upper: f64,
    config: &quadrature::Config,
) -> Result<f64, quadrature::Error> {
    let exponent = gamma - 1.0;
    let integrand = |z: f64| z.powf(gamma - 2.0) / (1.0 - z.powf(exponent)).sqrt();
    Ok(gamma * integrate(integrand, lower, upper, config)?.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn blowdown_matches_closed_form_for_gamma_three() {
        // With γ = 3 the antiderivative is −√(1 − y²)/y.
        let antiderivative = |y: f64| -(1.0 - y * y).sqrt() / y;
        let (lower, upper) = (0.5, 0.99);

        let value = blowdown(3.0, lower, upper, &quadrature::Config::default()).unwrap();
        let exact = 3.0 * (antiderivative(upper) - antiderivative(lower));

        assert_relative_eq!(value, exact, max_relative = 1e-6);
    }

    #[test]
    fn filling_matches_closed_form() {
        // γ∫ z^(γ−2)/√(1 − z^(γ−1)) dz = 2γ/(γ−1) · [√(1 − w_lower) − √(1 − w_upper)], w = z^(γ−1)
        let gamma: f64 = 1.4;
        let lower = 0.3;
        let upper = 0.99_f64.powf(1.0 / gamma);
        let w = |z: f64| z.powf(gamma - 1.0);

        let value = filling(gamma, lower, upper, &quadrature::Config::default()).unwrap();
        let exact =
            2.0 * gamma / (gamma - 1.0) * ((1.0 - w(lower)).sqrt() - (1.0 - w(upper)).sqrt());

        assert_relative_eq!(value, exact, max_relative = 1e-6);
    }

    #[test]
    fn collapsed_interval_contributes_nothing() {
        let config = quadrature::Config::default();
        assert_relative_eq!(blowdown(1.4, 0.9, 0.9, &config).unwrap(), 0.0);
        assert_relative_eq!(filling(1.4, 0.9, 0.5, &config).unwrap(), 0.0);
    }

    #[test]
    fn shallow_depth_cannot_resolve_the_singular_end() {
        let config = quadrature::Config {
            max_depth: 2,
            ..quadrature::Config::default()
        };
        let upper = 1.01_f64.powf(-1.0 / 1.4);
        let result = blowdown(1.4, 0.1, upper, &config);
        assert!(matches!(result, Err(quadrature::Error::MaxDepth { .. })));
    }
}

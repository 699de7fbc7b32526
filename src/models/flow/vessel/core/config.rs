use crate::support::{quadrature, root::brent};

use super::{InputError, InputField};

/// Validity gates for the capillary closed form.
///
/// The Poiseuille relation only holds for laminar flow in a long passage.
/// `forced_out_*` is an empirical rule with no derivation: a candidate that is
/// both short (`L/D` below `forced_out_length_ratio`) and well turbulent
/// (`Re` above `forced_out_reynolds`) is dropped from consideration entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapillaryGates {
    pub max_laminar_reynolds: f64,
    pub min_length_ratio: f64,
    pub forced_out_length_ratio: f64,
    pub forced_out_reynolds: f64,
}

impl Default for CapillaryGates {
    fn default() -> Self {
        Self {
            max_laminar_reynolds: 2000.0,
            min_length_ratio: 10.0,
            forced_out_length_ratio: 10.0,
            forced_out_reynolds: 5000.0,
        }
    }
}

/// Solver configuration for the diameter-from-time inversion.
///
/// [`SolverConfig::strict`] is the default. [`SolverConfig::retry`] allows
/// more bracket expansions and falls back to bisection if Brent's method fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Default search bracket on area, m².
    pub area_bracket: [f64; 2],

    /// Multiple of the vessel's equivalent diameter `(6V/π)^(1/3)` that no
    /// candidate diameter may exceed.
    pub ceiling_factor: f64,

    /// Number of times the bracket may be widened by a decade at each end.
    pub max_expansions: usize,

    /// Brent settings; the search runs on `ln A`.
    pub brent: brent::Config,

    /// Absolute distance to a bracket end (m²) within which a root is suspect.
    pub boundary_abs_tol: f64,

    /// Relative distance to a bracket end within which a root is suspect.
    pub boundary_rel_tol: f64,

    /// Smallest relative residual tolerance, whatever `ε` is.
    pub residual_floor: f64,

    /// Relative area perturbations tried, in both directions, when a root
    /// fails forward verification.
    pub refinement_steps: [f64; 2],

    /// Number of log-spaced diameter/time samples reported across the bracket.
    pub trace_points: usize,

    pub quadrature: quadrature::Config,

    pub capillary: CapillaryGates,

    /// Orifice `L/D` above which the thin-plate assumption is flagged.
    pub max_orifice_length_ratio: f64,

    /// Retry a failed Brent search with bisection on `log10(A)`.
    pub bisection_fallback: bool,

    /// Iteration cap for the bisection retry.
    pub fallback_max_iters: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl SolverConfig {
    /// Four bracket expansions and Brent's method only.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            area_bracket: [1e-12, 1e-2],
            ceiling_factor: 2.0,
            max_expansions: 4,
            brent: brent::Config {
                max_iters: 200,
                x_abs_tol: 1e-6,
                residual_tol: 0.0,
            },
            boundary_abs_tol: 1e-10,
            boundary_rel_tol: 1e-6,
            residual_floor: 0.01,
            refinement_steps: [0.05, 0.10],
            trace_points: 5,
            quadrature: quadrature::Config::default(),
            capillary: CapillaryGates::default(),
            max_orifice_length_ratio: 10.0,
            bisection_fallback: false,
            fallback_max_iters: 200,
        }
    }

    /// Twelve bracket expansions and a bisection fallback.
    #[must_use]
    pub fn retry() -> Self {
        Self {
            max_expansions: 12,
            bisection_fallback: true,
            ..Self::strict()
        }
    }

    /// Checks that every numeric knob is usable.
    pub(super) fn validate(&self) -> Result<(), InputError> {
        let [low, high] = self.area_bracket;
        let bracket_ok = low.is_finite() && high.is_finite() && low > 0.0 && low < high;
        let ok = bracket_ok
            && self.ceiling_factor.is_finite()
            && self.ceiling_factor > 0.0
            && self.residual_floor >= 0.0
            && self.refinement_steps.iter().all(|s| *s > 0.0 && *s < 1.0)
            && self.brent.validate().is_ok()
            && self.quadrature.validate().is_ok();

        if ok {
            Ok(())
        } else {
            Err(InputError {
                field: InputField::SolverConfig,
                raw: format!("{self:?}"),
                parsed: f64::NAN,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_relaxes_strict() {
        let strict = SolverConfig::strict();
        let retry = SolverConfig::retry();

        assert_eq!(strict.max_expansions, 4);
        assert_eq!(retry.max_expansions, 12);
        assert!(!strict.bisection_fallback);
        assert!(retry.bisection_fallback);
        assert_eq!(strict.brent, retry.brent);
        assert_eq!(SolverConfig::default(), strict);
    }

    #[test]
    fn rejects_inverted_bracket() {
        let config = SolverConfig {
            area_bracket: [1e-2, 1e-12],
            ..SolverConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, InputField::SolverConfig);
        assert!(SolverConfig::retry().validate().is_ok());
    }
}

//! Orifice forward model: transfer time from restriction area.
//!
//! While the restriction is choked the mass flow is linear in the upstream
//! pressure and the sonic phase has a closed form. The remaining subcritical
//! phase is integrated numerically in a substituted variable (see [`integral`]).
//! Every term scales as `V/(R·T·Cd·A)`, so time is exactly proportional to `1/A`.

mod integral;

use uom::si::{
    f64::{Pressure, Time},
    pressure::pascal,
    time::second,
};

use crate::support::{gas::flow, quadrature};

use super::{Conditions, IntegralError, Pressures};

/// Orifice transfer time split by flow regime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrificeTime {
    pub total: Time,
    /// Time spent choked.
    pub sonic: Time,
    /// Time spent subcritical.
    pub subsonic: Time,
    /// Whether the transfer starts choked.
    pub choked: bool,
}

/// Phase durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PhaseTimes {
    pub(crate) sonic: f64,
    pub(crate) subsonic: f64,
    pub(crate) choked: bool,
}

impl PhaseTimes {
    pub(crate) fn total(&self) -> f64 {
        self.sonic + self.subsonic
    }
}

impl From<PhaseTimes> for OrificeTime {
    fn from(times: PhaseTimes) -> Self {
        Self {
            total: Time::new::<second>(times.total()),
            sonic: Time::new::<second>(times.sonic),
            subsonic: Time::new::<second>(times.subsonic),
            choked: times.choked,
        }
    }
}

/// Computes the transfer time through an orifice of the given area (m²).
pub(crate) fn time(
    conditions: &Conditions,
    area: f64,
    quadrature: &quadrature::Config,
) -> Result<PhaseTimes, IntegralError> {
    let gamma = conditions.gamma;
    let (r, t) = (conditions.r, conditions.temperature);
    let rc = flow::critical_pressure_ratio(gamma);
    let pf = conditions.final_pressure();
    let scale = conditions.volume / (conditions.rt() * conditions.cd * area);
    let sonic_scale = scale / flow::sonic_coefficient(gamma, r, t);
    let subsonic_scale = scale / flow::subsonic_coefficient(gamma, r, t);

    let fail = |lower: f64, upper: f64, start: f64, source: quadrature::Error| IntegralError {
        process: conditions.process(),
        lower,
        upper,
        margin: conditions.margin(),
        start_pressure: Pressure::new::<pascal>(start),
        final_pressure: Pressure::new::<pascal>(pf),
        gamma,
        source,
    };

    match conditions.pressures {
        Pressures::Blowdown { p1, p2 } => {
            let p_star = p2 / rc;
            let choked = p1 > p_star;

            let sonic = if choked {
                sonic_scale * (p1 / p_star.max(pf)).ln()
            } else {
                0.0
            };

            let start = p1.min(p_star);
            let subsonic = if start > pf {
                let lower = (p2 / start).powf(1.0 / gamma);
                let upper = (p2 / pf).powf(1.0 / gamma);
                let value = integral::blowdown(gamma, lower, upper, quadrature)
                    .map_err(|source| fail(lower, upper, start, source))?;
                subsonic_scale * value
            } else {
                0.0
            };

            Ok(PhaseTimes {
                sonic,
                subsonic,
                choked,
            })
        }
        Pressures::Filling { p1, ps, .. } => {
            let p_star = rc * ps;
            let choked = p1 < p_star;

            let sonic = if choked {
                sonic_scale * (p_star.min(pf) - p1) / ps
            } else {
                0.0
            };

            let start = p1.max(p_star);
            let subsonic = if start < pf {
                let lower = (start / ps).powf(1.0 / gamma);
                let upper = (pf / ps).powf(1.0 / gamma);
                let value = integral::filling(gamma, lower, upper, quadrature)
                    .map_err(|source| fail(lower, upper, start, source))?;
                subsonic_scale * value
            } else {
                0.0
            };

            Ok(PhaseTimes {
                sonic,
                subsonic,
                choked,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::flow::vessel::core::test_support::{
        conditions, filling_inputs, reference_blowdown,
    };

    /// Integrates `dt = V/(R·T) · dP/ṁ` directly in log pressure.
    fn direct_time(conditions: &Conditions, area: f64) -> f64 {
        let (gamma, r, t) = (conditions.gamma, conditions.r, conditions.temperature);
        let pf = conditions.final_pressure();
        let rate = |p: f64| match conditions.pressures {
            Pressures::Blowdown { p2, .. } => {
                flow::mass_flow(conditions.cd, area, p, p2, gamma, r, t)
            }
            Pressures::Filling { ps, .. } => {
                flow::mass_flow(conditions.cd, area, ps, p, gamma, r, t)
            }
        };

        let (a, b) = (conditions.p1().ln(), pf.ln());
        let n = 20_000;
        let h = (b - a) / f64::from(n);
        let g = |s: f64| {
            let p = s.exp();
            conditions.volume / conditions.rt() * p / rate(p)
        };
        let mut sum = g(a) + g(b);
        for i in 1..n {
            let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
            sum += weight * g(a + h * f64::from(i));
        }
        (sum * h / 3.0).abs()
    }

    #[test]
    fn reference_blowdown_takes_about_175_seconds() {
        let conditions = conditions(&reference_blowdown());
        let area = flow::circle_area(9.314e-6);

        let times = time(&conditions, area, &quadrature::Config::default()).unwrap();

        assert!(times.choked);
        assert!(times.sonic > 0.0 && times.subsonic > 0.0);
        assert_relative_eq!(times.total(), 175.0, max_relative = 5e-3);
    }

    #[test]
    fn blowdown_matches_direct_integration() {
        let conditions = conditions(&reference_blowdown());
        let area = 5e-11;
        let times = time(&conditions, area, &quadrature::Config::default()).unwrap();
        assert_relative_eq!(
            times.total(),
            direct_time(&conditions, area),
            max_relative = 1e-5
        );
    }

    #[test]
    fn filling_matches_direct_integration() {
        let conditions = conditions(&filling_inputs());
        let area = 2e-9;
        let times = time(&conditions, area, &quadrature::Config::default()).unwrap();

        assert!(times.choked);
        assert!(times.subsonic > 0.0);
        assert_relative_eq!(
            times.total(),
            direct_time(&conditions, area),
            max_relative = 1e-5
        );
    }

    #[test]
    fn time_is_inversely_proportional_to_area() {
        for inputs in [reference_blowdown(), filling_inputs()] {
            let conditions = conditions(&inputs);
            let config = quadrature::Config::default();
            let t1 = time(&conditions, 1e-10, &config).unwrap().total();
            let t2 = time(&conditions, 3e-10, &config).unwrap().total();
            assert_relative_eq!(t1 / t2, 3.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn unchoked_blowdown_has_no_sonic_phase() {
        let mut inputs = reference_blowdown();
        inputs.upstream_pressure = Pressure::new::<pascal>(1500.0);
        let conditions = conditions(&inputs);

        let times = time(&conditions, 1e-10, &quadrature::Config::default()).unwrap();

        assert!(!times.choked);
        assert_relative_eq!(times.sonic, 0.0);
        assert!(times.subsonic > 0.0);
    }

    #[test]
    fn unresolvable_integral_reports_its_bounds() {
        let conditions = conditions(&reference_blowdown());
        let config = quadrature::Config {
            max_depth: 2,
            ..quadrature::Config::default()
        };

        let err = time(&conditions, 1e-10, &config).unwrap_err();

        assert_relative_eq!(err.margin, 0.01);
        assert_relative_eq!(err.gamma, 1.4);
        assert!(err.lower < err.upper && err.upper < 1.0);
        assert_relative_eq!(err.final_pressure.get::<pascal>(), 1010.0);
    }
}

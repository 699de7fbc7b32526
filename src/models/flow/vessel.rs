//! Rigid-vessel blowdown and filling through a small restriction.
//!
//! [`VesselTransfer`] is the [`twine_core::Model`] for this domain. Given a
//! target transfer time it sizes the restriction, and given a diameter it
//! computes the transfer time. The computational core lives in the internal
//! `core` module; its public items are re-exported here.

pub(crate) mod core;

pub use core::{
    AreaBracket, Bound, BracketCache, BracketingError, BracketingKind, CacheEntry, CacheKey,
    Candidate, CapillaryDiagnostics, CapillaryGates, ChokingKind, ChokingRatio, ConvergenceError,
    ConvergenceKind, Diagnostics, EventSink, Given, InputError, InputField, IntegralError,
    MemoryCache, NoCache, OrificeDiagnostics, OrificeTime, PressureError, Process, ProcessInputs,
    ResidualError, SolveDirection, SolveError, SolveEvent, SolveResult, Solved, SolverConfig,
    TracePoint, Verdict, Warning, capillary_diameter, capillary_time, orifice_time,
    parse_target_time, physical_ceiling, solve, solve_with,
};

use twine_core::Model;

/// Vessel transfer model with a fixed solver configuration.
///
/// Each call solves from scratch: no bracket cache is kept and no events are
/// reported. Use [`solve_with`] for either.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VesselTransfer {
    pub config: SolverConfig,
}

impl VesselTransfer {
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Model for VesselTransfer {
    type Input = ProcessInputs;
    type Output = SolveResult;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        solve_with(input, &self.config, &mut NoCache, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Length, Pressure, ThermodynamicTemperature, Time, Volume},
        length::meter,
        pressure::pascal,
        thermodynamic_temperature::kelvin,
        time::second,
        volume::cubic_meter,
    };

    use crate::support::gas::{Air, GasFluid};

    fn inputs(target: f64) -> ProcessInputs {
        ProcessInputs::blowdown(
            Given::TargetTime(Time::new::<second>(target)),
            Volume::new::<cubic_meter>(2e-7),
            Pressure::new::<pascal>(1.2e6),
            Pressure::new::<pascal>(1e3),
            ThermodynamicTemperature::new::<kelvin>(288.15),
            Length::new::<meter>(0.002),
            Air::properties(),
        )
    }

    #[test]
    fn model_matches_solve() {
        let model = VesselTransfer::default();
        let input = inputs(175.0);

        let via_model = model.call(&input).unwrap();
        let direct = solve(&input).unwrap();
        assert_eq!(via_model, direct);
    }

    #[test]
    fn model_uses_its_config() {
        let input = inputs(1e10);

        let strict = VesselTransfer::new(SolverConfig::strict()).call(&input);
        assert!(matches!(strict, Err(SolveError::Bracketing(_))));

        let retry = VesselTransfer::new(SolverConfig::retry())
            .call(&input)
            .unwrap();
        let orifice = retry.diagnostics.orifice.unwrap();
        assert_relative_eq!(
            orifice.diameter.get::<meter>(),
            9.3145e-6 * (175.0_f64 / 1e10).sqrt(),
            max_relative = 1e-3
        );
    }
}

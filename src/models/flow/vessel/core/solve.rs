use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature, Time, Volume},
    length::meter,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
    time::second,
    volume::cubic_meter,
};

use crate::support::{
    gas::{flow, ideal_gas},
    quadrature,
    units::SpecificGasConstant,
};

use super::{
    BracketCache, CapillaryDiagnostics, Candidate, Conditions, Diagnostics, EventSink,
    InputField, NoCache, OrificeDiagnostics, OrificeTime, ProcessInputs, Request, SolveError,
    SolveEvent, SolveResult, Solved, SolverConfig, TracePoint, Verdict, Warning, capillary,
    diagnostics, inversion, orifice, positive, relative_residual, selection,
};

/// Solves with the strict configuration, no bracket cache, and no event sink.
///
/// # Errors
///
/// Returns a [`SolveError`] if the inputs are invalid or no candidate can be produced.
pub fn solve(inputs: &ProcessInputs) -> Result<SolveResult, SolveError> {
    solve_with(inputs, &SolverConfig::default(), &mut NoCache, &mut ())
}

/// Solves for whichever quantity `inputs.given` leaves free.
///
/// The cache supplies and stores search brackets for the orifice inversion,
/// and every stage reports to `sink`.
///
/// # Errors
///
/// Returns a [`SolveError`] if the configuration or inputs are invalid, if the
/// target cannot be bracketed, or if the orifice search fails and no valid
/// capillary candidate exists.
pub fn solve_with(
    inputs: &ProcessInputs,
    config: &SolverConfig,
    cache: &mut impl BracketCache,
    sink: &mut impl EventSink,
) -> Result<SolveResult, SolveError> {
    config.validate()?;
    let request = inputs.given.validate()?;
    let conditions = inputs.conditions()?;

    let result = match request {
        Request::TargetTime(target) => diameter_from_time(&conditions, target, config, cache, sink),
        Request::Diameter(diameter) => time_from_diameter(&conditions, diameter, config, sink),
    }?;

    sink.emit(&SolveEvent::Accepted {
        verdict: result.verdict,
        value: result.value,
    });
    Ok(result)
}

/// Transfer time through an orifice of the given diameter, split by regime.
///
/// # Errors
///
/// Returns a [`SolveError`] if the inputs or diameter are invalid or the
/// subsonic integral does not converge.
pub fn orifice_time(inputs: &ProcessInputs, diameter: Length) -> Result<OrificeTime, SolveError> {
    let diameter = checked_diameter(diameter)?;
    let conditions = inputs.conditions()?;
    let area = flow::circle_area(diameter);
    let times = orifice::time(&conditions, area, &quadrature::Config::default())?;
    Ok(times.into())
}

/// Transfer time through a capillary of the given diameter.
///
/// Returns `None` when the pressure history has no usable logarithm.
///
/// # Errors
///
/// Returns a [`SolveError`] if the inputs or diameter are invalid.
pub fn capillary_time(inputs: &ProcessInputs, diameter: Length) -> Result<Option<Time>, SolveError> {
    let diameter = checked_diameter(diameter)?;
    let conditions = inputs.conditions()?;
    Ok(capillary::time(&conditions, diameter).map(Time::new::<second>))
}

/// Capillary diameter that completes the transfer in the given time.
///
/// Returns `None` when the pressure history has no usable logarithm.
///
/// # Errors
///
/// Returns a [`SolveError`] if the inputs or time are invalid.
pub fn capillary_diameter(inputs: &ProcessInputs, time: Time) -> Result<Option<Length>, SolveError> {
    let time = positive(InputField::TargetTime, time.get::<second>())?;
    let conditions = inputs.conditions()?;
    Ok(capillary::diameter(&conditions, time).map(Length::new::<meter>))
}

/// Largest diameter any candidate may have: `2·(6V/π)^(1/3)`.
#[must_use]
pub fn physical_ceiling(volume: Volume) -> Length {
    let factor = SolverConfig::default().ceiling_factor;
    Length::new::<meter>(inversion::ceiling_diameter(
        volume.get::<cubic_meter>(),
        factor,
    ))
}

fn checked_diameter(diameter: Length) -> Result<f64, SolveError> {
    Ok(positive(InputField::Diameter, diameter.get::<meter>())?)
}

fn diameter_from_time(
    conditions: &Conditions,
    target: f64,
    config: &SolverConfig,
    cache: &mut impl BracketCache,
    sink: &mut impl EventSink,
) -> Result<SolveResult, SolveError> {
    let tolerance = conditions.tolerance(config.residual_floor);
    let ceiling = inversion::ceiling_diameter(conditions.volume, config.ceiling_factor);
    let mut warnings = Vec::new();

    let capillary = capillary::diameter(conditions, target)
        .and_then(|d| capillary::time(conditions, d).map(|t| (d, t)))
        .map(|(d, t)| {
            let residual = relative_residual(t, target);
            diagnostics::capillary(conditions, d, t, residual, tolerance, &config.capillary, ceiling)
        });
    gate_capillary(capillary.as_ref(), &mut warnings, sink);

    let inverted = inversion::invert(conditions, target, config, cache, sink).and_then(|inv| {
        let area = inv.point.area;
        let times = orifice::time(conditions, area, &config.quadrature)?;
        let diameter = flow::circle_diameter(area);
        let diag =
            diagnostics::orifice(conditions, diameter, times, inv.point.residual, tolerance, ceiling);
        Ok((diag, inv.trace))
    });

    let (verdict, diameter, orifice, trace) = match inverted {
        Ok((orifice, trace)) => {
            gate_orifice(&orifice, config, ceiling, &mut warnings, sink);
            let (verdict, candidate) = selection::select(capillary.as_ref(), &orifice);
            let diameter = match (candidate, &capillary) {
                (Candidate::Capillary, Some(c)) => c.diameter,
                _ => orifice.diameter,
            };
            (verdict, diameter, Some(orifice), Some(trace))
        }
        // A target outside the reachable range is reported as is; only a
        // failed search inside a good bracket falls back to the capillary.
        Err(err @ (SolveError::Input(_) | SolveError::Pressures(_) | SolveError::Bracketing(_))) => {
            return Err(err);
        }
        Err(err) => {
            let Some(c) = capillary.as_ref().filter(|c| c.valid) else {
                return Err(err);
            };
            let diameter = c.diameter;
            warnings.push(Warning::OrificeFailed(err));
            (Verdict::Capillary, diameter, None, None)
        }
    };

    Ok(finish(
        conditions,
        Solved::Diameter(diameter),
        verdict,
        capillary,
        orifice,
        ceiling,
        warnings,
        trace,
    ))
}

fn time_from_diameter(
    conditions: &Conditions,
    diameter: f64,
    config: &SolverConfig,
    sink: &mut impl EventSink,
) -> Result<SolveResult, SolveError> {
    let tolerance = conditions.tolerance(config.residual_floor);
    let ceiling = inversion::ceiling_diameter(conditions.volume, config.ceiling_factor);
    let mut warnings = Vec::new();

    let capillary = capillary::time(conditions, diameter).map(|t| {
        diagnostics::capillary(conditions, diameter, t, 0.0, tolerance, &config.capillary, ceiling)
    });
    gate_capillary(capillary.as_ref(), &mut warnings, sink);

    let times = orifice::time(conditions, flow::circle_area(diameter), &config.quadrature)?;
    let orifice = diagnostics::orifice(conditions, diameter, times, 0.0, tolerance, ceiling);
    gate_orifice(&orifice, config, ceiling, &mut warnings, sink);

    let (verdict, candidate) = selection::select(capillary.as_ref(), &orifice);
    let time = match (candidate, &capillary) {
        (Candidate::Capillary, Some(c)) => c.time,
        _ => orifice.time.total,
    };

    Ok(finish(
        conditions,
        Solved::Time(time),
        verdict,
        capillary,
        Some(orifice),
        ceiling,
        warnings,
        None,
    ))
}

fn gate_capillary(
    capillary: Option<&CapillaryDiagnostics>,
    warnings: &mut Vec<Warning>,
    sink: &mut impl EventSink,
) {
    let Some(c) = capillary else {
        warnings.push(Warning::CapillaryInapplicable);
        return;
    };

    sink.emit(&SolveEvent::CandidateGated {
        candidate: Candidate::Capillary,
        valid: c.valid,
    });
    if c.forced_out {
        warnings.push(Warning::CapillaryForcedOut {
            reynolds: c.reynolds,
            length_ratio: c.length_ratio,
        });
    } else if !c.valid {
        warnings.push(Warning::CapillaryInvalid {
            reynolds: c.reynolds,
            length_ratio: c.length_ratio,
        });
    }
}

fn gate_orifice(
    orifice: &OrificeDiagnostics,
    config: &SolverConfig,
    ceiling: f64,
    warnings: &mut Vec<Warning>,
    sink: &mut impl EventSink,
) {
    sink.emit(&SolveEvent::CandidateGated {
        candidate: Candidate::Orifice,
        valid: orifice.valid,
    });
    if !orifice.within_ceiling {
        warnings.push(Warning::OrificeAboveCeiling {
            diameter: orifice.diameter,
            ceiling: Length::new::<meter>(ceiling),
        });
    }
    if orifice.length_ratio > config.max_orifice_length_ratio {
        warnings.push(Warning::LongOrifice {
            length_ratio: orifice.length_ratio,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn finish(
    conditions: &Conditions,
    value: Solved,
    verdict: Verdict,
    capillary: Option<CapillaryDiagnostics>,
    orifice: Option<OrificeDiagnostics>,
    ceiling: f64,
    mut warnings: Vec<Warning>,
    trace: Option<Vec<TracePoint>>,
) -> SolveResult {
    if verdict == Verdict::Inconclusive {
        warnings.push(Warning::NeitherValid);
    }

    let initial_inventory = ideal_gas::inventory(
        Volume::new::<cubic_meter>(conditions.volume),
        ThermodynamicTemperature::new::<kelvin>(conditions.temperature),
        Pressure::new::<pascal>(conditions.p1()),
        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(conditions.r),
    );

    SolveResult {
        value,
        verdict,
        diagnostics: Diagnostics {
            capillary,
            orifice,
            initial_inventory,
            ceiling: Length::new::<meter>(ceiling),
        },
        warnings,
        trace,
    }
}

use uom::si::{
    area::square_meter,
    f64::{Area, Length, Mass, MassRate, Time},
    length::meter,
    mass_rate::kilogram_per_second,
    time::second,
};

use crate::support::gas::flow;

use super::{
    CapillaryGates, ChokingRatio, Conditions, OrificeTime, capillary, orifice::PhaseTimes,
};

/// Validity checks for a capillary candidate, evaluated at initial flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapillaryDiagnostics {
    pub diameter: Length,
    pub time: Time,
    pub reynolds: f64,
    /// Flow path length over diameter.
    pub length_ratio: f64,
    pub mass_flow: MassRate,
    /// `Re` at or below the laminar limit.
    pub laminar: bool,
    /// `L/D` at or above the minimum for developed flow.
    pub long_enough: bool,
    /// Short and well turbulent; excluded regardless of other checks.
    pub forced_out: bool,
    /// The diameter does not exceed the vessel's physical ceiling.
    pub within_ceiling: bool,
    /// Relative residual of the forward time against the target.
    pub residual: f64,
    pub valid: bool,
}

/// Flow state and validity for an orifice candidate, evaluated at initial flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrificeDiagnostics {
    pub diameter: Length,
    pub area: Area,
    pub time: OrificeTime,
    pub reynolds: f64,
    /// Flow path length over diameter.
    pub length_ratio: f64,
    pub mass_flow: MassRate,
    pub choking: ChokingRatio,
    /// Throat Mach number; exactly `1.0` when choked.
    pub throat_mach: f64,
    /// The diameter does not exceed the vessel's physical ceiling.
    pub within_ceiling: bool,
    /// Relative residual of the forward time against the target.
    pub residual: f64,
    pub valid: bool,
}

/// Diagnostics for every candidate considered by a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub capillary: Option<CapillaryDiagnostics>,
    pub orifice: Option<OrificeDiagnostics>,
    /// Gas mass in the vessel at the start of the transfer.
    pub initial_inventory: Mass,
    /// Largest diameter any candidate may have.
    pub ceiling: Length,
}

pub(crate) fn capillary(
    conditions: &Conditions,
    diameter: f64,
    time: f64,
    residual: f64,
    tolerance: f64,
    gates: &CapillaryGates,
    ceiling: f64,
) -> CapillaryDiagnostics {
    let mass_flow = capillary::initial_mass_flow(conditions, diameter);
    let reynolds = flow::reynolds_number(mass_flow, diameter, conditions.mu);
    let length_ratio = conditions.length / diameter;

    let laminar = reynolds <= gates.max_laminar_reynolds;
    let long_enough = length_ratio >= gates.min_length_ratio;
    let forced_out =
        length_ratio < gates.forced_out_length_ratio && reynolds > gates.forced_out_reynolds;
    let within_ceiling = diameter <= ceiling;

    CapillaryDiagnostics {
        diameter: Length::new::<meter>(diameter),
        time: Time::new::<second>(time),
        reynolds,
        length_ratio,
        mass_flow: MassRate::new::<kilogram_per_second>(mass_flow),
        laminar,
        long_enough,
        forced_out,
        within_ceiling,
        residual,
        valid: laminar && long_enough && !forced_out && within_ceiling && residual <= tolerance,
    }
}

pub(crate) fn orifice(
    conditions: &Conditions,
    diameter: f64,
    times: PhaseTimes,
    residual: f64,
    tolerance: f64,
    ceiling: f64,
) -> OrificeDiagnostics {
    let area = flow::circle_area(diameter);
    let (up, down) = conditions.initial_drive();
    let (gamma, r, t) = (conditions.gamma, conditions.r, conditions.temperature);

    let mass_flow = flow::mass_flow(conditions.cd, area, up, down, gamma, r, t);
    let choking = conditions.choking_ratio();
    let within_ceiling = diameter <= ceiling;

    OrificeDiagnostics {
        diameter: Length::new::<meter>(diameter),
        area: Area::new::<square_meter>(area),
        time: times.into(),
        reynolds: flow::reynolds_number(mass_flow, diameter, conditions.mu),
        length_ratio: conditions.length / diameter,
        mass_flow: MassRate::new::<kilogram_per_second>(mass_flow),
        choking,
        throat_mach: flow::throat_mach(gamma, choking.value),
        within_ceiling,
        residual,
        valid: within_ceiling && residual <= tolerance,
    }
}

use std::fmt;

use thiserror::Error;
use uom::si::f64::{Area, Pressure, Time};

use crate::support::quadrature;

use super::Process;

/// Errors that can occur while solving a vessel transfer.
///
/// Each variant wraps a payload carrying the numbers needed to diagnose the
/// failure. No value is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// An input value is missing, non-finite, or out of range.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The pressures do not describe a valid blowdown or filling.
    #[error(transparent)]
    Pressures(#[from] PressureError),

    /// No sign-changing area bracket could be established or kept.
    #[error(transparent)]
    Bracketing(#[from] BracketingError),

    /// The subcritical integral could not be resolved near its singular end.
    #[error(transparent)]
    Integral(#[from] IntegralError),

    /// The root search did not converge on a bracket-preserving update.
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    /// A root was found but its forward-simulated time misses the target.
    #[error(transparent)]
    Residual(#[from] ResidualError),
}

/// The input a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    TargetTime,
    Diameter,
    VesselVolume,
    UpstreamPressure,
    DownstreamPressure,
    SupplyPressure,
    Temperature,
    FlowPathLength,
    DischargeCoefficient,
    Tolerance,
    HeatCapacityRatio,
    GasConstant,
    Viscosity,
    /// A numeric knob of the solver configuration.
    SolverConfig,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TargetTime => "target time",
            Self::Diameter => "diameter",
            Self::VesselVolume => "vessel volume",
            Self::UpstreamPressure => "upstream pressure",
            Self::DownstreamPressure => "downstream pressure",
            Self::SupplyPressure => "supply pressure",
            Self::Temperature => "temperature",
            Self::FlowPathLength => "flow path length",
            Self::DischargeCoefficient => "discharge coefficient",
            Self::Tolerance => "convergence tolerance",
            Self::HeatCapacityRatio => "heat capacity ratio",
            Self::GasConstant => "specific gas constant",
            Self::Viscosity => "dynamic viscosity",
            Self::SolverConfig => "solver configuration",
        };
        f.write_str(name)
    }
}

/// An input failed validation.
///
/// `raw` is the value as the caller supplied it and `parsed` is the number it
/// was read as, which is `NaN` when nothing numeric could be read.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: raw={raw:?}, parsed={parsed}")]
pub struct InputError {
    pub field: InputField,
    pub raw: String,
    pub parsed: f64,
}

impl InputError {
    /// Creates an input error for a value that was already numeric.
    pub(super) fn numeric(field: InputField, value: f64) -> Self {
        Self {
            field,
            raw: value.to_string(),
            parsed: value,
        }
    }
}

/// The process pressures are out of order.
///
/// Blowdown requires `P1 > Pf > P2 > 0`; filling requires `Ps > P2 > Pf > P1 > 0`,
/// where `Pf` is the stopping pressure set by the tolerance margin.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{process:?} pressures out of order: upstream={upstream:?}, downstream={downstream:?}, \
     supply={supply:?}, final={final_pressure:?}"
)]
pub struct PressureError {
    pub process: Process,
    pub upstream: Pressure,
    pub downstream: Pressure,
    pub supply: Option<Pressure>,
    pub final_pressure: Pressure,
}

/// Why a bracket could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketingKind {
    /// The transfer time at a bracket end was not finite.
    NonFiniteEndpoints,
    /// The target stayed outside the bracket after every allowed expansion.
    NotBracketed,
    /// The search converged onto a bracket end with no interior root.
    HitBound { bound: Bound },
}

/// A bracket end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// A bracket could not be established or the search landed on its edge.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "bracketing failed ({kind:?}): areas=[{area_low:?}, {area_high:?}], \
     times=[{time_low:?}, {time_high:?}], target={target:?}, expansions={expansions}"
)]
pub struct BracketingError {
    pub kind: BracketingKind,
    pub area_low: Area,
    pub area_high: Area,
    pub time_low: Time,
    pub time_high: Time,
    pub target: Time,
    pub expansions: usize,
}

/// Adaptive quadrature failed near the singular end of the subcritical integral.
///
/// `lower` and `upper` are bounds of the substituted variable
/// (`y = (P2/P)^(1/γ)` for blowdown, `z = (P/Ps)^(1/γ)` for filling).
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{process:?} subcritical integral failed on [{lower}, {upper}] \
     (margin={margin}, gamma={gamma})"
)]
pub struct IntegralError {
    pub process: Process,
    pub lower: f64,
    pub upper: f64,
    pub margin: f64,
    pub start_pressure: Pressure,
    pub final_pressure: Pressure,
    pub gamma: f64,
    #[source]
    pub source: quadrature::Error,
}

/// How the root search failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceKind {
    /// The iteration cap was reached.
    MaxIters,
    /// An update left both ends of the bracket with the same residual sign.
    BracketLost,
}

/// The root search ended without a converged, bracket-preserving solution.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "root search failed ({kind:?}) after {iters} iterations: \
     areas=[{area_low:?}, {area_high:?}], target={target:?}"
)]
pub struct ConvergenceError {
    pub kind: ConvergenceKind,
    pub area_low: Area,
    pub area_high: Area,
    pub iters: usize,
    pub target: Time,
}

/// Which pressure ratio decides whether the restriction is choked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChokingKind {
    /// Blowdown: downstream over vessel pressure, `P2/P1`.
    DownstreamOverUpstream,
    /// Filling: vessel over supply pressure, `P1/Ps`.
    VesselOverSupply,
}

/// The initial choking ratio and how it compares to the critical ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChokingRatio {
    pub kind: ChokingKind,
    pub value: f64,
    pub critical: f64,
    pub choked: bool,
}

/// The accepted root failed forward verification, even after refinement.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "forward time {forward_time:?} misses target {target:?}: residual={residual} \
     (refined={refined_residual:?}, tolerance={tolerance})"
)]
pub struct ResidualError {
    pub target: Time,
    pub forward_time: Time,
    /// Relative residual at the root returned by the search.
    pub residual: f64,
    /// Best relative residual after local refinement, if any candidate was evaluated.
    pub refined_residual: Option<f64>,
    pub epsilon: f64,
    /// Acceptance tolerance, `max(ε, floor)`.
    pub tolerance: f64,
    pub area_low: Area,
    pub area_high: Area,
    pub choking: ChokingRatio,
}

use uom::si::f64::{Length, Time};

use super::{Diagnostics, SolveError, Verdict};

/// The quantity a solve produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solved {
    Diameter(Length),
    Time(Time),
}

/// A forward-simulated sample across the final search bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub diameter: Length,
    pub time: Time,
}

/// Non-fatal conditions noticed while solving.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The capillary pressure ratio has no usable logarithm.
    CapillaryInapplicable,

    /// The capillary candidate is outside the laminar, long-tube regime.
    CapillaryInvalid { reynolds: f64, length_ratio: f64 },

    /// The capillary candidate is short and turbulent and was not considered.
    CapillaryForcedOut { reynolds: f64, length_ratio: f64 },

    /// The orifice inversion failed; a valid capillary result was returned instead.
    OrificeFailed(SolveError),

    /// The orifice diameter exceeds the vessel's physical ceiling.
    OrificeAboveCeiling { diameter: Length, ceiling: Length },

    /// Neither candidate is valid; the orifice value was returned.
    NeitherValid,

    /// The orifice is long for its diameter, so the thin-plate model is approximate.
    LongOrifice { length_ratio: f64 },
}

/// A validated solution.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub value: Solved,
    pub verdict: Verdict,
    pub diagnostics: Diagnostics,
    pub warnings: Vec<Warning>,
    /// Diameter/time samples across the search bracket, when a search ran.
    pub trace: Option<Vec<TracePoint>>,
}

impl SolveResult {
    /// Returns the solved diameter, if this was a diameter-from-time solve.
    #[must_use]
    pub fn diameter(&self) -> Option<Length> {
        match self.value {
            Solved::Diameter(diameter) => Some(diameter),
            Solved::Time(_) => None,
        }
    }

    /// Returns the solved time, if this was a time-from-diameter solve.
    #[must_use]
    pub fn time(&self) -> Option<Time> {
        match self.value {
            Solved::Time(time) => Some(time),
            Solved::Diameter(_) => None,
        }
    }
}

//! Orifice and capillary sizing for rigid-vessel blowdown and filling.
//!
//! Given a target transfer time, the capillary closed form gives one diameter
//! and the orifice model is inverted numerically for another. Each candidate
//! is gated against its regime of validity, and the better valid one is
//! returned together with diagnostics for both. Given a diameter instead,
//! both forward times are evaluated and gated the same way.

mod cache;
mod capillary;
mod config;
mod diagnostics;
mod error;
mod event;
mod input;
mod inversion;
mod orifice;
mod results;
mod selection;
mod solve;

#[cfg(test)]
mod test_support;

pub use cache::{AreaBracket, BracketCache, CacheEntry, CacheKey, MemoryCache, NoCache};
pub use config::{CapillaryGates, SolverConfig};
pub use diagnostics::{CapillaryDiagnostics, Diagnostics, OrificeDiagnostics};
pub use error::{
    Bound, BracketingError, BracketingKind, ChokingKind, ChokingRatio, ConvergenceError,
    ConvergenceKind, InputError, InputField, IntegralError, PressureError, ResidualError,
    SolveError,
};
pub use event::{EventSink, SolveEvent};
pub use input::{Given, Process, ProcessInputs, SolveDirection, parse_target_time};
pub use orifice::OrificeTime;
pub use results::{SolveResult, Solved, TracePoint, Warning};
pub use selection::{Candidate, Verdict};
pub use solve::{
    capillary_diameter, capillary_time, orifice_time, physical_ceiling, solve, solve_with,
};

pub(crate) use input::{Conditions, Pressures, Request, positive, relative_residual};

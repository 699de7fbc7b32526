use uom::si::f64::{Area, Time};

use super::{AreaBracket, Bound, Candidate, ConvergenceKind, Solved, Verdict};

/// Structured diagnostic events emitted while solving.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveEvent {
    /// A cached bracket was found and will be tried first.
    CacheHit { bracket: AreaBracket },

    /// A cached bracket did not hold the target and was dropped.
    CacheDiscarded { bracket: AreaBracket },

    /// Times at the bracket ends were out of order and the ends were swapped.
    BracketSwapped { area_low: Area, area_high: Area },

    /// The bracket was widened by a decade at each end.
    BracketExpanded {
        expansions: usize,
        area_low: Area,
        area_high: Area,
    },

    /// A bracket holding the target was established.
    Bracketed {
        area_low: Area,
        area_high: Area,
        time_low: Time,
        time_high: Time,
        expansions: usize,
    },

    /// One root search iteration; `residual` is `t(A) − target`.
    RootIteration {
        iter: usize,
        area: Area,
        residual: Time,
    },

    /// The root search failed and bisection is retrying it.
    FallbackUsed { kind: ConvergenceKind },

    /// A root on a bracket end failed its residual check.
    BoundaryRejected {
        bound: Bound,
        area: Area,
        residual: f64,
    },

    /// A local perturbation was evaluated after a failed residual check.
    RefinementTried {
        factor: f64,
        area: Area,
        residual: f64,
    },

    /// A candidate passed or failed its validity gates.
    CandidateGated { candidate: Candidate, valid: bool },

    /// A solution was accepted.
    Accepted { verdict: Verdict, value: Solved },
}

/// Receives [`SolveEvent`]s.
///
/// Closures implement `EventSink`, and `()` is a sink that ignores everything.
pub trait EventSink {
    fn emit(&mut self, event: &SolveEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&SolveEvent),
{
    fn emit(&mut self, event: &SolveEvent) {
        self(event);
    }
}

impl EventSink for () {
    fn emit(&mut self, _event: &SolveEvent) {}
}

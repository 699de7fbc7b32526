/// How the solver chose the step for an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Interval halving.
    Bisection,
    /// Linear interpolation through the two most recent points.
    Secant,
    /// Inverse quadratic interpolation through three points.
    InverseQuadratic,
}

/// Iteration event emitted by the Brent solver after each evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Iteration counter (1-based).
    pub iter: usize,
    /// Bracket containing the root after this iteration, ordered low to high.
    pub bracket: [f64; 2],
    /// The newly evaluated point.
    pub x: f64,
    /// Residual at `x`.
    pub residual: f64,
    pub step: Step,
}

/// Control actions supported by the Brent solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the best point found so far.
    StopEarly,
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged,
    MaxIters,
    StoppedByObserver,
}

/// The result of a Brent solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub status: Status,
    /// Best estimate of the root.
    pub x: f64,
    /// Residual at `x`.
    pub residual: f64,
    /// Final bracket, ordered low to high.
    pub bracket: [f64; 2],
    pub iters: usize,
}

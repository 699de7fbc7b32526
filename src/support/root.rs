//! Root finding for scalar equations.
//!
//! # Solvers
//!
//! - [`brent`]: Brent's method: guaranteed convergence on a bracketed
//!   interval, with superlinear steps when the function is well behaved.

pub mod brent;

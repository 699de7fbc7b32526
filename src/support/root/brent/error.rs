use thiserror::Error;

/// Errors that can occur during Brent solving.
///
/// `E` is the error type of the function being solved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error<E> {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("non-finite bracket endpoint: {value}")]
    NonFiniteBracket { value: f64 },

    #[error("zero-width bracket at {value}")]
    ZeroWidthBracket { value: f64 },

    #[error("no sign change: f({left})={left_residual}, f({right})={right_residual}")]
    NoSignChange {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
    },

    #[error("non-finite residual at x={x}: {residual}")]
    NonFiniteResidual { x: f64, residual: f64 },

    /// An update left both bracket endpoints with the same residual sign.
    #[error("bracket lost at iteration {iter}: [{left}, {right}]")]
    BracketLost { left: f64, right: f64, iter: usize },

    #[error("function evaluation failed")]
    Function(#[source] E),
}

use super::{CapillaryDiagnostics, OrificeDiagnostics};

/// Which model(s) produced an acceptable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Only the capillary closed form is valid.
    Capillary,
    /// Only the orifice model is valid.
    Orifice,
    /// Both are valid; the one with the lower residual was returned.
    Both,
    /// Neither is valid; the orifice value was returned with a warning.
    Inconclusive,
}

/// A candidate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Capillary,
    Orifice,
}

/// Picks the verdict and the candidate whose value is returned.
///
/// Both valid: the lower residual wins and ties go to the capillary closed
/// form. Neither valid: the orifice value is returned as inconclusive.
pub(crate) fn select(
    capillary: Option<&CapillaryDiagnostics>,
    orifice: &OrificeDiagnostics,
) -> (Verdict, Candidate) {
    match capillary {
        Some(c) if c.valid && orifice.valid => {
            let pick = if c.residual <= orifice.residual {
                Candidate::Capillary
            } else {
                Candidate::Orifice
            };
            (Verdict::Both, pick)
        }
        Some(c) if c.valid => (Verdict::Capillary, Candidate::Capillary),
        _ if orifice.valid => (Verdict::Orifice, Candidate::Orifice),
        _ => (Verdict::Inconclusive, Candidate::Orifice),
    }
}

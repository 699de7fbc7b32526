use uom::si::{
    f64::{Length, Time},
    length::meter,
    time::second,
};

use crate::{
    models::flow::vessel::core::{InputError, InputField},
    support::constraint::{Constraint, StrictlyPositive},
};

/// The quantity held fixed; the other one is solved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Given {
    /// Find the diameter that completes the transfer in this time.
    TargetTime(Time),

    /// Find the transfer time through a restriction of this diameter.
    Diameter(Length),
}

/// Which way a solve runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveDirection {
    DiameterFromTime,
    TimeFromDiameter,
}

impl Given {
    /// Returns the solve direction implied by the given quantity.
    #[must_use]
    pub fn direction(&self) -> SolveDirection {
        match self {
            Self::TargetTime(_) => SolveDirection::DiameterFromTime,
            Self::Diameter(_) => SolveDirection::TimeFromDiameter,
        }
    }

    /// Checks the given value is finite and positive, in SI units.
    pub(crate) fn validate(&self) -> Result<Request, InputError> {
        match *self {
            Self::TargetTime(time) => {
                positive(InputField::TargetTime, time.get::<second>()).map(Request::TargetTime)
            }
            Self::Diameter(diameter) => {
                positive(InputField::Diameter, diameter.get::<meter>()).map(Request::Diameter)
            }
        }
    }
}

/// A validated request in SI scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Request {
    TargetTime(f64),
    Diameter(f64),
}

/// Parses a target time in seconds from raw text.
///
/// Blank or non-numeric text reads as `NaN` and is rejected like any other
/// non-finite or non-positive value.
///
/// ```
/// use twine_gas_transfer::models::flow::vessel::parse_target_time;
/// use uom::si::time::second;
///
/// assert_eq!(parse_target_time(" 175 ").unwrap().get::<second>(), 175.0);
///
/// let err = parse_target_time("").unwrap_err();
/// assert!(err.parsed.is_nan());
/// ```
///
/// # Errors
///
/// Returns an [`InputError`] carrying the raw text and the parsed value.
pub fn parse_target_time(raw: &str) -> Result<Time, InputError> {
    let parsed = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
    if parsed.is_finite() && parsed > 0.0 {
        Ok(Time::new::<second>(parsed))
    } else {
        Err(InputError {
            field: InputField::TargetTime,
            raw: raw.to_owned(),
            parsed,
        })
    }
}

/// Accepts a finite, strictly positive value.
pub(crate) fn positive(field: InputField, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && StrictlyPositive::check(&value).is_ok() {
        Ok(value)
    } else {
        Err(InputError::numeric(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn direction_follows_given() {
        let time = Given::TargetTime(Time::new::<second>(175.0));
        let diameter = Given::Diameter(Length::new::<meter>(1e-5));
        assert_eq!(time.direction(), SolveDirection::DiameterFromTime);
        assert_eq!(diameter.direction(), SolveDirection::TimeFromDiameter);
    }

    #[test]
    fn zero_target_time_is_rejected() {
        let err = Given::TargetTime(Time::new::<second>(0.0))
            .validate()
            .unwrap_err();
        assert_eq!(err.field, InputField::TargetTime);
        assert_relative_eq!(err.parsed, 0.0);
        assert_eq!(err.raw, "0");
    }

    #[test]
    fn non_finite_diameter_is_rejected() {
        let err = Given::Diameter(Length::new::<meter>(f64::INFINITY))
            .validate()
            .unwrap_err();
        assert_eq!(err.field, InputField::Diameter);
        assert!(err.parsed.is_infinite());
    }

    #[test]
    fn parse_rejects_blank_and_garbage() {
        for raw in ["", "   ", "abc", "-3", "0", "inf", "NaN"] {
            let err = parse_target_time(raw).unwrap_err();
            assert_eq!(err.raw, raw);
            assert!(!(err.parsed > 0.0 && err.parsed.is_finite()), "{raw}");
        }
        assert!(parse_target_time("").unwrap_err().parsed.is_nan());
    }

    #[test]
    fn parse_accepts_scientific_notation() {
        let t = parse_target_time("1.75e2").unwrap();
        assert_relative_eq!(t.get::<second>(), 175.0);
    }
}

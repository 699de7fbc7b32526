use uom::si::{area::square_meter, f64::Area};

use crate::models::flow::vessel::core::{EventSink, SolveError, SolveEvent};

use super::{Forward, Point};

/// Result of forward verification at a candidate area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outcome {
    Accepted(Point),
    Rejected {
        original: Point,
        refined: Option<Point>,
    },
}

/// Forward-verifies `area`, trying local perturbations if it misses.
///
/// Each step `s` is tried as `A·(1 − s)` and `A·(1 + s)`, never above
/// `ceiling`. The perturbation with the lowest residual is kept if it both
/// improves on the original and meets `tolerance`.
pub(crate) fn verify(
    forward: &Forward<'_>,
    area: f64,
    target: f64,
    tolerance: f64,
    ceiling: f64,
    steps: &[f64],
    sink: &mut impl EventSink,
) -> Result<Outcome, SolveError> {
    let original = forward.point(area, target)?;
    if original.residual <= tolerance {
        return Ok(Outcome::Accepted(original));
    }

    let mut best: Option<Point> = None;
    for step in steps {
        for factor in [1.0 - step, 1.0 + step] {
            let point = forward.point((area * factor).min(ceiling), target)?;
            sink.emit(&SolveEvent::RefinementTried {
                factor,
                area: Area::new::<square_meter>(point.area),
                residual: point.residual,
            });
            if best.is_none_or(|b| point.residual < b.residual) {
                best = Some(point);
            }
        }
    }

    match best {
        Some(point) if point.residual < original.residual && point.residual <= tolerance => {
            Ok(Outcome::Accepted(point))
        }
        refined => Ok(Outcome::Rejected { original, refined }),
    }
}

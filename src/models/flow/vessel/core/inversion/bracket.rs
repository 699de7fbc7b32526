use std::mem;

use uom::si::{
    area::square_meter,
    f64::{Area, Time},
    time::second,
};

use crate::models::flow::vessel::core::{
    BracketingError, BracketingKind, EventSink, SolveError, SolveEvent,
};

use super::Forward;

/// An area bracket and the transfer times at its ends.
///
/// While searching, `time_low ≥ target ≥ time_high`. Time falls as area grows,
/// so `area_low < area_high` unless the ends had to be swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bracket {
    pub(crate) area_low: f64,
    pub(crate) area_high: f64,
    pub(crate) time_low: f64,
    pub(crate) time_high: f64,
    pub(crate) expansions: usize,
}

impl Bracket {
    pub(crate) fn error(&self, kind: BracketingKind, target: f64) -> SolveError {
        BracketingError {
            kind,
            area_low: Area::new::<square_meter>(self.area_low),
            area_high: Area::new::<square_meter>(self.area_high),
            time_low: Time::new::<second>(self.time_low),
            time_high: Time::new::<second>(self.time_high),
            target: Time::new::<second>(target),
            expansions: self.expansions,
        }
        .into()
    }

    /// Area ends in ascending order.
    pub(crate) fn ordered(&self) -> [f64; 2] {
        [
            self.area_low.min(self.area_high),
            self.area_low.max(self.area_high),
        ]
    }
}

/// Builds a bracket holding `target`, widening it a decade per side at most
/// `max_expansions` times. The upper area never exceeds `ceiling`.
pub(crate) fn establish(
    forward: &Forward<'_>,
    start: [f64; 2],
    ceiling: f64,
    max_expansions: usize,
    target: f64,
    sink: &mut impl EventSink,
) -> Result<Bracket, SolveError> {
    let [mut area_low, mut area_high] = start;
    let mut expansions = 0;

    loop {
        area_high = area_high.min(ceiling);

        let mut bracket = Bracket {
            area_low,
            area_high,
            time_low: forward.time(area_low)?,
            time_high: forward.time(area_high)?,
            expansions,
        };

        if !bracket.time_low.is_finite() || !bracket.time_high.is_finite() {
            return Err(bracket.error(BracketingKind::NonFiniteEndpoints, target));
        }

        if bracket.time_low < bracket.time_high {
            mem::swap(&mut bracket.area_low, &mut bracket.area_high);
            mem::swap(&mut bracket.time_low, &mut bracket.time_high);
            sink.emit(&SolveEvent::BracketSwapped {
                area_low: Area::new::<square_meter>(bracket.area_low),
                area_high: Area::new::<square_meter>(bracket.area_high),
            });
        }

        if bracket.time_high <= target && target <= bracket.time_low {
            sink.emit(&SolveEvent::Bracketed {
                area_low: Area::new::<square_meter>(bracket.area_low),
                area_high: Area::new::<square_meter>(bracket.area_high),
                time_low: Time::new::<second>(bracket.time_low),
                time_high: Time::new::<second>(bracket.time_high),
                expansions,
            });
            return Ok(bracket);
        }

        if expansions >= max_expansions {
            return Err(bracket.error(BracketingKind::NotBracketed, target));
        }

        let [low, high] = bracket.ordered();
        area_low = low / 10.0;
        area_high = (high * 10.0).min(ceiling);
        expansions += 1;

        sink.emit(&SolveEvent::BracketExpanded {
            expansions,
            area_low: Area::new::<square_meter>(area_low),
            area_high: Area::new::<square_meter>(area_high),
        });
    }
}

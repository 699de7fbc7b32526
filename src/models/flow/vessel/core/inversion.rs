//! Diameter-from-time inversion of the orifice model.
//!
//! The search runs in stages:
//!
//! 1. Seed a bracket from the cache hint, or the configured default.
//! 2. Normalize and widen the bracket until it holds the target.
//! 3. Find `t(A) = target` with Brent's method on `ln A`, retrying with
//!    bisection when configured.
//! 4. Reject a root sitting on a bracket end unless it meets the tolerance.
//! 5. Forward-verify the root, refining it locally if it misses.
//!
//! Every stage evaluates time through the same [`Forward`] function.

mod bracket;
mod fallback;
mod refine;

pub(crate) use bracket::Bracket;

use std::f64::consts::PI;

use uom::si::{
    area::square_meter,
    f64::{Area, Length, Time},
    length::meter,
    time::second,
};

use crate::support::{gas::flow, quadrature, root::brent};

use super::{
    AreaBracket, BracketCache, BracketingKind, Bound, CacheKey, Conditions, ConvergenceError,
    ConvergenceKind, EventSink, InputError, InputField, ResidualError, SolveError, SolveEvent,
    SolverConfig, TracePoint, orifice, relative_residual,
};

use refine::Outcome;

/// Forward transfer time `t(A)` of the orifice model.
pub(crate) struct Forward<'a> {
    conditions: &'a Conditions,
    quadrature: &'a quadrature::Config,
}

/// A forward-evaluated area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub(crate) area: f64,
    pub(crate) time: f64,
    pub(crate) residual: f64,
}

impl<'a> Forward<'a> {
    pub(crate) fn new(conditions: &'a Conditions, quadrature: &'a quadrature::Config) -> Self {
        Self {
            conditions,
            quadrature,
        }
    }

    /// Transfer time in seconds through area `area` (m²).
    pub(crate) fn time(&self, area: f64) -> Result<f64, SolveError> {
        Ok(orifice::time(self.conditions, area, self.quadrature)?.total())
    }

    pub(crate) fn point(&self, area: f64, target: f64) -> Result<Point, SolveError> {
        let time = self.time(area)?;
        Ok(Point {
            area,
            time,
            residual: relative_residual(time, target),
        })
    }
}

/// A verified orifice area for a target time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Inverted {
    pub(crate) point: Point,
    pub(crate) bracket: Bracket,
    pub(crate) trace: Vec<TracePoint>,
}

/// Largest allowed diameter: `factor·(6V/π)^(1/3)`.
pub(crate) fn ceiling_diameter(volume: f64, factor: f64) -> f64 {
    factor * (6.0 * volume / PI).cbrt()
}

/// Finds the orifice area whose forward time matches `target` seconds.
pub(crate) fn invert(
    conditions: &Conditions,
    target: f64,
    config: &SolverConfig,
    cache: &mut impl BracketCache,
    sink: &mut impl EventSink,
) -> Result<Inverted, SolveError> {
    let forward = Forward::new(conditions, &config.quadrature);
    let ceiling = flow::circle_area(ceiling_diameter(conditions.volume, config.ceiling_factor));
    let tolerance = conditions.tolerance(config.residual_floor);
    let key = CacheKey::new(conditions.process(), conditions.gas.clone());

    let bracket = seed(&forward, &key, target, ceiling, config, &*cache, sink)?;
    let area = search(&forward, &bracket, target, config, sink)?;
    check_boundary(&forward, area, &bracket, target, tolerance, config, sink)?;

    let point = match refine::verify(
        &forward,
        area,
        target,
        tolerance,
        ceiling,
        &config.refinement_steps,
        sink,
    )? {
        Outcome::Accepted(point) => point,
        Outcome::Rejected { original, refined } => {
            let [low, high] = bracket.ordered();
            return Err(ResidualError {
                target: Time::new::<second>(target),
                forward_time: Time::new::<second>(original.time),
                residual: original.residual,
                refined_residual: refined.map(|p| p.residual),
                epsilon: conditions.epsilon,
                tolerance,
                area_low: Area::new::<square_meter>(low),
                area_high: Area::new::<square_meter>(high),
                choking: conditions.choking_ratio(),
            }
            .into());
        }
    };

    let trace = trace(&forward, &bracket, config.trace_points)?;

    let [low, high] = bracket.ordered();
    cache.put(
        key,
        AreaBracket {
            low: Area::new::<square_meter>(low),
            high: Area::new::<square_meter>(high),
        },
    );

    Ok(Inverted {
        point,
        bracket,
        trace,
    })
}

/// Tries the cached bracket once, then falls back to the default bracket.
fn seed(
    forward: &Forward<'_>,
    key: &CacheKey,
    target: f64,
    ceiling: f64,
    config: &SolverConfig,
    cache: &impl BracketCache,
    sink: &mut impl EventSink,
) -> Result<Bracket, SolveError> {
    if let Some(hint) = cache.get(key) {
        sink.emit(&SolveEvent::CacheHit { bracket: hint });

        let low = hint.low.get::<square_meter>();
        let high = hint.high.get::<square_meter>().min(ceiling);
        if low.is_finite() && high.is_finite() && low > 0.0 && low < high {
            match bracket::establish(forward, [low, high], ceiling, 0, target, sink) {
                Ok(bracket) => return Ok(bracket),
                Err(SolveError::Bracketing(_)) => {}
                Err(err) => return Err(err),
            }
        }

        sink.emit(&SolveEvent::CacheDiscarded { bracket: hint });
    }

    bracket::establish(
        forward,
        config.area_bracket,
        ceiling,
        config.max_expansions,
        target,
        sink,
    )
}

/// Runs Brent's method on `ln A`, with the bisection retry if enabled.
fn search(
    forward: &Forward<'_>,
    bracket: &Bracket,
    target: f64,
    config: &SolverConfig,
    sink: &mut impl EventSink,
) -> Result<f64, SolveError> {
    let result = brent_search(forward, bracket, target, config, sink);

    match result {
        Err(SolveError::Convergence(err)) if config.bisection_fallback => {
            sink.emit(&SolveEvent::FallbackUsed { kind: err.kind });
            fallback::solve(forward, bracket, target, config).ok_or(SolveError::Convergence(err))
        }
        other => other,
    }
}

fn brent_search(
    forward: &Forward<'_>,
    bracket: &Bracket,
    target: f64,
    config: &SolverConfig,
    sink: &mut impl EventSink,
) -> Result<f64, SolveError> {
    let observer = |event: &brent::Event| -> Option<brent::Action> {
        sink.emit(&SolveEvent::RootIteration {
            iter: event.iter,
            area: Area::new::<square_meter>(event.x.exp()),
            residual: Time::new::<second>(event.residual),
        });
        None
    };

    let convergence = |kind, iters| -> SolveError {
        let [low, high] = bracket.ordered();
        ConvergenceError {
            kind,
            area_low: Area::new::<square_meter>(low),
            area_high: Area::new::<square_meter>(high),
            iters,
            target: Time::new::<second>(target),
        }
        .into()
    };

    let solution = brent::solve(
        |u: f64| forward.time(u.exp()).map(|time| time - target),
        [bracket.area_low.ln(), bracket.area_high.ln()],
        &config.brent,
        observer,
    )
    .map_err(|err| match err {
        brent::Error::Function(err) => err,
        brent::Error::BracketLost { iter, .. } => convergence(ConvergenceKind::BracketLost, iter),
        brent::Error::NonFiniteResidual { .. } => {
            bracket.error(BracketingKind::NonFiniteEndpoints, target)
        }
        brent::Error::NonFiniteBracket { .. }
        | brent::Error::ZeroWidthBracket { .. }
        | brent::Error::NoSignChange { .. } => bracket.error(BracketingKind::NotBracketed, target),
        brent::Error::InvalidConfig { reason } => InputError {
            field: InputField::SolverConfig,
            raw: reason.to_owned(),
            parsed: f64::NAN,
        }
        .into(),
    })?;

    match solution.status {
        brent::Status::Converged => Ok(solution.x.exp()),
        brent::Status::MaxIters | brent::Status::StoppedByObserver => {
            Err(convergence(ConvergenceKind::MaxIters, solution.iters))
        }
    }
}

/// Rejects a root on a bracket end whose residual misses the tolerance.
fn check_boundary(
    forward: &Forward<'_>,
    area: f64,
    bracket: &Bracket,
    target: f64,
    tolerance: f64,
    config: &SolverConfig,
    sink: &mut impl EventSink,
) -> Result<(), SolveError> {
    for (bound, edge) in [
        (Bound::Lower, bracket.area_low),
        (Bound::Upper, bracket.area_high),
    ] {
        let distance = (area - edge).abs();
        if distance > config.boundary_abs_tol || distance > config.boundary_rel_tol * edge {
            continue;
        }

        let residual = forward.point(area, target)?.residual;
        if residual > tolerance {
            sink.emit(&SolveEvent::BoundaryRejected {
                bound,
                area: Area::new::<square_meter>(area),
                residual,
            });
            return Err(bracket.error(BracketingKind::HitBound { bound }, target));
        }
    }
    Ok(())
}

/// Samples `points` log-spaced areas across the bracket, smallest diameter first.
fn trace(
    forward: &Forward<'_>,
    bracket: &Bracket,
    points: usize,
) -> Result<Vec<TracePoint>, SolveError> {
    let [low, high] = bracket.ordered();
    let (ln_low, ln_high) = (low.ln(), high.ln());

    (0..points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let fraction = if points > 1 {
                i as f64 / (points - 1) as f64
            } else {
                0.5
            };
            let area = (ln_low + fraction * (ln_high - ln_low)).exp();
            Ok(TracePoint {
                diameter: Length::new::<meter>(flow::circle_diameter(area)),
                time: Time::new::<second>(forward.time(area)?),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::flow::vessel::core::{
        ChokingKind, MemoryCache, NoCache, Process,
        test_support::{conditions, reference_blowdown},
    };

    fn reference_area() -> f64 {
        flow::circle_area(9.314e-6)
    }

    #[test]
    fn ceiling_for_small_vessels() {
        assert_relative_eq!(ceiling_diameter(2e-7, 2.0), 0.014_511, max_relative = 1e-4);
        assert_relative_eq!(ceiling_diameter(2e-6, 2.0), 0.031_263_7, max_relative = 1e-5);
    }

    #[test]
    fn inverts_reference_blowdown() {
        let conditions = conditions(&reference_blowdown());
        let config = SolverConfig::default();

        let inverted = invert(&conditions, 175.0, &config, &mut NoCache, &mut ()).unwrap();

        assert_relative_eq!(inverted.point.area, reference_area(), max_relative = 1e-3);
        assert!(inverted.point.residual < 1e-4);
        assert_eq!(inverted.trace.len(), 5);
        assert!(
            inverted
                .trace
                .windows(2)
                .all(|w| w[0].diameter < w[1].diameter && w[0].time > w[1].time)
        );
    }

    #[test]
    fn iterations_are_reported() {
        let conditions = conditions(&reference_blowdown());
        let mut iterations = 0;
        let mut sink = |event: &SolveEvent| {
            if matches!(event, SolveEvent::RootIteration { .. }) {
                iterations += 1;
            }
        };

        invert(&conditions, 175.0, &SolverConfig::default(), &mut NoCache, &mut sink).unwrap();

        assert!(iterations > 0 && iterations < 200);
    }

    #[test]
    fn cache_hint_is_used_and_refreshed() {
        let conditions = conditions(&reference_blowdown());
        let config = SolverConfig::default();
        let mut cache = MemoryCache::new();

        invert(&conditions, 175.0, &config, &mut cache, &mut ()).unwrap();
        let key = CacheKey::new(Process::Blowdown, "air");
        assert!(cache.get(&key).is_some());

        let mut hits = 0;
        let mut sink = |event: &SolveEvent| {
            if matches!(event, SolveEvent::CacheHit { .. }) {
                hits += 1;
            }
            assert!(!matches!(event, SolveEvent::CacheDiscarded { .. }));
        };
        let again = invert(&conditions, 175.0, &config, &mut cache, &mut sink).unwrap();

        assert_eq!(hits, 1);
        assert_relative_eq!(again.point.area, reference_area(), max_relative = 1e-3);
    }

    #[test]
    fn unusable_hint_falls_back_to_default_bracket() {
        let conditions = conditions(&reference_blowdown());
        let config = SolverConfig::default();
        let mut cache = MemoryCache::new();
        cache.put(
            CacheKey::new(Process::Blowdown, "air"),
            AreaBracket {
                low: Area::new::<square_meter>(1e-6),
                high: Area::new::<square_meter>(1e-5),
            },
        );

        let mut discarded = false;
        let mut sink = |event: &SolveEvent| {
            discarded |= matches!(event, SolveEvent::CacheDiscarded { .. });
        };
        let inverted = invert(&conditions, 175.0, &config, &mut cache, &mut sink).unwrap();

        assert!(discarded);
        assert_relative_eq!(inverted.point.area, reference_area(), max_relative = 1e-3);
    }

    #[test]
    fn unreachable_target_is_a_bracketing_error() {
        let conditions = conditions(&reference_blowdown());
        let err = invert(&conditions, 1e10, &SolverConfig::default(), &mut NoCache, &mut ())
            .unwrap_err();
        assert!(matches!(
            err,
            SolveError::Bracketing(ref e) if e.kind == BracketingKind::NotBracketed && e.expansions == 4
        ));
    }

    #[test]
    fn iteration_cap_is_a_convergence_error() {
        let conditions = conditions(&reference_blowdown());
        let mut config = SolverConfig::default();
        config.brent.max_iters = 1;

        let err = invert(&conditions, 175.0, &config, &mut NoCache, &mut ()).unwrap_err();

        let SolveError::Convergence(err) = err else {
            panic!("expected convergence error, got {err:?}");
        };
        assert_eq!(err.kind, ConvergenceKind::MaxIters);
        assert_eq!(err.iters, 1);
    }

    #[test]
    fn retry_recovers_with_bisection() {
        let conditions = conditions(&reference_blowdown());
        let mut config = SolverConfig::retry();
        config.brent.max_iters = 1;

        let mut fallback_used = false;
        let mut sink = |event: &SolveEvent| {
            fallback_used |= matches!(event, SolveEvent::FallbackUsed { .. });
        };
        let inverted = invert(&conditions, 175.0, &config, &mut NoCache, &mut sink).unwrap();

        assert!(fallback_used);
        assert_relative_eq!(inverted.point.area, reference_area(), max_relative = 1e-3);
    }

    #[test]
    fn failed_fallback_keeps_the_brent_error() {
        let conditions = conditions(&reference_blowdown());
        let mut config = SolverConfig::retry();
        config.brent.max_iters = 1;
        config.fallback_max_iters = 1;

        let err = invert(&conditions, 175.0, &config, &mut NoCache, &mut ()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Convergence(ref e) if e.kind == ConvergenceKind::MaxIters
        ));
    }

    #[test]
    fn coarse_root_fails_forward_verification() {
        let conditions = conditions(&reference_blowdown());
        let mut config = SolverConfig::default();
        config.brent.x_abs_tol = 3.0;

        let err = invert(&conditions, 175.0, &config, &mut NoCache, &mut ()).unwrap_err();

        let SolveError::Residual(err) = err else {
            panic!("expected residual error, got {err:?}");
        };
        assert_eq!(err.target.get::<second>(), 175.0);
        assert_relative_eq!(err.forward_time.get::<second>(), 152.996, max_relative = 1e-3);
        assert_relative_eq!(
            err.residual,
            relative_residual(err.forward_time.get::<second>(), 175.0)
        );
        assert!(err.residual > err.tolerance);

        // Refinement gets closer but still misses.
        let refined = err.refined_residual.unwrap();
        assert!(refined < err.residual && refined > err.tolerance);

        assert_eq!(err.epsilon, 0.01);
        assert_eq!(err.tolerance, 0.01);
        assert!(err.area_low < err.area_high);
        assert_eq!(err.choking.kind, ChokingKind::DownstreamOverUpstream);
        assert_relative_eq!(err.choking.value, 1e3 / 1.2e6);
        assert!(err.choking.choked);
    }

    #[test]
    fn root_on_bound_is_rejected_when_residual_misses() {
        let conditions = conditions(&reference_blowdown());
        let config = SolverConfig::default();
        let forward = Forward::new(&conditions, &config.quadrature);
        let bracket = Bracket {
            area_low: 1e-12,
            area_high: 1e-10,
            time_low: forward.time(1e-12).unwrap(),
            time_high: forward.time(1e-10).unwrap(),
            expansions: 0,
        };

        let err = check_boundary(&forward, 1e-10, &bracket, 175.0, 0.01, &config, &mut ())
            .unwrap_err();
        assert!(matches!(
            err,
            SolveError::Bracketing(ref e)
                if e.kind == BracketingKind::HitBound { bound: Bound::Upper }
        ));

        // Interior roots are not checked.
        assert!(check_boundary(&forward, 5e-11, &bracket, 175.0, 0.01, &config, &mut ()).is_ok());
    }
}

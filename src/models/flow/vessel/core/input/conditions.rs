use crate::{
    models::flow::vessel::core::{ChokingKind, ChokingRatio, Process},
    support::gas::flow,
};

/// Smallest stopping margin `Pf/P2 − 1`; keeps the integral away from its singularity.
pub(crate) const MIN_MARGIN: f64 = 1e-6;

/// Largest stopping margin.
pub(crate) const MAX_MARGIN: f64 = 0.1;

/// Vessel and supply pressures in Pa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Pressures {
    /// Vessel at `p1` vents to `p2`.
    Blowdown { p1: f64, p2: f64 },
    /// Vessel at `p1` fills to `p2` from a supply at `ps`.
    Filling { p1: f64, p2: f64, ps: f64 },
}

/// Validated process conditions as plain SI scalars.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Conditions {
    pub(crate) pressures: Pressures,
    pub(crate) volume: f64,
    pub(crate) temperature: f64,
    pub(crate) length: f64,
    pub(crate) cd: f64,
    pub(crate) epsilon: f64,
    pub(crate) gamma: f64,
    pub(crate) r: f64,
    pub(crate) mu: f64,
    pub(crate) gas: String,
}

impl Conditions {
    pub(crate) fn process(&self) -> Process {
        match self.pressures {
            Pressures::Blowdown { .. } => Process::Blowdown,
            Pressures::Filling { .. } => Process::Filling,
        }
    }

    /// Initial vessel pressure.
    pub(crate) fn p1(&self) -> f64 {
        match self.pressures {
            Pressures::Blowdown { p1, .. } | Pressures::Filling { p1, .. } => p1,
        }
    }

    /// Stopping margin, `ε` clamped to `[MIN_MARGIN, MAX_MARGIN]`.
    pub(crate) fn margin(&self) -> f64 {
        margin(self.epsilon)
    }

    /// Pressure at which the transfer counts as complete.
    pub(crate) fn final_pressure(&self) -> f64 {
        final_pressure(self.pressures, self.epsilon)
    }

    pub(crate) fn rt(&self) -> f64 {
        self.r * self.temperature
    }

    /// Relative residual tolerance, `max(ε, floor)`.
    pub(crate) fn tolerance(&self, floor: f64) -> f64 {
        self.epsilon.max(floor)
    }

    /// Initial choking ratio: `P2/P1` for blowdown, `P1/Ps` for filling.
    pub(crate) fn choking_ratio(&self) -> ChokingRatio {
        let (kind, value) = match self.pressures {
            Pressures::Blowdown { p1, p2 } => (ChokingKind::DownstreamOverUpstream, p2 / p1),
            Pressures::Filling { p1, ps, .. } => (ChokingKind::VesselOverSupply, p1 / ps),
        };
        ChokingRatio {
            kind,
            value,
            critical: flow::critical_pressure_ratio(self.gamma),
            choked: flow::is_choked(self.gamma, value),
        }
    }

    /// Initial `(upstream, downstream)` pressures across the restriction.
    pub(crate) fn initial_drive(&self) -> (f64, f64) {
        match self.pressures {
            Pressures::Blowdown { p1, p2 } => (p1, p2),
            Pressures::Filling { p1, ps, .. } => (ps, p1),
        }
    }
}

pub(crate) fn margin(epsilon: f64) -> f64 {
    epsilon.clamp(MIN_MARGIN, MAX_MARGIN)
}

pub(crate) fn final_pressure(pressures: Pressures, epsilon: f64) -> f64 {
    match pressures {
        Pressures::Blowdown { p2, .. } => p2 * (1.0 + margin(epsilon)),
        Pressures::Filling { p2, .. } => p2 * (1.0 - margin(epsilon)),
    }
}

/// Relative residual `|t − target| / max(target, 1e-9)`.
pub(crate) fn relative_residual(time: f64, target: f64) -> f64 {
    (time - target).abs() / target.max(1e-9)
}

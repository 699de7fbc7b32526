//! Capillary closed form for laminar, isothermal flow in a long tube.
//!
//! Poiseuille flow of an ideal gas gives `ṁ ∝ D⁴ (P_up² − P_down²) / (μ·L·R·T)`,
//! and the pressure history integrates in closed form to
//! `t = 128·μ·L·V·ln(N/Dn) / (π·D⁴·P_ref)`. No search is needed in either
//! direction.

use std::f64::consts::PI;

use super::{Conditions, Pressures};

/// Returns `ln(N/Dn)`, or `None` if it is not finite and positive.
pub(crate) fn log_ratio(conditions: &Conditions) -> Option<f64> {
    let pf = conditions.final_pressure();
    let ratio = match conditions.pressures {
        Pressures::Blowdown { p1, p2 } => ((p1 - p2) * (pf + p2)) / ((p1 + p2) * (pf - p2)),
        Pressures::Filling { p1, ps, .. } => ((ps + pf) * (ps - p1)) / ((ps - pf) * (ps + p1)),
    };
    let log = ratio.ln();
    (log.is_finite() && log > 0.0).then_some(log)
}

/// Reference pressure: `P2` for blowdown, `Ps` for filling.
fn reference_pressure(conditions: &Conditions) -> f64 {
    match conditions.pressures {
        Pressures::Blowdown { p2, .. } => p2,
        Pressures::Filling { ps, .. } => ps,
    }
}

/// `128·μ·L·V·ln(N/Dn) / (π·P_ref)`, the product `t·D⁴`.
fn time_diameter4(conditions: &Conditions) -> Option<f64> {
    let log = log_ratio(conditions)?;
    let value = 128.0 * conditions.mu * conditions.length * conditions.volume * log
        / (PI * reference_pressure(conditions));
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Diameter (m) that completes the transfer in `time` seconds.
pub(crate) fn diameter(conditions: &Conditions, time: f64) -> Option<f64> {
    time_diameter4(conditions).map(|k| (k / time).powf(0.25))
}

/// Transfer time (s) through a capillary of diameter `diameter` m.
pub(crate) fn time(conditions: &Conditions, diameter: f64) -> Option<f64> {
    time_diameter4(conditions).map(|k| k / diameter.powi(4))
}

/// Initial laminar mass flow (kg/s), the largest over the transfer.
pub(crate) fn initial_mass_flow(conditions: &Conditions, diameter: f64) -> f64 {
    let (up, down) = conditions.initial_drive();
    PI * diameter.powi(4) * (up * up - down * down)
        / (256.0 * conditions.mu * conditions.length * conditions.rt())
}

//! Compressible flow relations for an ideal gas through a restriction.
//!
//! All functions take plain SI scalars. Pressures are absolute, `gamma` is the
//! heat capacity ratio, `r` the specific gas constant, and `t` the (stagnation)
//! temperature.

use std::f64::consts::PI;

/// Critical pressure ratio `(2/(γ+1))^(γ/(γ−1))`.
///
/// Flow through a restriction is choked while the downstream-to-upstream
/// pressure ratio is at or below this value. It is about 0.528 for air.
#[must_use]
pub fn critical_pressure_ratio(gamma: f64) -> f64 {
    (2.0 / (gamma + 1.0)).powf(gamma / (gamma - 1.0))
}

/// Sonic flow coefficient `C* = √(γ/(R·T)) · (2/(γ+1))^((γ+1)/(2(γ−1)))`.
///
/// Choked mass flux per unit upstream pressure: `ṁ = Cd·A·P0·C*`.
#[must_use]
pub fn sonic_coefficient(gamma: f64, r: f64, t: f64) -> f64 {
    (gamma / (r * t)).sqrt() * (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (2.0 * (gamma - 1.0)))
}

/// Subsonic flow coefficient `K = √(2γ/(R·T·(γ−1)))`.
///
/// Subsonic mass flux: `ṁ = Cd·A·P0·K·ψ(Pb/P0)`, see [`subsonic_flow_function`].
#[must_use]
pub fn subsonic_coefficient(gamma: f64, r: f64, t: f64) -> f64 {
    (2.0 * gamma / (r * t * (gamma - 1.0))).sqrt()
}

/// Subsonic flow function `ψ(x) = √(x^(2/γ) − x^((γ+1)/γ))` for `x = Pb/P0`.
///
/// Returns zero outside `(0, 1)`.
#[must_use]
pub fn subsonic_flow_function(gamma: f64, ratio: f64) -> f64 {
    if !(ratio > 0.0 && ratio < 1.0) {
        return 0.0;
    }
    let value = ratio.powf(2.0 / gamma) - ratio.powf((gamma + 1.0) / gamma);
    value.max(0.0).sqrt()
}

/// Returns true if flow at `ratio = Pb/P0` is choked.
#[must_use]
pub fn is_choked(gamma: f64, ratio: f64) -> bool {
    ratio <= critical_pressure_ratio(gamma)
}

/// Mass flow rate through a restriction of area `area` with upstream pressure
/// `p0` and back pressure `pb`, switching between choked and subsonic forms.
#[must_use]
pub fn mass_flow(cd: f64, area: f64, p0: f64, pb: f64, gamma: f64, r: f64, t: f64) -> f64 {
    let ratio = pb / p0;
    if is_choked(gamma, ratio) {
        cd * area * p0 * sonic_coefficient(gamma, r, t)
    } else {
        cd * area * p0 * subsonic_coefficient(gamma, r, t) * subsonic_flow_function(gamma, ratio)
    }
}

/// Throat Mach number for `ratio = Pb/P0`.
///
/// At or below the critical ratio the throat is sonic and the result is exactly
/// `1.0`; it is never derived from a velocity ratio. Above it the isentropic
/// relation `√(2/(γ−1)·(x^(−(γ−1)/γ) − 1))` applies.
#[must_use]
pub fn throat_mach(gamma: f64, ratio: f64) -> f64 {
    if is_choked(gamma, ratio) {
        return 1.0;
    }
    if ratio >= 1.0 {
        return 0.0;
    }
    let exponent = (gamma - 1.0) / gamma;
    let mach = (2.0 / (gamma - 1.0) * (ratio.powf(-exponent) - 1.0)).sqrt();
    mach.min(1.0)
}

/// Pipe Reynolds number from mass flow: `Re = 4·ṁ/(π·D·μ)`.
#[must_use]
pub fn reynolds_number(mass_flow: f64, diameter: f64, viscosity: f64) -> f64 {
    4.0 * mass_flow / (PI * diameter * viscosity)
}

/// Cross-sectional area of a circular hole of diameter `d`.
#[must_use]
pub fn circle_area(diameter: f64) -> f64 {
    0.25 * PI * diameter * diameter
}

/// Diameter of a circular hole of area `a`.
#[must_use]
pub fn circle_diameter(area: f64) -> f64 {
    (4.0 * area / PI).sqrt()
}

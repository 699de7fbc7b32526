//! Ideal gas equation of state helpers: `p = ρ·R·T`.
//!
//! The vessel models are isothermal, so the gas inventory `m = ρ·V` is linear
//! in pressure and every mass balance reduces to a pressure balance.

use uom::si::f64::{Mass, MassDensity, Pressure, ThermodynamicTemperature, Volume};

use crate::support::units::SpecificGasConstant;

/// Computes density using the ideal gas equation of state.
#[must_use]
pub fn density(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    gas_constant: SpecificGasConstant,
) -> MassDensity {
    pressure / (gas_constant * temperature)
}

/// Computes the gas mass held in a rigid volume.
#[must_use]
pub fn inventory(
    volume: Volume,
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    gas_constant: SpecificGasConstant,
) -> Mass {
    density(temperature, pressure, gas_constant) * volume
}

use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature, Time, Volume},
    length::meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    time::second,
    volume::cubic_meter,
};

use crate::support::gas::{Air, GasFluid};

use super::{Conditions, Given, ProcessInputs};

/// A 0.2 cm³ air vessel at 12 bar venting to 1 kPa through a 2 mm path in 175 s.
pub(super) fn reference_blowdown() -> ProcessInputs {
    ProcessInputs::blowdown(
        Given::TargetTime(Time::new::<second>(175.0)),
        Volume::new::<cubic_meter>(2e-7),
        Pressure::new::<pascal>(1.2e6),
        Pressure::new::<pascal>(1e3),
        ThermodynamicTemperature::new::<kelvin>(288.15),
        Length::new::<meter>(0.002),
        Air::properties(),
    )
}

/// A 1 cm³ air vessel filled from 1 bar to 5 bar off an 8 bar supply.
pub(super) fn filling_inputs() -> ProcessInputs {
    ProcessInputs::filling(
        Given::TargetTime(Time::new::<second>(30.0)),
        Volume::new::<cubic_meter>(1e-6),
        Pressure::new::<pascal>(1e5),
        Pressure::new::<pascal>(5e5),
        Pressure::new::<pascal>(8e5),
        ThermodynamicTemperature::new::<kelvin>(293.15),
        Length::new::<meter>(0.002),
        Air::properties(),
    )
}

pub(super) fn conditions(inputs: &ProcessInputs) -> Conditions {
    inputs.conditions().expect("test inputs are valid")
}

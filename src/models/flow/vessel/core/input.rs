mod conditions;
mod given;

pub use given::{Given, SolveDirection, parse_target_time};

pub(crate) use conditions::{Conditions, Pressures, relative_residual};
pub(crate) use given::{Request, positive};

use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature, Volume},
    length::meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::support::{
    constraint::{Constrained, UnitIntervalLowerOpen, UnitIntervalOpen},
    gas::GasProperties,
};

use super::{InputError, InputField, PressureError, SolveError};

/// Direction of gas transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Process {
    /// The vessel empties through the restriction into a lower back pressure.
    Blowdown,
    /// The vessel fills through the restriction from a higher supply pressure.
    Filling,
}

/// Inputs describing a vessel transfer.
///
/// Pressures are absolute. For blowdown, `upstream_pressure` is the initial
/// vessel pressure and `downstream_pressure` the back pressure it vents to.
/// For filling, `upstream_pressure` is the initial vessel pressure,
/// `downstream_pressure` the pressure to fill to, and `supply_pressure` the
/// source feeding the vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInputs {
    pub process: Process,
    pub given: Given,
    pub vessel_volume: Volume,
    pub upstream_pressure: Pressure,
    pub downstream_pressure: Pressure,
    pub supply_pressure: Option<Pressure>,
    pub temperature: ThermodynamicTemperature,
    pub flow_path_length: Length,
    pub gas: GasProperties,
    /// Discharge coefficient, `0 < Cd ≤ 1`.
    pub discharge_coefficient: f64,
    /// Convergence tolerance `ε`, `0 < ε < 1`.
    ///
    /// Sets both the stopping margin around the final pressure and the
    /// relative residual a solved diameter must meet.
    pub tolerance: f64,
}

impl ProcessInputs {
    pub const DEFAULT_DISCHARGE_COEFFICIENT: f64 = 0.62;
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    /// Creates blowdown inputs with default discharge coefficient and tolerance.
    #[must_use]
    pub fn blowdown(
        given: Given,
        vessel_volume: Volume,
        initial_pressure: Pressure,
        back_pressure: Pressure,
        temperature: ThermodynamicTemperature,
        flow_path_length: Length,
        gas: GasProperties,
    ) -> Self {
        Self {
            process: Process::Blowdown,
            given,
            vessel_volume,
            upstream_pressure: initial_pressure,
            downstream_pressure: back_pressure,
            supply_pressure: None,
            temperature,
            flow_path_length,
            gas,
            discharge_coefficient: Self::DEFAULT_DISCHARGE_COEFFICIENT,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Creates filling inputs with default discharge coefficient and tolerance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn filling(
        given: Given,
        vessel_volume: Volume,
        initial_pressure: Pressure,
        fill_pressure: Pressure,
        supply_pressure: Pressure,
        temperature: ThermodynamicTemperature,
        flow_path_length: Length,
        gas: GasProperties,
    ) -> Self {
        Self {
            process: Process::Filling,
            given,
            vessel_volume,
            upstream_pressure: initial_pressure,
            downstream_pressure: fill_pressure,
            supply_pressure: Some(supply_pressure),
            temperature,
            flow_path_length,
            gas,
            discharge_coefficient: Self::DEFAULT_DISCHARGE_COEFFICIENT,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    #[must_use]
    pub fn with_given(mut self, given: Given) -> Self {
        self.given = given;
        self
    }

    #[must_use]
    pub fn with_discharge_coefficient(mut self, discharge_coefficient: f64) -> Self {
        self.discharge_coefficient = discharge_coefficient;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validates every scalar and the pressure ordering.
    ///
    /// The given quantity is validated separately by [`Given::validate`].
    pub(crate) fn conditions(&self) -> Result<Conditions, SolveError> {
        let volume = positive(
            InputField::VesselVolume,
            self.vessel_volume.get::<cubic_meter>(),
        )?;
        let p1 = positive(
            InputField::UpstreamPressure,
            self.upstream_pressure.get::<pascal>(),
        )?;
        let p2 = positive(
            InputField::DownstreamPressure,
            self.downstream_pressure.get::<pascal>(),
        )?;
        let temperature = positive(InputField::Temperature, self.temperature.get::<kelvin>())?;
        let length = positive(
            InputField::FlowPathLength,
            self.flow_path_length.get::<meter>(),
        )?;

        let cd = Constrained::<f64, UnitIntervalLowerOpen>::new(self.discharge_coefficient)
            .map_err(|_| {
                InputError::numeric(InputField::DischargeCoefficient, self.discharge_coefficient)
            })?
            .into_inner();
        let epsilon = Constrained::<f64, UnitIntervalOpen>::new(self.tolerance)
            .map_err(|_| InputError::numeric(InputField::Tolerance, self.tolerance))?
            .into_inner();

        let (gamma, r, mu) = self.gas.si();
        if !(gamma.is_finite() && gamma > 1.0) {
            return Err(InputError::numeric(InputField::HeatCapacityRatio, gamma).into());
        }
        let r = positive(InputField::GasConstant, r)?;
        let mu = positive(InputField::Viscosity, mu)?;

        let pressures = match self.process {
            Process::Blowdown => Pressures::Blowdown { p1, p2 },
            Process::Filling => {
                let raw = self.supply_pressure.map(|ps| ps.get::<pascal>());
                let ps = match raw {
                    Some(ps) => positive(InputField::SupplyPressure, ps)?,
                    None => {
                        return Err(InputError {
                            field: InputField::SupplyPressure,
                            raw: String::new(),
                            parsed: f64::NAN,
                        }
                        .into());
                    }
                };
                Pressures::Filling { p1, p2, ps }
            }
        };

        self.check_order(pressures, epsilon)?;

        Ok(Conditions {
            pressures,
            volume,
            temperature,
            length,
            cd,
            epsilon,
            gamma,
            r,
            mu,
            gas: self.gas.name.clone(),
        })
    }

    fn check_order(&self, pressures: Pressures, epsilon: f64) -> Result<(), PressureError> {
        let pf = conditions::final_pressure(pressures, epsilon);
        let ordered = match pressures {
            Pressures::Blowdown { p1, p2 } => p1 > pf && pf > p2,
            Pressures::Filling { p1, p2, ps } => ps > p2 && p2 > pf && pf > p1,
        };

        if ordered {
            Ok(())
        } else {
            Err(PressureError {
                process: self.process,
                upstream: self.upstream_pressure,
                downstream: self.downstream_pressure,
                supply: self.supply_pressure,
                final_pressure: Pressure::new::<pascal>(pf),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::flow::vessel::core::test_support::{filling_inputs, reference_blowdown};

    #[test]
    fn reference_blowdown_validates() {
        let conditions = reference_blowdown().conditions().expect("valid inputs");
        assert_eq!(conditions.process(), Process::Blowdown);
        assert_relative_eq!(conditions.p1(), 1.2e6);
        assert_relative_eq!(conditions.cd, 0.62);
        assert_relative_eq!(conditions.final_pressure(), 1010.0);
        assert_eq!(conditions.gas, "air");
    }

    #[test]
    fn rejects_bad_scalars_by_field() {
        let cases = [
            (
                reference_blowdown().with_discharge_coefficient(0.0),
                InputField::DischargeCoefficient,
            ),
            (
                reference_blowdown().with_discharge_coefficient(1.5),
                InputField::DischargeCoefficient,
            ),
            (reference_blowdown().with_tolerance(1.0), InputField::Tolerance),
            (reference_blowdown().with_tolerance(f64::NAN), InputField::Tolerance),
        ];

        for (inputs, field) in cases {
            match inputs.conditions() {
                Err(SolveError::Input(err)) => assert_eq!(err.field, field),
                other => panic!("expected {field} error, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_positive_volume() {
        let mut inputs = reference_blowdown();
        inputs.vessel_volume = Volume::new::<cubic_meter>(0.0);
        assert!(matches!(
            inputs.conditions(),
            Err(SolveError::Input(InputError {
                field: InputField::VesselVolume,
                ..
            }))
        ));
    }

    #[test]
    fn blowdown_requires_upstream_above_final_pressure() {
        let mut inputs = reference_blowdown();
        inputs.upstream_pressure = Pressure::new::<pascal>(1005.0);
        let err = inputs.conditions().unwrap_err();
        let SolveError::Pressures(err) = err else {
            panic!("expected pressure error, got {err:?}");
        };
        assert_eq!(err.process, Process::Blowdown);
        assert_relative_eq!(err.final_pressure.get::<pascal>(), 1010.0);
    }

    #[test]
    fn filling_requires_ordered_pressures() {
        assert!(filling_inputs().conditions().is_ok());

        let mut inputs = filling_inputs();
        inputs.supply_pressure = Some(Pressure::new::<pascal>(4e5));
        assert!(matches!(
            inputs.conditions(),
            Err(SolveError::Pressures(_))
        ));

        inputs.supply_pressure = None;
        assert!(matches!(
            inputs.conditions(),
            Err(SolveError::Input(InputError {
                field: InputField::SupplyPressure,
                ..
            }))
        ));
    }
}

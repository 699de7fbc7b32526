use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
///
/// Shares its dimension with specific heat capacity, so values are built with
/// the [`specific_heat_capacity`](uom::si::specific_heat_capacity) units:
///
/// ```
/// use twine_gas_transfer::support::units::SpecificGasConstant;
/// use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
///
/// let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.055);
/// assert_eq!(r.get::<joule_per_kilogram_kelvin>(), 287.055);
/// ```
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

//! Gas properties and compressible-flow primitives.
//!
//! [`GasProperties`] is the immutable record every flow model reads: molar
//! mass, specific gas constant, heat capacity ratio, and dynamic viscosity.
//! Properties come from the fixed table behind [`GasProperties::lookup`], from
//! a [`GasFluid`] marker type, or directly from the caller.
//!
//! The [`flow`] module holds the scalar relations shared by the orifice and
//! capillary models, and [`ideal_gas`] holds the equation of state.

mod fluid;

pub mod flow;
pub mod ideal_gas;

pub use fluid::{Air, Argon, CarbonDioxide, GasFluid, Helium, Hydrogen, Nitrogen, Oxygen};

use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{DynamicViscosity, MolarMass},
    molar_mass::kilogram_per_mole,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Universal gas constant, J/mol·K.
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618;

/// Immutable thermophysical properties of a gas.
#[derive(Debug, Clone, PartialEq)]
pub struct GasProperties {
    /// Name used to key cached brackets and to look the gas up.
    pub name: String,
    pub molar_mass: MolarMass,
    pub gas_constant: SpecificGasConstant,
    /// Ratio of specific heats `γ = cp / cv`.
    pub heat_capacity_ratio: f64,
    pub dynamic_viscosity: DynamicViscosity,
}

impl GasProperties {
    /// Creates gas properties, deriving the specific gas constant from the molar mass.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        molar_mass: MolarMass,
        heat_capacity_ratio: f64,
        dynamic_viscosity: DynamicViscosity,
    ) -> Self {
        let r = UNIVERSAL_GAS_CONSTANT / molar_mass.get::<kilogram_per_mole>();
        Self {
            name: name.into(),
            molar_mass,
            gas_constant: SpecificGasConstant::new::<joule_per_kilogram_kelvin>(r),
            heat_capacity_ratio,
            dynamic_viscosity,
        }
    }

    /// Returns a copy with an explicit specific gas constant.
    ///
    /// Useful when matching reference data that rounds `R` differently.
    #[must_use]
    pub fn with_gas_constant(mut self, gas_constant: SpecificGasConstant) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    /// Looks up a gas in the built-in table by name or chemical formula.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// ```
    /// use twine_gas_transfer::support::gas::GasProperties;
    ///
    /// let n2 = GasProperties::lookup("N2").unwrap();
    /// assert_eq!(n2.name, "nitrogen");
    /// assert!(GasProperties::lookup("unobtainium").is_none());
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        TABLE
            .iter()
            .find(|entry| entry.name == key || entry.formula.eq_ignore_ascii_case(&key))
            .map(TableEntry::properties)
    }

    /// Returns every gas in the built-in table.
    #[must_use]
    pub fn table() -> Vec<Self> {
        TABLE.iter().map(TableEntry::properties).collect()
    }

    /// Returns `(γ, R [J/kg·K], μ [Pa·s])` as plain SI scalars.
    pub(crate) fn si(&self) -> (f64, f64, f64) {
        (
            self.heat_capacity_ratio,
            self.gas_constant.get::<joule_per_kilogram_kelvin>(),
            self.dynamic_viscosity.get::<pascal_second>(),
        )
    }
}

/// A row of the fixed gas table.
struct TableEntry {
    name: &'static str,
    formula: &'static str,
    molar_mass: f64,
    gamma: f64,
    viscosity: f64,
}

impl TableEntry {
    fn properties(&self) -> GasProperties {
        GasProperties::new(
            self.name,
            MolarMass::new::<kilogram_per_mole>(self.molar_mass),
            self.gamma,
            DynamicViscosity::new::<pascal_second>(self.viscosity),
        )
    }
}

// Viscosities near 15 °C.
const TABLE: [TableEntry; 7] = [
    TableEntry {
        name: "air",
        formula: "air",
        molar_mass: 0.028_964_7,
        gamma: 1.4,
        viscosity: 1.81e-5,
    },
    TableEntry {
        name: "nitrogen",
        formula: "n2",
        molar_mass: 0.028_013_4,
        gamma: 1.4,
        viscosity: 1.76e-5,
    },
    TableEntry {
        name: "oxygen",
        formula: "o2",
        molar_mass: 0.031_998_8,
        gamma: 1.395,
        viscosity: 2.04e-5,
    },
    TableEntry {
        name: "helium",
        formula: "he",
        molar_mass: 0.004_002_6,
        gamma: 1.667,
        viscosity: 1.96e-5,
    },
    TableEntry {
        name: "hydrogen",
        formula: "h2",
        molar_mass: 0.002_015_88,
        gamma: 1.41,
        viscosity: 8.8e-6,
    },
    TableEntry {
        name: "argon",
        formula: "ar",
        molar_mass: 0.039_948,
        gamma: 1.667,
        viscosity: 2.23e-5,
    },
    TableEntry {
        name: "carbon dioxide",
        formula: "co2",
        molar_mass: 0.044_009_5,
        gamma: 1.289,
        viscosity: 1.47e-5,
    },
];

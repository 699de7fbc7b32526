use super::{GasProperties, TABLE};

/// A named gas with constant properties.
///
/// Implemented by unit marker types so models can be written against a
/// specific gas at compile time, mirroring the runtime [`GasProperties::lookup`].
pub trait GasFluid {
    /// Returns the properties for this gas.
    fn properties() -> GasProperties;
}

macro_rules! table_fluid {
    ($(#[$doc:meta])* $marker:ident => $row:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $marker;

        impl GasFluid for $marker {
            fn properties() -> GasProperties {
                TABLE[$row].properties()
            }
        }
    };
}

table_fluid!(
    /// Dry air.
    Air => 0
);
table_fluid!(Nitrogen => 1);
table_fluid!(Oxygen => 2);
table_fluid!(Helium => 3);
table_fluid!(Hydrogen => 4);
table_fluid!(Argon => 5);
table_fluid!(CarbonDioxide => 6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_table() {
        assert_eq!(Air::properties(), GasProperties::lookup("air").unwrap());
        assert_eq!(Helium::properties().name, "helium");
        assert_eq!(CarbonDioxide::properties().name, "carbon dioxide");
    }
}

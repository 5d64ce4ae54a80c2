//! Unit parsing and conversion for activity data and emission factors.
//!
//! Activity records arrive in whatever unit the city or data source reported
//! (litres, kL, gallons, kWh, TJ, tonnes, vehicle-km), while emission factors
//! are published per some other unit of the same quantity. This module
//! resolves unit strings and computes exact decimal conversion factors.
//!
//! # Quick Start
//!
//! ```
//! use ghgi_core::units::{DensityTable, Unit};
//! use rust_decimal_macros::dec;
//!
//! let gallons = Unit::parse("gal").unwrap();
//! let litres = Unit::parse("L").unwrap();
//! assert!(gallons.is_compatible(&litres));
//!
//! // Volume to mass needs a fuel density
//! let kg = Unit::parse("kg").unwrap();
//! let densities = DensityTable::default();
//! let mass = litres
//!     .convert_with_density(dec!(1000), &kg, &densities, Some("fuel-type-diesel"))
//!     .unwrap();
//! assert_eq!(mass, dec!(840));
//! ```
//!
//! # Module Structure
//!
//! - [`dimension`]: Mass, volume, energy, length and count
//! - [`registry`]: Known units with exact conversion factors
//! - [`parser`]: Unit string parsing
//! - [`conversion`]: [`Unit`], [`FactorUnit`] and [`MassUnit`]
//! - [`density`]: Fuel densities for volume <-> mass conversion

pub mod conversion;
pub mod density;
pub mod dimension;
pub mod parser;
pub mod registry;

pub use conversion::{convert_mass, FactorUnit, MassUnit, Unit};
pub use density::DensityTable;
pub use dimension::Dimension;
pub use parser::ParseError;
pub use registry::{UnitInfo, UnitRegistry, UNIT_REGISTRY};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Typical stationary energy conversion: fuel reported in US gallons,
    /// factor published per kg.
    #[test]
    fn test_gallons_of_diesel_to_kg() {
        let gallons = Unit::parse("gallons").unwrap();
        let kg = Unit::parse("kg").unwrap();
        let densities = DensityTable::default();

        let mass = gallons
            .convert_with_density(dec!(100), &kg, &densities, Some("fuel-type-diesel"))
            .unwrap();

        // 100 gal = 0.3785411784 m3, * 840 kg/m3
        assert_eq!(mass, dec!(317.974589856));
    }

    #[test]
    fn test_electricity_scenario() {
        let gwh = Unit::parse("GWh").unwrap();
        let kwh = Unit::parse("kWh").unwrap();
        assert_eq!(gwh.convert(dec!(12.5), &kwh).unwrap(), dec!(12500000));
    }
}

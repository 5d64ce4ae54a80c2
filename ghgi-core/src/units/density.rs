//! Fuel densities for volume <-> mass conversion.
//!
//! Activity data for liquid and gaseous fuels is often reported by volume
//! while emission factors are published per unit mass (or the other way
//! around). The density table bridges the two; a fuel without an entry
//! cannot be converted, and the caller gets [`CalculationError::MissingDensity`]
//! rather than a guessed value.

use crate::decimal;
use crate::errors::{CalculationError, CalculationResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fuel density table keyed by fuel-type identifier
///
/// unit: kg/m3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityTable {
    densities: BTreeMap<String, Decimal>,
}

impl Default for DensityTable {
    /// Typical densities at 15 °C (liquids) or standard conditions (gases).
    fn default() -> Self {
        let densities = [
            ("fuel-type-aviation-gasoline", dec!(710)),
            ("fuel-type-biodiesel", dec!(880)),
            ("fuel-type-diesel", dec!(840)),
            ("fuel-type-ethanol", dec!(789)),
            ("fuel-type-gasoline", dec!(745)),
            ("fuel-type-jet-kerosene", dec!(800)),
            ("fuel-type-kerosene", dec!(800)),
            ("fuel-type-liquefied-petroleum-gases", dec!(540)),
            ("fuel-type-lubricants", dec!(900)),
            ("fuel-type-natural-gas", dec!(0.717)),
            ("fuel-type-residual-fuel-oil", dec!(940)),
        ];
        Self {
            densities: densities
                .into_iter()
                .map(|(fuel, density)| (fuel.to_string(), density))
                .collect(),
        }
    }
}

impl DensityTable {
    /// An empty table, useful for tests and for fully custom reference data.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            densities: BTreeMap::new(),
        }
    }

    /// Inserts or replaces the density of a fuel type.
    pub fn insert(&mut self, fuel_type: impl Into<String>, kg_per_m3: Decimal) {
        self.densities.insert(fuel_type.into(), kg_per_m3);
    }

    /// Adds every entry of `other`, overriding existing fuel types.
    pub fn extend(&mut self, other: &DensityTable) {
        for (fuel, density) in &other.densities {
            self.densities.insert(fuel.clone(), *density);
        }
    }

    #[must_use]
    pub fn get(&self, fuel_type: &str) -> Option<Decimal> {
        self.densities.get(fuel_type).copied()
    }

    /// Iterates over `(fuel type, kg/m3)` pairs in fuel-type order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.densities
            .iter()
            .map(|(fuel, density)| (fuel.as_str(), *density))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.densities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    fn require(&self, fuel_type: Option<&str>) -> CalculationResult<Decimal> {
        let missing = || CalculationError::MissingDensity {
            fuel_type: fuel_type.unwrap_or("<unspecified>").to_string(),
        };
        let density = fuel_type.and_then(|fuel| self.get(fuel)).ok_or_else(missing)?;
        if density.is_zero() {
            return Err(missing());
        }
        Ok(density)
    }

    /// Converts a volume in m3 to a mass in kg.
    pub fn volume_to_mass(
        &self,
        volume_m3: Decimal,
        fuel_type: Option<&str>,
    ) -> CalculationResult<Decimal> {
        let density = self.require(fuel_type)?;
        decimal::mul(volume_m3, density, "volume to mass conversion")
    }

    /// Converts a mass in kg to a volume in m3.
    pub fn mass_to_volume(
        &self,
        mass_kg: Decimal,
        fuel_type: Option<&str>,
    ) -> CalculationResult<Decimal> {
        let density = self.require(fuel_type)?;
        decimal::div(mass_kg, density, "mass to volume conversion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_densities_are_physical() {
        let table = DensityTable::default();
        assert!(!table.is_empty());
        assert_eq!(table.get("fuel-type-diesel"), Some(dec!(840)));
        // Liquids sit between LPG and heavy fuel oil
        for fuel in ["fuel-type-gasoline", "fuel-type-kerosene", "fuel-type-diesel"] {
            let density = table.get(fuel).unwrap();
            assert!(density > dec!(500) && density < dec!(1000), "{fuel}: {density}");
        }
    }

    #[test]
    fn test_volume_to_mass() {
        let table = DensityTable::default();
        // 1000 L of diesel = 1 m3 = 840 kg
        let mass = table.volume_to_mass(dec!(1), Some("fuel-type-diesel")).unwrap();
        assert_eq!(mass, dec!(840));
    }

    #[test]
    fn test_mass_to_volume() {
        let table = DensityTable::default();
        let volume = table.mass_to_volume(dec!(840), Some("fuel-type-diesel")).unwrap();
        assert_eq!(volume, dec!(1));
    }

    #[test]
    fn test_missing_density_names_fuel() {
        let table = DensityTable::default();
        let err = table
            .volume_to_mass(dec!(1), Some("fuel-type-other-biogas"))
            .unwrap_err();
        match err {
            CalculationError::MissingDensity { fuel_type } => {
                assert_eq!(fuel_type, "fuel-type-other-biogas")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_fuel_type() {
        let table = DensityTable::default();
        let err = table.mass_to_volume(dec!(1), None).unwrap_err();
        assert!(matches!(err, CalculationError::MissingDensity { .. }));
    }

    #[test]
    fn test_extend_overrides() {
        let mut table = DensityTable::default();
        let mut overrides = DensityTable::empty();
        overrides.insert("fuel-type-diesel", dec!(832));
        overrides.insert("fuel-type-other-biogas", dec!(1.15));
        table.extend(&overrides);

        assert_eq!(table.get("fuel-type-diesel"), Some(dec!(832)));
        assert_eq!(table.get("fuel-type-other-biogas"), Some(dec!(1.15)));
    }
}

//! Engine configuration.
//!
//! ```toml
//! gwp_set = "AR5"
//! region = "BR"
//! tolerance_tonnes = 0.01
//!
//! [densities]
//! fuel-type-diesel = 835
//! fuel-type-biogas = "1.15"
//! ```

use crate::decimal;
use crate::errors::{CalculationError, CalculationResult};
use crate::gas::GwpSet;
use crate::units::DensityTable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Settings shared by every calculation an engine performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// default: AR6
    pub gwp_set: GwpSet,
    /// Region used to prefer region-specific emission factors.
    ///
    /// default: none (only world factors apply)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Extra or overriding fuel densities, merged over the built-in table
    ///
    /// unit: kg/m3
    pub densities: DensityTable,
    /// Absolute tolerance used when checking against reference totals
    ///
    /// unit: t CO2e
    /// default: 0.01
    pub tolerance_tonnes: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gwp_set: GwpSet::default(),
            region: None,
            densities: DensityTable::empty(),
            tolerance_tonnes: dec!(0.01),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(contents: &str) -> CalculationResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> CalculationResult<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            gwp_set = %config.gwp_set,
            density_overrides = config.densities.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// The built-in density table with this configuration's overrides applied.
    #[must_use]
    pub fn density_table(&self) -> DensityTable {
        let mut table = DensityTable::default();
        table.extend(&self.densities);
        table
    }

    /// Tolerance in kg CO2e.
    pub fn tolerance_kg(&self) -> CalculationResult<Decimal> {
        decimal::mul(self.tolerance_tonnes, dec!(1000), "tolerance in kg")
    }

    fn validate(&self) -> CalculationResult<()> {
        if self.tolerance_tonnes.is_sign_negative() {
            return Err(CalculationError::Config(format!(
                "tolerance_tonnes must not be negative, got {}",
                self.tolerance_tonnes
            )));
        }
        if self.tolerance_kg().is_err() {
            return Err(CalculationError::Config(format!(
                "tolerance_tonnes is too large, got {}",
                self.tolerance_tonnes
            )));
        }
        if let Some((fuel, density)) = self.densities.iter().find(|(_, d)| *d <= Decimal::ZERO) {
            return Err(CalculationError::Config(format!(
                "density for '{fuel}' must be positive, got {density}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.gwp_set, GwpSet::AR6);
        assert_eq!(config.tolerance_kg().unwrap(), dec!(10));
        assert_eq!(config.density_table(), DensityTable::default());
    }

    #[test]
    fn test_full_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            gwp_set = "AR5"
            region = "BR"
            tolerance_tonnes = "0.5"

            [densities]
            fuel-type-diesel = 835
            fuel-type-biogas = "1.15"
            "#,
        )
        .unwrap();

        assert_eq!(config.gwp_set, GwpSet::AR5);
        assert_eq!(config.region.as_deref(), Some("BR"));
        assert_eq!(config.tolerance_tonnes, dec!(0.5));

        let table = config.density_table();
        assert_eq!(table.get("fuel-type-diesel"), Some(dec!(835)));
        assert_eq!(table.get("fuel-type-biogas"), Some(dec!(1.15)));
        assert_eq!(table.get("fuel-type-gasoline"), Some(dec!(745)));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_toml_str("tolerance_tonnes = -1"),
            Err(CalculationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("tolerance_tonnes = \"79228162514264337593543950335\""),
            Err(CalculationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[densities]\nfuel-type-diesel = 0"),
            Err(CalculationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("gwp_set = \"AR9\""),
            Err(CalculationError::Toml(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("unknown_key = 1"),
            Err(CalculationError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::from_path("/nonexistent/ghgi.toml"),
            Err(CalculationError::Io(_))
        ));
    }
}

//! Third-party data sources.
//!
//! Regional or national datasets often cover a larger geography than the
//! city being inventoried. Such figures are brought down to city level by
//! the ratio of populations in the inventory year before they are used.

use crate::activity::ActivityRecord;
use crate::calculator::GasAmounts;
use crate::decimal;
use crate::errors::CalculationResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a data source's values relate to the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingRule {
    /// Values are already for the city.
    #[default]
    None,
    /// Values cover a larger area and scale with population.
    Population,
}

/// A dataset that activity records or emissions can be imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default)]
    pub scaling: ScalingRule,
    /// Population of the geography the dataset covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

impl DataSource {
    /// The multiplier from source values to city values.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` when the source scales by population but its
    /// population is zero or unknown.
    pub fn scale_factor(&self, city_population: u64) -> CalculationResult<Decimal> {
        match self.scaling {
            ScalingRule::None => Ok(Decimal::ONE),
            ScalingRule::Population => {
                population_scale_factor(city_population, self.population.unwrap_or(0))
            }
        }
    }

    /// Scales an activity record to the city and attributes it to this
    /// source.
    pub fn import_activity(
        &self,
        record: &ActivityRecord,
        city_population: u64,
    ) -> CalculationResult<ActivityRecord> {
        let mut scaled = scale_activity(record, self.scale_factor(city_population)?)?;
        scaled.source.data_source = Some(self.id.clone());
        if scaled.source.reference.is_none() {
            scaled.source.reference = self.publisher.clone();
        }
        Ok(scaled)
    }
}

/// `city_population / source_population`
pub fn population_scale_factor(
    city_population: u64,
    source_population: u64,
) -> CalculationResult<Decimal> {
    decimal::div(
        Decimal::from(city_population),
        Decimal::from(source_population),
        "population scale factor",
    )
}

/// Multiplies every quantity of `record` by `factor`.
pub fn scale_activity(
    record: &ActivityRecord,
    factor: Decimal,
) -> CalculationResult<ActivityRecord> {
    let mut scaled = record.clone();
    for quantity in scaled.quantities.values_mut() {
        quantity.amount = decimal::mul(quantity.amount, factor, "scaled activity")?;
    }
    Ok(scaled)
}

/// Multiplies every gas amount by `factor`. Omitted gases stay omitted.
pub fn scale_gas_amounts(amounts: &GasAmounts, factor: Decimal) -> CalculationResult<GasAmounts> {
    let mut scaled = amounts.clone();
    for amount in scaled.amounts.values_mut() {
        amount.mass_kg = decimal::mul(amount.mass_kg, factor, "scaled gas amount")?;
    }
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::GasAmount;
    use crate::errors::CalculationError;
    use crate::gas::Gas;
    use crate::units::Unit;
    use rust_decimal_macros::dec;

    fn national() -> DataSource {
        DataSource {
            id: "national-fuel-sales".to_string(),
            publisher: Some("Energy Ministry".to_string()),
            scaling: ScalingRule::Population,
            population: Some(200_000_000),
        }
    }

    #[test]
    fn test_population_scale_factor() {
        assert_eq!(population_scale_factor(2_000_000, 200_000_000).unwrap(), dec!(0.01));
        assert!(matches!(
            population_scale_factor(2_000_000, 0),
            Err(CalculationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_unscaled_source() {
        let local = DataSource {
            id: "utility".to_string(),
            publisher: None,
            scaling: ScalingRule::None,
            population: None,
        };
        assert_eq!(local.scale_factor(12345).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_unknown_source_population() {
        let mut source = national();
        source.population = None;
        assert!(source.scale_factor(1000).is_err());
    }

    #[test]
    fn test_import_activity() {
        let record = ActivityRecord::new()
            .with_quantity("fuel-sold", dec!(5000000), Unit::parse("kL").unwrap())
            .with_classification("fuel-type", "fuel-type-gasoline");
        let imported = national().import_activity(&record, 2_000_000).unwrap();

        assert_eq!(imported.quantity("fuel-sold").unwrap().amount, dec!(50000));
        assert_eq!(imported.classification("fuel-type"), Some("fuel-type-gasoline"));
        assert_eq!(imported.source.data_source.as_deref(), Some("national-fuel-sales"));
        assert_eq!(imported.source.reference.as_deref(), Some("Energy Ministry"));
    }

    #[test]
    fn test_scale_gas_amounts() {
        let mut amounts = GasAmounts::default();
        amounts.amounts.insert(
            Gas::CO2,
            GasAmount {
                gas: Gas::CO2,
                mass_kg: dec!(1000),
                emission_factor_id: None,
            },
        );
        amounts.omitted.push(Gas::N2O);

        let scaled = scale_gas_amounts(&amounts, dec!(0.25)).unwrap();
        assert_eq!(scaled.mass_kg(Gas::CO2), Some(dec!(250)));
        assert_eq!(scaled.omitted, vec![Gas::N2O]);
    }

    #[test]
    fn test_deserialize() {
        let source: DataSource = toml::from_str(
            r#"
            id = "census-2022"
            scaling = "population"
            population = 3500000
            "#,
        )
        .unwrap();
        assert_eq!(source.scaling, ScalingRule::Population);
        assert_eq!(source.population, Some(3_500_000));
    }
}

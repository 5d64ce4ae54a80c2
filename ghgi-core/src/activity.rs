//! Activity records: the measured or estimated quantities behind an
//! inventory entry.

use crate::units::Unit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quantity with the unit it was reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: Decimal,
    pub unit: Unit,
}

impl Quantity {
    #[must_use]
    pub fn new(amount: Decimal, unit: Unit) -> Self {
        Self { amount, unit }
    }
}

/// Where an activity value came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceAttribution {
    /// Identifier of the data source (e.g. a dataset id or "user").
    pub data_source: Option<String>,
    /// Free-form provenance such as a publisher or a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One user-entered or imported measurement.
///
/// Quantities are keyed by activity field (`fuel-consumption`,
/// `distance-travelled`, `co2-amount` …); which field a methodology reads is
/// decided by its formula. Classification fields such as `fuel-type` select
/// among emission factors and fuel densities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(default)]
    pub quantities: BTreeMap<String, Quantity>,
    #[serde(default)]
    pub classification: BTreeMap<String, String>,
    #[serde(default)]
    pub source: SourceAttribution,
}

impl ActivityRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that sets a quantity field.
    #[must_use]
    pub fn with_quantity(mut self, field: &str, amount: Decimal, unit: Unit) -> Self {
        self.quantities
            .insert(field.to_string(), Quantity::new(amount, unit));
        self
    }

    /// Builder-style helper that sets a classification field.
    #[must_use]
    pub fn with_classification(mut self, field: &str, value: &str) -> Self {
        self.classification
            .insert(field.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_source(mut self, data_source: &str) -> Self {
        self.source.data_source = Some(data_source.to_string());
        self
    }

    #[must_use]
    pub fn quantity(&self, field: &str) -> Option<&Quantity> {
        self.quantities.get(field)
    }

    #[must_use]
    pub fn classification(&self, field: &str) -> Option<&str> {
        self.classification.get(field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder() {
        let record = ActivityRecord::new()
            .with_quantity("fuel-consumption", dec!(1000), Unit::parse("L").unwrap())
            .with_classification("fuel-type", "fuel-type-diesel")
            .with_source("user");

        assert_eq!(record.quantity("fuel-consumption").unwrap().amount, dec!(1000));
        assert_eq!(record.classification("fuel-type"), Some("fuel-type-diesel"));
        assert_eq!(record.source.data_source.as_deref(), Some("user"));
        assert!(record.quantity("fuel-sold").is_none());
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "quantities": {
                "fuel-consumption": { "amount": "1000", "unit": "L" }
            },
            "classification": { "fuel-type": "fuel-type-gasoline" }
        }"#;
        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        let quantity = record.quantity("fuel-consumption").unwrap();
        assert_eq!(quantity.amount, dec!(1000));
        assert_eq!(quantity.unit, Unit::parse("litres").unwrap());
        assert_eq!(record.source, SourceAttribution::default());
    }
}

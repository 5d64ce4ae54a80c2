//! Emission factors and the region-aware resolver that picks one per gas.

use crate::activity::ActivityRecord;
use crate::errors::{CalculationError, CalculationResult};
use crate::gas::Gas;
use crate::units::FactorUnit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Region code for factors that apply anywhere.
pub const WORLD_REGION: &str = "world";

/// A coefficient relating one unit of activity to a mass of one gas.
///
/// Emission factors are immutable reference data (e.g. IPCC EFDB rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gas: Gas,
    /// Mass of `gas` per unit of activity, in `units`.
    pub emissions_per_activity: Decimal,
    /// e.g. `kg/L`, `t/TJ`, `kg/kWh`
    pub units: FactorUnit,
    /// Region code (ISO country or locode). `None` and `"world"` are the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Classification values this factor is specific to, e.g.
    /// `fuel-type = fuel-type-diesel`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl EmissionFactor {
    #[must_use]
    pub fn new(gas: Gas, emissions_per_activity: Decimal, units: FactorUnit) -> Self {
        Self {
            id: None,
            gas,
            emissions_per_activity,
            units,
            region: None,
            metadata: BTreeMap::new(),
            data_source: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// True for factors without a region or with the world region.
    #[must_use]
    pub fn is_default_region(&self) -> bool {
        self.region
            .as_deref()
            .map_or(true, |r| r.eq_ignore_ascii_case(WORLD_REGION))
    }

    fn is_region(&self, region: &str) -> bool {
        self.region
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(region))
    }

    /// True if the activity carries every classification in this factor's
    /// metadata. A factor specific to a fuel or vehicle type does not apply
    /// to activities that leave that type unclassified.
    #[must_use]
    pub fn matches_activity(&self, activity: &ActivityRecord) -> bool {
        self.metadata
            .iter()
            .all(|(key, value)| activity.classification(key) == Some(value.as_str()))
    }
}

/// Selects the emission factor for `gas` from `candidates`.
///
/// An exact (case-insensitive) region match wins; otherwise the first
/// world/default-region factor is used. Among equally good candidates the
/// first in input order is chosen, so the result is deterministic.
///
/// # Errors
///
/// `NoApplicableFactor` if no candidate for `gas` exists in the requested
/// region or the default region.
pub fn resolve<'a>(
    gas: Gas,
    candidates: &'a [EmissionFactor],
    region: Option<&str>,
) -> CalculationResult<&'a EmissionFactor> {
    let mut for_gas = candidates.iter().filter(|f| f.gas == gas);

    if let Some(region) = region.filter(|r| !r.eq_ignore_ascii_case(WORLD_REGION)) {
        if let Some(exact) = for_gas.clone().find(|f| f.is_region(region)) {
            return Ok(exact);
        }
    }

    for_gas
        .find(|f| f.is_default_region())
        .ok_or(CalculationError::NoApplicableFactor { gas })
}

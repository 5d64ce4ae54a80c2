//! Checking calculated totals against externally published reference values.
//!
//! A reference case bundles an activity record, a methodology, the emission
//! factors to use and the CO2e total some other tool (or a published
//! inventory) arrived at. Cases are usually kept in TOML:
//!
//! ```toml
//! [[case]]
//! name = "diesel combustion"
//! methodology = "fuel-combustion-consumption"
//! gpc_reference_number = "I.1.1"
//! expected_co2e_kg = "2685.53"
//!
//! [case.activity.quantities.fuel-consumption]
//! amount = "1000"
//! unit = "L"
//!
//! [[case.factors]]
//! gas = "CO2"
//! emissions_per_activity = "2.68"
//! units = "kg/L"
//! ```
//!
//! Cases that need a fuel density nobody has registered are skipped rather
//! than failed: the gap is in the reference data, not in the engine.

use crate::activity::ActivityRecord;
use crate::config::EngineConfig;
use crate::decimal;
use crate::emission_factor::EmissionFactor;
use crate::engine::EmissionsEngine;
use crate::errors::{CalculationError, CalculationResult};
use crate::gas::GwpSet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One (activity, methodology, expected total) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCase {
    pub name: String,
    pub methodology: String,
    pub gpc_reference_number: String,
    pub activity: ActivityRecord,
    #[serde(default)]
    pub factors: Vec<EmissionFactor>,
    /// Overrides the configured GWP set for this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gwp_set: Option<GwpSet>,
    /// Overrides the configured region for this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub expected_co2e_kg: Decimal,
}

#[derive(Debug, Deserialize)]
struct ReferenceCaseFile {
    #[serde(default, rename = "case")]
    cases: Vec<ReferenceCase>,
}

impl ReferenceCase {
    /// Parses every `[[case]]` table of a TOML document.
    pub fn from_toml_str(contents: &str) -> CalculationResult<Vec<Self>> {
        let file: ReferenceCaseFile = toml::from_str(contents)?;
        Ok(file.cases)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CalculationResult<Vec<Self>> {
        let path = path.as_ref();
        let cases = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), cases = cases.len(), "Loaded reference cases");
        Ok(cases)
    }
}

/// Absolute tolerance on a CO2e total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    pub absolute_kg: Decimal,
}

impl Tolerance {
    pub fn from_tonnes(tonnes: Decimal) -> CalculationResult<Self> {
        Ok(Self {
            absolute_kg: decimal::mul(tonnes, Decimal::ONE_THOUSAND, "tolerance in kg")?,
        })
    }

    #[must_use]
    pub fn accepts(&self, difference: Decimal) -> bool {
        difference.abs() <= self.absolute_kg
    }
}

impl Default for Tolerance {
    /// 0.01 t
    fn default() -> Self {
        Self {
            absolute_kg: dec!(10),
        }
    }
}

/// Result of checking one case.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Pass {
        calculated_kg: Decimal,
        difference_kg: Decimal,
    },
    Fail {
        calculated_kg: Decimal,
        expected_kg: Decimal,
        difference_kg: Decimal,
    },
    /// The case needs a fuel density that is not registered.
    Skipped { fuel_type: String },
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass { .. })
    }
}

/// Runs `case` through the engine configured by `config`.
///
/// # Errors
///
/// Any calculation error other than `MissingDensity`, which becomes
/// [`ValidationOutcome::Skipped`].
pub fn validate(
    case: &ReferenceCase,
    config: &EngineConfig,
) -> CalculationResult<ValidationOutcome> {
    let mut engine = EmissionsEngine::from_config(config);
    if let Some(gwp_set) = case.gwp_set {
        engine = engine.with_gwp_set(gwp_set);
    }
    if let Some(region) = &case.region {
        engine = engine.with_region(region.as_str());
    }

    let result = match engine.calculate(
        &case.activity,
        &case.methodology,
        &case.gpc_reference_number,
        &case.factors,
    ) {
        Ok(result) => result,
        Err(CalculationError::MissingDensity { fuel_type }) => {
            warn!(case = %case.name, fuel_type = %fuel_type, "Skipping reference case");
            return Ok(ValidationOutcome::Skipped { fuel_type });
        }
        Err(e) => return Err(e),
    };

    let calculated_kg = result.total_co2e_kg;
    let difference_kg =
        decimal::sub(calculated_kg, case.expected_co2e_kg, "reference difference")?;
    let tolerance = Tolerance::from_tonnes(config.tolerance_tonnes)?;
    if tolerance.accepts(difference_kg) {
        Ok(ValidationOutcome::Pass {
            calculated_kg,
            difference_kg,
        })
    } else {
        warn!(
            case = %case.name,
            calculated_kg = %calculated_kg,
            expected_kg = %case.expected_co2e_kg,
            "Reference case outside tolerance"
        );
        Ok(ValidationOutcome::Fail {
            calculated_kg,
            expected_kg: case.expected_co2e_kg,
            difference_kg,
        })
    }
}

/// Outcomes of a batch of cases, by case name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSummary {
    pub outcomes: Vec<(String, ValidationOutcome)>,
}

impl ValidationSummary {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, ValidationOutcome::Pass { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ValidationOutcome::Fail { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ValidationOutcome::Skipped { .. }))
    }

    fn count(&self, f: impl Fn(&ValidationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| f(o)).count()
    }
}

/// Validates every case. Stops at the first calculation error.
pub fn validate_all(
    cases: &[ReferenceCase],
    config: &EngineConfig,
) -> CalculationResult<ValidationSummary> {
    let outcomes = cases
        .iter()
        .map(|case| Ok((case.name.clone(), validate(case, config)?)))
        .collect::<CalculationResult<Vec<_>>>()?;
    Ok(ValidationSummary { outcomes })
}

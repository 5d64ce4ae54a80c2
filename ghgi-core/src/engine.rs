//! The emission calculation engine.
//!
//! Ties the pieces together: methodology lookup, factor resolution, gas
//! amount calculation and GWP aggregation. An engine is immutable once
//! built and is `Send + Sync`, so one instance can serve parallel
//! calculations without locking.

use crate::activity::ActivityRecord;
use crate::aggregate::{aggregate, EmissionsResult};
use crate::calculator::{self, CalculationContext, GasAmounts};
use crate::config::EngineConfig;
use crate::emission_factor::EmissionFactor;
use crate::errors::CalculationResult;
use crate::gas::GwpSet;
use crate::methodology::METHODOLOGY_REGISTRY;
use crate::units::DensityTable;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_ENGINE: LazyLock<EmissionsEngine> = LazyLock::new(EmissionsEngine::default);

/// Calculates emissions for one activity record with the default engine
/// (built-in densities, AR6, world factors only).
///
/// See [`EmissionsEngine::calculate`].
pub fn calculate_gas_amounts(
    activity: &ActivityRecord,
    methodology: &str,
    gpc_reference_number: &str,
    candidates: &[EmissionFactor],
) -> CalculationResult<EmissionsResult> {
    DEFAULT_ENGINE.calculate(activity, methodology, gpc_reference_number, candidates)
}

/// Emission calculator configured with a density table, a GWP set and an
/// optional region.
#[derive(Debug, Clone, Default)]
pub struct EmissionsEngine {
    densities: DensityTable,
    gwp_set: GwpSet,
    region: Option<String>,
}

impl EmissionsEngine {
    /// Creates an engine with the built-in densities and AR6.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            densities: config.density_table(),
            gwp_set: config.gwp_set,
            region: config.region.clone(),
        }
    }

    #[must_use]
    pub fn with_gwp_set(mut self, gwp_set: GwpSet) -> Self {
        self.gwp_set = gwp_set;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_densities(mut self, densities: DensityTable) -> Self {
        self.densities = densities;
        self
    }

    pub fn gwp_set(&self) -> GwpSet {
        self.gwp_set
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn densities(&self) -> &DensityTable {
        &self.densities
    }

    /// Per-gas masses in kg, before GWP weighting.
    ///
    /// # Errors
    ///
    /// - `InvalidGpcReference` / `UnknownMethodology` from the lookup
    /// - `MissingDensity` and `IncompatibleUnits` from the calculator
    pub fn gas_amounts(
        &self,
        activity: &ActivityRecord,
        methodology: &str,
        gpc_reference_number: &str,
        candidates: &[EmissionFactor],
    ) -> CalculationResult<GasAmounts> {
        let formula = METHODOLOGY_REGISTRY.lookup(methodology, gpc_reference_number)?;
        calculator::calculate(formula, activity, candidates, self.context())
    }

    /// Calculates the per-gas breakdown and CO2e total of `activity`.
    ///
    /// Gases the methodology covers but `candidates` do not are listed in
    /// [`EmissionsResult::omitted_gases`] and contribute nothing to the
    /// total.
    pub fn calculate(
        &self,
        activity: &ActivityRecord,
        methodology: &str,
        gpc_reference_number: &str,
        candidates: &[EmissionFactor],
    ) -> CalculationResult<EmissionsResult> {
        let amounts = self.gas_amounts(activity, methodology, gpc_reference_number, candidates)?;
        let result = aggregate(&amounts, self.gwp_set)?;
        debug!(
            methodology,
            gpc_reference_number,
            gwp_set = %self.gwp_set,
            gases = result.per_gas.len(),
            omitted = result.omitted_gases.len(),
            total_co2e_kg = %result.total_co2e_kg,
            "Calculated emissions"
        );
        Ok(result)
    }

    fn context(&self) -> CalculationContext<'_> {
        CalculationContext {
            densities: &self.densities,
            region: self.region.as_deref(),
        }
    }
}

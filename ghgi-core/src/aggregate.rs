//! GWP aggregation.
//!
//! $$CO_2e = \sum_{gas} m_{gas} \cdot GWP_{set}(gas)$$
//!
//! Amounts stay unrounded; rounding belongs to [`crate::report`].

use crate::calculator::{GasAmount, GasAmounts};
use crate::decimal;
use crate::errors::CalculationResult;
use crate::gas::{Gas, GwpSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contribution of one gas to a CO2e total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasBreakdown {
    pub gas: Gas,
    /// Physical mass of the gas, kg.
    pub mass_kg: Decimal,
    /// GWP coefficient applied.
    pub gwp: Decimal,
    /// `mass_kg * gwp`
    pub co2e_kg: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_id: Option<String>,
}

/// Per-gas breakdown and CO2e total of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsResult {
    pub per_gas: BTreeMap<Gas, GasBreakdown>,
    /// Gases the methodology covers but no emission factor was found for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omitted_gases: Vec<Gas>,
    pub total_co2e_kg: Decimal,
    pub gwp_set: GwpSet,
}

impl EmissionsResult {
    /// An empty result: no gases and a zero total.
    #[must_use]
    pub fn empty(gwp_set: GwpSet) -> Self {
        Self {
            per_gas: BTreeMap::new(),
            omitted_gases: Vec::new(),
            total_co2e_kg: Decimal::ZERO,
            gwp_set,
        }
    }

    /// Mass of `gas` in kg, `None` when the gas was omitted.
    #[must_use]
    pub fn mass_kg(&self, gas: Gas) -> Option<Decimal> {
        self.per_gas.get(&gas).map(|b| b.mass_kg)
    }

    /// CO2e of `gas` in kg, `None` when the gas was omitted.
    #[must_use]
    pub fn co2e_kg(&self, gas: Gas) -> Option<Decimal> {
        self.per_gas.get(&gas).map(|b| b.co2e_kg)
    }

    /// Recomputes the breakdown under a different GWP set. Masses are
    /// unchanged.
    pub fn with_gwp_set(&self, gwp_set: GwpSet) -> CalculationResult<Self> {
        let amounts = GasAmounts {
            amounts: self
                .per_gas
                .iter()
                .map(|(&gas, b)| {
                    (
                        gas,
                        GasAmount {
                            gas,
                            mass_kg: b.mass_kg,
                            emission_factor_id: b.emission_factor_id.clone(),
                        },
                    )
                })
                .collect(),
            omitted: self.omitted_gases.clone(),
        };
        aggregate(&amounts, gwp_set)
    }
}

/// Weights each gas amount by its GWP coefficient and sums to CO2e.
///
/// # Errors
///
/// `DecimalOverflow` only for amounts far outside any realistic inventory.
pub fn aggregate(amounts: &GasAmounts, gwp_set: GwpSet) -> CalculationResult<EmissionsResult> {
    let coefficients = gwp_set.coefficients();
    let mut per_gas = BTreeMap::new();
    for (&gas, amount) in &amounts.amounts {
        let gwp = coefficients.get(gas);
        per_gas.insert(
            gas,
            GasBreakdown {
                gas,
                mass_kg: amount.mass_kg,
                gwp,
                co2e_kg: decimal::mul(amount.mass_kg, gwp, "CO2e")?,
                emission_factor_id: amount.emission_factor_id.clone(),
            },
        );
    }
    let total_co2e_kg = decimal::sum(per_gas.values().map(|b| b.co2e_kg), "CO2e total")?;

    Ok(EmissionsResult {
        per_gas,
        omitted_gases: amounts.omitted.clone(),
        total_co2e_kg,
        gwp_set,
    })
}

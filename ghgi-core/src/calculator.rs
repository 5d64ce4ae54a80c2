//! Gas amount calculation.
//!
//! Applies a [`Formula`] to one activity record and produces the physical
//! mass of each gas in kilograms:
//!
//! $$m_{gas} = A \cdot c \cdot EF_{gas} \cdot k$$
//!
//! where $A$ is the activity amount, $c$ converts it into the unit the
//! emission factor is expressed per (possibly through a fuel density),
//! $EF_{gas}$ is the resolved factor and $k$ converts the factor's mass unit
//! to kg. All arithmetic is decimal.
//!
//! Gases without an applicable factor are reported as omitted, never as
//! zero: partial gas coverage is a normal data condition and callers must
//! be able to tell "no data" from "no emissions".

use crate::activity::{ActivityRecord, Quantity};
use crate::decimal;
use crate::emission_factor::{self, EmissionFactor};
use crate::errors::{CalculationError, CalculationResult};
use crate::gas::Gas;
use crate::methodology::{Conversion, Formula, FormulaKind};
use crate::units::{DensityTable, Dimension, Unit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Calculated mass of one gas for one activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasAmount {
    pub gas: Gas,
    pub mass_kg: Decimal,
    /// The emission factor used, if it had an id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_id: Option<String>,
}

/// Output of the calculator: amounts for covered gases, plus the gases the
/// formula asked for but no factor covered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GasAmounts {
    pub amounts: BTreeMap<Gas, GasAmount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omitted: Vec<Gas>,
}

impl GasAmounts {
    /// Mass of `gas` in kg, or `None` if the gas was omitted.
    #[must_use]
    pub fn mass_kg(&self, gas: Gas) -> Option<Decimal> {
        self.amounts.get(&gas).map(|a| a.mass_kg)
    }

    fn insert(&mut self, gas: Gas, mass_kg: Decimal, factor: Option<&EmissionFactor>) {
        self.amounts.insert(
            gas,
            GasAmount {
                gas,
                mass_kg,
                emission_factor_id: factor.and_then(|f| f.id.clone()),
            },
        );
    }
}

/// Inputs shared by every calculation made with one engine.
#[derive(Debug, Clone, Copy)]
pub struct CalculationContext<'a> {
    pub densities: &'a DensityTable,
    pub region: Option<&'a str>,
}

/// Calculates per-gas masses for `activity` using `formula`.
///
/// # Errors
///
/// - `MissingDensity` when a volume/mass conversion is needed and the
///   classified fuel type has no density
/// - `IncompatibleUnits` when the activity unit cannot be brought to the
///   factor's unit
///
/// `NoApplicableFactor` never escapes: the gas is listed in
/// [`GasAmounts::omitted`] instead.
pub fn calculate(
    formula: &Formula,
    activity: &ActivityRecord,
    candidates: &[EmissionFactor],
    context: CalculationContext<'_>,
) -> CalculationResult<GasAmounts> {
    match formula.kind {
        FormulaKind::ActivityTimesFactor {
            quantity_field,
            declared_dimension,
        } => activity_times_factor(
            formula,
            activity.quantity(quantity_field),
            declared_dimension,
            activity,
            candidates,
            context,
        ),
        FormulaKind::DirectMeasure => direct_measure(formula, activity),
    }
}

fn activity_times_factor(
    formula: &Formula,
    quantity: Option<&Quantity>,
    declared_dimension: Dimension,
    activity: &ActivityRecord,
    candidates: &[EmissionFactor],
    context: CalculationContext<'_>,
) -> CalculationResult<GasAmounts> {
    let quantity = quantity.filter(|q| !q.amount.is_zero());
    if let Some(q) = quantity {
        check_declared_dimension(formula, q, declared_dimension)?;
    }

    let applicable: Vec<EmissionFactor> = candidates
        .iter()
        .filter(|f| f.matches_activity(activity))
        .cloned()
        .collect();
    if applicable.len() < candidates.len() {
        debug!(
            methodology = formula.methodology,
            discarded = candidates.len() - applicable.len(),
            "Discarded factors whose metadata the activity does not match"
        );
    }
    let fuel_type = formula
        .classifier_field
        .and_then(|field| activity.classification(field));

    let mut result = GasAmounts::default();
    for &gas in formula.gases {
        let factor = match emission_factor::resolve(gas, &applicable, context.region) {
            Ok(factor) => factor,
            Err(CalculationError::NoApplicableFactor { gas }) => {
                warn!(
                    methodology = formula.methodology,
                    gas = %gas,
                    region = context.region.unwrap_or("world"),
                    "No applicable emission factor; omitting gas"
                );
                result.omitted.push(gas);
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(q) = quantity else {
            result.insert(gas, Decimal::ZERO, Some(factor));
            continue;
        };

        let per_unit = factor.units.per();
        let normalized = match formula.conversion {
            Conversion::FuelDensity => {
                q.unit
                    .convert_with_density(q.amount, per_unit, context.densities, fuel_type)?
            }
            Conversion::SameDimension => q.unit.convert(q.amount, per_unit)?,
        };
        let mass = decimal::mul(normalized, factor.emissions_per_activity, "gas amount")?;
        let mass_kg = decimal::mul(mass, factor.units.mass_to_kg(), "gas amount")?;

        debug!(
            methodology = formula.methodology,
            gas = %gas,
            factor = %factor.emissions_per_activity,
            units = %factor.units,
            mass_kg = %mass_kg,
            "Calculated gas amount"
        );
        result.insert(gas, mass_kg, Some(factor));
    }
    Ok(result)
}

fn check_declared_dimension(
    formula: &Formula,
    quantity: &Quantity,
    declared: Dimension,
) -> CalculationResult<()> {
    let actual = quantity.unit.dimension();
    let density_pair = matches!(
        (actual, declared),
        (Dimension::Mass, Dimension::Volume) | (Dimension::Volume, Dimension::Mass)
    );
    if actual == declared || (formula.conversion == Conversion::FuelDensity && density_pair) {
        Ok(())
    } else {
        Err(CalculationError::IncompatibleUnits {
            from: quantity.unit.to_string(),
            to: declared.to_string(),
        })
    }
}

fn direct_measure(formula: &Formula, activity: &ActivityRecord) -> CalculationResult<GasAmounts> {
    let kg = Unit::parse("kg")?;
    let mut result = GasAmounts::default();
    for &gas in formula.gases {
        let Some(q) = activity.quantity(Formula::direct_measure_field(gas)) else {
            result.omitted.push(gas);
            continue;
        };
        if q.unit.dimension() != Dimension::Mass {
            return Err(CalculationError::IncompatibleUnits {
                from: q.unit.to_string(),
                to: kg.to_string(),
            });
        }
        result.insert(gas, q.unit.convert(q.amount, &kg)?, None);
    }
    Ok(result)
}

//! Presentation of inventory results.
//!
//! This is the only place amounts are rounded. Values are converted from kg
//! to the requested [`MassUnit`] first and rounded once, half away from
//! zero.

use crate::decimal::{self, round_for_display};
use crate::errors::CalculationResult;
use crate::gas::{Gas, GwpSet};
use crate::gpc::{GpcReference, Scope, Sector};
use crate::inventory::{Inventory, InventoryEntry};
use crate::units::MassUnit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How figures are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// default: t
    pub unit: MassUnit,
    /// default: 2
    pub decimal_places: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            unit: MassUnit::Tonne,
            decimal_places: 2,
        }
    }
}

impl ReportOptions {
    fn present(&self, kg: Decimal) -> CalculationResult<Decimal> {
        Ok(round_for_display(self.unit.from_kg(kg)?, self.decimal_places))
    }
}

/// One inventory entry as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub gpc_reference: GpcReference,
    pub sector: Sector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub methodology: String,
    /// Physical mass per gas. Gases with no amount are absent.
    pub gases: BTreeMap<Gas, Decimal>,
    pub co2e: Decimal,
    pub unit: MassUnit,
    pub gwp_set: GwpSet,
}

/// Rows for every entry of `inventory`, in GPC order.
pub fn rows(inventory: &Inventory, options: ReportOptions) -> CalculationResult<Vec<ReportRow>> {
    inventory.entries().map(|entry| row(entry, options)).collect()
}

fn row(entry: &InventoryEntry, options: ReportOptions) -> CalculationResult<ReportRow> {
    let gases = entry
        .gas_totals_kg()?
        .into_iter()
        .map(|(gas, kg)| Ok((gas, options.present(kg)?)))
        .collect::<CalculationResult<_>>()?;
    Ok(ReportRow {
        gpc_reference: entry.gpc_reference(),
        sector: entry.sector(),
        scope: entry.scope(),
        methodology: entry.methodology().to_string(),
        gases,
        co2e: options.present(entry.total_co2e_kg())?,
        unit: options.unit,
        gwp_set: entry.gwp_set(),
    })
}

/// CO2e per sector plus the inventory total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub sectors: BTreeMap<Sector, Decimal>,
    pub total: Decimal,
    pub unit: MassUnit,
}

/// Rolls the inventory up by sector.
///
/// Sector figures and the total are each rounded from unrounded sums, so
/// the rounded sectors may not add up to the rounded total in the last
/// digit.
pub fn sector_summary(
    inventory: &Inventory,
    options: ReportOptions,
) -> CalculationResult<SectorSummary> {
    let sectors = inventory
        .totals_by_sector()?
        .into_iter()
        .map(|(sector, kg)| Ok((sector, options.present(kg)?)))
        .collect::<CalculationResult<_>>()?;
    let total_kg = decimal::sum(
        inventory.entries().map(InventoryEntry::total_co2e_kg),
        "report total",
    )?;
    Ok(SectorSummary {
        sectors,
        total: options.present(total_kg)?,
        unit: options.unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityRecord;
    use crate::emission_factor::EmissionFactor;
    use crate::engine::EmissionsEngine;
    use crate::units::{FactorUnit, Unit};
    use rust_decimal_macros::dec;

    fn inventory() -> Inventory {
        let mut inventory = Inventory::new("Example City", 2023, EmissionsEngine::new());
        let per_litre = FactorUnit::parse("kg/L").unwrap();

        let entry = inventory
            .entry_or_insert("II.1.1", "fuel-sales")
            .unwrap();
        entry
            .set_factors(vec![
                EmissionFactor::new(Gas::CO2, dec!(2.68), per_litre.clone()),
                EmissionFactor::new(Gas::CH4, dec!(0.0001), per_litre.clone()),
                EmissionFactor::new(Gas::N2O, dec!(0.00001), per_litre),
            ])
            .unwrap();
        entry
            .upsert_activity(
                "diesel",
                ActivityRecord::new()
                    .with_quantity("fuel-sold", dec!(1000), Unit::parse("L").unwrap())
                    .with_classification("fuel-type", "fuel-type-diesel"),
            )
            .unwrap();

        let waste = inventory.entry_or_insert("III.1.1", "direct-measure").unwrap();
        waste
            .upsert_activity(
                "landfill",
                ActivityRecord::new().with_quantity(
                    "ch4-amount",
                    dec!(12.345),
                    Unit::parse("t").unwrap(),
                ),
            )
            .unwrap();
        inventory
    }

    #[test]
    fn test_rows_in_tonnes() {
        let rows = rows(&inventory(), ReportOptions::default()).unwrap();
        assert_eq!(rows.len(), 2);

        let transport = &rows[0];
        assert_eq!(transport.gpc_reference.to_string(), "II.1.1");
        assert_eq!(transport.scope, Some(Scope::One));
        // 2685.53 kg
        assert_eq!(transport.co2e, dec!(2.69));
        assert_eq!(transport.gases[&Gas::CO2], dec!(2.68));
        assert_eq!(transport.gases[&Gas::N2O], Decimal::ZERO);

        let waste = &rows[1];
        assert_eq!(waste.sector, Sector::Waste);
        // 12.345 t CH4 * 28
        assert_eq!(waste.co2e, dec!(345.66));
        assert_eq!(waste.gases[&Gas::CH4], dec!(12.35));
        assert!(!waste.gases.contains_key(&Gas::CO2));
    }

    #[test]
    fn test_rows_in_kg_keep_precision() {
        let options = ReportOptions {
            unit: MassUnit::Kilogram,
            decimal_places: 3,
        };
        let rows = rows(&inventory(), options).unwrap();
        assert_eq!(rows[0].co2e, dec!(2685.53));
        assert_eq!(rows[0].gases[&Gas::N2O], dec!(0.01));
    }

    #[test]
    fn test_sector_summary() {
        let summary = sector_summary(
            &inventory(),
            ReportOptions {
                unit: MassUnit::Kilotonne,
                decimal_places: 4,
            },
        )
        .unwrap();
        assert_eq!(summary.sectors[&Sector::Transportation], dec!(0.0027));
        assert_eq!(summary.sectors[&Sector::Waste], dec!(0.3457));
        assert_eq!(summary.total, dec!(0.3483));
        assert_eq!(summary.unit, MassUnit::Kilotonne);
    }

    #[test]
    fn test_row_serialization() {
        let rows = rows(&inventory(), ReportOptions::default()).unwrap();
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["gpc_reference"], "III.1.1");
        assert_eq!(json["scope"], "1");
        assert_eq!(json["unit"], "t");
        assert_eq!(json["co2e"], "345.66");
    }
}

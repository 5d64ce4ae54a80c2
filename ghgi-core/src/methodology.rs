//! Registry of calculation methodologies.
//!
//! A methodology tells the engine how to turn an activity record into gas
//! amounts: which quantity field to read, which classification field
//! selects emission factors and densities, and which gases apply. The table
//! is static and keyed by methodology identifier plus a GPC reference
//! prefix; the most specific prefix wins.
//!
//! | Methodology | GPC | Quantity field | Gases |
//! |-------------|-----|----------------|-------|
//! | `fuel-combustion-consumption` | I., II. | `fuel-consumption` | CO2, CH4, N2O |
//! | `fuel-sales` | II. | `fuel-sold` | CO2, CH4, N2O |
//! | `energy-consumption` | I., II. | `energy-consumption` | CO2, CH4, N2O |
//! | `vehicle-distance` | II. | `distance-travelled` | CO2, CH4, N2O |
//! | `waste-disposal` | III. | `waste-mass` | CH4 |
//! | `direct-measure` | any | `<gas>-amount` | CO2, CH4, N2O |

use crate::errors::{CalculationError, CalculationResult};
use crate::gas::Gas;
use crate::gpc::GpcReference;
use crate::units::Dimension;
use std::sync::LazyLock;

const ALL_GASES: &[Gas] = &[Gas::CO2, Gas::CH4, Gas::N2O];

/// How the activity is turned into gas masses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    /// `gas = activity * emission_factor[gas]`
    ActivityTimesFactor {
        /// Activity field holding the quantity.
        quantity_field: &'static str,
        /// Dimension the quantity is declared in.
        declared_dimension: Dimension,
    },
    /// The activity already carries one mass per gas, in
    /// `<gas>-amount` fields (`co2-amount`, `ch4-amount`, `n2o-amount`).
    DirectMeasure,
}

/// Conversion applied to the activity before it meets an emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Only conversions within a dimension (L -> m3, kWh -> TJ).
    SameDimension,
    /// Volume <-> mass via the fuel density of the classified fuel type.
    FuelDensity,
}

/// A formula definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub methodology: &'static str,
    /// GPC reference prefix this formula is registered under; `""` for any.
    pub gpc_prefix: &'static str,
    pub kind: FormulaKind,
    /// Classification field that selects fuel densities (and factors).
    pub classifier_field: Option<&'static str>,
    pub conversion: Conversion,
    pub gases: &'static [Gas],
}

impl Formula {
    /// The activity field holding the mass of `gas` for direct measurements.
    #[must_use]
    pub fn direct_measure_field(gas: Gas) -> &'static str {
        match gas {
            Gas::CO2 => "co2-amount",
            Gas::CH4 => "ch4-amount",
            Gas::N2O => "n2o-amount",
        }
    }
}

/// The global methodology registry.
pub static METHODOLOGY_REGISTRY: LazyLock<MethodologyRegistry> =
    LazyLock::new(MethodologyRegistry::new);

/// Keyed lookup of [`Formula`]s.
#[derive(Debug)]
pub struct MethodologyRegistry {
    formulas: Vec<Formula>,
}

impl Default for MethodologyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodologyRegistry {
    pub fn new() -> Self {
        let fuel = |methodology: &'static str,
                    gpc_prefix: &'static str,
                    quantity_field: &'static str| Formula {
            methodology,
            gpc_prefix,
            kind: FormulaKind::ActivityTimesFactor {
                quantity_field,
                declared_dimension: Dimension::Volume,
            },
            classifier_field: Some("fuel-type"),
            conversion: Conversion::FuelDensity,
            gases: ALL_GASES,
        };
        let energy = |gpc_prefix: &'static str| Formula {
            methodology: "energy-consumption",
            gpc_prefix,
            kind: FormulaKind::ActivityTimesFactor {
                quantity_field: "energy-consumption",
                declared_dimension: Dimension::Energy,
            },
            classifier_field: None,
            conversion: Conversion::SameDimension,
            gases: ALL_GASES,
        };

        let formulas = vec![
            fuel("fuel-combustion-consumption", "I.", "fuel-consumption"),
            fuel("fuel-combustion-consumption", "II.", "fuel-consumption"),
            fuel("fuel-sales", "II.", "fuel-sold"),
            energy("I."),
            energy("II."),
            Formula {
                methodology: "vehicle-distance",
                gpc_prefix: "II.",
                kind: FormulaKind::ActivityTimesFactor {
                    quantity_field: "distance-travelled",
                    declared_dimension: Dimension::Length,
                },
                classifier_field: Some("vehicle-type"),
                conversion: Conversion::SameDimension,
                gases: ALL_GASES,
            },
            Formula {
                methodology: "waste-disposal",
                gpc_prefix: "III.",
                kind: FormulaKind::ActivityTimesFactor {
                    quantity_field: "waste-mass",
                    declared_dimension: Dimension::Mass,
                },
                classifier_field: Some("waste-type"),
                conversion: Conversion::SameDimension,
                gases: &[Gas::CH4],
            },
            Formula {
                methodology: "direct-measure",
                gpc_prefix: "",
                kind: FormulaKind::DirectMeasure,
                classifier_field: None,
                conversion: Conversion::SameDimension,
                gases: ALL_GASES,
            },
        ];
        Self { formulas }
    }

    /// Returns the formula for `methodology` under `gpc_reference_number`.
    ///
    /// # Errors
    ///
    /// - `InvalidGpcReference` if the reference number does not parse
    /// - `UnknownMethodology` if nothing is registered for the combination
    pub fn lookup(
        &self,
        methodology: &str,
        gpc_reference_number: &str,
    ) -> CalculationResult<&Formula> {
        let reference = GpcReference::parse(gpc_reference_number)?;
        self.formulas
            .iter()
            .filter(|f| f.methodology == methodology && reference.matches_prefix(f.gpc_prefix))
            .max_by_key(|f| f.gpc_prefix.len())
            .ok_or_else(|| CalculationError::UnknownMethodology {
                methodology: methodology.to_string(),
                gpc_reference_number: gpc_reference_number.to_string(),
            })
    }

    /// Identifiers of all registered methodologies, deduplicated and sorted.
    #[must_use]
    pub fn methodologies(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.formulas.iter().map(|f| f.methodology).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

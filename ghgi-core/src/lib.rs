//! Emission calculations for city greenhouse-gas inventories.
//!
//! Given an activity record (fuel burnt, energy used, distance driven, waste
//! landfilled …), a methodology and a set of candidate emission factors, the
//! engine computes the mass of each gas and the CO2-equivalent total:
//!
//! ```
//! use ghgi_core::{calculate_gas_amounts, ActivityRecord, EmissionFactor, Gas};
//! use ghgi_core::units::{FactorUnit, Unit};
//! use rust_decimal_macros::dec;
//!
//! let activity = ActivityRecord::new()
//!     .with_quantity("fuel-consumption", dec!(1000), Unit::parse("L").unwrap())
//!     .with_classification("fuel-type", "fuel-type-diesel");
//! let per_litre = FactorUnit::parse("kg/L").unwrap();
//! let factors = vec![
//!     EmissionFactor::new(Gas::CO2, dec!(2.68), per_litre.clone()),
//!     EmissionFactor::new(Gas::CH4, dec!(0.0001), per_litre.clone()),
//!     EmissionFactor::new(Gas::N2O, dec!(0.00001), per_litre),
//! ];
//!
//! let result =
//!     calculate_gas_amounts(&activity, "fuel-combustion-consumption", "I.1.1", &factors).unwrap();
//! assert_eq!(result.total_co2e_kg, dec!(2685.53));
//! ```
//!
//! All arithmetic uses [`rust_decimal::Decimal`]; nothing is rounded until
//! [`report`] presents it.

pub mod activity;
pub mod aggregate;
pub mod calculator;
pub mod config;
pub mod datasource;
pub mod decimal;
pub mod emission_factor;
pub mod engine;
pub mod gas;
pub mod gpc;
pub mod inventory;
pub mod methodology;
pub mod python;
pub mod report;
pub mod units;
pub mod validation;

pub mod errors;

pub use activity::{ActivityRecord, Quantity, SourceAttribution};
pub use aggregate::{EmissionsResult, GasBreakdown};
pub use config::EngineConfig;
pub use emission_factor::EmissionFactor;
pub use engine::{calculate_gas_amounts, EmissionsEngine};
pub use errors::{CalculationError, CalculationResult};
pub use gas::{Gas, GwpSet};

//! Unit conversion calculations.
//!
//! This module provides the high-level [`Unit`] and [`FactorUnit`] types that
//! combine parsing and conversion, plus [`MassUnit`] for presenting results.
//!
//! # Example
//!
//! ```
//! use ghgi_core::units::{FactorUnit, Unit};
//! use rust_decimal_macros::dec;
//!
//! let kl = Unit::parse("kL").unwrap();
//! let litres = Unit::parse("litres").unwrap();
//! assert_eq!(kl.convert(dec!(2.5), &litres).unwrap(), dec!(2500));
//!
//! let factor_unit = FactorUnit::parse("kg/L").unwrap();
//! assert_eq!(factor_unit.per().original(), "L");
//! ```

use super::density::DensityTable;
use super::dimension::Dimension;
use super::parser::{parse_symbol, split_ratio, ParseError};
use super::registry::UnitInfo;
use crate::decimal;
use crate::errors::{CalculationError, CalculationResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed and validated unit.
///
/// Two units are equal if they resolve to the same dimension and factor, so
/// `Unit::parse("L") == Unit::parse("litres")`.
#[derive(Debug, Clone)]
pub struct Unit {
    /// The original input string (preserved for display).
    original: String,
    info: UnitInfo,
}

impl Unit {
    /// Parses a unit string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let info = parse_symbol(input)?;
        Ok(Self {
            original: input.trim().to_string(),
            info,
        })
    }

    /// Returns the original input string.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.info.dimension
    }

    /// Returns the multiplier to the base unit of this unit's dimension.
    #[must_use]
    pub fn to_base_factor(&self) -> Decimal {
        self.info.to_base_factor
    }

    /// Returns true if this unit can be converted to `other` without extra
    /// physical information.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.dimension() == other.dimension()
    }

    /// Calculates the conversion factor from this unit to the target unit.
    ///
    /// # Errors
    ///
    /// `IncompatibleUnits` if the dimensions differ.
    pub fn conversion_factor(&self, other: &Self) -> CalculationResult<Decimal> {
        if !self.is_compatible(other) {
            return Err(self.incompatible(other));
        }
        // value_other = value_self * (factor_self / factor_other)
        decimal::div(
            self.to_base_factor(),
            other.to_base_factor(),
            "unit conversion factor",
        )
    }

    /// Converts a value from this unit to the target unit.
    pub fn convert(&self, value: Decimal, other: &Self) -> CalculationResult<Decimal> {
        if !self.is_compatible(other) {
            return Err(self.incompatible(other));
        }
        // Go through the base unit rather than the ratio so that factors
        // like 1/3 never get materialised and truncated.
        let base = decimal::mul(value, self.to_base_factor(), "unit conversion")?;
        decimal::div(base, other.to_base_factor(), "unit conversion")
    }

    /// Converts a quantity to `target`, going through a fuel density when
    /// the quantity is a volume and the target a mass (or vice versa).
    ///
    /// # Errors
    ///
    /// - `MissingDensity` when a density is needed but `fuel_type` has none
    /// - `IncompatibleUnits` for any other cross-dimension conversion
    pub fn convert_with_density(
        &self,
        value: Decimal,
        target: &Self,
        densities: &DensityTable,
        fuel_type: Option<&str>,
    ) -> CalculationResult<Decimal> {
        match (self.dimension(), target.dimension()) {
            (from, to) if from == to => self.convert(value, target),
            (Dimension::Volume, Dimension::Mass) => {
                let volume_m3 = decimal::mul(value, self.to_base_factor(), "unit conversion")?;
                let mass_kg = densities.volume_to_mass(volume_m3, fuel_type)?;
                decimal::div(mass_kg, target.to_base_factor(), "unit conversion")
            }
            (Dimension::Mass, Dimension::Volume) => {
                let mass_kg = decimal::mul(value, self.to_base_factor(), "unit conversion")?;
                let volume_m3 = densities.mass_to_volume(mass_kg, fuel_type)?;
                decimal::div(volume_m3, target.to_base_factor(), "unit conversion")
            }
            _ => Err(self.incompatible(target)),
        }
    }

    fn incompatible(&self, other: &Self) -> CalculationError {
        CalculationError::IncompatibleUnits {
            from: self.original.clone(),
            to: other.original.clone(),
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.info.dimension == other.info.dimension
            && self.info.to_base_factor == other.info.to_base_factor
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for Unit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Unit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The unit of an emission factor: a mass of gas per unit of activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorUnit {
    mass: Unit,
    per: Unit,
}

impl FactorUnit {
    /// Parses a compound unit like `kg/L` or `t per TJ`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (num, den) =
            split_ratio(input).ok_or_else(|| ParseError::NotAFactorUnit(input.to_string()))?;
        let mass = Unit::parse(&num)?;
        if mass.dimension() != Dimension::Mass {
            return Err(ParseError::NumeratorNotMass {
                unit: num,
                dimension: mass.dimension(),
            });
        }
        let per = Unit::parse(&den)?;
        Ok(Self { mass, per })
    }

    /// The mass unit of the emitted gas.
    #[must_use]
    pub fn mass(&self) -> &Unit {
        &self.mass
    }

    /// The activity unit the factor is expressed per.
    #[must_use]
    pub fn per(&self) -> &Unit {
        &self.per
    }

    /// Multiplier that turns an amount in the numerator unit into kg.
    #[must_use]
    pub fn mass_to_kg(&self) -> Decimal {
        self.mass.to_base_factor()
    }
}

impl fmt::Display for FactorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mass, self.per)
    }
}

impl Serialize for FactorUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FactorUnit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Mass units used when presenting totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MassUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "t")]
    Tonne,
    #[serde(rename = "kt")]
    Kilotonne,
    #[serde(rename = "Mt")]
    Megatonne,
    #[serde(rename = "Gt")]
    Gigatonne,
}

impl MassUnit {
    /// Kilograms per one of this unit.
    #[must_use]
    pub fn kilograms(&self) -> Decimal {
        match self {
            MassUnit::Kilogram => Decimal::ONE,
            MassUnit::Tonne => dec!(1000),
            MassUnit::Kilotonne => dec!(1000000),
            MassUnit::Megatonne => dec!(1000000000),
            MassUnit::Gigatonne => dec!(1000000000000),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Tonne => "t",
            MassUnit::Kilotonne => "kt",
            MassUnit::Megatonne => "Mt",
            MassUnit::Gigatonne => "Gt",
        }
    }

    /// Converts a mass in kilograms to this unit. Not rounded.
    pub fn from_kg(&self, kg: Decimal) -> CalculationResult<Decimal> {
        decimal::div(kg, self.kilograms(), "mass unit conversion")
    }

    /// Converts a mass in this unit to kilograms.
    pub fn to_kg(&self, value: Decimal) -> CalculationResult<Decimal> {
        decimal::mul(value, self.kilograms(), "mass unit conversion")
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for MassUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kg" => Ok(MassUnit::Kilogram),
            "t" | "tonne" | "tonnes" => Ok(MassUnit::Tonne),
            "kt" => Ok(MassUnit::Kilotonne),
            "Mt" => Ok(MassUnit::Megatonne),
            "Gt" => Ok(MassUnit::Gigatonne),
            "" => Err(ParseError::Empty),
            other => Err(ParseError::UnknownSymbol(other.to_string())),
        }
    }
}

/// Converts a mass between two presentation units.
pub fn convert_mass(value: Decimal, from: MassUnit, to: MassUnit) -> CalculationResult<Decimal> {
    to.from_kg(from.to_kg(value)?)
}

//! Greenhouse gases and Global Warming Potential coefficient sets.
//!
//! GWP coefficients convert a mass of a gas into the mass of CO2 that would
//! cause the same warming over a 100-year horizon. The coefficients change
//! between IPCC Assessment Reports, so the set is selectable per inventory.
//!
//! | Gas | AR4 | AR5 | AR6 |
//! |-----|-----|-----|-----|
//! | CO2 | 1   | 1   | 1   |
//! | CH4 | 25  | 28  | 28  |
//! | N2O | 298 | 265 | 273 |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A greenhouse gas tracked by the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gas {
    CO2,
    CH4,
    N2O,
}

impl Gas {
    /// All gases, in reporting order.
    pub const ALL: [Gas; 3] = [Gas::CO2, Gas::CH4, Gas::N2O];

    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Gas::CO2 => "CO2",
            Gas::CH4 => "CH4",
            Gas::N2O => "N2O",
        }
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Gas {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CO2" => Ok(Gas::CO2),
            "CH4" => Ok(Gas::CH4),
            "N2O" => Ok(Gas::N2O),
            other => Err(format!("unknown gas '{other}'")),
        }
    }
}

/// IPCC Assessment Report whose GWP-100 values are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GwpSet {
    AR4,
    AR5,
    #[default]
    AR6,
}

impl GwpSet {
    /// Returns the coefficients for this set.
    #[must_use]
    pub fn coefficients(&self) -> GwpCoefficients {
        match self {
            GwpSet::AR4 => GwpCoefficients {
                co2: Decimal::ONE,
                ch4: dec!(25),
                n2o: dec!(298),
            },
            GwpSet::AR5 => GwpCoefficients {
                co2: Decimal::ONE,
                ch4: dec!(28),
                n2o: dec!(265),
            },
            GwpSet::AR6 => GwpCoefficients {
                co2: Decimal::ONE,
                ch4: dec!(28),
                n2o: dec!(273),
            },
        }
    }

    /// Shorthand for `self.coefficients().get(gas)`.
    #[must_use]
    pub fn coefficient(&self, gas: Gas) -> Decimal {
        self.coefficients().get(gas)
    }
}

impl fmt::Display for GwpSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GwpSet::AR4 => "AR4",
            GwpSet::AR5 => "AR5",
            GwpSet::AR6 => "AR6",
        };
        f.write_str(name)
    }
}

impl FromStr for GwpSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AR4" => Ok(GwpSet::AR4),
            "AR5" => Ok(GwpSet::AR5),
            "AR6" => Ok(GwpSet::AR6),
            other => Err(format!("unknown GWP set '{other}'")),
        }
    }
}

/// GWP-100 coefficients for one assessment report
///
/// unit: kg CO2e per kg of gas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpCoefficients {
    /// default: 1 (by definition)
    pub co2: Decimal,
    /// Fossil and non-fossil methane share a single coefficient here.
    pub ch4: Decimal,
    pub n2o: Decimal,
}

impl GwpCoefficients {
    #[must_use]
    pub fn get(&self, gas: Gas) -> Decimal {
        match gas {
            Gas::CO2 => self.co2,
            Gas::CH4 => self.ch4,
            Gas::N2O => self.n2o,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_is_ar6() {
        assert_eq!(GwpSet::default(), GwpSet::AR6);
    }

    #[test]
    fn test_co2_is_unity_everywhere() {
        for set in [GwpSet::AR4, GwpSet::AR5, GwpSet::AR6] {
            assert_eq!(set.coefficient(Gas::CO2), Decimal::ONE);
        }
    }

    #[test]
    fn test_ar5_ar6_n2o() {
        assert_eq!(GwpSet::AR5.coefficient(Gas::N2O), dec!(265));
        assert_eq!(GwpSet::AR6.coefficient(Gas::N2O), dec!(273));
        assert_eq!(GwpSet::AR5.coefficient(Gas::CH4), dec!(28));
    }

    #[test]
    fn test_parse() {
        assert_eq!("ch4".parse::<Gas>().unwrap(), Gas::CH4);
        assert_eq!(" ar5 ".parse::<GwpSet>().unwrap(), GwpSet::AR5);
        assert!("SF6".parse::<Gas>().is_err());
        assert!("AR7".parse::<GwpSet>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Gas::N2O).unwrap();
        assert_eq!(json, "\"N2O\"");
        let set: GwpSet = serde_json::from_str("\"AR5\"").unwrap();
        assert_eq!(set, GwpSet::AR5);
    }
}

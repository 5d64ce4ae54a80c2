//! GPC reference numbers.
//!
//! The Global Protocol for Community-scale GHG inventories classifies every
//! emission source by a reference number of the form
//! `<sector>.<subsector>[.<subcategory>]`, e.g. `I.1.1` (residential
//! buildings, in-boundary fuel combustion) or `III.2` (biological treatment
//! of waste). Sectors are roman numerals I to VI.

use crate::errors::{CalculationError, CalculationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level GPC sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    StationaryEnergy,
    Transportation,
    Waste,
    IndustrialProcesses,
    Afolu,
    OtherScope3,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::StationaryEnergy,
        Sector::Transportation,
        Sector::Waste,
        Sector::IndustrialProcesses,
        Sector::Afolu,
        Sector::OtherScope3,
    ];

    #[must_use]
    pub fn numeral(&self) -> &'static str {
        match self {
            Sector::StationaryEnergy => "I",
            Sector::Transportation => "II",
            Sector::Waste => "III",
            Sector::IndustrialProcesses => "IV",
            Sector::Afolu => "V",
            Sector::OtherScope3 => "VI",
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Sector::StationaryEnergy => "Stationary Energy",
            Sector::Transportation => "Transportation",
            Sector::Waste => "Waste",
            Sector::IndustrialProcesses => "Industrial Processes and Product Uses",
            Sector::Afolu => "Agriculture, Forestry and Other Land Use",
            Sector::OtherScope3 => "Other Scope 3",
        }
    }

    fn from_numeral(numeral: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.numeral() == numeral)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emission scope (1: in-boundary, 2: grid energy, 3: out-of-boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            Scope::One => 1,
            Scope::Two => 2,
            Scope::Three => 3,
        };
        write!(f, "{n}")
    }
}

/// A parsed GPC reference number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpcReference {
    pub sector: Sector,
    pub subsector: u8,
    pub subcategory: Option<u8>,
}

impl GpcReference {
    pub fn parse(input: &str) -> CalculationResult<Self> {
        let invalid = || CalculationError::InvalidGpcReference(input.to_string());
        let mut parts = input.trim().split('.');

        let sector = parts
            .next()
            .and_then(Sector::from_numeral)
            .ok_or_else(invalid)?;
        let subsector = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(invalid)?;
        let subcategory = match parts.next() {
            Some(p) => Some(p.parse::<u8>().ok().filter(|n| *n > 0).ok_or_else(invalid)?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            sector,
            subsector,
            subcategory,
        })
    }

    /// The scope implied by the numbering, where there is one.
    ///
    /// Energy sectors encode the scope in the subcategory digit. Waste
    /// subcategory 1 is in-boundary and 2 is treatment outside the city.
    /// IPPU and AFOLU are in-boundary by definition, and sector VI is
    /// out-of-boundary.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        match self.sector {
            Sector::StationaryEnergy | Sector::Transportation => match self.subcategory? {
                1 => Some(Scope::One),
                2 => Some(Scope::Two),
                3 => Some(Scope::Three),
                _ => None,
            },
            Sector::Waste => match self.subcategory? {
                1 | 3 => Some(Scope::One),
                2 => Some(Scope::Three),
                _ => None,
            },
            Sector::IndustrialProcesses | Sector::Afolu => Some(Scope::One),
            Sector::OtherScope3 => Some(Scope::Three),
        }
    }

    /// True if `prefix` (e.g. `"II."` or `"I.1"`) selects this reference.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        let rendered = format!("{self}.");
        if prefix.ends_with('.') {
            rendered.starts_with(prefix)
        } else {
            rendered.starts_with(&format!("{prefix}."))
        }
    }
}

impl fmt::Display for GpcReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sector.numeral(), self.subsector)?;
        if let Some(subcategory) = self.subcategory {
            write!(f, ".{subcategory}")?;
        }
        Ok(())
    }
}

impl FromStr for GpcReference {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GpcReference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GpcReference {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reference() {
        let reference = GpcReference::parse("II.4.3").unwrap();
        assert_eq!(reference.sector, Sector::Transportation);
        assert_eq!(reference.subsector, 4);
        assert_eq!(reference.subcategory, Some(3));
        assert_eq!(reference.to_string(), "II.4.3");
    }

    #[test]
    fn test_parse_without_subcategory() {
        let reference = GpcReference::parse("V.2").unwrap();
        assert_eq!(reference.sector, Sector::Afolu);
        assert_eq!(reference.subcategory, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "VII.1", "I", "I.x", "I.0", "I.1.1.1", "i.1.1"] {
            assert!(
                matches!(
                    GpcReference::parse(bad),
                    Err(CalculationError::InvalidGpcReference(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_scopes() {
        let scope = |r: &str| GpcReference::parse(r).unwrap().scope();
        assert_eq!(scope("I.1.1"), Some(Scope::One));
        assert_eq!(scope("I.2.2"), Some(Scope::Two));
        assert_eq!(scope("II.1.3"), Some(Scope::Three));
        assert_eq!(scope("III.1.2"), Some(Scope::Three));
        assert_eq!(scope("IV.1"), Some(Scope::One));
        assert_eq!(scope("VI.1"), Some(Scope::Three));
        assert_eq!(scope("I.1"), None);
    }

    #[test]
    fn test_prefix_matching() {
        let reference = GpcReference::parse("II.1.1").unwrap();
        assert!(reference.matches_prefix(""));
        assert!(reference.matches_prefix("II."));
        assert!(reference.matches_prefix("II.1"));
        assert!(reference.matches_prefix("II.1.1"));
        assert!(!reference.matches_prefix("I."));
        assert!(!reference.matches_prefix("II.1.2"));

        let tenth = GpcReference::parse("II.10.1").unwrap();
        assert!(!tenth.matches_prefix("II.1"));
    }

    #[test]
    fn test_serde_as_string() {
        let reference: GpcReference = serde_json::from_str("\"III.1.1\"").unwrap();
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"III.1.1\"");
    }
}

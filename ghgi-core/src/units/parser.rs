//! Parsing of unit strings.
//!
//! Two shapes are accepted:
//!
//! - a simple unit symbol such as `L`, `kWh`, `t` or an alias like `litres`
//! - a compound emission-factor unit: a mass over an activity unit
//!
//! | Notation | Meaning |
//! |----------|---------|
//! | `kg/L`, `kg / L` | kilograms per litre |
//! | `kg per L` | kilograms per litre |
//! | `kg L-1`, `kg L^-1`, `kg L**-1` | kilograms per litre |
//! | `t/TJ` | tonnes per terajoule |
//!
//! Whitespace is normalized automatically.

use super::dimension::Dimension;
use super::registry::{UnitInfo, UNIT_REGISTRY};
use thiserror::Error;

/// Error type for unit parsing failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty unit string")]
    Empty,
    #[error("unknown unit symbol '{0}'")]
    UnknownSymbol(String),
    #[error("'{0}' is not a mass over an activity unit")]
    NotAFactorUnit(String),
    #[error("emission factor numerator '{unit}' has dimension {dimension}, expected mass")]
    NumeratorNotMass { unit: String, dimension: Dimension },
}

/// Looks up a single unit symbol after trimming whitespace.
pub fn parse_symbol(input: &str) -> Result<UnitInfo, ParseError> {
    let symbol = input.trim();
    if symbol.is_empty() {
        return Err(ParseError::Empty);
    }
    UNIT_REGISTRY
        .lookup(symbol)
        .ok_or_else(|| ParseError::UnknownSymbol(symbol.to_string()))
}

/// Splits a compound unit string into numerator and denominator symbols.
///
/// Returns `None` when the string is a single symbol.
pub(crate) fn split_ratio(input: &str) -> Option<(String, String)> {
    let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some((num, den)) = normalized.split_once('/') {
        return Some((num.trim().to_string(), den.trim().to_string()));
    }
    if let Some((num, den)) = normalized.split_once(" per ") {
        return Some((num.trim().to_string(), den.trim().to_string()));
    }

    // "kg L-1" style: second token carries a -1 exponent
    let mut tokens = normalized.split(' ');
    let num = tokens.next()?;
    let den = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    let den = ["^-1", "**-1", "-1"]
        .iter()
        .find_map(|suffix| den.strip_suffix(suffix))?;
    Some((num.to_string(), den.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol() {
        let info = parse_symbol("  kWh ").unwrap();
        assert_eq!(info.dimension, Dimension::Energy);
        assert_eq!(parse_symbol(""), Err(ParseError::Empty));
        assert_eq!(
            parse_symbol("parsec"),
            Err(ParseError::UnknownSymbol("parsec".to_string()))
        );
    }

    #[test]
    fn test_split_ratio_notations() {
        let expected = Some(("kg".to_string(), "L".to_string()));
        assert_eq!(split_ratio("kg/L"), expected);
        assert_eq!(split_ratio("kg / L"), expected);
        assert_eq!(split_ratio("  kg   per L "), expected);
        assert_eq!(split_ratio("kg L-1"), expected);
        assert_eq!(split_ratio("kg L^-1"), expected);
        assert_eq!(split_ratio("kg L**-1"), expected);
    }

    #[test]
    fn test_split_ratio_single_symbol() {
        assert_eq!(split_ratio("kg"), None);
        assert_eq!(split_ratio("kg L"), None);
    }
}

use crate::gas::Gas;
use crate::units::ParseError;
use thiserror::Error;

/// Error type for emission calculations.
///
/// Every variant is a deterministic function of the inputs, so none of them
/// are worth retrying.
#[derive(Error, Debug)]
pub enum CalculationError {
    #[error("No formula registered for methodology '{methodology}' and GPC reference '{gpc_reference_number}'")]
    UnknownMethodology {
        methodology: String,
        gpc_reference_number: String,
    },
    #[error("Volume/mass conversion requires a density for fuel type '{fuel_type}' but none is registered")]
    MissingDensity { fuel_type: String },
    #[error("No applicable emission factor for {gas}")]
    NoApplicableFactor { gas: Gas },
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
    #[error("Cannot convert from '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },
    #[error("Invalid GPC reference number '{0}'")]
    InvalidGpcReference(String),
    #[error("Decimal overflow while computing {0}")]
    DecimalOverflow(&'static str),
    #[error("Division by zero while computing {0}")]
    DivisionByZero(&'static str),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl From<ParseError> for CalculationError {
    fn from(e: ParseError) -> Self {
        Self::UnknownUnit(e.to_string())
    }
}

/// Convenience type for `Result<T, CalculationError>`.
pub type CalculationResult<T> = Result<T, CalculationError>;

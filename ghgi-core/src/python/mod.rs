//! Python bindings for the calculation engine.
//!
//! Inputs and outputs cross the boundary as plain dicts and lists via
//! `pythonize`. Decimals are exchanged as strings so no precision is lost
//! to Python floats; numeric inputs are accepted too.
//!
//! ```python
//! from ghgi._lib.core import calculate
//!
//! result = calculate(
//!     {
//!         "quantities": {"fuel-consumption": {"amount": "1000", "unit": "L"}},
//!         "classification": {"fuel-type": "fuel-type-diesel"},
//!     },
//!     "fuel-combustion-consumption",
//!     "I.1.1",
//!     [{"gas": "CO2", "emissions_per_activity": "2.68", "units": "kg/L"}],
//! )
//! result["total_co2e_kg"]  # "2680"
//! ```

use crate::activity::ActivityRecord;
use crate::emission_factor::EmissionFactor;
use crate::engine::EmissionsEngine;
use crate::errors::CalculationError;
use crate::gas::{Gas, GwpSet};
use crate::methodology::METHODOLOGY_REGISTRY;
use crate::units::{convert_mass as convert_mass_units, MassUnit};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::{depythonize, pythonize};
use rust_decimal::Decimal;
use std::str::FromStr;

impl From<CalculationError> for PyErr {
    fn from(e: CalculationError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

fn parse<T: FromStr>(value: &str) -> PyResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// An emission calculator with a fixed GWP set and region.
#[pyclass(name = "Engine", frozen)]
pub struct PyEmissionsEngine(EmissionsEngine);

#[pymethods]
impl PyEmissionsEngine {
    #[new]
    #[pyo3(signature = (gwp_set="AR6", region=None))]
    fn new(gwp_set: &str, region: Option<String>) -> PyResult<Self> {
        let mut engine = EmissionsEngine::new().with_gwp_set(parse(gwp_set)?);
        if let Some(region) = region {
            engine = engine.with_region(region);
        }
        Ok(Self(engine))
    }

    /// Calculates per-gas amounts and the CO2e total of one activity.
    fn calculate<'py>(
        &self,
        py: Python<'py>,
        activity: &Bound<'py, PyAny>,
        methodology: &str,
        gpc_reference_number: &str,
        factors: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let activity: ActivityRecord = depythonize(activity)?;
        let factors: Vec<EmissionFactor> = depythonize(factors)?;
        let result = self
            .0
            .calculate(&activity, methodology, gpc_reference_number, &factors)?;
        Ok(pythonize(py, &result)?)
    }

    #[getter]
    fn gwp_set(&self) -> String {
        self.0.gwp_set().to_string()
    }

    #[getter]
    fn region(&self) -> Option<String> {
        self.0.region().map(str::to_string)
    }
}

/// Calculates emissions for one activity record.
///
/// Returns a dict with `per_gas`, `omitted_gases`, `total_co2e_kg` and
/// `gwp_set`. Raises `ValueError` for unknown methodologies, missing fuel
/// densities and malformed input.
#[pyfunction]
#[pyo3(signature = (activity, methodology, gpc_reference_number, factors, region=None, gwp_set="AR6"))]
pub fn calculate<'py>(
    py: Python<'py>,
    activity: &Bound<'py, PyAny>,
    methodology: &str,
    gpc_reference_number: &str,
    factors: &Bound<'py, PyAny>,
    region: Option<String>,
    gwp_set: &str,
) -> PyResult<Bound<'py, PyAny>> {
    PyEmissionsEngine::new(gwp_set, region)?.calculate(
        py,
        activity,
        methodology,
        gpc_reference_number,
        factors,
    )
}

/// Converts a mass between kg, t, kt, Mt and Gt. Values are decimal strings.
#[pyfunction]
pub fn convert_mass(value: &str, from_unit: &str, to_unit: &str) -> PyResult<String> {
    let value: Decimal = parse(value)?;
    let from: MassUnit = parse(from_unit)?;
    let to: MassUnit = parse(to_unit)?;
    Ok(convert_mass_units(value, from, to)?.normalize().to_string())
}

/// GWP-100 coefficient of `gas` in `gwp_set`, as a decimal string.
#[pyfunction]
pub fn gwp_coefficient(gas: &str, gwp_set: &str) -> PyResult<String> {
    let gas: Gas = parse(gas)?;
    let gwp_set: GwpSet = parse(gwp_set)?;
    Ok(gwp_set.coefficient(gas).to_string())
}

/// Identifiers of the registered methodologies.
#[pyfunction]
pub fn methodologies() -> Vec<&'static str> {
    METHODOLOGY_REGISTRY.methodologies()
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEmissionsEngine>()?;
    m.add_function(wrap_pyfunction!(calculate, m)?)?;
    m.add_function(wrap_pyfunction!(convert_mass, m)?)?;
    m.add_function(wrap_pyfunction!(gwp_coefficient, m)?)?;
    m.add_function(wrap_pyfunction!(methodologies, m)?)?;
    Ok(())
}

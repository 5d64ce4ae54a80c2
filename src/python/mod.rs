use ghgi_core::python::core;
use pyo3::prelude::*;
use pyo3::wrap_pymodule;

#[pymodule]
#[pyo3(name = "_lib")]
fn ghgi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;

    // Make `import ghgi._lib.core` work, not just attribute access
    let modules = PyModule::import_bound(m.py(), "sys")?.getattr("modules")?;
    modules.set_item("ghgi._lib.core", m.getattr("core")?)?;

    Ok(())
}

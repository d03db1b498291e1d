use crate::error::ImportError;
use crate::importer::Importer;
use pyo3::prelude::*;

fn to_py_err(err: ImportError) -> PyErr {
    let report = serde_json::to_string(&err.to_report()).unwrap_or_else(|_| err.to_string());
    PyErr::new::<pyo3::exceptions::PyValueError, _>(report)
}

/// Imports a workflow export and returns the canonical graph as JSON.
///
/// Args:
///     text (str): The export file content, as produced by Make, n8n or Zapier.
///
/// Returns:
///     str: A JSON document with `nodes`, `edges` and `metadata`. Every node
///         carries a `position`.
///
/// Raises:
///     ValueError: If the import fails. The message is a JSON error report
///         with `code`, `message` and optional `detail`.
#[pyfunction]
fn import_workflow(text: &str) -> PyResult<String> {
    let result = Importer::default().import_str(text).map_err(to_py_err)?;
    serde_json::to_string(&result)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

/// Detects which platform produced an export.
///
/// Args:
///     text (str): The export file content.
///
/// Returns:
///     str | None: "make", "n8n" or "zapier", or None if no platform matches.
///
/// Raises:
///     ValueError: If the text is too large or is not valid JSON.
#[pyfunction]
fn detect_platform(text: &str) -> PyResult<Option<&'static str>> {
    let platform = Importer::default().detect_str(text).map_err(to_py_err)?;
    Ok(platform.map(|p| p.as_str()))
}

/// Workflow export importer.
///
/// This module provides Python bindings to the flowport Rust library: platform
/// detection, validation, graph normalization and layout of Make, n8n and
/// Zapier exports.
#[pymodule]
fn flowport(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(import_workflow, m)?)?;
    m.add_function(wrap_pyfunction!(detect_platform, m)?)?;
    Ok(())
}

// Python-grensesnittet for UI-laget. UI-tilstand (side, skjema) lever
// utelukkende på Python-siden; her kommer bare rene kall inn.

use pyo3::exceptions::{PyPermissionError, PyValueError};
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::config::{load_config, MonitorConfig};
use crate::dates::DateLabel;
use crate::error::CoreError;
use crate::models::{PostMetrics, PreMetrics};
use crate::render::{CsvRenderer, JsonRenderer, ReportRenderer, TextRenderer};
use crate::service::LoadMonitor;
use crate::storage::JsonFileStore;

// ──────────────────────────────────────────────────────────────────────────────
// HJELPERE
// ──────────────────────────────────────────────────────────────────────────────

fn to_py_err(e: CoreError) -> PyErr {
    match e {
        CoreError::Unauthorized => PyPermissionError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn config_from(path: Option<&str>) -> PyResult<MonitorConfig> {
    match path {
        Some(p) => load_config(p).map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(MonitorConfig::default()),
    }
}

fn monitor(cfg: &MonitorConfig) -> LoadMonitor<JsonFileStore> {
    LoadMonitor::from_config(cfg)
}

fn date_or_today(date: Option<&str>) -> DateLabel {
    date.map(DateLabel::new).unwrap_or_else(DateLabel::today)
}

fn export_with(
    cfg: &MonitorConfig,
    date: &str,
    credential: &str,
    renderer: &dyn ReportRenderer,
) -> PyResult<(String, Vec<u8>)> {
    let policy = cfg.authorization_policy();
    let out = monitor(cfg)
        .export_report(policy.as_ref(), credential, &DateLabel::new(date), renderer)
        .map_err(to_py_err)?;
    Ok((out.file_name, out.bytes))
}

// ──────────────────────────────────────────────────────────────────────────────
// FANGST
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn today_label() -> String {
    DateLabel::today().to_string()
}

#[pyfunction]
#[pyo3(signature = (player, rest, stress, fatigue, date=None, config_path=None))]
fn submit_pre(
    player: &str,
    rest: i32,
    stress: i32,
    fatigue: i32,
    date: Option<&str>,
    config_path: Option<&str>,
) -> PyResult<()> {
    let cfg = config_from(config_path)?;
    let metrics = PreMetrics {
        rest_quality: rest,
        stress,
        muscular_fatigue: fatigue,
    };
    monitor(&cfg)
        .submit_pre(player, &date_or_today(date), metrics)
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (player, intensity, fatigue, date=None, config_path=None))]
fn submit_post(
    player: &str,
    intensity: i32,
    fatigue: i32,
    date: Option<&str>,
    config_path: Option<&str>,
) -> PyResult<()> {
    let cfg = config_from(config_path)?;
    let metrics = PostMetrics {
        perceived_intensity: intensity,
        current_fatigue: fatigue,
    };
    monitor(&cfg)
        .submit_post(player, &date_or_today(date), metrics)
        .map_err(to_py_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// STAB
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
#[pyo3(signature = (config_path=None))]
fn list_available_dates(config_path: Option<&str>) -> PyResult<Vec<String>> {
    let cfg = config_from(config_path)?;
    Ok(monitor(&cfg)
        .list_available_dates()
        .into_iter()
        .map(|d| d.to_string())
        .collect())
}

/// Rapportmodellen som Python-dict (via json.loads, uten pyo3 serde-feature).
#[pyfunction]
#[pyo3(signature = (date, credential, config_path=None))]
fn report_json(py: Python<'_>, date: &str, credential: &str, config_path: Option<&str>) -> PyResult<PyObject> {
    let cfg = config_from(config_path)?;
    let (_, bytes) = export_with(&cfg, date, credential, &JsonRenderer)?;
    let text = String::from_utf8(bytes).map_err(|e| PyValueError::new_err(e.to_string()))?;

    let json_mod = py
        .import("json")
        .map_err(|e| PyValueError::new_err(format!("failed to import json: {e}")))?;
    let obj = json_mod
        .call_method1("loads", (text.as_str(),))
        .map_err(|e| PyValueError::new_err(format!("internal JSON parse error via json.loads: {e}")))?;
    Ok(obj.into_py(py))
}

/// (filnavn, tekst)
#[pyfunction]
#[pyo3(signature = (date, credential, config_path=None))]
fn report_text(date: &str, credential: &str, config_path: Option<&str>) -> PyResult<(String, String)> {
    let cfg = config_from(config_path)?;
    let (name, bytes) = export_with(&cfg, date, credential, &TextRenderer::default())?;
    Ok((name, String::from_utf8_lossy(&bytes).into_owned()))
}

/// (filnavn, csv)
#[pyfunction]
#[pyo3(signature = (date, credential, config_path=None))]
fn report_csv(date: &str, credential: &str, config_path: Option<&str>) -> PyResult<(String, String)> {
    let cfg = config_from(config_path)?;
    let (name, bytes) = export_with(&cfg, date, credential, &CsvRenderer)?;
    Ok((name, String::from_utf8_lossy(&bytes).into_owned()))
}

#[pyfunction]
#[pyo3(signature = (credential, config_path=None))]
fn clear_all(credential: &str, config_path: Option<&str>) -> PyResult<()> {
    let cfg = config_from(config_path)?;
    let policy = cfg.authorization_policy();
    monitor(&cfg)
        .clear_all(policy.as_ref(), credential)
        .map_err(to_py_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn squadload_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(today_label, m)?)?;
    m.add_function(wrap_pyfunction!(submit_pre, m)?)?;
    m.add_function(wrap_pyfunction!(submit_post, m)?)?;
    m.add_function(wrap_pyfunction!(list_available_dates, m)?)?;
    m.add_function(wrap_pyfunction!(report_json, m)?)?;
    m.add_function(wrap_pyfunction!(report_text, m)?)?;
    m.add_function(wrap_pyfunction!(report_csv, m)?)?;
    m.add_function(wrap_pyfunction!(clear_all, m)?)?;
    Ok(())
}

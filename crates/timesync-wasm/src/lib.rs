//! WASM bindings for timesync-engine.
//!
//! The browser hands over the exchange record as JSON and gets JSON back.
//! The `*_json` functions hold the logic so they can be tested natively;
//! the `#[wasm_bindgen]` wrappers only convert errors to `JsValue`.

use chrono::NaiveDate;
use timesync_engine::{ConfigRecord, EngineOptions, Session};
use wasm_bindgen::prelude::*;

fn session_from_json(config_json: &str, today: &str) -> Result<Session, String> {
    let today = today
        .parse::<NaiveDate>()
        .map_err(|e| format!("Invalid datetime: '{today}': {e}"))?;
    ConfigRecord::from_json(config_json)
        .and_then(|record| record.into_session(today))
        .map_err(|e| e.to_string())
}

/// Ranked suggestions for a config record; `today` (`YYYY-MM-DD`) is used
/// when the record has no date.
pub fn compute_suggestions_json(config_json: &str, today: &str) -> Result<String, String> {
    let session = session_from_json(config_json, today)?;
    let suggestions = session.suggestions().map_err(|e| e.to_string())?;
    serde_json::to_string(&suggestions).map_err(|e| e.to_string())
}

/// Availability grid for a config record at `granularity` minutes.
pub fn build_availability_grid_json(
    config_json: &str,
    today: &str,
    granularity: u32,
) -> Result<String, String> {
    let mut session = session_from_json(config_json, today)?;
    let options = EngineOptions {
        granularity,
        ..session.options().clone()
    };
    session
        .apply(timesync_engine::Command::SetOptions(options))
        .map_err(|e| e.to_string())?;
    let grid = session.grid().map_err(|e| e.to_string())?;
    serde_json::to_string(&grid).map_err(|e| e.to_string())
}

/// Fail-closed import: always returns a record, plus the problem if there was one.
pub fn import_config_json(config_json: &str, today: &str) -> Result<String, String> {
    let today = today
        .parse::<NaiveDate>()
        .map_err(|e| format!("Invalid datetime: '{today}': {e}"))?;
    let imported = ConfigRecord::import_or_default(config_json, today);
    let body = serde_json::json!({
        "config": imported.session.to_record(),
        "issue": imported.issue.map(|e| e.to_string()),
    });
    Ok(body.to_string())
}

#[wasm_bindgen(js_name = computeSuggestions)]
pub fn compute_suggestions(config_json: &str, today: &str) -> Result<String, JsValue> {
    compute_suggestions_json(config_json, today).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = buildAvailabilityGrid)]
pub fn build_availability_grid(
    config_json: &str,
    today: &str,
    granularity: u32,
) -> Result<String, JsValue> {
    build_availability_grid_json(config_json, today, granularity).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = importConfig)]
pub fn import_config(config_json: &str, today: &str) -> Result<String, JsValue> {
    import_config_json(config_json, today).map_err(|e| JsValue::from_str(&e))
}

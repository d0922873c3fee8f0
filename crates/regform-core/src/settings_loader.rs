//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `REGFORM_DEBUG` | `debug` |
//! | `REGFORM_LOG_LEVEL` | `log_level` |
//! | `REGFORM_RESET_ON_SUCCESS` | `reset_on_success` |
//! | `REGFORM_REDACT_SECRETS` | `redact_secrets` |
//! | `REGFORM_SUBMIT_LABEL` | `submit_label` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use regform_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/regform.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::RegformError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RegformError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RegformError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_onto_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RegformError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RegformError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, RegformError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RegformError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_onto_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RegformError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RegformError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `REGFORM_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" as true; anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("REGFORM_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("REGFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("REGFORM_RESET_ON_SUCCESS") {
        settings.reset_on_success = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("REGFORM_REDACT_SECRETS") {
        settings.redact_secrets = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("REGFORM_SUBMIT_LABEL") {
        settings.submit_label = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, RegformError> {
    std::fs::read_to_string(path).map_err(|e| {
        RegformError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Deep-merges `value` over the serialized defaults and deserializes the result.
fn merge_onto_defaults(value: serde_json::Value, format: &str) -> Result<Settings, RegformError> {
    let mut merged = serde_json::to_value(Settings::default()).map_err(|e| {
        RegformError::SerializationError(format!("Failed to serialize default settings: {e}"))
    })?;

    merge_json(&mut merged, value);
    serde_json::from_value(merged).map_err(|e| {
        RegformError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges `overlay` into `base`. Objects merge key by key; any other
/// overlay value replaces what `base` holds.
fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

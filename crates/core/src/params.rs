//! Pure helpers for reading typed settings out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key,
//! a `null`, or a value of the wrong type all yield the default. Host pages
//! hand us whatever they stored, so these never fail.

use serde_json::Value;

/// Extracts an `f64` from `settings[name]`; integers are accepted as floats.
///
/// Non-finite results are replaced by `default`.
pub fn param_f64(settings: &Value, name: &str, default: f64) -> f64 {
    settings
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Extracts a `usize` from `settings[name]`.
///
/// Only non-negative JSON integers are accepted.
pub fn param_usize(settings: &Value, name: &str, default: usize) -> usize {
    settings
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `String` from `settings[name]`.
pub fn param_string(settings: &Value, name: &str, default: &str) -> String {
    settings
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

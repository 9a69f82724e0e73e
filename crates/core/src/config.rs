//! Picker settings with per-key fallback to defaults.

use serde_json::Value;

use crate::color::Rgb;
use crate::geometry::Placement;
use crate::params::{param_f64, param_string, param_usize};

/// Number of entries the recent-colors list keeps.
pub const DEFAULT_RECENT_CAPACITY: usize = 14;
/// Color used when the host input has no usable value.
pub const DEFAULT_COLOR: &str = "#000000";
/// Key the recent-colors list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "recentColors";

/// Settings for one picker instance.
///
/// Build with [`PickerConfig::default`] or [`PickerConfig::from_json`]; the
/// latter never fails and falls back per key.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    pub recent_capacity: usize,
    pub placement: Placement,
    pub default_color: String,
    pub storage_key: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            placement: Placement::default(),
            default_color: DEFAULT_COLOR.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl PickerConfig {
    /// Reads `recent_capacity`, `panel_gap`, `viewport_margin`,
    /// `default_color` and `storage_key` from a JSON object.
    ///
    /// An unparsable `default_color` is replaced by black, and negative
    /// spacing is floored at zero.
    pub fn from_json(settings: &Value) -> Self {
        let defaults = Placement::default();
        let default_color = param_string(settings, "default_color", DEFAULT_COLOR);
        let default_color = match Rgb::from_hex(&default_color) {
            Ok(c) => c.to_hex(),
            Err(_) => DEFAULT_COLOR.to_string(),
        };
        Self {
            recent_capacity: param_usize(settings, "recent_capacity", DEFAULT_RECENT_CAPACITY),
            placement: Placement {
                gap: param_f64(settings, "panel_gap", defaults.gap).max(0.0),
                margin: param_f64(settings, "viewport_margin", defaults.margin).max(0.0),
            },
            default_color,
            storage_key: param_string(settings, "storage_key", DEFAULT_STORAGE_KEY),
        }
    }
}

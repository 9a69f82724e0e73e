//! Text-field formats shown under the picker controls.
//!
//! The picker shows one format at a time (hex, RGB or HSL) and the toggle
//! button cycles through them. Numeric fields display rounded integers.

use serde::Serialize;

use crate::color::{hsl_to_hsv, hsv_to_hsl, hsv_to_rgb, rgb_to_hsv, Hsl, Hsv, Rgb};
use crate::error::PickerError;

/// Which group of text fields is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

impl ColorFormat {
    /// The format the toggle switches to: Hex → RGB → HSL → Hex.
    pub fn next(self) -> Self {
        match self {
            ColorFormat::Hex => ColorFormat::Rgb,
            ColorFormat::Rgb => ColorFormat::Hsl,
            ColorFormat::Hsl => ColorFormat::Hex,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorFormat::Hex => "hex",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Hsl => "hsl",
        }
    }

    pub fn fields(self) -> &'static [FormatField] {
        match self {
            ColorFormat::Hex => &[FormatField::Hex],
            ColorFormat::Rgb => &[FormatField::Red, FormatField::Green, FormatField::Blue],
            ColorFormat::Hsl => &[
                FormatField::Hue,
                FormatField::Saturation,
                FormatField::Lightness,
            ],
        }
    }
}

/// A single editable text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatField {
    Hex,
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Lightness,
}

impl FormatField {
    pub fn format(self) -> ColorFormat {
        match self {
            FormatField::Hex => ColorFormat::Hex,
            FormatField::Red | FormatField::Green | FormatField::Blue => ColorFormat::Rgb,
            FormatField::Hue | FormatField::Saturation | FormatField::Lightness => {
                ColorFormat::Hsl
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatField::Hex => "hex",
            FormatField::Red => "red",
            FormatField::Green => "green",
            FormatField::Blue => "blue",
            FormatField::Hue => "hue",
            FormatField::Saturation => "saturation",
            FormatField::Lightness => "lightness",
        }
    }

    /// Parses the field's DOM name (`"red"`, `"hex"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        [
            FormatField::Hex,
            FormatField::Red,
            FormatField::Green,
            FormatField::Blue,
            FormatField::Hue,
            FormatField::Saturation,
            FormatField::Lightness,
        ]
        .into_iter()
        .find(|f| f.name() == name)
    }

    /// Inclusive range of a numeric field; `None` for hex.
    fn range(self) -> Option<(f64, f64)> {
        match self {
            FormatField::Hex => None,
            FormatField::Red | FormatField::Green | FormatField::Blue => Some((0.0, 255.0)),
            FormatField::Hue => Some((0.0, 360.0)),
            FormatField::Saturation | FormatField::Lightness => Some((0.0, 100.0)),
        }
    }

    /// Display text of this field for the given color.
    pub fn text(self, rgb: Rgb, hsl: Hsl) -> String {
        match self {
            FormatField::Hex => rgb.to_hex(),
            FormatField::Red => rgb.r.to_string(),
            FormatField::Green => rgb.g.to_string(),
            FormatField::Blue => rgb.b.to_string(),
            FormatField::Hue => ((hsl.h.round() as u32) % 360).to_string(),
            FormatField::Saturation => format!("{}", hsl.s.round()),
            FormatField::Lightness => format!("{}", hsl.l.round()),
        }
    }

    /// Parses typed text for a numeric field, clamped to the field's range.
    ///
    /// Surrounding whitespace and a trailing `%` or `°` are accepted.
    pub fn parse_number(self, text: &str) -> Result<f64, PickerError> {
        let invalid = || PickerError::InvalidComponent {
            name: self.name().to_string(),
            value: text.to_string(),
        };
        let (lo, hi) = self.range().ok_or_else(invalid)?;
        let trimmed = text.trim().trim_end_matches(['%', '°']).trim_end();
        let value: f64 = trimmed.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(value.clamp(lo, hi))
    }
}

/// Applies typed `text` in `field` to the current color.
///
/// A hex edit must be a complete six digit hex; anything shorter is treated
/// as still being typed and rejected. RGB edits go through 8-bit RGB, HSL
/// edits convert directly so the untouched HSL components stay put.
pub fn apply_edit(field: FormatField, text: &str, current: Hsv) -> Result<Hsv, PickerError> {
    match field {
        FormatField::Hex => Rgb::from_hex(text.trim()).map(rgb_to_hsv),
        FormatField::Red | FormatField::Green | FormatField::Blue => {
            let value = field.parse_number(text)?.round() as u8;
            let mut rgb = hsv_to_rgb(current);
            match field {
                FormatField::Red => rgb.r = value,
                FormatField::Green => rgb.g = value,
                _ => rgb.b = value,
            }
            Ok(rgb_to_hsv(rgb))
        }
        FormatField::Hue | FormatField::Saturation | FormatField::Lightness => {
            let value = field.parse_number(text)?;
            let mut hsl = hsv_to_hsl(current);
            match field {
                FormatField::Hue => hsl.h = value,
                FormatField::Saturation => hsl.s = value,
                _ => hsl.l = value,
            }
            Ok(hsl_to_hsv(hsl))
        }
    }
}

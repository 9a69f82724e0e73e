//! Color types and conversion functions for the picker.
//!
//! Provides three color types (`Rgb`, `Hsv`, `Hsl`) and pure conversion
//! functions between them and `#rrggbb` hex strings. Percentages (`s`, `v`,
//! `l`) are 0–100 and hue is in degrees at the API boundary; the math
//! normalizes to 0–1 internally.
//!
//! The hex-facing functions are lenient: anything that is not a six digit
//! hex color converts to black instead of failing. Use [`Rgb::from_hex`]
//! when the caller needs to know the input was bad.

use crate::error::PickerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit RGB color. The representation handed to the host input.
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue/saturation/value. `h` in degrees [0, 360), `s` and `v` in [0, 100].
///
/// This is the picker's working state: the hue slider drives `h` and the
/// saturation surface drives `s` and `v`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Hue/saturation/lightness. `h` in degrees [0, 360), `s` and `l` in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `PickerError::InvalidHex` unless the input is exactly six hex
    /// digits after an optional leading `#`.
    pub fn from_hex(hex: &str) -> Result<Rgb, PickerError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(PickerError::InvalidHex(hex.to_string()));
        }
        let channel = |at: usize| {
            u8::from_str_radix(&digits[at..at + 2], 16)
                .map_err(|_| PickerError::InvalidHex(hex.to_string()))
        };
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Formats the color as lowercase `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Wraps a hue in degrees into [0, 360). Non-finite input becomes 0.
pub fn normalize_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Maps a 0–100 percentage to 0–1, clamped. NaN becomes 0.
fn unit(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        (percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Quantizes a 0–1 channel to 0–255 with rounding.
fn to_channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Shared hue formula for HSV and HSL: 60° sectors keyed by the dominant channel.
fn hue_degrees(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    normalize_hue(h)
}

/// Sector decomposition shared by HSV and HSL: returns the chroma-only
/// (r, g, b) for hue `h` in [0, 360) before the match offset is added.
fn sector_rgb(h: f64, chroma: f64) -> (f64, f64, f64) {
    let x = chroma * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    match (h / 60.0) as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    }
}

/// Parses a hex string to RGB, returning black for anything malformed.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_default()
}

/// Formats RGB as lowercase `"#rrggbb"`.
pub fn rgb_to_hex(c: Rgb) -> String {
    c.to_hex()
}

/// Converts RGB to HSV.
///
/// Pure black yields `s = 0, v = 0`; any gray yields `s = 0` and `h = 0`.
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    Hsv {
        h: hue_degrees(r, g, b, max, delta),
        s: s * 100.0,
        v: max * 100.0,
    }
}

/// Converts HSV to RGB. `h = 360` wraps to 0; `s` and `v` are clamped to [0, 100].
pub fn hsv_to_rgb(c: Hsv) -> Rgb {
    let h = normalize_hue(c.h);
    let s = unit(c.s);
    let v = unit(c.v);

    let chroma = v * s;
    let m = v - chroma;
    let (r, g, b) = sector_rgb(h, chroma);
    Rgb {
        r: to_channel(r + m),
        g: to_channel(g + m),
        b: to_channel(b + m),
    }
}

/// Converts RGB to HSL.
///
/// Saturation is 0 for grays and at the lightness extremes.
pub fn rgb_to_hsl(c: Rgb) -> Hsl {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    let s = if delta == 0.0 || l == 0.0 || l == 1.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h: hue_degrees(r, g, b, max, delta),
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// Converts HSL to RGB. `h = 360` wraps to 0; `s` and `l` are clamped to [0, 100].
pub fn hsl_to_rgb(c: Hsl) -> Rgb {
    let h = normalize_hue(c.h);
    let s = unit(c.s);
    let l = unit(c.l);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let m = l - chroma / 2.0;
    let (r, g, b) = sector_rgb(h, chroma);
    Rgb {
        r: to_channel(r + m),
        g: to_channel(g + m),
        b: to_channel(b + m),
    }
}

/// HSV to HSL directly, without 8-bit quantization. Hue is normalized.
pub fn hsv_to_hsl(c: Hsv) -> Hsl {
    let s = unit(c.s);
    let v = unit(c.v);
    let l = v * (1.0 - s / 2.0);
    let s_hsl = if l == 0.0 || l == 1.0 {
        0.0
    } else {
        (v - l) / l.min(1.0 - l)
    };
    Hsl {
        h: normalize_hue(c.h),
        s: s_hsl * 100.0,
        l: l * 100.0,
    }
}

/// HSL to HSV directly, without 8-bit quantization. Hue is normalized.
pub fn hsl_to_hsv(c: Hsl) -> Hsv {
    let s = unit(c.s);
    let l = unit(c.l);
    let v = l + s * l.min(1.0 - l);
    let s_hsv = if v == 0.0 { 0.0 } else { 2.0 * (1.0 - l / v) };
    Hsv {
        h: normalize_hue(c.h),
        s: s_hsv * 100.0,
        v: v * 100.0,
    }
}

/// Hex to HSV through RGB. Malformed input yields `{0, 0, 0}`.
pub fn hex_to_hsv(hex: &str) -> Hsv {
    rgb_to_hsv(hex_to_rgb(hex))
}

/// HSV to lowercase `"#rrggbb"`.
pub fn hsv_to_hex(c: Hsv) -> String {
    hsv_to_rgb(c).to_hex()
}

/// Hex to HSL through RGB. Malformed input yields `{0, 0, 0}`.
pub fn hex_to_hsl(hex: &str) -> Hsl {
    rgb_to_hsl(hex_to_rgb(hex))
}

/// HSL to lowercase `"#rrggbb"`.
pub fn hsl_to_hex(c: Hsl) -> String {
    hsl_to_rgb(c).to_hex()
}

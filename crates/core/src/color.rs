//! Colors for dots, links and glows.
//!
//! [`Srgb`] keeps the hex parsing/formatting used in config files; [`Rgba`]
//! pairs it with an alpha and renders the `rgba(r, g, b, a)` strings a 2-D
//! canvas context expects for `fillStyle`/`strokeStyle`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// sRGB color with components in [0, 1].
///
/// Serializes as a `"#rrggbb"` hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Builds a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses `"#00d4ff"` or `"00d4ff"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_u8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// 8-bit channels, clamped and rounded.
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Formats as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A color with straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(rename = "hex")]
    pub rgb: Srgb,
    pub alpha: f64,
}

impl Rgba {
    pub fn new(rgb: Srgb, alpha: f64) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Same color, different alpha (clamped).
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::new(self.rgb, alpha)
    }

    /// CSS color string, e.g. `rgba(0, 212, 255, 0.8)`.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.rgb.to_u8();
        format!("rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        let channel = |value: u8| f64::from(value) / 255.0;
        Self::rgb(channel(red), channel(green), channel(blue))
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> ChoreoResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let invalid = || ChoreoError::InvalidData(format!("invalid hex color `{input}`"));
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>, short: bool| -> ChoreoResult<f64> {
            let raw = u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())?;
            let value = if short { raw * 17 } else { raw };
            Ok(f64::from(value) / 255.0)
        };

        match digits.len() {
            3 => Ok(Self::rgb(
                channel(0..1, true)?,
                channel(1..2, true)?,
                channel(2..3, true)?,
            )),
            6 => Ok(Self::rgb(
                channel(0..2, false)?,
                channel(2..4, false)?,
                channel(4..6, false)?,
            )),
            8 => Ok(Self::rgba(
                channel(0..2, false)?,
                channel(2..4, false)?,
                channel(4..6, false)?,
                channel(6..8, false)?,
            )),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                byte(self.alpha)
            )
        }
    }

    pub fn validate(self) -> ChoreoResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChoreoError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Component-wise `from + (to - from) * t` with `t` clamped into `[0, 1]`.
    ///
    /// Evaluated as `from * (1 - t) + to * t` so both endpoints are exact.
    #[must_use]
    pub fn mix(from: Self, to: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: f64, b: f64| a * (1.0 - t) + b * t;
        Self::rgba(
            lerp(from.red, to.red),
            lerp(from.green, to.green),
            lerp(from.blue, to.blue),
            lerp(from.alpha, to.alpha),
        )
    }
}

/// Named theme colors, serialized as `{ "name": "#rrggbb" }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct ThemePalette {
    colors: IndexMap<String, Color>,
}

impl ThemePalette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Venue palette used by the stock section presets.
    #[must_use]
    pub fn garden() -> Self {
        let mut palette = Self::new();
        palette.insert("forest", Color::from_rgb8(24, 50, 40));
        palette.insert("sage", Color::from_rgb8(156, 175, 149));
        palette.insert("cream", Color::from_rgb8(245, 239, 226));
        palette.insert("terracotta", Color::from_rgb8(198, 106, 77));
        palette
    }

    pub fn insert(&mut self, name: impl Into<String>, color: Color) {
        self.colors.insert(name.into(), color);
    }

    pub fn get(&self, name: &str) -> ChoreoResult<Color> {
        self.colors
            .get(name)
            .copied()
            .ok_or_else(|| ChoreoError::InvalidData(format!("unknown theme color `{name}`")))
    }

    /// Mixes two named colors.
    pub fn mix(&self, from: &str, to: &str, t: f64) -> ChoreoResult<Color> {
        Ok(Color::mix(self.get(from)?, self.get(to)?, t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        for color in self.colors.values() {
            color.validate()?;
        }
        Ok(())
    }
}

impl TryFrom<IndexMap<String, String>> for ThemePalette {
    type Error = ChoreoError;

    fn try_from(raw: IndexMap<String, String>) -> Result<Self, Self::Error> {
        let colors = raw
            .into_iter()
            .map(|(name, hex)| Color::from_hex(&hex).map(|color| (name, color)))
            .collect::<ChoreoResult<IndexMap<_, _>>>()?;
        Ok(Self { colors })
    }
}

impl From<ThemePalette> for IndexMap<String, String> {
    fn from(palette: ThemePalette) -> Self {
        palette
            .colors
            .into_iter()
            .map(|(name, color)| (name, color.to_hex()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ThemePalette};

    #[test]
    fn hex_parsing_supports_short_long_and_alpha_forms() {
        assert_eq!(
            Color::from_hex("#fff").expect("short"),
            Color::rgb(1.0, 1.0, 1.0)
        );
        assert_eq!(
            Color::from_hex("000000").expect("long"),
            Color::rgb(0.0, 0.0, 0.0)
        );
        let translucent = Color::from_hex("#ff000080").expect("alpha");
        assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn hex_round_trips_through_to_hex() {
        let color = Color::from_hex("#1a2b3c").expect("parse");
        assert_eq!(color.to_hex(), "#1a2b3c");
    }

    #[test]
    fn mix_is_componentwise_and_clamped() {
        let from = Color::rgb(0.0, 0.2, 1.0);
        let to = Color::rgb(1.0, 0.6, 0.0);
        let mid = Color::mix(from, to, 0.5);
        assert!((mid.red - 0.5).abs() < 1e-12);
        assert!((mid.green - 0.4).abs() < 1e-12);
        assert!((mid.blue - 0.5).abs() < 1e-12);
        assert_eq!(Color::mix(from, to, -1.0), from);
        assert_eq!(Color::mix(from, to, 4.0), to);
    }

    #[test]
    fn palette_lookup_reports_unknown_names() {
        let palette = ThemePalette::garden();
        assert!(palette.get("forest").is_ok());
        assert!(palette.get("magenta").is_err());
        assert!(palette.validate().is_ok());
    }
}

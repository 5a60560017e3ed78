//! Box colors.
//!
//! Colors are purely cosmetic: no layout rule depends on them.

use peniko::Color;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a color string can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0}")]
pub struct ParseColorError(pub String);

/// RGBA8 display color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoxColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BoxColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Result<Self, ParseColorError> {
        let invalid = || ParseColorError(color.to_string());
        let hex = color.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Hex form; the alpha byte is only written when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for BoxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for BoxColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<BoxColor> for String {
    fn from(color: BoxColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for BoxColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::rgba(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<BoxColor> for Color {
    fn from(color: BoxColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors handed out to new boxes.
pub const PALETTE: [BoxColor; 10] = [
    BoxColor::rgb(0xFF, 0x6B, 0x6B),
    BoxColor::rgb(0x4E, 0xCD, 0xC4),
    BoxColor::rgb(0x45, 0xB7, 0xD1),
    BoxColor::rgb(0xFF, 0xA0, 0x7A),
    BoxColor::rgb(0x98, 0xD8, 0xC8),
    BoxColor::rgb(0xF7, 0xDC, 0x6F),
    BoxColor::rgb(0xBB, 0x8F, 0xCE),
    BoxColor::rgb(0x85, 0xC1, 0xE2),
    BoxColor::rgb(0xF8, 0xB7, 0x39),
    BoxColor::rgb(0x52, 0xB7, 0x88),
];

/// Pick a palette color uniformly at random.
pub fn random_color() -> BoxColor {
    PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PALETTE[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(BoxColor::from_hex("#FF6B6B").unwrap(), BoxColor::rgb(255, 107, 107));
        assert_eq!(BoxColor::from_hex("#ff6b6b").unwrap(), BoxColor::rgb(255, 107, 107));
        assert_eq!(BoxColor::from_hex("#fff").unwrap(), BoxColor::rgb(255, 255, 255));
        assert_eq!(
            BoxColor::from_hex("#11223380").unwrap(),
            BoxColor::rgba(0x11, 0x22, 0x33, 0x80)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(BoxColor::from_hex("FF6B6B").is_err());
        assert!(BoxColor::from_hex("#12345").is_err());
        assert!(BoxColor::from_hex("#GGGGGG").is_err());
        assert!(BoxColor::from_hex("#ééé").is_err());
        assert!(BoxColor::from_hex("#+fffff").is_err());
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(BoxColor::rgb(0x4E, 0xCD, 0xC4).to_hex(), "#4ECDC4");
        assert_eq!(BoxColor::rgba(0, 0, 0, 0).to_string(), "#00000000");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&PALETTE[0]).unwrap();
        assert_eq!(json, "\"#FF6B6B\"");
        let parsed: BoxColor = serde_json::from_str("\"#45b7d1\"").unwrap();
        assert_eq!(parsed, PALETTE[2]);
        assert!(serde_json::from_str::<BoxColor>("\"red\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color: Color = PALETTE[1].into();
        assert_eq!(BoxColor::from(color), PALETTE[1]);
    }

    #[test]
    fn test_random_color_is_from_palette() {
        for _ in 0..50 {
            assert!(PALETTE.contains(&random_color()));
        }
    }
}

//! Color values.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
///
/// Serialized as hex notation; deserialized from hex notation or a named
/// color keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorValue {
    ColorValue { r, g, b, a: 255 }
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = rgb(255, 255, 255);

    /// Red (#ff0000), used for line-box debug outlines.
    pub const RED: Self = rgb(255, 0, 0);

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        // [§ 4.2.1]
        // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
        // by replicating digits, not by adding zeros."
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                a: short(3)?,
                ..rgb(short(0)?, short(1)?, short(2)?)
            }),
            6 => Some(rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                a: long(6)?,
                ..rgb(long(0)?, long(2)?, long(4)?)
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The sixteen basic HTML colors plus `transparent`.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => rgb(0, 128, 0),
            "blue" => rgb(0, 0, 255),
            "yellow" => rgb(255, 255, 0),
            "gray" | "grey" => rgb(128, 128, 128),
            "silver" => rgb(192, 192, 192),
            "maroon" => rgb(128, 0, 0),
            "purple" => rgb(128, 0, 128),
            "fuchsia" | "magenta" => rgb(255, 0, 255),
            "lime" => rgb(0, 255, 0),
            "olive" => rgb(128, 128, 0),
            "navy" => rgb(0, 0, 128),
            "teal" => rgb(0, 128, 128),
            "aqua" | "cyan" => rgb(0, 255, 255),
            "transparent" => Self { a: 0, ..Self::BLACK },
            _ => return None,
        };
        Some(color)
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for ColorValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_named(s)
        };
        parsed.ok_or_else(|| format!("invalid color \"{s}\""))
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(color: ColorValue) -> Self {
        color.to_hex_string()
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

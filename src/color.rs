use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Luminance below which a swatch counts as dark and gets a light label.
pub const DARK_THRESHOLD: f64 = 128.0;

/// A single sRGB color, rendered as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

/// Label color that stays readable on top of a swatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    /// White text, for dark swatches.
    Light,
    /// Black text, for light swatches.
    Dark,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::from_rgb(0xff, 0xff, 0xff);
    pub const BLACK: HexColor = HexColor::from_rgb(0x00, 0x00, 0x00);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Lowercase, zero-padded `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness on the 0-255 scale (ITU-R BT.601 weights).
    pub fn luminance(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    pub fn is_dark(self) -> bool {
        self.luminance() < DARK_THRESHOLD
    }

    pub fn text_shade(self) -> Shade {
        if self.is_dark() { Shade::Light } else { Shade::Dark }
    }

    /// Uniformly random color, every channel drawn from `0..=255`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_rgb(rng.random(), rng.random(), rng.random())
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(c: Srgb<u8>) -> Self {
        Self::from_rgb(c.red, c.green, c.blue)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidHex(s.to_string()))
        };
        Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_hex()
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{Error, Result};

/// Upper bound on colors in a palette, and the number produced by extraction
/// and randomization.
pub const MAX_COLORS: usize = 5;

/// Ordered list of colors shown as swatches and written on export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HexColor>", into = "Vec<HexColor>")]
pub struct Palette {
    colors: Vec<HexColor>,
}

impl Palette {
    pub fn new(colors: Vec<HexColor>) -> Result<Self> {
        if colors.len() > MAX_COLORS {
            return Err(Error::TooManyColors(colors.len()));
        }
        Ok(Self { colors })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// All-white row displayed before anything has been loaded.
    pub fn placeholder() -> Self {
        Self {
            colors: vec![HexColor::WHITE; MAX_COLORS],
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            colors: (0..MAX_COLORS).map(|_| HexColor::random(rng)).collect(),
        }
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = HexColor> + '_ {
        self.colors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.iter().map(HexColor::to_hex).collect()
    }
}

impl TryFrom<Vec<HexColor>> for Palette {
    type Error = Error;

    fn try_from(colors: Vec<HexColor>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<HexColor> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

//! Dominant-color palette extraction.
//!
//! An image is shrunk to a fixed sample grid, its pixels are clustered with
//! k-means, and the centroids become a palette of up to five `#rrggbb`
//! colors. Palettes can be randomized, shown as swatches and exported as
//! JSON or plain text.

pub mod board;
pub mod color;
pub mod error;
pub mod export;
pub mod extract;
pub mod session;
pub mod swatches;
pub mod theme;
pub mod wasm;

#[cfg(feature = "gui")]
pub mod gui;
#[cfg(any(feature = "native-bin", feature = "gui"))]
pub mod logging;

pub use color::{HexColor, Shade};
pub use error::{Error, Result};
pub use export::{ExportFormat, read_palette, write_palette};
pub use extract::{
    ColorSpace, DominantColor, ExtractOptions, PaletteOrder, extract_dominant_colors,
    extract_palette, extract_palette_bytes, extract_palette_path,
};
pub use swatches::{MAX_COLORS, Palette};

use thiserror::Error;

/// Everything that can go wrong while loading, extracting or exporting a palette.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed palette JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid hex color {0:?}, expected #rrggbb")]
    InvalidHex(String),
    #[error("A palette holds at most 5 colors, got {0}")]
    TooManyColors(usize),
    #[error("No palette to export!")]
    EmptyPalette,
    #[error("Image has no opaque pixels to sample")]
    NoPixels,
    #[error("Invalid extraction options: {0}")]
    InvalidOptions(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

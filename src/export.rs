use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::color::HexColor;
use crate::error::{Error, Result};
use crate::swatches::Palette;

/// On-disk palette layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `{"palette": ["#rrggbb", ...]}`
    Json,
    /// One `#rrggbb` per line.
    #[default]
    Text,
}

impl ExportFormat {
    /// JSON when the path ends in `.json` or the JSON filter was picked in the
    /// save dialog, plain text otherwise.
    pub fn detect(path: &Path, selected: Option<ExportFormat>) -> Self {
        let json_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if json_ext || selected == Some(ExportFormat::Json) {
            ExportFormat::Json
        } else {
            ExportFormat::Text
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    /// Label used by file dialogs and the format picker.
    pub fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON Files",
            ExportFormat::Text => "Text Files",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PaletteFile {
    palette: Palette,
}

/// Pretty JSON with four-space indentation.
pub fn to_json(palette: &Palette) -> Result<String> {
    let file = PaletteFile {
        palette: palette.clone(),
    };
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    file.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn to_text(palette: &Palette) -> String {
    palette.iter().map(|c| format!("{c}\n")).collect()
}

pub fn render(palette: &Palette, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(palette),
        ExportFormat::Text => Ok(to_text(palette)),
    }
}

pub fn write_palette(palette: &Palette, path: &Path, format: ExportFormat) -> Result<()> {
    if palette.is_empty() {
        return Err(Error::EmptyPalette);
    }
    fs::write(path, render(palette, format)?)?;
    info!(path = %path.display(), ?format, colors = palette.len(), "palette exported");
    Ok(())
}

pub fn parse_palette(contents: &str, format: ExportFormat) -> Result<Palette> {
    match format {
        ExportFormat::Json => Ok(serde_json::from_str::<PaletteFile>(contents)?.palette),
        ExportFormat::Text => {
            let colors = contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::parse::<HexColor>)
                .collect::<Result<Vec<_>>>()?;
            Palette::new(colors)
        }
    }
}

/// Read back a file produced by [`write_palette`]. A file whose contents open
/// with `{` is read as JSON whatever its extension.
pub fn read_palette(path: &Path) -> Result<Palette> {
    let contents = fs::read_to_string(path)?;
    let format = if contents.trim_start().starts_with('{') {
        ExportFormat::Json
    } else {
        ExportFormat::detect(path, None)
    };
    parse_palette(&contents, format)
}

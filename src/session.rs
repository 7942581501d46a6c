//! Window state behind the buttons, independent of the toolkit drawing it.
//!
//! Every action reports its outcome through a one-line status message. No
//! failure is fatal: the previous palette stays on screen.

use std::path::Path;

use image::RgbaImage;
use rand::Rng;
use tracing::warn;

use crate::board::SwatchBoard;
use crate::color::HexColor;
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::extract::{self, ExtractOptions, PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::swatches::Palette;
use crate::theme::Theme;

pub const INITIAL_STATUS: &str = "Click any color to copy HEX code";

/// Somewhere copied hex codes go.
pub trait Clipboard {
    fn set_text(&mut self, text: String);
}

#[derive(Debug)]
pub struct Session {
    options: ExtractOptions,
    palette: Palette,
    board: SwatchBoard,
    theme: Theme,
    status: String,
    preview: Option<RgbaImage>,
    preview_revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl Session {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            palette: Palette::empty(),
            board: SwatchBoard::new(&Palette::placeholder()),
            theme: Theme::default(),
            status: INITIAL_STATUS.to_string(),
            preview: None,
            preview_revision: 0,
        }
    }

    /// Colors available for export. Empty until an upload or randomize.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn board(&self) -> &SwatchBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut SwatchBoard {
        &mut self.board
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    /// Bumped whenever the preview image changes.
    pub fn preview_revision(&self) -> u64 {
        self.preview_revision
    }

    fn set_palette(&mut self, palette: Palette) {
        self.board = SwatchBoard::new(&palette);
        self.palette = palette;
    }

    pub fn upload(&mut self, path: &Path) {
        if let Err(e) = self.try_upload(path) {
            warn!(path = %path.display(), error = %e, "image upload failed");
            self.status = format!("Error: {e}");
        }
    }

    fn try_upload(&mut self, path: &Path) -> Result<()> {
        let img = extract::load_image(path)?;
        self.preview = Some(extract::thumbnail(&img, PREVIEW_WIDTH, PREVIEW_HEIGHT));
        self.preview_revision += 1;
        let palette = extract::extract_palette(&img, &self.options)?;
        self.set_palette(palette);
        Ok(())
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_palette(Palette::random(rng));
        self.status = "Random colors generated".to_string();
    }

    pub fn switch_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme switched to: {}", self.theme.name());
    }

    pub fn copy(&mut self, color: HexColor, clipboard: &mut dyn Clipboard) {
        clipboard.set_text(color.to_hex());
        self.status = format!("Copied: {color}");
    }

    /// Whether there is anything to export. Reports the refusal in the status
    /// line when there is not, before any save dialog opens.
    pub fn check_exportable(&mut self) -> bool {
        if self.palette.is_empty() {
            self.status = Error::EmptyPalette.to_string();
            return false;
        }
        true
    }

    pub fn export(&mut self, path: &Path, selected: Option<ExportFormat>) {
        let format = ExportFormat::detect(path, selected);
        self.status = match export::write_palette(&self.palette, path, format) {
            Ok(()) => format!("Palette exported to: {}", path.display()),
            Err(Error::EmptyPalette) => Error::EmptyPalette.to_string(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "palette export failed");
                format!("Export error: {e}")
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct Recorded(Vec<String>);

    impl Clipboard for Recorded {
        fn set_text(&mut self, text: String) {
            self.0.push(text);
        }
    }

    #[test]
    fn starts_with_placeholder_and_empty_palette() {
        let session = Session::default();
        assert!(session.palette().is_empty());
        assert_eq!(session.board().swatches().len(), 5);
        assert!(session.board().swatches().iter().all(|s| s.color == HexColor::WHITE));
        assert_eq!(session.status(), INITIAL_STATUS);
        assert_eq!(session.theme(), Theme::GradientGalaxy);
    }

    #[test]
    fn randomize_replaces_palette_and_board() {
        let mut session = Session::default();
        session.randomize(&mut StdRng::seed_from_u64(1));
        assert_eq!(session.palette().len(), 5);
        let shown: Vec<HexColor> = session.board().swatches().iter().map(|s| s.color).collect();
        assert_eq!(shown, session.palette().colors());
        assert_eq!(session.status(), "Random colors generated");
    }

    #[test]
    fn switch_theme_reports_name() {
        let mut session = Session::default();
        session.switch_theme();
        assert_eq!(session.status(), "Theme switched to: Nature Green");
        session.switch_theme();
        assert_eq!(session.status(), "Theme switched to: Gradient Galaxy");
    }

    #[test]
    fn copy_hands_hex_to_clipboard() {
        let mut session = Session::default();
        let mut clipboard = Recorded::default();
        session.copy(HexColor::from_rgb(0xab, 0x01, 0x02), &mut clipboard);
        assert_eq!(clipboard.0, vec!["#ab0102"]);
        assert_eq!(session.status(), "Copied: #ab0102");
    }

    #[test]
    fn export_without_palette_is_refused() {
        let mut session = Session::default();
        session.export(Path::new("never-written.json"), None);
        assert_eq!(session.status(), "No palette to export!");
        assert!(!Path::new("never-written.json").exists());
    }

    #[test]
    fn export_check_runs_before_any_dialog() {
        let mut session = Session::default();
        assert!(!session.check_exportable());
        assert_eq!(session.status(), "No palette to export!");

        session.randomize(&mut StdRng::seed_from_u64(2));
        assert!(session.check_exportable());
        assert_eq!(session.status(), "Random colors generated");
    }

    #[test]
    fn failed_upload_keeps_palette() {
        let mut session = Session::default();
        session.randomize(&mut StdRng::seed_from_u64(9));
        let before = session.palette().clone();
        session.upload(Path::new("/definitely/not/here.png"));
        assert!(session.status().starts_with("Error: "));
        assert_eq!(session.palette(), &before);
        assert_eq!(session.preview_revision(), 0);
    }
}

//! Desktop window: buttons on top, image preview, swatch scene, status line.
//! Upload and export go through native file dialogs; a cancelled dialog
//! changes nothing.

use std::path::PathBuf;

use egui::{
    Align2, Color32, ComboBox, FontId, Margin, Mesh, Pos2, Rect, RichText, Sense, Shape, Stroke,
    TextureHandle, TextureOptions, vec2,
};

use crate::board::{Point, SCENE_HEIGHT, SWATCH_SIZE};
use crate::color::{HexColor, Shade};
use crate::export::ExportFormat;
use crate::extract::{ExtractOptions, PREVIEW_HEIGHT};
use crate::session::{Clipboard, Session};
use crate::theme::Theme;

pub const WINDOW_TITLE: &str = "Image Color Palette Extractor";

fn color32(c: HexColor) -> Color32 {
    let (r, g, b) = c.rgb();
    Color32::from_rgb(r, g, b)
}

impl Clipboard for egui::Context {
    fn set_text(&mut self, text: String) {
        self.copy_text(text);
    }
}

pub struct PaletteApp {
    session: Session,
    export_format: ExportFormat,
    preview: Option<(u64, TextureHandle)>,
    applied_theme: Option<Theme>,
}

impl PaletteApp {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            session: Session::new(options),
            export_format: ExportFormat::Json,
            preview: None,
            applied_theme: None,
        }
    }

    pub fn run(options: ExtractOptions) -> eframe::Result {
        let native = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(vec2(850.0, 750.0))
                .with_title(WINDOW_TITLE),
            ..Default::default()
        };
        eframe::run_native(
            WINDOW_TITLE,
            native,
            Box::new(move |_cc| Ok(Box::new(PaletteApp::new(options)))),
        )
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let theme = self.session.theme();
        if self.applied_theme == Some(theme) {
            return;
        }
        let colors = theme.colors();
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = Color32::TRANSPARENT;
        visuals.override_text_color = Some(color32(colors.text));
        for (widget, fill) in [
            (&mut visuals.widgets.inactive, colors.button),
            (&mut visuals.widgets.hovered, colors.button_hover),
            (&mut visuals.widgets.active, colors.button_hover),
        ] {
            widget.bg_fill = color32(fill);
            widget.weak_bg_fill = color32(fill);
        }
        ctx.set_visuals(visuals);
        self.applied_theme = Some(theme);
    }

    fn paint_background(&self, ctx: &egui::Context) {
        let (left, right) = self.session.theme().colors().gradient;
        let (left, right) = (color32(left), color32(right));
        let rect = ctx.screen_rect();
        let mut mesh = Mesh::default();
        mesh.colored_vertex(rect.left_top(), left);
        mesh.colored_vertex(rect.right_top(), right);
        mesh.colored_vertex(rect.right_bottom(), right);
        mesh.colored_vertex(rect.left_bottom(), left);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        ctx.layer_painter(egui::LayerId::background())
            .add(Shape::mesh(mesh));
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let revision = self.session.preview_revision();
        if self.preview.as_ref().is_some_and(|(rev, _)| *rev == revision) {
            return;
        }
        if let Some(img) = self.session.preview() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [img.width() as usize, img.height() as usize],
                img.as_raw(),
            );
            let texture = ctx.load_texture("preview", image, TextureOptions::default());
            self.preview = Some((revision, texture));
        }
    }

    fn pick_image() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Image")
            .add_filter("Image Files", &["jpg", "jpeg", "png"])
            .pick_file()
    }

    /// Save dialog with the chosen format's filter listed first.
    fn pick_export_target(format: ExportFormat) -> Option<PathBuf> {
        let other = match format {
            ExportFormat::Json => ExportFormat::Text,
            ExportFormat::Text => ExportFormat::Json,
        };
        let mut dialog = rfd::FileDialog::new()
            .set_title("Export Palette")
            .set_file_name(format!("palette.{}", format.extension()));
        for f in [format, other] {
            dialog = dialog.add_filter(f.filter_name(), &[f.extension()]);
        }
        dialog.save_file()
    }

    fn draw_preview(&self, ui: &mut egui::Ui) {
        egui::Frame::NONE
            .fill(Color32::WHITE)
            .stroke(Stroke::new(2.0, Color32::from_gray(0xcc)))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_height(PREVIEW_HEIGHT as f32);
                ui.centered_and_justified(|ui| match &self.preview {
                    Some((_, texture)) => {
                        ui.image(texture);
                    }
                    None => {
                        ui.label(RichText::new("No image loaded").color(Color32::BLACK));
                    }
                });
            });
    }

    /// Paint the swatches and feed pointer events to the board. Returns the
    /// color of a clicked swatch.
    fn draw_scene(&mut self, ui: &mut egui::Ui) -> Option<HexColor> {
        let width = self.session.board().width().max(ui.available_width());
        let (response, painter) = ui.allocate_painter(vec2(width, SCENE_HEIGHT), Sense::click_and_drag());
        let origin = response.rect.min;
        let to_scene = |p: Pos2| Point::new(p.x - origin.x, p.y - origin.y);
        let board = self.session.board_mut();
        let mut clicked = None;

        if response.clicked() {
            if let Some(p) = response.interact_pointer_pos().map(to_scene) {
                board.press(p);
                clicked = board.release(p);
            }
        }
        if response.drag_started() {
            if let Some(p) = ui.input(|i| i.pointer.press_origin()) {
                board.press(to_scene(p));
            }
        }
        if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                board.drag_to(to_scene(p));
            }
        }
        if response.drag_stopped() {
            if let Some(p) = ui.input(|i| i.pointer.latest_pos()) {
                clicked = board.release(to_scene(p));
            }
        }

        for swatch in board.swatches() {
            let min = origin + vec2(swatch.pos.x, swatch.pos.y);
            let rect = Rect::from_min_size(min, vec2(SWATCH_SIZE, SWATCH_SIZE));
            painter.rect_filled(rect, 0.0, color32(swatch.color));
            let label = match swatch.color.text_shade() {
                Shade::Light => Color32::WHITE,
                Shade::Dark => Color32::BLACK,
            };
            let center = swatch.center();
            painter.text(
                origin + vec2(center.x, center.y),
                Align2::CENTER_CENTER,
                swatch.color.to_hex(),
                FontId::proportional(11.0),
                label,
            );
        }

        clicked
    }
}

impl eframe::App for PaletteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        self.paint_background(ctx);

        let dropped: Option<PathBuf> =
            ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.session.upload(&path);
        }

        let mut upload = false;
        let mut randomize = false;
        let mut switch_theme = false;
        let mut export = false;
        let mut copied = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.inner_margin(Margin::same(16)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    upload = ui.button("Upload Image").clicked();
                    randomize = ui.button("Random Colors").clicked();
                    switch_theme = ui.button("Switch Theme").clicked();
                    export = ui.button("Export Palette").clicked();
                });

                ui.horizontal(|ui| {
                    ui.label("Save as:");
                    ComboBox::from_id_salt("export_format")
                        .selected_text(self.export_format.filter_name())
                        .show_ui(ui, |ui| {
                            for format in [ExportFormat::Json, ExportFormat::Text] {
                                ui.selectable_value(&mut self.export_format, format, format.filter_name());
                            }
                        });
                });

                ui.add_space(8.0);
                self.draw_preview(ui);
                ui.add_space(8.0);
                egui::ScrollArea::horizontal().show(ui, |ui| {
                    copied = self.draw_scene(ui);
                });

                ui.vertical_centered(|ui| {
                    ui.label(self.session.status());
                });
            });

        if upload {
            if let Some(path) = Self::pick_image() {
                self.session.upload(&path);
            }
        }
        if randomize {
            self.session.randomize(&mut rand::rng());
        }
        if switch_theme {
            self.session.switch_theme();
        }
        if export && self.session.check_exportable() {
            if let Some(path) = Self::pick_export_target(self.export_format) {
                self.session.export(&path, Some(self.export_format));
            }
        }
        if let Some(color) = copied {
            let mut clipboard = ctx.clone();
            self.session.copy(color, &mut clipboard);
        }

        self.refresh_preview(ctx);
    }
}

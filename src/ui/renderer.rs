//! Widget rasterizer
//!
//! Draws a [`WidgetLayout`] filled from a [`ViewModel`] onto a tiny-skia
//! pixmap. Digits and labels are rasterized with ab_glyph when a font is
//! available; without one, filled boxes get a dot, like a masked PIN field.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};
use tracing::debug;

use crate::app::{Outcome, SubmissionStatus};
use crate::domain::core::Rect;
use crate::ui::layout::WidgetLayout;
use crate::ui::view::ViewModel;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create a {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to read font {}: {source}", .path.display())]
    FontIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Font data could not be parsed")]
    InvalidFont,

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

mod palette {
    use tiny_skia::Color;

    pub fn background() -> Color {
        Color::from_rgba8(250, 250, 252, 255)
    }
    pub fn text() -> Color {
        Color::from_rgba8(28, 28, 30, 255)
    }
    pub fn box_border() -> Color {
        Color::from_rgba8(199, 199, 204, 255)
    }
    pub fn box_focused() -> Color {
        Color::from_rgba8(0, 122, 255, 255)
    }
    pub fn box_fill() -> Color {
        Color::from_rgba8(255, 255, 255, 255)
    }
    pub fn disabled_overlay() -> Color {
        Color::from_rgba8(242, 242, 247, 160)
    }
    pub fn button() -> Color {
        Color::from_rgba8(0, 122, 255, 255)
    }
    pub fn button_disabled() -> Color {
        Color::from_rgba8(174, 174, 178, 255)
    }
    pub fn success() -> Color {
        Color::from_rgba8(52, 199, 89, 255)
    }
    pub fn failure() -> Color {
        Color::from_rgba8(255, 59, 48, 255)
    }
    pub fn on_accent() -> Color {
        Color::from_rgba8(255, 255, 255, 255)
    }
}

/// Renderer for the OTP widget
#[derive(Debug, Default)]
pub struct WidgetRenderer {
    font: Option<FontArc>,
}

impl WidgetRenderer {
    /// Creates a renderer without a font (placeholder digits)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer from raw TrueType/OpenType bytes
    pub fn with_font_data(data: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontArc::try_from_vec(data).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self { font: Some(font) })
    }

    /// Creates a renderer, loading the font at `path` when one is given
    pub fn from_font_path(path: Option<&Path>) -> Result<Self, RendererError> {
        match path {
            Some(path) => {
                let data = std::fs::read(path).map_err(|source| RendererError::FontIo {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!(path = %path.display(), "font loaded");
                Self::with_font_data(data)
            }
            None => Ok(Self::new()),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Renders the widget into a new pixmap
    pub fn render(&self, layout: &WidgetLayout, model: &ViewModel) -> Result<Pixmap, RendererError> {
        let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height).ok_or(
            RendererError::PixmapCreationFailed {
                width: layout.canvas_width,
                height: layout.canvas_height,
            },
        )?;
        pixmap.fill(palette::background());

        let scale = layout.scale;
        self.draw_text_centered(&mut pixmap, layout.title, &model.title, 20.0 * scale, palette::text());

        let editable = model.status.is_editable();
        for (index, rect) in layout.boxes.iter().enumerate() {
            let focused = editable && model.selection.highlights(index);
            self.render_box(&mut pixmap, *rect, &model.boxes[index], focused, scale);
            if !editable {
                fill_rect(&mut pixmap, *rect, palette::disabled_overlay());
            }
        }

        self.render_status(&mut pixmap, layout, model);
        Ok(pixmap)
    }

    /// Writes the pixmap as a PNG file
    pub fn save_png(&self, pixmap: &Pixmap, path: &Path) -> Result<(), RendererError> {
        pixmap
            .save_png(path)
            .map_err(|err| RendererError::Encoding(err.to_string()))
    }

    fn render_box(&self, pixmap: &mut Pixmap, rect: Rect, digit: &str, focused: bool, scale: f32) {
        fill_rect(pixmap, rect, palette::box_fill());

        let (color, width) = if focused {
            (palette::box_focused(), 2.0 * scale)
        } else {
            (palette::box_border(), 1.0 * scale)
        };
        stroke_rect(pixmap, rect, color, width.max(1.0));

        if digit.is_empty() {
            return;
        }
        if self.font.is_some() {
            self.draw_text_centered(pixmap, rect, digit, rect.h as f32 * 0.55, palette::text());
        } else {
            let (cx, cy) = rect.center();
            fill_circle(pixmap, cx, cy, rect.w.min(rect.h) as f32 / 8.0, palette::text());
        }
    }

    fn render_status(&self, pixmap: &mut Pixmap, layout: &WidgetLayout, model: &ViewModel) {
        let slot = layout.status;
        let scale = layout.scale;
        let label_size = 16.0 * scale;

        match (&model.status, &model.outcome) {
            (SubmissionStatus::Submitting, None) => {
                let (cx, cy) = slot.center();
                draw_spinner(pixmap, cx, cy, slot.h as f32 / 3.0, scale);
            }
            (_, Some(outcome)) => {
                let (color, label) = match outcome {
                    Outcome::Success => (palette::success(), "Verified"),
                    Outcome::Failure { .. } => (palette::failure(), "Verification failed"),
                };
                fill_rect(pixmap, slot, color);
                self.draw_text_centered(pixmap, slot, label, label_size, palette::on_accent());
            }
            (SubmissionStatus::Idle, None) => {
                let color = if model.submit_enabled {
                    palette::button()
                } else {
                    palette::button_disabled()
                };
                fill_rect(pixmap, slot, color);
                self.draw_text_centered(pixmap, slot, "Submit", label_size, palette::on_accent());
            }
        }
    }

    /// Draws `text` centered in `rect`; a no-op without a font
    fn draw_text_centered(&self, pixmap: &mut Pixmap, rect: Rect, text: &str, size: f32, color: Color) {
        let Some(font) = &self.font else {
            return;
        };
        let scaled = font.as_scaled(PxScale::from(size));

        let width: f32 = text
            .chars()
            .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
            .sum();
        let (cx, cy) = rect.center();
        let mut caret_x = cx - width / 2.0;
        // descent is negative: this puts the ascent-descent box on the center line
        let baseline = cy + (scaled.ascent() + scaled.descent()) / 2.0;

        for ch in text.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = point(caret_x, baseline);
            caret_x += scaled.h_advance(glyph.id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x + gx as f32;
                let y = bounds.min.y + gy as f32;
                if coverage <= 0.0 {
                    return;
                }
                let mut shaded = color;
                shaded.apply_opacity(coverage);
                if let Some(cell) = SkiaRect::from_xywh(x, y, 1.0, 1.0) {
                    let mut paint = Paint::default();
                    paint.set_color(shaded);
                    pixmap.fill_rect(cell, &paint, Transform::identity(), None);
                }
            });
        }
    }
}

fn to_skia(rect: Rect) -> Option<SkiaRect> {
    SkiaRect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: Color) {
    if let Some(rect) = to_skia(rect) {
        let mut paint = Paint::default();
        paint.set_color(color);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn stroke_rect(pixmap: &mut Pixmap, rect: Rect, color: Color, width: f32) {
    let Some(rect) = to_skia(rect) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, color: Color) {
    let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}

/// Ring of dots fading around the circle
fn draw_spinner(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, scale: f32) {
    const DOTS: usize = 8;
    for dot in 0..DOTS {
        let angle = TAU * dot as f32 / DOTS as f32;
        let mut color = palette::button();
        color.apply_opacity((dot + 1) as f32 / DOTS as f32);
        fill_circle(
            pixmap,
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
            (2.5 * scale).max(1.0),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OtpConfig;
    use crate::domain::selection::Selection;

    fn model() -> ViewModel {
        ViewModel {
            title: "Enter code".to_string(),
            boxes: Default::default(),
            selection: Selection::default(),
            status: SubmissionStatus::Idle,
            outcome: None,
            submit_enabled: true,
        }
    }

    fn pixel(pixmap: &Pixmap, x: i32, y: i32) -> tiny_skia::PremultipliedColorU8 {
        pixmap.pixel(x as u32, y as u32).unwrap()
    }

    #[test]
    fn renders_at_layout_size() {
        let layout = WidgetLayout::from_config(&OtpConfig::default());
        let renderer = WidgetRenderer::new();
        let pixmap = renderer.render(&layout, &model()).unwrap();

        assert_eq!(pixmap.width(), layout.canvas_width);
        assert_eq!(pixmap.height(), layout.canvas_height);
        assert_eq!(pixmap.data().len(), (layout.canvas_width * layout.canvas_height * 4) as usize);
    }

    #[test]
    fn filled_box_gets_placeholder_mark() {
        let layout = WidgetLayout::from_config(&OtpConfig::default());
        let renderer = WidgetRenderer::new();

        let mut filled = model();
        filled.boxes[1] = "7".into();
        let empty_pixmap = renderer.render(&layout, &model()).unwrap();
        let filled_pixmap = renderer.render(&layout, &filled).unwrap();

        let (cx, cy) = layout.boxes[1].center();
        assert_eq!(pixel(&empty_pixmap, cx as i32, cy as i32).red(), 255);
        assert!(pixel(&filled_pixmap, cx as i32, cy as i32).red() < 100);
    }

    #[test]
    fn status_slot_color_follows_state() {
        let layout = WidgetLayout::from_config(&OtpConfig::default());
        let renderer = WidgetRenderer::new();
        // a corner of the slot stays clear of labels
        let (x, y) = (layout.status.x + 1, layout.status.y + 1);

        let idle = renderer.render(&layout, &model()).unwrap();
        assert_eq!(pixel(&idle, x, y).blue(), 255);

        let mut failed = model();
        failed.status = SubmissionStatus::Submitting;
        failed.outcome = Some(Outcome::Failure {
            reason: "nope".into(),
        });
        let failed = renderer.render(&layout, &failed).unwrap();
        assert_eq!(pixel(&failed, x, y).red(), 255);
        assert!(pixel(&failed, x, y).green() < 100);
    }

    fn system_font() -> Option<WidgetRenderer> {
        const CANDIDATES: [&str; 4] = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        let path = CANDIDATES.iter().map(Path::new).find(|path| path.exists())?;
        WidgetRenderer::from_font_path(Some(path)).ok()
    }

    #[test]
    fn font_draws_digit_glyphs_inside_box() {
        let Some(renderer) = system_font() else {
            return;
        };
        assert!(renderer.has_font());
        let layout = WidgetLayout::from_config(&OtpConfig::default());

        let mut filled = model();
        filled.boxes[3] = "4".into();
        let empty_pixmap = renderer.render(&layout, &model()).unwrap();
        let filled_pixmap = renderer.render(&layout, &filled).unwrap();

        let rect = layout.boxes[3];
        let mut inked = 0;
        // stay clear of the border stroke
        for y in rect.y + 4..rect.bottom() - 4 {
            for x in rect.x + 4..rect.right() - 4 {
                assert_eq!(pixel(&empty_pixmap, x, y).red(), 255);
                if pixel(&filled_pixmap, x, y).red() < 128 {
                    inked += 1;
                }
            }
        }
        assert!(inked > 20, "only {inked} dark pixels in the box");

        // neighbouring empty box stays blank
        let (cx, cy) = layout.boxes[4].center();
        assert_eq!(pixel(&filled_pixmap, cx as i32, cy as i32).red(), 255);
    }

    #[test]
    fn invalid_font_is_rejected() {
        let result = WidgetRenderer::with_font_data(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RendererError::InvalidFont)));
    }

    #[test]
    fn missing_font_file_is_reported() {
        let result = WidgetRenderer::from_font_path(Some(Path::new("/no/such/font.ttf")));
        assert!(matches!(result, Err(RendererError::FontIo { .. })));

        let renderer = WidgetRenderer::from_font_path(None).unwrap();
        assert!(!renderer.has_font());
    }
}

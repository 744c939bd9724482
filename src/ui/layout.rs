//! Widget geometry and hit-testing
//!
//! Vertical stack: title, row of boxes, submit/status slot. All rectangles are
//! device pixels with the configured scale applied. Separated from rendering
//! so taps can be routed without a pixmap.

use crate::config::OtpConfig;
use crate::domain::CODE_LENGTH;
use crate::domain::core::Rect;

/// What a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Inside box `index`
    Box(usize),
    /// Inside the row but between or around the boxes
    Row,
    /// The submit / status slot
    StatusSlot,
}

/// Pre-calculated widget geometry
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub title: Rect,
    pub row: Rect,
    pub boxes: [Rect; CODE_LENGTH],
    /// Zero-size rectangle: the hidden field is never drawn
    pub hidden_field: Rect,
    pub status: Rect,
    pub scale: f32,
}

impl WidgetLayout {
    const TITLE_HEIGHT: f32 = 32.0;
    const SECTION_GAP: f32 = 16.0;
    const ROW_MARGIN: f32 = 8.0;
    const STATUS_HEIGHT: f32 = 44.0;

    /// Computes the layout for a configuration
    pub fn from_config(config: &OtpConfig) -> Self {
        let scale = config.scale;
        let px = |value: f32| (value * scale).round() as i32;

        let box_w = px(config.box_width as f32);
        let box_h = px(config.box_height as f32);
        let gap = px(config.box_gap as f32);
        let padding = px(config.padding as f32);
        let row_margin = px(Self::ROW_MARGIN);
        let section_gap = px(Self::SECTION_GAP);

        let boxes_width = box_w * CODE_LENGTH as i32 + gap * (CODE_LENGTH as i32 - 1);
        let title = Rect::new(padding, padding, boxes_width, px(Self::TITLE_HEIGHT));

        let row = Rect::new(
            padding,
            title.bottom() + section_gap,
            boxes_width,
            box_h + row_margin * 2,
        );
        let boxes = std::array::from_fn(|index| {
            Rect::new(
                row.x + (box_w + gap) * index as i32,
                row.y + row_margin,
                box_w,
                box_h,
            )
        });

        let status = Rect::new(
            padding,
            row.bottom() + section_gap,
            boxes_width,
            px(Self::STATUS_HEIGHT),
        );

        Self {
            canvas_width: (boxes_width + padding * 2) as u32,
            canvas_height: (status.bottom() + padding) as u32,
            title,
            row,
            boxes,
            hidden_field: Rect::new(row.x, row.y, 0, 0),
            status,
            scale,
        }
    }

    /// Rectangle of box `index`
    pub fn box_rect(&self, index: usize) -> Option<Rect> {
        self.boxes.get(index).copied()
    }

    /// Maps a tap position onto a widget element
    pub fn hit_test(&self, x: i32, y: i32) -> Option<HitTarget> {
        if let Some(index) = self.boxes.iter().position(|rect| rect.contains_point(x, y)) {
            return Some(HitTarget::Box(index));
        }
        if self.row.contains_point(x, y) {
            return Some(HitTarget::Row);
        }
        if self.status.contains_point(x, y) {
            return Some(HitTarget::StatusSlot);
        }
        None
    }
}

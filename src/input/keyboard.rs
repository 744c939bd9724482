//! Input routing for the hidden field
//!
//! The host delivers raw events from one invisible text field plus taps on
//! the drawn widget. This module decodes them and forwards each to the
//! matching controller operation. It never touches widget state itself.

use tracing::debug;

use crate::app::{HostPlatform, OtpController, OtpError, Verifier};
use crate::ui::layout::{HitTarget, WidgetLayout};

/// Raw events the host can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// New text from the hidden field (keystroke, paste, or autofill)
    Text(String),
    /// Backspace key press
    Backspace,
    /// Native selection moved
    SelectionChange { start: i64, end: i64 },
    /// Tap at a canvas position
    Tap { x: i32, y: i32 },
}

impl InputEvent {
    /// Decodes a host key name
    ///
    /// `"Backspace"` is the only named key the widget reacts to; everything
    /// else is treated as typed text and left for sanitizing.
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "" => None,
            "Backspace" => Some(InputEvent::Backspace),
            text => Some(InputEvent::Text(text.to_string())),
        }
    }
}

/// Forwards decoded events to a controller, using the layout for taps
#[derive(Debug, Clone)]
pub struct InputRouter {
    layout: WidgetLayout,
}

impl InputRouter {
    pub fn new(layout: WidgetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    /// Applies one event to the controller
    ///
    /// Only taps can fail: on a box that does not exist, or on the submit
    /// slot when submitting is not possible.
    pub fn dispatch<H: HostPlatform, V: Verifier>(
        &self,
        controller: &mut OtpController<H, V>,
        event: InputEvent,
    ) -> Result<(), OtpError> {
        match event {
            InputEvent::Text(text) => controller.on_text_changed(&text),
            InputEvent::Backspace => controller.on_backspace(),
            InputEvent::SelectionChange { start, end } => {
                controller.on_selection_changed(start, end)
            }
            InputEvent::Tap { x, y } => match self.layout.hit_test(x, y) {
                Some(HitTarget::Box(index)) => controller.focus_box(index)?,
                Some(HitTarget::Row) => controller.focus_row(),
                Some(HitTarget::StatusSlot) => controller.press_submit()?,
                None => debug!(x, y, "tap outside the widget"),
            },
        }
        Ok(())
    }
}

//! Selection model over the hidden field
//!
//! The hidden text field only knows a flat `(start, end)` selection. This
//! module owns the mapping from that pair onto the box that the next edit
//! targets, so no other code does index arithmetic on raw selections.

use serde::Serialize;

use crate::domain::code::CODE_LENGTH;

/// Upper bound of a selection endpoint (one past the last box)
pub const SELECTION_MAX: usize = CODE_LENGTH;

/// How a selection should be interpreted by the boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Collapsed selection: insertion point before box `index`
    Caret { index: usize },
    /// Exactly one box selected: the next keystroke replaces it
    Overwrite { index: usize },
    /// Anything wider, e.g. a select-all from the host
    Range { start: usize, end: usize },
}

/// Selection pair with `0 <= start <= end <= SELECTION_MAX`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// Builds a selection from raw host values
    ///
    /// Both endpoints are clamped to `[0, SELECTION_MAX]`. A reversed pair
    /// (some hosts report the anchor first) is put back in order.
    ///
    /// # Example
    /// ```rust
    /// use otp_entry::domain::selection::Selection;
    ///
    /// let selection = Selection::clamped(-3, 42);
    /// assert_eq!((selection.start(), selection.end()), (0, 6));
    /// ```
    pub fn clamped(raw_start: i64, raw_end: i64) -> Self {
        let clamp = |raw: i64| raw.clamp(0, SELECTION_MAX as i64) as usize;
        let (a, b) = (clamp(raw_start), clamp(raw_end));
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Collapsed caret before box `index`
    pub fn caret(index: usize) -> Self {
        let index = index.min(SELECTION_MAX);
        Self {
            start: index,
            end: index,
        }
    }

    /// Selection spanning exactly box `index`
    ///
    /// Falls back to a caret at the end when `index` is not a box.
    pub fn overwrite(index: usize) -> Self {
        if index >= CODE_LENGTH {
            return Self::caret(SELECTION_MAX);
        }
        Self {
            start: index,
            end: index + 1,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// True for a collapsed selection
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// True when exactly one box is selected
    pub fn is_overwrite(&self) -> bool {
        self.end == self.start + 1
    }

    /// Classifies the selection
    pub fn kind(&self) -> SelectionKind {
        if self.is_caret() {
            SelectionKind::Caret { index: self.start }
        } else if self.is_overwrite() {
            SelectionKind::Overwrite { index: self.start }
        } else {
            SelectionKind::Range {
                start: self.start,
                end: self.end,
            }
        }
    }

    /// Box that the next typed digit or backspace acts on
    ///
    /// Always `start`, whatever the selection width. A caret parked after the
    /// last box targets nothing.
    pub fn target_slot(&self) -> Option<usize> {
        (self.start < CODE_LENGTH).then_some(self.start)
    }

    /// Caret position after a digit was written into `slot`
    ///
    /// Stops on the last box rather than moving past it, so a correction
    /// typed right after the sixth digit still lands in a box.
    pub fn advanced_from(slot: usize) -> Self {
        Self::caret((slot + 1).min(CODE_LENGTH - 1))
    }

    /// Returns true if box `index` is highlighted by this selection
    pub fn highlights(&self, index: usize) -> bool {
        match self.kind() {
            SelectionKind::Caret { index: caret } => caret == index,
            SelectionKind::Overwrite { index: selected } => selected == index,
            SelectionKind::Range { start, end } => (start..end).contains(&index),
        }
    }
}

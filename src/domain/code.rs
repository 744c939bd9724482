//! Fixed-size code buffer and keyboard input sanitizing
//!
//! The buffer holds one optional digit per visual box. It is positional:
//! writing or clearing one slot never moves the content of another, and the
//! buffer is never resized.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Number of boxes in the widget
pub const CODE_LENGTH: usize = 6;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII only: `\D` would let other scripts' digits through
    Regex::new(r"[^0-9]+").expect("static pattern is valid")
});

/// Errors returned by direct buffer mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("slot {index} is outside the {}-digit code", CODE_LENGTH)]
    SlotOutOfRange { index: usize },

    #[error("'{ch}' is not a decimal digit")]
    NotADigit { ch: char },
}

/// Reduces raw text from the hidden field to at most one digit
///
/// Every character outside `0-9` is dropped and only the first remaining
/// digit is kept, so pasted text like `"a-42"` yields `Some('4')`.
///
/// # Example
/// ```rust
/// use otp_entry::domain::code::sanitize;
///
/// assert_eq!(sanitize("7"), Some('7'));
/// assert_eq!(sanitize(" 12 "), Some('1'));
/// assert_eq!(sanitize("x"), None);
/// ```
pub fn sanitize(raw: &str) -> Option<char> {
    NON_DIGITS.replace_all(raw, "").chars().next()
}

/// Ordered sequence of exactly [`CODE_LENGTH`] slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeBuffer {
    slots: [Option<char>; CODE_LENGTH],
}

impl CodeBuffer {
    /// Creates an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `digit` into slot `index`, replacing whatever was there
    pub fn set(&mut self, index: usize, digit: char) -> Result<(), CodeError> {
        if !digit.is_ascii_digit() {
            return Err(CodeError::NotADigit { ch: digit });
        }
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CodeError::SlotOutOfRange { index })?;
        *slot = Some(digit);
        Ok(())
    }

    /// Empties slot `index` without touching its neighbours
    pub fn clear(&mut self, index: usize) -> Result<(), CodeError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CodeError::SlotOutOfRange { index })?;
        *slot = None;
        Ok(())
    }

    /// Empties every slot
    pub fn reset(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }

    /// Digit at `index`, `None` for an empty or out-of-range slot
    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Returns true if slot `index` holds a digit
    pub fn is_filled(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// All slots in box order
    pub fn slots(&self) -> &[Option<char>; CODE_LENGTH] {
        &self.slots
    }

    /// Concatenation of every filled slot
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    /// True once every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of filled slots
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Display strings per box: the digit, or `""` when empty
    pub fn display(&self) -> [String; CODE_LENGTH] {
        self.slots
            .map(|slot| slot.map(String::from).unwrap_or_default())
    }
}

impl fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.unwrap_or('_'))?;
        }
        Ok(())
    }
}

//! Domain logic and core data structures
//!
//! Pure data: no timers, no host services, no rendering.

pub mod code;
pub mod core;
pub mod selection;

pub use code::{CODE_LENGTH, CodeBuffer, CodeError, sanitize};
pub use self::core::Rect;
pub use selection::{Selection, SelectionKind};

pub mod keyboard;

pub use keyboard::{InputEvent, InputRouter};

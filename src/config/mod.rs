//! Configuration module for otp-entry
//!
//! Holds the widget settings shared by the controller (delays, rejected
//! codes) and the UI layer (title, box geometry, font).

pub mod widget;

pub use widget::{ConfigError, OtpConfig};

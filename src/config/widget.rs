use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::CODE_LENGTH;

/// Widget configuration, loaded from TOML or defaulted
///
/// Every field is optional in the file. Values outside the supported range
/// are clamped by [`OtpConfig::sanitized`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    pub title: String,
    /// Simulated verification round trip
    pub submit_delay_ms: u64,
    /// How long the result indicator stays before the form clears
    pub reset_delay_ms: u64,
    /// Settling delay between the reset and refocusing the field
    pub refocus_delay_ms: u64,
    pub box_width: u32,
    pub box_height: u32,
    pub box_gap: u32,
    pub padding: u32,
    pub scale: f32,
    /// TrueType/OpenType font used for digits; placeholder marks without one
    pub font_path: Option<PathBuf>,
    /// Codes the simulated verifier refuses
    pub rejected_codes: Vec<String>,
}

impl OtpConfig {
    pub const MAX_SUBMIT_DELAY_MS: u64 = 30_000;
    pub const MAX_RESET_DELAY_MS: u64 = 10_000;
    pub const MAX_REFOCUS_DELAY_MS: u64 = 2_000;
    pub const MIN_BOX_SIZE: u32 = 16;
    pub const MAX_BOX_SIZE: u32 = 256;
    pub const MAX_BOX_GAP: u32 = 64;
    pub const MAX_PADDING: u32 = 128;
    pub const MIN_SCALE: f32 = 0.5;
    pub const MAX_SCALE: f32 = 4.0;

    /// Parses a TOML document and sanitizes the result
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let parsed: OtpConfig = toml::from_str(text)?;
        let config = parsed.sanitized();
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns a copy with every numeric value clamped to its supported range
    pub fn sanitized(mut self) -> Self {
        self.submit_delay_ms = self.submit_delay_ms.min(Self::MAX_SUBMIT_DELAY_MS);
        self.reset_delay_ms = self.reset_delay_ms.min(Self::MAX_RESET_DELAY_MS);
        self.refocus_delay_ms = self.refocus_delay_ms.min(Self::MAX_REFOCUS_DELAY_MS);
        self.box_width = Self::sanitize_box_dimension(self.box_width);
        self.box_height = Self::sanitize_box_dimension(self.box_height);
        self.box_gap = self.box_gap.min(Self::MAX_BOX_GAP);
        self.padding = self.padding.min(Self::MAX_PADDING);
        self.scale = if self.scale.is_finite() {
            self.scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
        } else {
            1.0
        };
        self
    }

    pub fn sanitize_box_dimension(value: u32) -> u32 {
        value.clamp(Self::MIN_BOX_SIZE, Self::MAX_BOX_SIZE)
    }

    /// Checks values that cannot be fixed by clamping
    pub fn validate(&self) -> Result<(), ConfigError> {
        for code in &self.rejected_codes {
            let well_formed =
                code.len() == CODE_LENGTH && code.chars().all(|ch| ch.is_ascii_digit());
            if !well_formed {
                return Err(ConfigError::InvalidRejectedCode { code: code.clone() });
            }
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn refocus_delay(&self) -> Duration {
        Duration::from_millis(self.refocus_delay_ms)
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            title: "Enter verification code".to_string(),
            submit_delay_ms: 1_500,
            reset_delay_ms: 800,
            refocus_delay_ms: 100,
            box_width: 48,
            box_height: 56,
            box_gap: 10,
            padding: 24,
            scale: 1.0,
            font_path: None,
            rejected_codes: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Rejected code '{code}' must be exactly {} digits", CODE_LENGTH)]
    InvalidRejectedCode { code: String },
}

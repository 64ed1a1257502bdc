//! Runtime settings
//!
//! Nothing is persisted. The browser shell may pass overrides as JSON in the
//! canvas element's `data-settings` attribute; missing fields fall back to
//! the defaults below. The particle pool size is fixed and not a setting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunables for the background and the puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    // === Background ===
    /// Horizontal scanline overlay
    pub scanlines: bool,
    /// Random glitch bands
    pub glitch: bool,
    /// Per-frame glitch probability (0.0 - 1.0)
    pub glitch_chance: f64,

    // === Puzzle ===
    /// Delay between the last placement and completion (ms)
    pub settle_delay_ms: f64,

    // === Accessibility ===
    /// Reduced motion (no glitch flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scanlines: true,
            glitch: true,
            glitch_chance: GLITCH_CHANCE,
            settle_delay_ms: SETTLE_DELAY_MS,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse overrides; unknown fields are rejected, missing ones default
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.glitch_chance) {
            return Err(SettingsError::OutOfRange {
                field: "glitch_chance",
                value: self.glitch_chance,
            });
        }
        if !self.settle_delay_ms.is_finite() || self.settle_delay_ms < 0.0 {
            return Err(SettingsError::OutOfRange {
                field: "settle_delay_ms",
                value: self.settle_delay_ms,
            });
        }
        Ok(())
    }

    /// Glitch bands respect reduced_motion
    pub fn effective_glitch(&self) -> bool {
        self.glitch && !self.reduced_motion
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Parse(String),
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(msg) => write!(f, "invalid settings json: {msg}"),
            SettingsError::OutOfRange { field, value } => {
                write!(f, "setting {field} out of range: {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

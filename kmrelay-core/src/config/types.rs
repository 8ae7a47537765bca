//! Configuration type definitions

use kmrelay_protocol::DEFAULT_BAUD_RATE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference width assumed until the host sends a resolution frame
pub const DEFAULT_WIDTH: u16 = 1920;

/// Reference height assumed until the host sends a resolution frame
pub const DEFAULT_HEIGHT: u16 = 1080;

/// When HID reports are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReportMode {
    /// Every state mutation sends a report immediately
    #[default]
    Auto,
    /// Reports are only sent when the owner asks for one
    Manual,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate of zero
    InvalidBaudRate,
    /// Reference width or height of zero
    InvalidResolution,
}

/// Relay configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RelayConfig {
    /// Serial link speed in bits per second
    pub baud_rate: u32,
    /// Initial reference width for absolute coordinates
    pub width: u16,
    /// Initial reference height for absolute coordinates
    pub height: u16,
    /// Report emission mode
    pub report_mode: ReportMode,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            report_mode: ReportMode::Auto,
        }
    }
}

impl RelayConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution);
        }
        Ok(())
    }
}

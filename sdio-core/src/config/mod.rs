//! Driver configuration
//!
//! Board-level settings fixed at build time (or loaded once at boot):
//! transfer clock, retry count, and which optional hardware is present.
//! With the `serde` feature the configuration can be stored in flash as
//! postcard-serialized binary data alongside the rest of the board config.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::{DEFAULT_TRANSFER_CLOCK_HZ, SDIO_MAX_CLOCK_HZ};
use crate::retry::RetryBudget;

/// Read timeout per block (ms)
pub const READ_TIMEOUT_MS: u32 = 1000;

/// Write timeout per block (ms)
///
/// Shorter than the read timeout; writes complete faster on this hardware.
pub const WRITE_TIMEOUT_MS: u32 = 500;

/// Default attempts per operation
pub const DEFAULT_RETRIES: u8 = 3;

/// Maximum serialized config size (binary)
pub const MAX_CONFIG_SIZE: usize = 16;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Retry count of zero
    ZeroRetries,
    /// Transfer clock of zero
    ZeroFrequency,
    /// Transfer clock above the adapter's 48 MHz ceiling
    FrequencyTooHigh,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroRetries => f.write_str("retry count must be at least 1"),
            ConfigError::ZeroFrequency => f.write_str("transfer clock must be non-zero"),
            ConfigError::FrequencyTooHigh => {
                write!(f, "transfer clock above {} Hz", SDIO_MAX_CLOCK_HZ)
            }
            ConfigError::Serialize => f.write_str("config serialization failed"),
            ConfigError::Deserialize => f.write_str("config deserialization failed"),
        }
    }
}

/// SDIO driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SdioConfig {
    /// Target card clock for block transfers (Hz)
    pub transfer_clock_hz: u32,
    /// Attempts per operation (identification, 4-bit switch, read, write)
    pub retries: u8,
    /// D1-D3 are routed to the card socket
    pub wide_bus_wired: bool,
    /// Feed the watchdog between attempts
    pub watchdog: bool,
}

impl Default for SdioConfig {
    fn default() -> Self {
        Self {
            transfer_clock_hz: DEFAULT_TRANSFER_CLOCK_HZ,
            retries: DEFAULT_RETRIES,
            wide_bus_wired: true,
            watchdog: false,
        }
    }
}

impl SdioConfig {
    /// Create a config with default settings
    pub const fn new() -> Self {
        Self {
            transfer_clock_hz: DEFAULT_TRANSFER_CLOCK_HZ,
            retries: DEFAULT_RETRIES,
            wide_bus_wired: true,
            watchdog: false,
        }
    }

    /// Set the transfer clock
    pub const fn with_transfer_clock(mut self, hz: u32) -> Self {
        self.transfer_clock_hz = hz;
        self
    }

    /// Set attempts per operation
    pub const fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Declare whether D1-D3 are wired
    pub const fn with_wide_bus(mut self, wired: bool) -> Self {
        self.wide_bus_wired = wired;
        self
    }

    /// Enable or disable watchdog refresh between attempts
    pub const fn with_watchdog(mut self, enabled: bool) -> Self {
        self.watchdog = enabled;
        self
    }

    /// Retry budget for one operation
    pub const fn retry_budget(&self) -> RetryBudget {
        RetryBudget::new(self.retries)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.transfer_clock_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.transfer_clock_hz > SDIO_MAX_CLOCK_HZ {
            return Err(ConfigError::FrequencyTooHigh);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used portion
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdioConfig::default();
        assert_eq!(config, SdioConfig::new());
        assert_eq!(config.transfer_clock_hz, 18_000_000);
        assert_eq!(config.retry_budget().attempts(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = SdioConfig::new();
        assert_eq!(config.with_retries(0).validate(), Err(ConfigError::ZeroRetries));
        assert_eq!(config.with_transfer_clock(0).validate(), Err(ConfigError::ZeroFrequency));
        assert_eq!(
            config.with_transfer_clock(50_000_000).validate(),
            Err(ConfigError::FrequencyTooHigh)
        );
        assert!(config.with_transfer_clock(48_000_000).validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SdioConfig::new()
            .with_wide_bus(false)
            .with_watchdog(true)
            .with_retries(5);

        assert!(!config.wide_bus_wired);
        assert!(config.watchdog);
        assert_eq!(config.retry_budget(), RetryBudget::new(5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_storage() {
        let config = SdioConfig::new().with_transfer_clock(12_000_000).with_wide_bus(false);
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let len = config.to_bytes(&mut buf).unwrap().len();

        assert_eq!(SdioConfig::from_bytes(&buf[..len]), Ok(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stored_config_is_validated() {
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let len = SdioConfig::new().with_retries(0).to_bytes(&mut buf).unwrap().len();

        assert_eq!(SdioConfig::from_bytes(&buf[..len]), Err(ConfigError::ZeroRetries));
        assert_eq!(SdioConfig::from_bytes(&[]), Err(ConfigError::Deserialize));
    }
}

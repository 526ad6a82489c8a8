//! Bus-level configuration types
//!
//! Everything the driver hands to [`SdioPeripheral::configure`](crate::SdioPeripheral::configure)
//! when it (re)programs the host controller.

/// Data bus width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWidth {
    /// D0 only
    #[default]
    One,
    /// D0-D3
    Four,
}

impl BusWidth {
    /// Number of data lines in use
    pub const fn lines(self) -> u8 {
        match self {
            BusWidth::One => 1,
            BusWidth::Four => 4,
        }
    }
}

/// Clock divider register value
///
/// The host controller produces `SDIO_CK = input / (divider + 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider(pub u32);

impl ClockDivider {
    /// Raw register value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Card clock produced from `input_hz` with this divider
    pub const fn output_hz(self, input_hz: u32) -> u32 {
        input_hz / self.0.saturating_add(2)
    }

    /// Clamp to a register field of `bits` width
    ///
    /// Clamping lowers the divider, which raises the card clock, so callers
    /// only do this when the field really is narrower than the computed value.
    pub const fn clamped(self, bits: u32) -> Self {
        let max = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
        if self.0 > max {
            ClockDivider(max)
        } else {
            self
        }
    }
}

/// Live clock frequencies supplied by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralClocks {
    /// SDIO adapter kernel clock (SDIOCLK), the divider input
    pub input_hz: u32,
    /// APB2 bus clock; the card clock must stay below 8/3 of it
    pub pclk2_hz: u32,
}

impl PeripheralClocks {
    /// Create a clock snapshot
    pub const fn new(input_hz: u32, pclk2_hz: u32) -> Self {
        Self { input_hz, pclk2_hz }
    }
}

/// Clock edge on which command/data are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockEdge {
    #[default]
    Rising,
    Falling,
}

/// Card power rail state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    #[default]
    Off,
    On,
}

/// Full host controller configuration
///
/// Mirrors the CLKCR/POWER register contents. Hardware flow control,
/// clock bypass and power save stay disabled; the driver never enables them.
/// The default is the reset state: unpowered, 1-bit, divider 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Data bus width
    pub width: BusWidth,
    /// Card clock divider
    pub divider: ClockDivider,
    /// Clock edge
    pub edge: ClockEdge,
    /// Power rail
    pub power: PowerState,
}

impl BusConfig {
    /// Powered, 1-bit bus at the given divider
    pub const fn powered(divider: ClockDivider) -> Self {
        Self {
            width: BusWidth::One,
            divider,
            edge: ClockEdge::Rising,
            power: PowerState::On,
        }
    }

    /// Same configuration with a different divider
    pub const fn with_divider(self, divider: ClockDivider) -> Self {
        Self { divider, ..self }
    }

    /// Same configuration with a different bus width
    pub const fn with_width(self, width: BusWidth) -> Self {
        Self { width, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_frequency() {
        // 48 MHz / (118 + 2) = 400 kHz
        assert_eq!(ClockDivider(118).output_hz(48_000_000), 400_000);
        assert_eq!(ClockDivider(0).output_hz(48_000_000), 24_000_000);
    }

    #[test]
    fn test_clamp_to_register_width() {
        assert_eq!(ClockDivider(300).clamped(8), ClockDivider(255));
        assert_eq!(ClockDivider(118).clamped(8), ClockDivider(118));
        assert_eq!(ClockDivider(u32::MAX).clamped(32), ClockDivider(u32::MAX));
    }

    #[test]
    fn test_config_builders() {
        let config = BusConfig::powered(ClockDivider(118))
            .with_width(BusWidth::Four)
            .with_divider(ClockDivider(1));

        assert_eq!(config.width, BusWidth::Four);
        assert_eq!(config.divider, ClockDivider(1));
        assert_eq!(config.power, PowerState::On);
        assert_eq!(BusWidth::Four.lines(), 4);
    }
}

//! Driver errors
//!
//! Only terminal failures show up here: single failed attempts are absorbed
//! by the retry budget, and a card that refuses 4-bit mode just runs at
//! 1 bit. Callers that need the underlying reason query the card state.

/// Errors surfaced by the block driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdioError {
    /// Operation needs an initialized card
    NotReady,
    /// Card identification failed on every attempt
    IdentificationFailed,
    /// 4-bit mode failed, and identification failed again in 1-bit mode
    FallbackFailed,
    /// Block read failed on every attempt
    ReadFailed,
    /// Block write failed on every attempt
    WriteFailed,
    /// Adapter clock too fast to reach 400 kHz within the CLKDIV field
    ClockUnreachable,
    /// Multi-block transfer ran past the last addressable sector
    AddressOverflow,
}

impl core::fmt::Display for SdioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            SdioError::NotReady => "card not initialized",
            SdioError::IdentificationFailed => "card identification failed",
            SdioError::FallbackFailed => "1-bit fallback initialization failed",
            SdioError::ReadFailed => "block read failed",
            SdioError::WriteFailed => "block write failed",
            SdioError::ClockUnreachable => "identification clock out of divider range",
            SdioError::AddressOverflow => "block address overflow",
        };
        f.write_str(msg)
    }
}

impl From<sdio_hal::AddressOverflow> for SdioError {
    fn from(_: sdio_hal::AddressOverflow) -> Self {
        SdioError::AddressOverflow
    }
}

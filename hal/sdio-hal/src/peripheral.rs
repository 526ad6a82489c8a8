//! SDIO host controller abstractions
//!
//! Provides the traits a chip-specific HAL implements so the block driver
//! can bring up a card and move sectors without touching registers.

use crate::bus::{BusConfig, PeripheralClocks};
use crate::card::{Block, BlockAddress, CardState};

/// SDIO host controller
///
/// Every call is synchronous: the implementation blocks (polling or DMA
/// wait) until the request completes or its own timeout expires. The
/// driver serializes all calls, so implementations need no locking.
pub trait SdioPeripheral {
    /// Error type for card commands and transfers
    type Error: core::fmt::Debug;

    /// Current adapter and bus clock frequencies
    fn clocks(&self) -> PeripheralClocks;

    /// Program bus width, clock divider, clock edge and power rail
    ///
    /// Pure register configuration; assumed to always succeed.
    fn configure(&mut self, config: BusConfig);

    /// Run card identification (CMD0/CMD8/ACMD41/CMD2/CMD3/CMD7)
    ///
    /// May take many bus cycles. Leaves the card selected in transfer state
    /// on success.
    fn identify_card(&mut self) -> Result<(), Self::Error>;

    /// Switch the card to 4-bit data bus (ACMD6)
    ///
    /// Cards that only support 1-bit mode fail here; that is expected. On
    /// success the driver reprograms the host width through [`configure`].
    ///
    /// [`configure`]: SdioPeripheral::configure
    fn enable_wide_bus(&mut self) -> Result<(), Self::Error>;

    /// Read exactly one sector
    ///
    /// # Arguments
    /// * `block` - Destination buffer
    /// * `address` - Sector index
    /// * `timeout_ms` - Upper bound on the transfer
    fn read_block(
        &mut self,
        block: &mut Block,
        address: BlockAddress,
        timeout_ms: u32,
    ) -> Result<(), Self::Error>;

    /// Write exactly one sector
    ///
    /// # Arguments
    /// * `block` - Source buffer
    /// * `address` - Sector index
    /// * `timeout_ms` - Upper bound on the transfer
    fn write_block(
        &mut self,
        block: &Block,
        address: BlockAddress,
        timeout_ms: u32,
    ) -> Result<(), Self::Error>;

    /// Query the card's current state (CMD13)
    ///
    /// A bus error while reading the status is reported as [`CardState::Error`].
    fn card_state(&mut self) -> CardState;
}

/// Supervisory timer refresh hook
///
/// Called between retry attempts so a slow card doesn't trip the
/// independent watchdog. Cannot abort an operation in flight.
pub trait Watchdog {
    /// Feed the watchdog
    fn refresh(&mut self);
}

/// Watchdog hook for boards without a watchdog
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWatchdog;

impl Watchdog for NoWatchdog {
    fn refresh(&mut self) {}
}

impl<W: Watchdog + ?Sized> Watchdog for &mut W {
    fn refresh(&mut self) {
        (**self).refresh()
    }
}

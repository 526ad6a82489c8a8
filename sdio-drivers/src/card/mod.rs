//! SD card over SDIO
//!
//! [`SdioCard`] owns the host controller and drives it from power-off to a
//! 4-bit (or 1-bit) transfer-ready bus, then moves single sectors with
//! bounded retries.
//!
//! # Usage
//!
//! ```ignore
//! let mut card = SdioCard::new(peripheral, SdioConfig::default());
//! card.initialize()?;
//!
//! let mut block = Block::zeroed();
//! card.read_block(0, &mut block)?;
//! ```
//!
//! Calls are synchronous and take `&mut self`, so only one operation can be
//! in flight per handle.

mod init;
mod transfer;

#[cfg(test)]
pub(crate) mod mock;

use heapless::Vec;
use sdio_core::retry::{retry, retry_with, Exhausted, Success};
use sdio_core::state::{InitState, Lifecycle};
use sdio_core::{SdioConfig, SdioError};
use sdio_hal::{
    Block, BlockAddress, BlockDevice, BusConfig, BusWidth, ClockDivider, NoWatchdog,
    SdioPeripheral, Watchdog,
};

pub use transfer::{AttemptError, TransferOutcome};

/// Maximum bring-up states recorded per `initialize` call
///
/// The longest path (4-bit refused, 1-bit fallback) visits 9 states.
pub const INIT_TRACE_LEN: usize = 12;

/// SD card driver handle
pub struct SdioCard<P, W = NoWatchdog> {
    peripheral: P,
    watchdog: W,
    config: SdioConfig,
    lifecycle: Lifecycle,
    bus: BusConfig,
    trace: Vec<InitState, INIT_TRACE_LEN>,
}

impl<P: SdioPeripheral> SdioCard<P, NoWatchdog> {
    /// Create a driver for a board without a watchdog
    pub fn new(peripheral: P, config: SdioConfig) -> Self {
        Self::with_watchdog(peripheral, NoWatchdog, config)
    }
}

impl<P: SdioPeripheral, W: Watchdog> SdioCard<P, W> {
    /// Create a driver that feeds `watchdog` between attempts
    ///
    /// The watchdog is only refreshed when `config.watchdog` is set, which
    /// [`SdioConfig::default`] leaves off. Pair this constructor with
    /// `SdioConfig::new().with_watchdog(true)` unless the hook should stay
    /// idle.
    pub fn with_watchdog(peripheral: P, watchdog: W, config: SdioConfig) -> Self {
        Self {
            peripheral,
            watchdog,
            config,
            lifecycle: Lifecycle::Uninitialized,
            bus: BusConfig::default(),
            trace: Vec::new(),
        }
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Negotiated data bus width
    pub fn bus_width(&self) -> BusWidth {
        self.bus.width
    }

    /// Negotiated card clock divider
    pub fn clock_divider(&self) -> ClockDivider {
        self.bus.divider
    }

    /// Driver configuration
    pub fn config(&self) -> &SdioConfig {
        &self.config
    }

    /// States visited by the last `initialize` call
    pub fn init_trace(&self) -> &[InitState] {
        &self.trace
    }

    /// Access the host controller
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Mutable access to the host controller
    ///
    /// Reconfiguring the controller behind the driver's back invalidates
    /// the negotiated bus settings; call `initialize` again afterwards.
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    /// Access the watchdog hook
    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    /// Consume the driver and return the host controller and watchdog
    pub fn release(self) -> (P, W) {
        (self.peripheral, self.watchdog)
    }

    /// Run `op` against the peripheral within the configured retry budget
    ///
    /// With `feed_watchdog` set (and the watchdog enabled in the config),
    /// the watchdog is refreshed before every attempt.
    fn retried<T, E, F>(&mut self, feed_watchdog: bool, mut op: F) -> Result<Success<T>, Exhausted<E>>
    where
        F: FnMut(&mut P) -> Result<T, E>,
    {
        let budget = self.config.retry_budget();
        let peripheral = &mut self.peripheral;

        if feed_watchdog && self.config.watchdog {
            let watchdog = &mut self.watchdog;
            retry_with(budget, || watchdog.refresh(), |_| op(peripheral))
        } else {
            retry(budget, |_| op(peripheral))
        }
    }

    fn ensure_ready(&self) -> Result<(), SdioError> {
        if self.lifecycle.is_ready() {
            Ok(())
        } else {
            Err(SdioError::NotReady)
        }
    }
}

impl<P: SdioPeripheral, W: Watchdog> BlockDevice for SdioCard<P, W> {
    type Error = SdioError;

    fn read(&mut self, address: BlockAddress, block: &mut Block) -> Result<(), Self::Error> {
        self.read_block(address, block)
    }

    fn write(&mut self, address: BlockAddress, block: &Block) -> Result<(), Self::Error> {
        self.write_block(address, block)
    }
}

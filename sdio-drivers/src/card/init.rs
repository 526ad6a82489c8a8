//! Card bring-up
//!
//! Walks [`InitState`] from Reset to Ready, performing the side effect for
//! each state and feeding the outcome back into the state machine.
//!
//! The two retry tiers differ on purpose: a card refusing 4-bit mode is
//! normal (some cards are 1-bit only) and only triggers a 1-bit restart,
//! while failing identification in that 1-bit restart is a real fault.

use sdio_core::clock::{
    compute_divider, identification_divider, CLKDIV_BITS, IDENTIFICATION_CLOCK_HZ,
};
use sdio_core::state::{InitEvent, InitState, Lifecycle};
use sdio_core::SdioError;
use sdio_hal::{BusConfig, BusWidth, SdioPeripheral, Watchdog};

use super::SdioCard;
use crate::fmt::Dbg;

impl<P: SdioPeripheral, W: Watchdog> SdioCard<P, W> {
    /// Bring the card up to a transfer-ready bus
    ///
    /// Safe to call again after a failure; every call starts over from a
    /// reset peripheral. On success the card is ready for block transfers
    /// at the negotiated width and clock.
    pub fn initialize(&mut self) -> Result<(), SdioError> {
        self.lifecycle = Lifecycle::Initializing;
        self.trace.clear();

        let mut state = InitState::Reset;
        loop {
            let _ = self.trace.push(state);

            let event = match state {
                InitState::Reset | InitState::WideBusAttempted => self.low_level_init(),
                InitState::LowSpeedReady { .. } => self.identify(),
                InitState::Identified { .. } => self.go_to_transfer_speed(),
                InitState::TransferSpeed { fallback } => {
                    if fallback || !self.config.wide_bus_wired {
                        InitEvent::WideBusSkipped
                    } else {
                        self.negotiate_wide_bus()
                    }
                }
                InitState::Ready => {
                    self.lifecycle = state.lifecycle();
                    info!(
                        "SD card ready: {}-bit bus, divider {}",
                        self.bus.width.lines(),
                        self.bus.divider.value()
                    );
                    return Ok(());
                }
                InitState::Failed(e) => {
                    self.lifecycle = state.lifecycle();
                    error!("SD card initialization failed: {}", e);
                    return Err(e);
                }
            };

            trace!("init event: {}", event);
            state = state.transition(event);
        }
    }

    /// Reset → LowSpeedReady: power on at 1 bit and the identification clock
    fn low_level_init(&mut self) -> InitEvent {
        let clocks = self.peripheral.clocks();
        let Some(divider) = identification_divider(clocks.input_hz) else {
            error!(
                "SDIOCLK {} Hz cannot be divided down to {} Hz",
                clocks.input_hz, IDENTIFICATION_CLOCK_HZ
            );
            return InitEvent::ClockUnreachable;
        };

        self.bus = BusConfig::powered(divider);
        self.peripheral.configure(self.bus);

        debug!("SDIO powered, identification divider {}", self.bus.divider.value());
        InitEvent::LowLevelConfigured
    }

    /// LowSpeedReady → Identified
    fn identify(&mut self) -> InitEvent {
        match self.retried(true, |p| p.identify_card()) {
            Ok(done) => {
                debug!("card identified after {} attempt(s)", done.attempts);
                InitEvent::Identified
            }
            Err(failed) => {
                warn!(
                    "card identification failed after {} attempt(s): {}",
                    failed.attempts,
                    Dbg(&failed.last_error)
                );
                InitEvent::IdentificationExhausted
            }
        }
    }

    /// Identified → TransferSpeed
    fn go_to_transfer_speed(&mut self) -> InitEvent {
        let clocks = self.peripheral.clocks();
        let wanted = compute_divider(self.config.transfer_clock_hz, clocks);
        let divider = wanted.clamped(CLKDIV_BITS);
        if divider != wanted {
            warn!(
                "transfer divider {} exceeds CLKDIV, card clock above {} Hz",
                wanted.value(),
                self.config.transfer_clock_hz
            );
        }
        self.bus = self.bus.with_divider(divider);
        self.peripheral.configure(self.bus);

        debug!(
            "transfer clock {} Hz (divider {})",
            divider.output_hz(clocks.input_hz),
            divider.value()
        );
        InitEvent::TransferClockSet
    }

    /// TransferSpeed → Ready or WideBusAttempted
    fn negotiate_wide_bus(&mut self) -> InitEvent {
        match self.retried(true, |p| p.enable_wide_bus()) {
            Ok(_) => {
                self.bus = self.bus.with_width(BusWidth::Four);
                self.peripheral.configure(self.bus);
                InitEvent::WideBusEnabled
            }
            Err(failed) => {
                warn!(
                    "4-bit bus refused after {} attempt(s) ({}), restarting at 1 bit",
                    failed.attempts,
                    Dbg(&failed.last_error)
                );
                InitEvent::WideBusExhausted
            }
        }
    }
}

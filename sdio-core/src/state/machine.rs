//! State machine definitions
//!
//! Bring-up runs Reset → LowSpeedReady → Identified → TransferSpeed → Ready.
//! When the board has D1-D3 wired, TransferSpeed tries 4-bit mode first; if
//! the card refuses, the machine goes through WideBusAttempted and repeats
//! the whole sequence at 1 bit, this time with no way out but Ready or
//! Failed.

use super::events::InitEvent;
use crate::error::SdioError;

/// Lifecycle of a driver handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    /// Created, `initialize` not called yet
    #[default]
    Uninitialized,
    /// `initialize` in progress
    Initializing,
    /// Card usable for block transfers
    Ready,
    /// Last `initialize` failed
    Error,
}

impl Lifecycle {
    /// Check if block transfers are allowed
    pub fn is_ready(&self) -> bool {
        matches!(self, Lifecycle::Ready)
    }
}

/// Bring-up states
///
/// `fallback` marks the second, 1-bit-only pass after the card refused
/// 4-bit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
    /// Peripheral unpowered/unconfigured
    Reset,
    /// Powered, 1-bit, identification clock
    LowSpeedReady { fallback: bool },
    /// Card identified and selected
    Identified { fallback: bool },
    /// Transfer clock programmed
    TransferSpeed { fallback: bool },
    /// 4-bit mode refused; peripheral about to be reset for a 1-bit pass
    WideBusAttempted,
    /// Bring-up complete
    Ready,
    /// Bring-up failed
    Failed(SdioError),
}

impl InitState {
    /// Check if bring-up has finished, one way or the other
    pub fn is_terminal(&self) -> bool {
        matches!(self, InitState::Ready | InitState::Failed(_))
    }

    /// Check if this state belongs to the 1-bit fallback pass
    pub fn is_fallback(&self) -> bool {
        match self {
            InitState::LowSpeedReady { fallback }
            | InitState::Identified { fallback }
            | InitState::TransferSpeed { fallback } => *fallback,
            InitState::WideBusAttempted => true,
            _ => false,
        }
    }

    /// Handle lifecycle corresponding to this bring-up state
    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            InitState::Ready => Lifecycle::Ready,
            InitState::Failed(_) => Lifecycle::Error,
            _ => Lifecycle::Initializing,
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that make no sense in the current state leave it unchanged.
    pub fn transition(self, event: InitEvent) -> Self {
        use InitEvent as E;
        use InitState::*;

        match (self, event) {
            // Low-level configuration
            (Reset, E::LowLevelConfigured) => LowSpeedReady { fallback: false },
            (WideBusAttempted, E::LowLevelConfigured) => LowSpeedReady { fallback: true },
            (Reset | WideBusAttempted, E::ClockUnreachable) => Failed(SdioError::ClockUnreachable),

            // Identification
            (LowSpeedReady { fallback }, E::Identified) => Identified { fallback },
            (LowSpeedReady { fallback: false }, E::IdentificationExhausted) => {
                Failed(SdioError::IdentificationFailed)
            }
            (LowSpeedReady { fallback: true }, E::IdentificationExhausted) => {
                Failed(SdioError::FallbackFailed)
            }

            // Transfer clock
            (Identified { fallback }, E::TransferClockSet) => TransferSpeed { fallback },

            // Bus width
            (TransferSpeed { .. }, E::WideBusSkipped) => Ready,
            (TransferSpeed { fallback: false }, E::WideBusEnabled) => Ready,
            (TransferSpeed { fallback: false }, E::WideBusExhausted) => WideBusAttempted,

            // Default: stay in current state
            _ => self,
        }
    }
}

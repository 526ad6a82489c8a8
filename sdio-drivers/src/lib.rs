//! SDIO block driver
//!
//! Concrete driver on top of the `sdio-hal` traits:
//!
//! - Card bring-up: identification clock, card identification, transfer
//!   clock, 4-bit negotiation with 1-bit fallback
//! - Single-sector read/write with bounded retries and card state checks
//! - [`BlockDevice`](sdio_hal::BlockDevice) implementation for filesystems

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod card;

pub use card::{AttemptError, SdioCard, TransferOutcome};

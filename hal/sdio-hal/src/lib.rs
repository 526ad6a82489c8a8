//! SDIO Hardware Abstraction Layer
//!
//! This crate defines the contract between the block driver and the
//! chip-specific SDIO host controller. A chip HAL implements
//! [`SdioPeripheral`] on top of its register block (or vendor HAL), and
//! the driver in `sdio-drivers` runs unchanged on any of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Filesystem (FAT, littlefs, ...)        │
//! └─────────────────────────────────────────┘
//!                     │  BlockDevice
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sdio-drivers (SdioCard)                │
//! └─────────────────────────────────────────┘
//!                     │  SdioPeripheral + Watchdog
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL (STM32F1/F4/F7 SDIO, ...)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`peripheral::SdioPeripheral`] - SDIO host controller operations
//! - [`peripheral::Watchdog`] - Supervisory timer refresh hook
//! - [`block::BlockDevice`] - Sector storage as seen by a filesystem

#![no_std]
#![deny(unsafe_code)]

pub mod block;
pub mod bus;
pub mod card;
pub mod peripheral;

// Re-export key types at crate root for convenience
pub use block::{AddressOverflow, BlockDevice};
pub use bus::{BusConfig, BusWidth, ClockDivider, ClockEdge, PeripheralClocks, PowerState};
pub use card::{Block, BlockAddress, CardState, BLOCK_SIZE};
pub use peripheral::{NoWatchdog, SdioPeripheral, Watchdog};

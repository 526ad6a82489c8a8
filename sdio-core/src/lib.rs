//! Board-agnostic core logic for the SDIO block driver
//!
//! This crate contains all driver logic that does not touch the host
//! controller:
//!
//! - Clock divider negotiation
//! - Bounded retry
//! - Bring-up state machine and handle lifecycle
//! - Configuration type definitions
//! - Driver error type

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod error;
pub mod retry;
pub mod state;

pub use config::{ConfigError, SdioConfig};
pub use error::SdioError;
pub use retry::RetryBudget;

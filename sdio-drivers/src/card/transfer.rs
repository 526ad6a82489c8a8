//! Single-sector reads and writes
//!
//! Each attempt issues one full-block transfer and then queries the card
//! state no matter what the transfer reported. The host can report a clean
//! transfer while the card itself has dropped into an error state, so an
//! attempt only counts when both checks pass.

use sdio_core::config::{READ_TIMEOUT_MS, WRITE_TIMEOUT_MS};
use sdio_core::SdioError;
use sdio_hal::{Block, BlockAddress, CardState, SdioPeripheral, Watchdog};

use super::SdioCard;
use crate::fmt::Dbg;

/// Result of one transfer attempt plus the card state read right after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome<E> {
    /// What the host controller reported for the transfer
    pub transfer: Result<(), E>,
    /// Card state queried after the transfer
    pub card: CardState,
}

/// Why an attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptError<E> {
    /// The host controller reported a failed transfer
    Transfer(E),
    /// The transfer went through but the card is unhealthy
    Card(CardState),
}

impl<E> TransferOutcome<E> {
    /// Check if the transfer succeeded and the card is healthy
    pub fn is_success(&self) -> bool {
        self.transfer.is_ok() && self.card.is_healthy()
    }

    /// Collapse into a result, preferring the transfer error when both failed
    pub fn into_result(self) -> Result<(), AttemptError<E>> {
        match self.transfer {
            Err(e) => Err(AttemptError::Transfer(e)),
            Ok(()) if !self.card.is_healthy() => Err(AttemptError::Card(self.card)),
            Ok(()) => Ok(()),
        }
    }
}

impl<P: SdioPeripheral, W: Watchdog> SdioCard<P, W> {
    /// Read one sector into `block`
    ///
    /// Retries back-to-back within the configured budget, feeding the
    /// watchdog before each attempt. There is no automatic re-initialization
    /// on failure; the handle stays usable for the next call.
    pub fn read_block(&mut self, address: BlockAddress, block: &mut Block) -> Result<(), SdioError> {
        self.ensure_ready()?;

        let result = self.retried(true, |p| {
            let transfer = p.read_block(block, address, READ_TIMEOUT_MS);
            let card = p.card_state();
            TransferOutcome { transfer, card }.into_result()
        });

        match result {
            Ok(done) => {
                if done.attempts > 1 {
                    debug!("read of block {} needed {} attempts", address, done.attempts);
                }
                Ok(())
            }
            Err(failed) => {
                warn!(
                    "read of block {} failed after {} attempt(s): {}",
                    address,
                    failed.attempts,
                    Dbg(&failed.last_error)
                );
                Err(SdioError::ReadFailed)
            }
        }
    }

    /// Write `block` to one sector
    ///
    /// Same retry policy as [`read_block`](Self::read_block), except the
    /// watchdog is not fed between attempts.
    pub fn write_block(&mut self, address: BlockAddress, block: &Block) -> Result<(), SdioError> {
        self.ensure_ready()?;

        let result = self.retried(false, |p| {
            let transfer = p.write_block(block, address, WRITE_TIMEOUT_MS);
            let card = p.card_state();
            TransferOutcome { transfer, card }.into_result()
        });

        match result {
            Ok(done) => {
                if done.attempts > 1 {
                    debug!("write of block {} needed {} attempts", address, done.attempts);
                }
                Ok(())
            }
            Err(failed) => {
                warn!(
                    "write of block {} failed after {} attempt(s): {}",
                    address,
                    failed.attempts,
                    Dbg(&failed.last_error)
                );
                Err(SdioError::WriteFailed)
            }
        }
    }
}

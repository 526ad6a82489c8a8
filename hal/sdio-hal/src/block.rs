//! Block device abstraction
//!
//! The sector-level interface a filesystem layer consumes. Implemented by
//! the SDIO driver; filesystems stay generic over it.

use crate::card::{Block, BlockAddress, BLOCK_SIZE};

/// A multi-block transfer ran past the last addressable sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressOverflow;

/// Address of the `index`-th block of a run starting at `start`
fn nth_address(start: BlockAddress, index: usize) -> Result<BlockAddress, AddressOverflow> {
    BlockAddress::try_from(index)
        .ok()
        .and_then(|offset| start.checked_add(offset))
        .ok_or(AddressOverflow)
}

/// Sector storage device
///
/// Each call is independent: a failed transfer leaves the device usable
/// for the next one, and no call resumes a previous partial transfer.
pub trait BlockDevice {
    /// Error type for block operations
    type Error: From<AddressOverflow>;

    /// Bytes per block
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Read the block at `address` into `block`
    fn read(&mut self, address: BlockAddress, block: &mut Block) -> Result<(), Self::Error>;

    /// Write `block` to the block at `address`
    fn write(&mut self, address: BlockAddress, block: &Block) -> Result<(), Self::Error>;

    /// Read consecutive blocks starting at `start`
    ///
    /// Stops at the first failure. A run that would pass the last
    /// addressable sector fails before reaching it.
    fn read_many(&mut self, start: BlockAddress, blocks: &mut [Block]) -> Result<(), Self::Error> {
        for (index, block) in blocks.iter_mut().enumerate() {
            self.read(nth_address(start, index)?, block)?;
        }
        Ok(())
    }

    /// Write consecutive blocks starting at `start`
    ///
    /// Stops at the first failure. A run that would pass the last
    /// addressable sector fails before reaching it.
    fn write_many(&mut self, start: BlockAddress, blocks: &[Block]) -> Result<(), Self::Error> {
        for (index, block) in blocks.iter().enumerate() {
            self.write(nth_address(start, index)?, block)?;
        }
        Ok(())
    }
}

//! Card-side types: sectors and card state

use core::ops::{Deref, DerefMut};

/// Bytes per sector
pub const BLOCK_SIZE: usize = 512;

/// Sector index on the card
///
/// Capacity checks are left to the card and the filesystem.
pub type BlockAddress = u32;

/// One 512-byte sector
///
/// Word aligned so a DMA-backed host controller can use it directly.
#[derive(Clone, PartialEq, Eq)]
#[repr(C, align(4))]
pub struct Block(pub [u8; BLOCK_SIZE]);

impl Block {
    /// All-zero sector
    pub const fn zeroed() -> Self {
        Block([0; BLOCK_SIZE])
    }

    /// Sector filled with a single byte value
    pub const fn filled(value: u8) -> Self {
        Block([value; BLOCK_SIZE])
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<[u8; BLOCK_SIZE]> for Block {
    fn from(data: [u8; BLOCK_SIZE]) -> Self {
        Block(data)
    }
}

impl Deref for Block {
    type Target = [u8; BLOCK_SIZE];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Block {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Block[{:02x?}..]", &self.0[..8])
    }
}

/// Card state as reported by the CURRENT_STATE field of the card status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardState {
    /// Idle/ready, before identification
    Ready,
    /// Identification in progress
    Identification,
    /// Stand-by, addressed but not selected
    Standby,
    /// Selected and waiting for data commands
    Transfer,
    /// Sending data to the host
    Sending,
    /// Receiving data from the host
    Receiving,
    /// Writing received data to flash
    Programming,
    /// Disconnected from the bus
    Disconnected,
    /// Status could not be read, or the card reported an error
    Error,
}

impl CardState {
    /// Decode the 4-bit CURRENT_STATE field (card status bits 12:9)
    pub fn from_status(status: u32) -> Self {
        match (status >> 9) & 0x0F {
            0 => CardState::Ready,
            1 => CardState::Identification,
            2 => CardState::Standby,
            3 => CardState::Transfer,
            4 => CardState::Sending,
            5 => CardState::Receiving,
            6 => CardState::Programming,
            7 => CardState::Disconnected,
            _ => CardState::Error,
        }
    }

    /// Whether the card can keep servicing block transfers
    pub fn is_healthy(self) -> bool {
        !matches!(self, CardState::Disconnected | CardState::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_alignment() {
        assert_eq!(core::mem::align_of::<Block>(), 4);
        assert_eq!(core::mem::size_of::<Block>(), BLOCK_SIZE);
    }

    #[test]
    fn test_block_deref() {
        let mut block = Block::zeroed();
        block[0] = 0xAA;
        block[511] = 0x55;
        assert_eq!(block.0[0], 0xAA);
        assert_eq!(block.len(), BLOCK_SIZE);
        assert_ne!(block, Block::default());
    }

    #[test]
    fn test_state_decode() {
        assert_eq!(CardState::from_status(3 << 9), CardState::Transfer);
        assert_eq!(CardState::from_status(6 << 9), CardState::Programming);
        assert_eq!(CardState::from_status(0x0F << 9), CardState::Error);
        // Other status bits don't leak into the state field
        assert_eq!(CardState::from_status((4 << 9) | 0x100), CardState::Sending);
    }

    #[test]
    fn test_health() {
        assert!(CardState::Transfer.is_healthy());
        assert!(CardState::Programming.is_healthy());
        assert!(!CardState::Error.is_healthy());
        assert!(!CardState::Disconnected.is_healthy());
    }
}

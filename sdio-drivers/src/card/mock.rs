//! Scripted host controller for driver tests

use heapless::Vec;
use sdio_hal::{
    Block, BlockAddress, BusConfig, CardState, PeripheralClocks, SdioPeripheral, Watchdog,
};

/// Sectors backing the mock card
pub const MOCK_BLOCKS: usize = 8;

/// Scripted outcome for a repeated call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Always succeed
    Pass,
    /// Always fail
    Fail,
    /// Fail the first N calls, then succeed
    FailFirst(u32),
    /// Succeed the first N calls, then fail
    PassFirst(u32),
}

impl Script {
    /// Outcome of the `call`-th call (1-based)
    fn passes(self, call: u32) -> bool {
        match self {
            Script::Pass => true,
            Script::Fail => false,
            Script::FailFirst(n) => call > n,
            Script::PassFirst(n) => call <= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    NoResponse,
    Timeout,
    AddressOutOfRange,
}

pub struct MockPeripheral {
    pub clocks: PeripheralClocks,
    pub identify: Script,
    pub wide_bus: Script,
    pub read: Script,
    pub write: Script,
    pub card_state: CardState,
    pub storage: [Block; MOCK_BLOCKS],

    pub bus: BusConfig,
    pub configs: Vec<BusConfig, 16>,
    pub identify_calls: u32,
    pub wide_bus_calls: u32,
    pub read_calls: u32,
    pub write_calls: u32,
    pub state_calls: u32,
    pub last_timeout_ms: Option<u32>,
}

impl MockPeripheral {
    /// A well-behaved 4-bit card on a 48 MHz SDIOCLK / 72 MHz PCLK2 board
    pub fn new() -> Self {
        Self {
            clocks: PeripheralClocks::new(48_000_000, 72_000_000),
            identify: Script::Pass,
            wide_bus: Script::Pass,
            read: Script::Pass,
            write: Script::Pass,
            card_state: CardState::Transfer,
            storage: core::array::from_fn(|_| Block::zeroed()),
            bus: BusConfig::default(),
            configs: Vec::new(),
            identify_calls: 0,
            wide_bus_calls: 0,
            read_calls: 0,
            write_calls: 0,
            state_calls: 0,
            last_timeout_ms: None,
        }
    }

    fn slot(address: BlockAddress) -> Result<usize, MockError> {
        let index = address as usize;
        if index < MOCK_BLOCKS {
            Ok(index)
        } else {
            Err(MockError::AddressOutOfRange)
        }
    }
}

impl Default for MockPeripheral {
    fn default() -> Self {
        Self::new()
    }
}

impl SdioPeripheral for MockPeripheral {
    type Error = MockError;

    fn clocks(&self) -> PeripheralClocks {
        self.clocks
    }

    fn configure(&mut self, config: BusConfig) {
        self.bus = config;
        let _ = self.configs.push(config);
    }

    fn identify_card(&mut self) -> Result<(), Self::Error> {
        self.identify_calls += 1;
        if self.identify.passes(self.identify_calls) {
            Ok(())
        } else {
            Err(MockError::NoResponse)
        }
    }

    fn enable_wide_bus(&mut self) -> Result<(), Self::Error> {
        self.wide_bus_calls += 1;
        if self.wide_bus.passes(self.wide_bus_calls) {
            Ok(())
        } else {
            Err(MockError::NoResponse)
        }
    }

    fn read_block(
        &mut self,
        block: &mut Block,
        address: BlockAddress,
        timeout_ms: u32,
    ) -> Result<(), Self::Error> {
        self.read_calls += 1;
        self.last_timeout_ms = Some(timeout_ms);
        let index = Self::slot(address)?;
        if !self.read.passes(self.read_calls) {
            return Err(MockError::Timeout);
        }
        *block = self.storage[index].clone();
        Ok(())
    }

    fn write_block(
        &mut self,
        block: &Block,
        address: BlockAddress,
        timeout_ms: u32,
    ) -> Result<(), Self::Error> {
        self.write_calls += 1;
        self.last_timeout_ms = Some(timeout_ms);
        let index = Self::slot(address)?;
        if !self.write.passes(self.write_calls) {
            return Err(MockError::Timeout);
        }
        self.storage[index] = block.clone();
        Ok(())
    }

    fn card_state(&mut self) -> CardState {
        self.state_calls += 1;
        self.card_state
    }
}

/// Watchdog that counts refreshes
#[derive(Debug, Default)]
pub struct CountingWatchdog {
    pub refreshes: u32,
}

impl Watchdog for CountingWatchdog {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

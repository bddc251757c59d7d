//! Mock TMC2130 behind an SPI device

use crate::tmc_driver::registers::{
    DRV_STATUS_CS_ACTUAL_SHIFT, DRV_STATUS_STST, REG_DRV_STATUS, REG_IOIN, WRITE_ONLY,
};
use crate::tmc_driver::traits::SpiDevice;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct SpiState {
    registers: HashMap<u8, u32>,
    writes: Vec<(u8, u32)>,
    reads: Vec<u8>,
    fail: bool,
    moving_reads: u32,
}

/// Register file answering like a TMC2130: write-only registers read back as 0.
#[derive(Debug, Clone, Default)]
pub struct MockSpi {
    state: Arc<Mutex<SpiState>>,
}

impl MockSpi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chip that answers the connection test, reports version 0x11 and is at rest.
    pub fn healthy() -> Self {
        let spi = Self::new();
        spi.set_register(REG_IOIN, 0x1100_0000);
        spi.set_register(REG_DRV_STATUS, DRV_STATUS_STST | (16 << DRV_STATUS_CS_ACTUAL_SHIFT));
        spi
    }

    fn state(&self) -> MutexGuard<'_, SpiState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets a register as the chip would hold it, without logging a write.
    pub fn set_register(&self, address: u8, value: u32) {
        self.state().registers.insert(address, value);
    }

    /// Raw register content, including write-only registers.
    pub fn register(&self, address: u8) -> u32 {
        self.state().registers.get(&address).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<(u8, u32)> {
        self.state().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state().writes.len()
    }

    pub fn reads(&self) -> Vec<u8> {
        self.state().reads.clone()
    }

    pub fn clear_log(&self) {
        let mut state = self.state();
        state.writes.clear();
        state.reads.clear();
    }

    pub fn fail_transfers(&self, fail: bool) {
        self.state().fail = fail;
    }

    /// The next `reads` DRV_STATUS reads report the motor as moving.
    pub fn moving_for(&self, reads: u32) {
        self.state().moving_reads = reads;
    }
}

impl SpiDevice for MockSpi {
    fn write_register(&mut self, address: u8, value: u32) -> Result<u8, Box<dyn Error>> {
        let mut state = self.state();
        if state.fail {
            return Err("mock SPI transfer failure".into());
        }
        state.registers.insert(address, value);
        state.writes.push((address, value));
        Ok(0)
    }

    fn read_register(&mut self, address: u8) -> Result<(u8, u32), Box<dyn Error>> {
        let mut state = self.state();
        if state.fail {
            return Err("mock SPI transfer failure".into());
        }
        state.reads.push(address);
        if WRITE_ONLY.contains(&address) {
            return Ok((0, 0));
        }
        let mut value = state.registers.get(&address).copied().unwrap_or(0);
        if address == REG_DRV_STATUS && state.moving_reads > 0 {
            state.moving_reads -= 1;
            value &= !DRV_STATUS_STST;
        }
        Ok((0, value))
    }
}

//! Mock digital output

use crate::tmc_driver::traits::DigitalOutputPin;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct PinState {
    high: bool,
    rising_edges: u32,
    writes: u32,
    fail: bool,
}

/// Records the level of a single output and counts rising edges.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    state: Arc<Mutex<PinState>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PinState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_high(&self) -> bool {
        self.state().high
    }

    /// Number of low-to-high transitions, i.e. step pulses on a STEP line.
    pub fn rising_edges(&self) -> u32 {
        self.state().rising_edges
    }

    /// Number of successful writes, including ones that did not change the level.
    pub fn write_count(&self) -> u32 {
        self.state().writes
    }

    /// Makes every following write fail without touching the level.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail = fail;
    }

    fn drive(&self, high: bool) -> Result<(), Box<dyn Error>> {
        let mut state = self.state();
        if state.fail {
            return Err("mock pin write failure".into());
        }
        if high && !state.high {
            state.rising_edges += 1;
        }
        state.high = high;
        state.writes += 1;
        Ok(())
    }
}

impl DigitalOutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Box<dyn Error>> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<(), Box<dyn Error>> {
        self.drive(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_rising_edges_only() {
        let mut pin = MockPin::new();
        pin.set_high().unwrap();
        pin.set_high().unwrap();
        pin.set_low().unwrap();
        pin.set_high().unwrap();
        assert_eq!(pin.rising_edges(), 2);
        assert_eq!(pin.write_count(), 4);
        assert!(pin.is_high());
    }
}

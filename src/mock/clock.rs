//! Virtual time for busy-wait tests

use crate::interfaces::clock::BusyClock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Time only advances when the code under test delays.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_us: Arc<AtomicU64>,
    delays: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time spent in `delay_us`.
    pub fn elapsed_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }

    pub fn delay_calls(&self) -> u64 {
        self.delays.load(Ordering::Relaxed)
    }
}

impl BusyClock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }

    fn delay_us(&mut self, micros: u32) {
        self.now_us.fetch_add(u64::from(micros), Ordering::Relaxed);
        self.delays.fetch_add(1, Ordering::Relaxed);
    }
}

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Travel-limit sensor polled once per gated step.
///
/// Debouncing belongs to the implementation; `update` just reports the
/// current verdict. Implementations are shared between the axis
/// configuration and its driver, hence `&self`.
pub trait EndstopDriver: Send + Sync {
    fn update(&self) -> bool;

    /// False for placeholder endstops on axes without a switch.
    fn implemented(&self) -> bool {
        true
    }
}

/// Axis end without a switch. Never blocks.
#[derive(Debug, Default)]
pub struct NoEndstop;

impl EndstopDriver for NoEndstop {
    fn update(&self) -> bool {
        false
    }

    fn implemented(&self) -> bool {
        false
    }
}

/// Endstop state latched by someone else: an interrupt, a stall line or a test.
#[derive(Debug, Default)]
pub struct FlagEndstop {
    triggered: AtomicBool,
    polls: AtomicU32,
}

impl FlagEndstop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_triggered(&self, triggered: bool) {
        self.triggered.store(triggered, Ordering::Release);
    }

    /// How many times `update` was called.
    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::Relaxed)
    }
}

impl EndstopDriver for FlagEndstop {
    fn update(&self) -> bool {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.triggered.load(Ordering::Acquire)
    }
}

use std::time::Instant;

/// Monotonic time source with a blocking delay, used for busy-wait polling.
pub trait BusyClock: Send {
    /// Microseconds since an arbitrary fixed origin.
    fn now_us(&self) -> u64;
    /// Blocks the caller without yielding.
    fn delay_us(&mut self, micros: u32);
}

/// `std::time::Instant` based clock, spinning for delays.
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyClock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn delay_us(&mut self, micros: u32) {
        let start = Instant::now();
        let wait = std::time::Duration::from_micros(u64::from(micros));
        while start.elapsed() < wait {
            std::hint::spin_loop();
        }
    }
}

/// ROM delay plus the ESP-IDF system timer.
#[cfg(target_os = "espidf")]
pub struct EtsClock;

#[cfg(target_os = "espidf")]
impl BusyClock for EtsClock {
    fn now_us(&self) -> u64 {
        esp_idf_svc::systime::EspSystemTime.now().as_micros() as u64
    }

    fn delay_us(&mut self, micros: u32) {
        esp_idf_hal::delay::Ets::delay_us(micros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_clock_delay_blocks_at_least_requested_time() {
        let mut clock = StdClock::new();
        let before = clock.now_us();
        clock.delay_us(200);
        assert!(clock.now_us() - before >= 200);
    }
}

use crate::interfaces::clock::BusyClock;
use std::time::Duration;

/// Sampling interval of busy-wait polling.
pub const WAIT_RESOLUTION_US: u32 = 100;

/// Polls `condition` every [`WAIT_RESOLUTION_US`] until it holds or `timeout`
/// of wall time has passed. Returns whether the condition was met.
///
/// Blocks the caller for the whole wait. Never call this from the step
/// generation path.
pub fn wait_until<F>(clock: &mut dyn BusyClock, timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = clock
        .now_us()
        .saturating_add(u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX));
    loop {
        if condition() {
            return true;
        }
        if clock.now_us() >= deadline {
            return false;
        }
        clock.delay_us(WAIT_RESOLUTION_US);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClock;

    #[test]
    fn returns_immediately_when_condition_holds() {
        let mut clock = MockClock::new();
        assert!(wait_until(&mut clock, Duration::from_millis(100), || true));
        assert_eq!(clock.delay_calls(), 0);
    }

    #[test]
    fn stops_polling_once_condition_is_met() {
        let mut clock = MockClock::new();
        let mut polls = 0;
        let met = wait_until(&mut clock, Duration::from_millis(100), || {
            polls += 1;
            polls == 4
        });
        assert!(met);
        assert_eq!(polls, 4);
        assert_eq!(clock.elapsed_us(), 3 * u64::from(WAIT_RESOLUTION_US));
    }

    #[test]
    fn gives_up_after_timeout() {
        let mut clock = MockClock::new();
        let met = wait_until(&mut clock, Duration::from_millis(100), || false);
        assert!(!met);
        // 100 ms at 100 us resolution
        assert_eq!(clock.delay_calls(), 1000);
        assert_eq!(clock.elapsed_us(), 100_000);
    }

    #[test]
    fn huge_timeout_still_returns_on_condition() {
        let mut clock = MockClock::new();
        let mut polls = 0;
        assert!(wait_until(&mut clock, Duration::MAX, || {
            polls += 1;
            polls == 2
        }));
        assert_eq!(clock.delay_calls(), 1);
    }

    #[test]
    fn zero_timeout_samples_once() {
        let mut clock = MockClock::new();
        let mut polls = 0;
        assert!(!wait_until(&mut clock, Duration::ZERO, || {
            polls += 1;
            false
        }));
        assert_eq!(polls, 1);
    }
}

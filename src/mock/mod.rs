//! Test doubles for the hardware capabilities
//!
//! Every mock is a cheap handle around shared state: hand one clone to the
//! driver and keep another in the test to inspect what the driver did.

#![cfg(any(test, feature = "mock"))]

mod clock;
mod pin;
mod spi;

pub use clock::MockClock;
pub use pin::MockPin;
pub use spi::MockSpi;

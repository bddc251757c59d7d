//! Stepper drivers for the motion firmware
//!
//! One [`stepper::StepperDriver`] per axis hides whether the motor sits on a
//! plain STEP/DIR/ENABLE stage or on an SPI configured TMC2130. Endstops are
//! checked inside `step_cond`, so an axis at its travel limit cannot be
//! pulsed further by the planner.

pub mod commands;
pub mod error;
pub mod interfaces;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod stepper;
pub mod tmc_driver;

pub use error::StepperError;
pub use stepper::endstop::{EndstopDriver, FlagEndstop, NoEndstop};
pub use stepper::status::{DriverStatus, LogSink, StatusSink};
pub use stepper::{SimpleStepperDriver, StepperDriver, Tmc2130StepperDriver};

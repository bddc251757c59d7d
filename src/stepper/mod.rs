//! Stepper driver contract
//!
//! Every motor output, plain STEP/DIR/ENABLE or SPI configured, is driven
//! through [`StepperDriver`]. The planner calls `dir` on direction changes
//! and `step_cond`/`unstep` for every pulse; `step_cond` refuses to pulse
//! while the endstop ahead of the motor is triggered.

pub mod backup;
pub mod endstop;
pub mod simple;
pub mod standstill;
pub mod status;
pub mod tmc2130;

use crate::error::StepperError;
use endstop::EndstopDriver;
use status::{DriverStatus, StatusSink};
use std::sync::Arc;

pub use simple::SimpleStepperDriver;
pub use tmc2130::Tmc2130StepperDriver;

/// Endstops and travel direction shared by all driver variants.
pub struct StepperBase {
    min_endstop: Arc<dyn EndstopDriver>,
    max_endstop: Arc<dyn EndstopDriver>,
    direction: bool,
}

impl StepperBase {
    pub fn new(min_endstop: Arc<dyn EndstopDriver>, max_endstop: Arc<dyn EndstopDriver>) -> Self {
        Self {
            min_endstop,
            max_endstop,
            direction: true,
        }
    }

    pub fn min_endstop(&self) -> &Arc<dyn EndstopDriver> {
        &self.min_endstop
    }

    pub fn max_endstop(&self) -> &Arc<dyn EndstopDriver> {
        &self.max_endstop
    }

    /// True when moving towards max.
    pub fn direction(&self) -> bool {
        self.direction
    }

    pub fn set_direction(&mut self, direction: bool) {
        self.direction = direction;
    }

    /// Polls the endstop in the current direction of travel.
    pub fn blocked(&self) -> bool {
        if self.direction {
            self.max_endstop.update()
        } else {
            self.min_endstop.update()
        }
    }
}

pub trait StepperDriver: Send {
    fn base(&self) -> &StepperBase;

    /// Prepares the hardware. Call once before stepping.
    fn init(&mut self, _out: &mut dyn StatusSink) -> Result<(), StepperError> {
        Ok(())
    }

    /// Steps unless the endstop in the direction of travel is triggered.
    /// Returns true when blocked, in which case no pulse was emitted.
    fn step_cond(&mut self) -> bool {
        if self.base().blocked() {
            return true;
        }
        self.step();
        false
    }

    /// Raises STEP regardless of endstops.
    fn step(&mut self);
    /// Lowers STEP.
    fn unstep(&mut self);
    /// Sets the travel direction, true = towards max.
    fn dir(&mut self, direction: bool);
    fn enable(&mut self);
    fn disable(&mut self);

    fn implement_set_microsteps(&self) -> bool {
        false
    }

    fn implement_set_max_current(&self) -> bool {
        false
    }

    /// Must be a power of two.
    fn set_microsteps(&mut self, _microsteps: u16) {}

    /// Raw current, 0..=65535. For SPI drivers this is the RMS current in mA.
    fn set_motor_current(&mut self, _current: u16) {}

    fn set_motor_current_percent(&mut self, _percent: u8) {}

    /// Called before a homing move, paired with `after_homing`.
    fn before_homing(&mut self) {}

    fn after_homing(&mut self) {}

    fn status(&mut self, out: &mut dyn StatusSink) {
        out.write_line("not implemented");
    }

    fn driver_status(&mut self) -> Option<DriverStatus> {
        None
    }

    fn set_stallguard_threshold(&mut self, _threshold: i8) {}

    fn stallguard_threshold(&mut self) -> Option<i8> {
        None
    }

    fn min_endstop(&self) -> &Arc<dyn EndstopDriver> {
        self.base().min_endstop()
    }

    fn max_endstop(&self) -> &Arc<dyn EndstopDriver> {
        self.base().max_endstop()
    }

    fn direction(&self) -> bool {
        self.base().direction()
    }
}

#[cfg(test)]
mod tests {
    use super::endstop::FlagEndstop;
    use super::*;

    #[test]
    fn direction_selects_endstop() {
        let min = Arc::new(FlagEndstop::new());
        let max = Arc::new(FlagEndstop::new());
        let mut base = StepperBase::new(min.clone(), max.clone());
        assert!(base.direction());

        max.set_triggered(true);
        assert!(base.blocked());
        assert_eq!((min.polls(), max.polls()), (0, 1));

        base.set_direction(false);
        assert!(!base.blocked());
        assert_eq!((min.polls(), max.polls()), (1, 1));
    }
}

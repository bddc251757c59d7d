use crate::stepper::endstop::EndstopDriver;
use crate::stepper::{StepperBase, StepperDriver};
use crate::tmc_driver::pin::PinSettings;
use std::sync::Arc;

/// Plain STEP/DIR/ENABLE stage (A4988, DRV8825, TMC in standalone mode).
pub struct SimpleStepperDriver {
    base: StepperBase,
    pins: PinSettings,
}

impl SimpleStepperDriver {
    pub fn new(
        min_endstop: Arc<dyn EndstopDriver>,
        max_endstop: Arc<dyn EndstopDriver>,
        pins: PinSettings,
    ) -> Self {
        Self {
            base: StepperBase::new(min_endstop, max_endstop),
            pins,
        }
    }
}

impl StepperDriver for SimpleStepperDriver {
    fn base(&self) -> &StepperBase {
        &self.base
    }

    fn step(&mut self) {
        self.pins.step_on();
    }

    fn unstep(&mut self) {
        self.pins.step_off();
    }

    fn dir(&mut self, direction: bool) {
        self.pins.set_dir(direction);
        self.base.set_direction(direction);
    }

    fn enable(&mut self) {
        self.pins.enable();
    }

    fn disable(&mut self) {
        self.pins.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;
    use crate::stepper::endstop::FlagEndstop;

    struct Rig {
        driver: SimpleStepperDriver,
        step: MockPin,
        dir: MockPin,
        enable: MockPin,
        min: Arc<FlagEndstop>,
        max: Arc<FlagEndstop>,
    }

    fn rig() -> Rig {
        let (step, dir, enable) = (MockPin::new(), MockPin::new(), MockPin::new());
        let (min, max) = (Arc::new(FlagEndstop::new()), Arc::new(FlagEndstop::new()));
        let driver = SimpleStepperDriver::new(
            min.clone(),
            max.clone(),
            PinSettings::new(
                Box::new(step.clone()),
                Box::new(dir.clone()),
                Box::new(enable.clone()),
            ),
        );
        Rig {
            driver,
            step,
            dir,
            enable,
            min,
            max,
        }
    }

    fn pulse(rig: &mut Rig) -> bool {
        let blocked = rig.driver.step_cond();
        rig.driver.unstep();
        blocked
    }

    #[test]
    fn towards_max_blocks_only_on_max_endstop() {
        let mut rig = rig();
        rig.driver.dir(true);
        rig.min.set_triggered(true);
        assert!(!pulse(&mut rig));
        assert_eq!(rig.step.rising_edges(), 1);

        rig.max.set_triggered(true);
        assert!(pulse(&mut rig));
        assert_eq!(rig.step.rising_edges(), 1);
    }

    #[test]
    fn triggered_min_endstop_blocks_move_towards_min() {
        let mut rig = rig();
        rig.driver.dir(false);
        rig.min.set_triggered(true);
        assert!(rig.driver.step_cond());
        assert_eq!(rig.step.rising_edges(), 0);
        assert!(!rig.step.is_high());
    }

    #[test]
    fn free_min_endstop_allows_exactly_one_pulse() {
        let mut rig = rig();
        rig.driver.dir(false);
        assert!(!rig.driver.step_cond());
        assert_eq!(rig.step.rising_edges(), 1);
        assert!(rig.step.is_high());
        rig.driver.unstep();
        assert!(!rig.step.is_high());
    }

    #[test]
    fn next_step_uses_endstop_of_new_direction() {
        let mut rig = rig();
        rig.max.set_triggered(true);
        rig.driver.dir(true);
        assert!(pulse(&mut rig));

        rig.driver.dir(false);
        assert!(!rig.dir.is_high());
        assert!(!pulse(&mut rig));
        assert_eq!(rig.step.rising_edges(), 1);
        assert_eq!(rig.max.polls(), 1);
        assert_eq!(rig.min.polls(), 1);
        assert!(!rig.driver.direction());
    }

    #[test]
    fn step_ignores_endstops() {
        let mut rig = rig();
        rig.max.set_triggered(true);
        rig.driver.step();
        assert_eq!(rig.step.rising_edges(), 1);
        assert_eq!(rig.max.polls(), 0);
    }

    #[test]
    fn enable_and_disable_are_idempotent() {
        let mut rig = rig();
        rig.driver.enable();
        rig.driver.disable();
        assert!(rig.enable.is_high(), "active-low stage should be off");

        rig.driver.disable();
        rig.driver.enable();
        rig.driver.enable();
        assert!(!rig.enable.is_high());
        assert_eq!(rig.enable.rising_edges(), 1);
    }

    #[test]
    fn configuration_setters_are_silent_no_ops() {
        let mut rig = rig();
        assert!(!rig.driver.implement_set_microsteps());
        assert!(!rig.driver.implement_set_max_current());
        rig.driver.set_microsteps(16);
        rig.driver.set_motor_current(800);
        rig.driver.set_motor_current_percent(50);
        let writes = rig.step.write_count() + rig.dir.write_count() + rig.enable.write_count();
        assert_eq!(writes, 0);
    }

    #[test]
    fn default_init_and_status() {
        let mut rig = rig();
        let mut out: Vec<String> = Vec::new();
        assert!(rig.driver.init(&mut out).is_ok());
        rig.driver.status(&mut out);
        assert_eq!(out, vec!["not implemented"]);
        assert!(rig.driver.driver_status().is_none());
    }
}

use crate::tmc_driver::traits::DigitalOutputPin;
use std::error::Error;

pub struct PinSettings {
    pub step_pin: Box<dyn DigitalOutputPin>,
    pub dir_pin: Box<dyn DigitalOutputPin>,
    pub enable_pin: Box<dyn DigitalOutputPin>,
    /// Output stage is energized when ENABLE is pulled low (TMC, A4988, DRV8825).
    pub enable_active_low: bool,
    pub invert_dir: bool,
}

impl PinSettings {
    pub fn new(
        step_pin: Box<dyn DigitalOutputPin>,
        dir_pin: Box<dyn DigitalOutputPin>,
        enable_pin: Box<dyn DigitalOutputPin>,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            enable_active_low: true,
            invert_dir: false,
        }
    }

    pub fn step_on(&mut self) {
        report("STEP", self.step_pin.set_high());
    }

    pub fn step_off(&mut self) {
        report("STEP", self.step_pin.set_low());
    }

    /// `towards_max` drives DIR high unless the axis is inverted.
    pub fn set_dir(&mut self, towards_max: bool) {
        report("DIR", self.dir_pin.set_level(towards_max != self.invert_dir));
    }

    pub fn enable(&mut self) {
        report("ENABLE", self.enable_pin.set_level(!self.enable_active_low));
    }

    pub fn disable(&mut self) {
        report("ENABLE", self.enable_pin.set_level(self.enable_active_low));
    }
}

fn report(name: &str, result: Result<(), Box<dyn Error>>) {
    if let Err(e) = result {
        log::error!("Error driving {} pin: {}", name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;

    fn pins() -> (PinSettings, MockPin, MockPin, MockPin) {
        let (step, dir, enable) = (MockPin::new(), MockPin::new(), MockPin::new());
        let pins = PinSettings::new(
            Box::new(step.clone()),
            Box::new(dir.clone()),
            Box::new(enable.clone()),
        );
        (pins, step, dir, enable)
    }

    #[test]
    fn enable_is_active_low_by_default() {
        let (mut pins, _, _, enable) = pins();
        pins.enable();
        assert!(!enable.is_high());
        pins.disable();
        assert!(enable.is_high());
    }

    #[test]
    fn active_high_enable() {
        let (mut pins, _, _, enable) = pins();
        pins.enable_active_low = false;
        pins.enable();
        assert!(enable.is_high());
        pins.disable();
        assert!(!enable.is_high());
    }

    #[test]
    fn inverted_direction() {
        let (mut pins, _, dir, _) = pins();
        pins.set_dir(true);
        assert!(dir.is_high());
        pins.invert_dir = true;
        pins.set_dir(true);
        assert!(!dir.is_high());
    }

    #[test]
    fn pin_failures_are_swallowed() {
        let (mut pins, step, _, _) = pins();
        step.fail_writes(true);
        pins.step_on();
        assert_eq!(step.rising_edges(), 0);
    }
}

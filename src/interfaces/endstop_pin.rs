use crate::stepper::endstop::EndstopDriver;
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use std::error::Error;

/// Endstop switch (or TMC DIAG1 stall line) read straight from a GPIO.
pub struct EspIdfEndstopPin {
    pin_driver: PinDriver<'static, AnyIOPin, Input>,
    active_high: bool,
}

impl EspIdfEndstopPin {
    pub fn new(pin: AnyIOPin, active_high: bool) -> Result<Self, Box<dyn Error>> {
        let mut pin_driver = PinDriver::input(pin)?;
        pin_driver.set_pull(if active_high { Pull::Down } else { Pull::Up })?;

        Ok(Self {
            pin_driver,
            active_high,
        })
    }
}

unsafe impl Send for EspIdfEndstopPin {}
unsafe impl Sync for EspIdfEndstopPin {}
impl EndstopDriver for EspIdfEndstopPin {
    fn update(&self) -> bool {
        self.pin_driver.is_high() == self.active_high
    }
}

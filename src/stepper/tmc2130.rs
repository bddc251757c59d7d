use crate::error::StepperError;
use crate::interfaces::clock::{BusyClock, StdClock};
use crate::stepper::backup::RegisterBackup;
use crate::stepper::endstop::EndstopDriver;
use crate::stepper::standstill::wait_until;
use crate::stepper::status::{DriverStatus, StatusSink};
use crate::stepper::{StepperBase, StepperDriver};
use crate::tmc_driver::driver_settings::Tmc2130Settings;
use crate::tmc_driver::pin::PinSettings;
use crate::tmc_driver::tmc2130::Tmc2130;
use crate::tmc_driver::traits::Tmc2130Control;
use std::sync::Arc;

/// TMC2130 on STEP/DIR/ENABLE lines, configured over SPI.
pub struct Tmc2130StepperDriver<C: Tmc2130Control = Tmc2130> {
    base: StepperBase,
    pins: PinSettings,
    driver: C,
    settings: Tmc2130Settings,
    clock: Box<dyn BusyClock>,
    backup: Option<RegisterBackup>,
}

impl<C: Tmc2130Control> Tmc2130StepperDriver<C> {
    pub fn new(
        min_endstop: Arc<dyn EndstopDriver>,
        max_endstop: Arc<dyn EndstopDriver>,
        pins: PinSettings,
        mut driver: C,
        settings: Tmc2130Settings,
    ) -> Self {
        driver.set_sense_parameters(settings.current.r_sense_ohms, settings.current.hold_multiplier);
        Self {
            base: StepperBase::new(min_endstop, max_endstop),
            pins,
            driver,
            settings,
            clock: Box::new(StdClock::new()),
            backup: None,
        }
    }

    /// Replaces the clock used for standstill polling.
    pub fn with_clock(mut self, clock: Box<dyn BusyClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn chip(&mut self) -> &mut C {
        &mut self.driver
    }

    pub fn settings(&self) -> &Tmc2130Settings {
        &self.settings
    }

    /// Registers saved by the last `before_homing`, until `after_homing` runs.
    pub fn backup(&self) -> Option<&RegisterBackup> {
        self.backup.as_ref()
    }

    /// Several registers must not be written while the motor turns.
    /// Gives up after the configured timeout and lets the write go ahead.
    fn wait_for_standstill(&mut self) {
        let driver = &mut self.driver;
        let timeout = self.settings.standstill_timeout;
        if !wait_until(self.clock.as_mut(), timeout, || driver.stst()) {
            log::warn!(
                "{}: no standstill after {} ms, writing anyway",
                self.settings.name,
                timeout.as_millis()
            );
        }
    }
}

impl<C: Tmc2130Control> StepperDriver for Tmc2130StepperDriver<C> {
    fn base(&self) -> &StepperBase {
        &self.base
    }

    fn init(&mut self, out: &mut dyn StatusSink) -> Result<(), StepperError> {
        out.write_line(&format!(
            "{} (cs {}) TMC2130 initialization...",
            self.settings.name,
            self.driver.cs_pin()
        ));
        self.pins.disable();
        self.driver.begin();
        // the first answer after power-up can be stale
        self.driver.test_connection();
        let code = self.driver.test_connection();
        if code != 0 {
            out.write_line("SPI error");
            log::error!("{}: connection test failed with code {}", self.settings.name, code);
            return Err(StepperError::Connection { code });
        }
        out.field("chip version ", &self.driver.version());

        self.wait_for_standstill();
        self.driver.i_scale_analog(true);
        self.driver.interpolate(false);
        self.driver.internal_rsense(false);
        self.driver.sgt(0);
        self.driver.diag1_stall(true);
        if let Some(microsteps) = self.settings.microsteps.microsteps {
            self.driver.set_microsteps(microsteps);
        }
        if let Some(milliamps) = self.settings.current.rms_current_ma {
            self.driver.set_rms_current(milliamps);
        }
        self.pins.enable();
        log::info!("{}: TMC2130 ready", self.settings.name);
        Ok(())
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

    /// Overrides the base `false`: M350 reaches `set_microsteps` on this stage.
    fn implement_set_microsteps(&self) -> bool {
        true
    }

    fn implement_set_max_current(&self) -> bool {
        true
    }

    fn set_microsteps(&mut self, microsteps: u16) {
        self.wait_for_standstill();
        self.driver.set_microsteps(microsteps);
    }

    fn set_motor_current(&mut self, current: u16) {
        self.wait_for_standstill();
        self.driver.set_rms_current(current);
    }

    fn before_homing(&mut self) {
        self.backup = Some(RegisterBackup::capture(&mut self.driver));
        if let Some(threshold) = self.settings.stallguard.homing_threshold {
            self.driver.sgt(threshold);
        }
    }

    fn after_homing(&mut self) {
        match self.backup.take() {
            Some(backup) => backup.restore(&mut self.driver),
            None => log::warn!(
                "{}: after_homing without before_homing, registers left as they are",
                self.settings.name
            ),
        }
    }

    fn status(&mut self, out: &mut dyn StatusSink) {
        out.field("TMC2130 driver version ", &self.driver.version());
        out.field("\tConnection test ", &self.driver.test_connection());
        out.field("\tRMS current ", &self.driver.rms_current());
        out.field("\tMicrosteps ", &self.driver.microsteps());
        out.field("\tStallguard value ", &self.driver.sg_result());
        out.field("\tOver temperature ", &self.driver.ot());
        out.field("\tOver temperature prewarn ", &self.driver.otpw());
    }

    fn driver_status(&mut self) -> Option<DriverStatus> {
        Some(DriverStatus {
            name: self.settings.name.clone(),
            version: self.driver.version(),
            connection: self.driver.test_connection(),
            over_temperature: self.driver.ot(),
            over_temperature_warning: self.driver.otpw(),
            current: self.driver.rms_current(),
            microsteps: self.driver.microsteps(),
            stallguard_threshold: self.driver.sgt_value(),
            stallguard_result: self.driver.sg_result(),
            current_scale_actual: self.driver.cs_actual(),
        })
    }

    fn set_stallguard_threshold(&mut self, threshold: i8) {
        self.wait_for_standstill();
        self.driver.sgt(threshold);
    }

    fn stallguard_threshold(&mut self) -> Option<i8> {
        Some(self.driver.sgt_value())
    }
}

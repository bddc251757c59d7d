// src/main.rs: single TMC2130 axis bring-up and stall homing

#[cfg(target_os = "espidf")]
mod app {
    use esp_idf_hal::delay::{Ets, FreeRtos};
    use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_hal::spi::{
        config::{Config, DriverConfig, MODE_3},
        Dma, SpiDriver,
    };
    use esp_stepper_drivers::commands;
    use esp_stepper_drivers::interfaces::clock::EtsClock;
    use esp_stepper_drivers::interfaces::digital_pin::EspIdfDigitalOutputPin;
    use esp_stepper_drivers::interfaces::endstop_pin::EspIdfEndstopPin;
    use esp_stepper_drivers::interfaces::spi::EspSpiDevice;
    use esp_stepper_drivers::tmc_driver::driver_settings::Tmc2130Settings;
    use esp_stepper_drivers::tmc_driver::pin::PinSettings;
    use esp_stepper_drivers::tmc_driver::tmc2130::Tmc2130;
    use esp_stepper_drivers::{LogSink, StepperDriver, Tmc2130StepperDriver};
    use std::error::Error;
    use std::sync::Arc;

    const STEP_PULSE_US: u32 = 5;
    const STEP_INTERVAL_US: u32 = 200;
    const HOMING_MAX_STEPS: u32 = 200 * 16 * 20;

    fn init_driver() -> Result<Box<dyn StepperDriver>, Box<dyn Error>> {
        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        log::info!("Configuring GPIO pins...");
        let step_pin = Box::new(EspIdfDigitalOutputPin::new(AnyOutputPin::from(pins.gpio5))?);
        let dir_pin = Box::new(EspIdfDigitalOutputPin::new(AnyOutputPin::from(pins.gpio6))?);
        let enable_pin = Box::new(EspIdfDigitalOutputPin::new(AnyOutputPin::from(pins.gpio7))?);
        log::info!(
            "STEP GPIO {}, DIR GPIO {}, EN GPIO {}",
            step_pin.num(),
            dir_pin.num(),
            enable_pin.num()
        );

        // Min switch on GPIO3 (normally open to GND), DIAG1 stall output on GPIO4
        let min_endstop = Arc::new(EspIdfEndstopPin::new(AnyIOPin::from(pins.gpio3), false)?);
        let max_endstop = Arc::new(EspIdfEndstopPin::new(AnyIOPin::from(pins.gpio4), true)?);

        log::info!("Configuring SPI...");
        let cs_driver = PinDriver::output(AnyOutputPin::from(pins.gpio10))?;
        let spi_config = Config::new().baudrate(Hertz(1_000_000)).data_mode(MODE_3);
        let spi_driver_config = DriverConfig::new().dma(Dma::Auto(4096));
        let spi = SpiDriver::new(
            peripherals.spi2,
            pins.gpio12,       // SCLK
            pins.gpio11,       // MOSI (SDI on TMC2130)
            Some(pins.gpio13), // MISO (SDO on TMC2130)
            &spi_driver_config,
        )?;
        let spi_device = EspSpiDevice::new(spi, &spi_config, cs_driver)?;

        let mut settings = Tmc2130Settings::named("X");
        settings.microsteps.microsteps = Some(16);
        settings.current.rms_current_ma = Some(800);
        settings.stallguard.homing_threshold = Some(8);

        let cs_pin = spi_device.cs_num();
        let chip = Tmc2130::new(Box::new(spi_device), cs_pin);
        let driver = Tmc2130StepperDriver::new(
            min_endstop,
            max_endstop,
            PinSettings::new(step_pin, dir_pin, enable_pin),
            chip,
            settings,
        )
        .with_clock(Box::new(EtsClock));

        Ok(Box::new(driver))
    }

    /// Runs towards max until the stall line fires. Returns whether it did.
    fn home_towards_max(driver: &mut dyn StepperDriver) -> bool {
        driver.before_homing();
        driver.dir(true);
        let mut hit = false;
        for _ in 0..HOMING_MAX_STEPS {
            if driver.step_cond() {
                hit = true;
                break;
            }
            Ets::delay_us(STEP_PULSE_US);
            driver.unstep();
            Ets::delay_us(STEP_INTERVAL_US);
        }
        driver.after_homing();
        hit
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut drivers = vec![init_driver()?];
        let mut sink = LogSink;

        log::info!("Initializing TMC2130...");
        if let Err(e) = drivers[0].init(&mut sink) {
            log::error!("Error initializing TMC2130: {}", e);
            return Err(e.into());
        }
        drivers[0].status(&mut sink);

        FreeRtos::delay_ms(500);

        log::info!("Homing towards max...");
        if home_towards_max(drivers[0].as_mut()) {
            log::info!("Endstop reached.");
        } else {
            log::warn!("Homing finished without hitting the endstop.");
        }

        commands::report_endstops(&drivers, &["x"], &mut sink);
        commands::report_driver_status(&mut drivers, None, &mut sink)?;

        log::info!("Application finished setup. Looping indefinitely.");
        loop {
            FreeRtos::delay_ms(5000);
            log::info!("Main loop heartbeat...");
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("Starting TMC2130 stepper application...");

    if let Err(e) = app::run() {
        log::error!("Stepper application stopped: {}", e);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    env_logger::init();
    log::error!("esp-stepper-drivers drives real hardware; build it for an ESP-IDF target");
    std::process::exit(1);
}

// TMC2130 SPI transport with manual chip-select control

use crate::tmc_driver::traits::SpiDevice;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::spi::{config::Config, SpiBusDriver, SpiDriver};
use std::error::Error;

pub struct EspSpiDevice {
    driver: SpiBusDriver<'static, SpiDriver<'static>>,
    cs_pin: PinDriver<'static, AnyOutputPin, Output>,
}

unsafe impl Send for EspSpiDevice {}

impl EspSpiDevice {
    pub fn new(
        spi: SpiDriver<'static>,
        config: &Config,
        cs_pin_driver: PinDriver<'static, AnyOutputPin, Output>,
    ) -> Result<Self, Box<dyn Error>> {
        let driver = SpiBusDriver::new(spi, config)?;
        let mut device = Self {
            driver,
            cs_pin: cs_pin_driver,
        };
        // CS idles high
        device.cs_pin.set_high()?;
        Ok(device)
    }

    pub fn cs_num(&self) -> u16 {
        self.cs_pin.pin() as u16
    }

    fn transaction<F, R>(&mut self, operation: F) -> Result<R, Box<dyn Error>>
    where
        F: FnOnce(&mut SpiBusDriver<'static, SpiDriver<'static>>) -> Result<R, Box<dyn Error>>,
    {
        self.cs_pin.set_low()?;
        let result = operation(&mut self.driver);
        self.cs_pin.set_high()?;
        result
    }
}

impl SpiDevice for EspSpiDevice {
    fn write_register(&mut self, address: u8, value: u32) -> Result<u8, Box<dyn Error>> {
        let [b3, b2, b1, b0] = value.to_be_bytes();
        let write_cmd: [u8; 5] = [address | 0x80, b3, b2, b1, b0];
        let mut read_buffer: [u8; 5] = [0; 5];

        self.transaction(|driver| {
            driver
                .transfer(&mut read_buffer, &write_cmd)
                .map_err(|e| e.into())
        })?;

        Ok(read_buffer[0])
    }

    // The chip answers a read request on the following datagram.
    fn read_register(&mut self, address: u8) -> Result<(u8, u32), Box<dyn Error>> {
        let read_addr_cmd: [u8; 5] = [address & 0x7F, 0, 0, 0, 0];
        let dummy_cmd: [u8; 5] = [0x00, 0, 0, 0, 0];
        let mut read_buffer: [u8; 5] = [0; 5];

        self.transaction(|driver| driver.write(&read_addr_cmd).map_err(|e| e.into()))?;

        // CSN high time between datagrams
        Ets::delay_us(1);

        self.transaction(|driver| {
            driver
                .transfer(&mut read_buffer, &dummy_cmd)
                .map_err(|e| e.into())
        })?;

        let value = u32::from_be_bytes([
            read_buffer[1],
            read_buffer[2],
            read_buffer[3],
            read_buffer[4],
        ]);
        let status = read_buffer[0];

        Ok((status, value))
    }
}

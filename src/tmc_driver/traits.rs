use std::error::Error;

pub trait DigitalOutputPin: Send + Sync {
    fn set_high(&mut self) -> Result<(), Box<dyn Error>>;
    fn set_low(&mut self) -> Result<(), Box<dyn Error>>;

    fn set_level(&mut self, high: bool) -> Result<(), Box<dyn Error>> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

pub trait SpiDevice: Send {
    /// Writes a value to a register, returning the status byte clocked out during the write.
    fn write_register(&mut self, address: u8, value: u32) -> Result<u8, Box<dyn Error>>;
    /// Reads a value from a register, returning the status byte and the 32-bit value.
    /// Handles the two-step read protocol internally.
    fn read_register(&mut self, address: u8) -> Result<(u8, u32), Box<dyn Error>>;
}

/// Register-level control of a TMC2130 chip.
///
/// Reads and writes are fire-and-forget: a broken bus shows up as zeroed
/// reads, never as an error.
pub trait Tmc2130Control: Send {
    /// Chip-select identifier this handle talks to.
    fn cs_pin(&self) -> u16;

    /// Pushes the power-on register defaults to the chip.
    fn begin(&mut self);
    /// 0 = OK, 1 = bus stuck high, 2 = bus stuck low.
    fn test_connection(&mut self) -> u8;
    fn version(&mut self) -> u8;

    fn gconf(&mut self) -> u32;
    fn set_gconf(&mut self, value: u32);
    fn chopconf(&mut self) -> u32;
    fn set_chopconf(&mut self, value: u32);
    fn coolconf(&mut self) -> u32;
    fn set_coolconf(&mut self, value: u32);
    fn pwmconf(&mut self) -> u32;
    fn set_pwmconf(&mut self, value: u32);
    fn tcoolthrs(&mut self) -> u32;
    fn set_tcoolthrs(&mut self, value: u32);
    fn tpwmthrs(&mut self) -> u32;
    fn set_tpwmthrs(&mut self, value: u32);

    fn i_scale_analog(&mut self, enable: bool);
    fn interpolate(&mut self, enable: bool);
    fn internal_rsense(&mut self, enable: bool);
    fn sgt(&mut self, threshold: i8);
    fn sgt_value(&mut self) -> i8;
    fn diag1_stall(&mut self, enable: bool);

    fn set_microsteps(&mut self, microsteps: u16);
    fn microsteps(&mut self) -> u16;
    /// RMS run current in milliamps.
    /// Sense resistor and IHOLD/IRUN ratio used by the RMS current conversion.
    fn set_sense_parameters(&mut self, r_sense_ohms: f32, hold_multiplier: f32);
    fn set_rms_current(&mut self, milliamps: u16);
    fn rms_current(&mut self) -> u16;

    fn sg_result(&mut self) -> u16;
    fn cs_actual(&mut self) -> u8;
    /// Over-temperature shutdown.
    fn ot(&mut self) -> bool;
    /// Over-temperature pre-warning.
    fn otpw(&mut self) -> bool;
    /// Standstill indicator.
    fn stst(&mut self) -> bool;
}

use crate::tmc_driver::driver_settings::CurrentSettings;
use crate::tmc_driver::registers::*;
use crate::tmc_driver::traits::{SpiDevice, Tmc2130Control};

const VSENSE_HIGH_VOLTS: f32 = 0.180;
const VSENSE_LOW_VOLTS: f32 = 0.325;
const RSENSE_OFFSET_OHMS: f32 = 0.02;

/// Copies of the registers the TMC2130 cannot read back.
#[derive(Debug, Clone, Copy)]
struct ShadowRegisters {
    ihold_irun: u32,
    tpowerdown: u32,
    tpwmthrs: u32,
    tcoolthrs: u32,
    coolconf: u32,
    pwmconf: u32,
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        Self {
            ihold_irun: DEFAULT_IHOLD_IRUN,
            tpowerdown: DEFAULT_TPOWERDOWN,
            tpwmthrs: 0,
            tcoolthrs: 0,
            coolconf: 0,
            pwmconf: DEFAULT_PWMCONF,
        }
    }
}

/// TMC2130 register access over SPI.
pub struct Tmc2130 {
    spi: Box<dyn SpiDevice>,
    cs_pin: u16,
    r_sense: f32,
    hold_multiplier: f32,
    shadow: ShadowRegisters,
}

impl Tmc2130 {
    pub fn new(spi: Box<dyn SpiDevice>, cs_pin: u16) -> Self {
        Self {
            spi,
            cs_pin,
            r_sense: 0.11,
            hold_multiplier: 0.5,
            shadow: ShadowRegisters::default(),
        }
    }

    /// Sense resistor and hold ratio used by the RMS current conversion.
    pub fn with_current_settings(mut self, current: &CurrentSettings) -> Self {
        self.set_sense_parameters(current.r_sense_ohms, current.hold_multiplier);
        self
    }

    fn write_register(&mut self, address: u8, value: u32) {
        let name = register_name(address);
        match address {
            REG_IHOLD_IRUN => self.shadow.ihold_irun = value,
            REG_TPOWERDOWN => self.shadow.tpowerdown = value,
            REG_TPWMTHRS => self.shadow.tpwmthrs = value,
            REG_TCOOLTHRS => self.shadow.tcoolthrs = value,
            REG_COOLCONF => self.shadow.coolconf = value,
            REG_PWMCONF => self.shadow.pwmconf = value,
            _ => {}
        }
        match self.spi.write_register(address, value) {
            Ok(status) => log::debug!(
                "cs {}: wrote {} (0x{:02X}) = 0x{:08X}, SPI status 0x{:02X}",
                self.cs_pin,
                name,
                address,
                value,
                status
            ),
            Err(e) => log::error!("cs {}: SPI error writing {}: {}", self.cs_pin, name, e),
        }
    }

    fn read_register(&mut self, address: u8) -> u32 {
        let name = register_name(address);
        match address {
            REG_IHOLD_IRUN => return self.shadow.ihold_irun,
            REG_TPOWERDOWN => return self.shadow.tpowerdown,
            REG_TPWMTHRS => return self.shadow.tpwmthrs,
            REG_TCOOLTHRS => return self.shadow.tcoolthrs,
            REG_COOLCONF => return self.shadow.coolconf,
            REG_PWMCONF => return self.shadow.pwmconf,
            _ => {}
        }
        match self.spi.read_register(address) {
            Ok((status, value)) => {
                log::debug!(
                    "cs {}: read {} (0x{:02X}) = 0x{:08X}, SPI status 0x{:02X}",
                    self.cs_pin,
                    name,
                    address,
                    value,
                    status
                );
                value
            }
            Err(e) => {
                log::error!("cs {}: SPI error reading {}: {}", self.cs_pin, name, e);
                0
            }
        }
    }

    fn modify_register(&mut self, address: u8, mask: u32, bits: u32) {
        let value = (self.read_register(address) & !mask) | (bits & mask);
        self.write_register(address, value);
    }

    fn set_flag(&mut self, address: u8, flag: u32, enable: bool) {
        self.modify_register(address, flag, if enable { flag } else { 0 });
    }

    fn drv_status(&mut self) -> u32 {
        self.read_register(REG_DRV_STATUS)
    }

    fn vsense(&mut self) -> bool {
        self.read_register(REG_CHOPCONF) & CHOPCONF_VSENSE != 0
    }

    fn sense_volts(vsense: bool) -> f32 {
        if vsense {
            VSENSE_HIGH_VOLTS
        } else {
            VSENSE_LOW_VOLTS
        }
    }

    /// Current scale (0..=31) that yields `milliamps` RMS for the given sense range.
    fn current_scale(&self, milliamps: u16, vsense: bool) -> u32 {
        let cs = 32.0 * std::f32::consts::SQRT_2 * f32::from(milliamps) / 1000.0
            * (self.r_sense + RSENSE_OFFSET_OHMS)
            / Self::sense_volts(vsense)
            - 1.0;
        cs.clamp(0.0, 31.0) as u32
    }
}

impl Tmc2130Control for Tmc2130 {
    fn cs_pin(&self) -> u16 {
        self.cs_pin
    }

    fn begin(&mut self) {
        log::info!("cs {}: pushing TMC2130 register defaults", self.cs_pin);
        let shadow = ShadowRegisters::default();
        self.write_register(REG_GCONF, 0);
        self.write_register(REG_CHOPCONF, DEFAULT_CHOPCONF);
        self.write_register(REG_COOLCONF, shadow.coolconf);
        self.write_register(REG_PWMCONF, shadow.pwmconf);
        self.write_register(REG_IHOLD_IRUN, shadow.ihold_irun);
        self.write_register(REG_TPOWERDOWN, shadow.tpowerdown);
        self.modify_register(REG_CHOPCONF, CHOPCONF_TOFF_MASK, DEFAULT_TOFF);
    }

    fn test_connection(&mut self) -> u8 {
        match self.drv_status() {
            0xFFFF_FFFF => 1,
            0 => 2,
            _ => 0,
        }
    }

    fn version(&mut self) -> u8 {
        (self.read_register(REG_IOIN) >> IOIN_VERSION_SHIFT) as u8
    }

    fn gconf(&mut self) -> u32 {
        self.read_register(REG_GCONF)
    }

    fn set_gconf(&mut self, value: u32) {
        self.write_register(REG_GCONF, value);
    }

    fn chopconf(&mut self) -> u32 {
        self.read_register(REG_CHOPCONF)
    }

    fn set_chopconf(&mut self, value: u32) {
        self.write_register(REG_CHOPCONF, value);
    }

    fn coolconf(&mut self) -> u32 {
        self.read_register(REG_COOLCONF)
    }

    fn set_coolconf(&mut self, value: u32) {
        self.write_register(REG_COOLCONF, value);
    }

    fn pwmconf(&mut self) -> u32 {
        self.read_register(REG_PWMCONF)
    }

    fn set_pwmconf(&mut self, value: u32) {
        self.write_register(REG_PWMCONF, value);
    }

    fn tcoolthrs(&mut self) -> u32 {
        self.read_register(REG_TCOOLTHRS)
    }

    fn set_tcoolthrs(&mut self, value: u32) {
        self.write_register(REG_TCOOLTHRS, value);
    }

    fn tpwmthrs(&mut self) -> u32 {
        self.read_register(REG_TPWMTHRS)
    }

    fn set_tpwmthrs(&mut self, value: u32) {
        self.write_register(REG_TPWMTHRS, value);
    }

    fn i_scale_analog(&mut self, enable: bool) {
        self.set_flag(REG_GCONF, GCONF_I_SCALE_ANALOG, enable);
    }

    fn interpolate(&mut self, enable: bool) {
        self.set_flag(REG_CHOPCONF, CHOPCONF_INTPOL, enable);
    }

    fn internal_rsense(&mut self, enable: bool) {
        self.set_flag(REG_GCONF, GCONF_INTERNAL_RSENSE, enable);
    }

    fn sgt(&mut self, threshold: i8) {
        let threshold = threshold.clamp(-64, 63);
        let bits = ((threshold as u8 as u32) & 0x7F) << COOLCONF_SGT_SHIFT;
        self.modify_register(REG_COOLCONF, COOLCONF_SGT_MASK, bits);
    }

    fn sgt_value(&mut self) -> i8 {
        let raw = ((self.read_register(REG_COOLCONF) & COOLCONF_SGT_MASK) >> COOLCONF_SGT_SHIFT) as u8;
        // sign-extend the 7-bit field
        ((raw << 1) as i8) >> 1
    }

    fn diag1_stall(&mut self, enable: bool) {
        self.set_flag(REG_GCONF, GCONF_DIAG1_STALL, enable);
    }

    fn set_microsteps(&mut self, microsteps: u16) {
        match calculate_mres(microsteps) {
            Some(mres) => {
                self.modify_register(REG_CHOPCONF, CHOPCONF_MRES_MASK, mres << CHOPCONF_MRES_SHIFT)
            }
            None => log::warn!(
                "cs {}: ignoring microstep setting {}, not a power of two up to 256",
                self.cs_pin,
                microsteps
            ),
        }
    }

    fn microsteps(&mut self) -> u16 {
        let mres = (self.read_register(REG_CHOPCONF) & CHOPCONF_MRES_MASK) >> CHOPCONF_MRES_SHIFT;
        256u16.checked_shr(mres).unwrap_or(0)
    }

    fn set_sense_parameters(&mut self, r_sense_ohms: f32, hold_multiplier: f32) {
        self.r_sense = r_sense_ohms;
        self.hold_multiplier = hold_multiplier;
    }

    fn set_rms_current(&mut self, milliamps: u16) {
        let mut cs = self.current_scale(milliamps, false);
        if cs < 16 {
            self.set_flag(REG_CHOPCONF, CHOPCONF_VSENSE, true);
            cs = self.current_scale(milliamps, true);
        } else if self.vsense() {
            self.set_flag(REG_CHOPCONF, CHOPCONF_VSENSE, false);
        }
        let ihold = (((cs as f32) * self.hold_multiplier) as u32).min(31);
        let ihold_irun = (self.shadow.ihold_irun & (0x0F << IHOLD_IRUN_IHOLDDELAY_SHIFT))
            | (cs << IHOLD_IRUN_IRUN_SHIFT)
            | ihold;
        log::info!(
            "cs {}: RMS current {} mA -> IRUN {}, IHOLD {}",
            self.cs_pin,
            milliamps,
            cs,
            ihold
        );
        self.write_register(REG_IHOLD_IRUN, ihold_irun);
    }

    fn rms_current(&mut self) -> u16 {
        let irun = (self.shadow.ihold_irun >> IHOLD_IRUN_IRUN_SHIFT) & 0x1F;
        let vsense = self.vsense();
        let milliamps = (irun as f32 + 1.0) / 32.0 * Self::sense_volts(vsense)
            / (self.r_sense + RSENSE_OFFSET_OHMS)
            / std::f32::consts::SQRT_2
            * 1000.0;
        milliamps as u16
    }

    fn sg_result(&mut self) -> u16 {
        (self.drv_status() & DRV_STATUS_SG_RESULT_MASK) as u16
    }

    fn cs_actual(&mut self) -> u8 {
        ((self.drv_status() >> DRV_STATUS_CS_ACTUAL_SHIFT) & 0x1F) as u8
    }

    fn ot(&mut self) -> bool {
        self.drv_status() & DRV_STATUS_OT != 0
    }

    fn otpw(&mut self) -> bool {
        self.drv_status() & DRV_STATUS_OTPW != 0
    }

    fn stst(&mut self) -> bool {
        self.drv_status() & DRV_STATUS_STST != 0
    }
}

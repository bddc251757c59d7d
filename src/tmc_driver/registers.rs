// TMC2130 register map
pub const REG_GCONF: u8 = 0x00;
pub const REG_GSTAT: u8 = 0x01;
pub const REG_IOIN: u8 = 0x04;
pub const REG_IHOLD_IRUN: u8 = 0x10;
pub const REG_TPOWERDOWN: u8 = 0x11;
pub const REG_TPWMTHRS: u8 = 0x13;
pub const REG_TCOOLTHRS: u8 = 0x14;
pub const REG_CHOPCONF: u8 = 0x6C;
pub const REG_COOLCONF: u8 = 0x6D;
pub const REG_DRV_STATUS: u8 = 0x6F;
pub const REG_PWMCONF: u8 = 0x70;

/// Registers the chip cannot read back.
pub const WRITE_ONLY: [u8; 6] = [
    REG_IHOLD_IRUN,
    REG_TPOWERDOWN,
    REG_TPWMTHRS,
    REG_TCOOLTHRS,
    REG_COOLCONF,
    REG_PWMCONF,
];

pub const GCONF_I_SCALE_ANALOG: u32 = 1 << 0;
pub const GCONF_INTERNAL_RSENSE: u32 = 1 << 1;
pub const GCONF_DIAG1_STALL: u32 = 1 << 8;

pub const CHOPCONF_TOFF_MASK: u32 = 0x0F;
pub const CHOPCONF_TBL_SHIFT: u32 = 15;
pub const CHOPCONF_TBL_MASK: u32 = 0x03 << CHOPCONF_TBL_SHIFT;
pub const CHOPCONF_VSENSE: u32 = 1 << 17;
pub const CHOPCONF_MRES_SHIFT: u32 = 24;
pub const CHOPCONF_MRES_MASK: u32 = 0x0F << CHOPCONF_MRES_SHIFT;
pub const CHOPCONF_INTPOL: u32 = 1 << 28;

pub const COOLCONF_SGT_SHIFT: u32 = 16;
pub const COOLCONF_SGT_MASK: u32 = 0x7F << COOLCONF_SGT_SHIFT;

pub const IHOLD_IRUN_IRUN_SHIFT: u32 = 8;
pub const IHOLD_IRUN_IHOLDDELAY_SHIFT: u32 = 16;

pub const DRV_STATUS_SG_RESULT_MASK: u32 = 0x3FF;
pub const DRV_STATUS_CS_ACTUAL_SHIFT: u32 = 16;
pub const DRV_STATUS_OT: u32 = 1 << 25;
pub const DRV_STATUS_OTPW: u32 = 1 << 26;
pub const DRV_STATUS_STST: u32 = 1 << 31;

pub const IOIN_VERSION_SHIFT: u32 = 24;

// Power-on values pushed by `begin()`
pub const DEFAULT_CHOPCONF: u32 = 2 << CHOPCONF_TBL_SHIFT;
pub const DEFAULT_PWMCONF: u32 = 0x0005_0480;
pub const DEFAULT_IHOLD_IRUN: u32 = (6 << IHOLD_IRUN_IHOLDDELAY_SHIFT) | (16 << IHOLD_IRUN_IRUN_SHIFT) | 8;
pub const DEFAULT_TOFF: u32 = 8;
pub const DEFAULT_TPOWERDOWN: u32 = 20;

pub fn register_name(address: u8) -> &'static str {
    match address {
        REG_GCONF => "GCONF",
        REG_GSTAT => "GSTAT",
        REG_IOIN => "IOIN",
        REG_IHOLD_IRUN => "IHOLD_IRUN",
        REG_TPOWERDOWN => "TPOWERDOWN",
        REG_TPWMTHRS => "TPWMTHRS",
        REG_TCOOLTHRS => "TCOOLTHRS",
        REG_CHOPCONF => "CHOPCONF",
        REG_COOLCONF => "COOLCONF",
        REG_DRV_STATUS => "DRV_STATUS",
        REG_PWMCONF => "PWMCONF",
        _ => "UNKNOWN",
    }
}

/// MRES field value for a microstep count, `None` for anything but a power of two up to 256.
pub fn calculate_mres(microsteps: u16) -> Option<u32> {
    match microsteps {
        256 => Some(0),
        128 => Some(1),
        64 => Some(2),
        32 => Some(3),
        16 => Some(4),
        8 => Some(5),
        4 => Some(6),
        2 => Some(7),
        1 => Some(8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mres_round_trips_through_shift() {
        for shift in 0..=8u32 {
            let microsteps = 256u16 >> shift;
            assert_eq!(calculate_mres(microsteps), Some(shift));
        }
    }

    #[test]
    fn mres_rejects_non_powers_of_two() {
        assert_eq!(calculate_mres(0), None);
        assert_eq!(calculate_mres(3), None);
        assert_eq!(calculate_mres(512), None);
    }
}

use crate::tmc_driver::traits::Tmc2130Control;

/// The registers homing is allowed to change, saved so they can be put back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterBackup {
    pub gconf: u32,
    pub chopconf: u32,
    pub coolconf: u32,
    pub pwmconf: u32,
    pub tcoolthrs: u32,
    pub tpwmthrs: u32,
}

impl RegisterBackup {
    pub fn capture<C: Tmc2130Control + ?Sized>(chip: &mut C) -> Self {
        Self {
            gconf: chip.gconf(),
            chopconf: chip.chopconf(),
            coolconf: chip.coolconf(),
            pwmconf: chip.pwmconf(),
            tcoolthrs: chip.tcoolthrs(),
            tpwmthrs: chip.tpwmthrs(),
        }
    }

    /// Writes the saved values back in capture order.
    pub fn restore<C: Tmc2130Control + ?Sized>(&self, chip: &mut C) {
        chip.set_gconf(self.gconf);
        chip.set_chopconf(self.chopconf);
        chip.set_coolconf(self.coolconf);
        chip.set_pwmconf(self.pwmconf);
        chip.set_tcoolthrs(self.tcoolthrs);
        chip.set_tpwmthrs(self.tpwmthrs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSpi;
    use crate::tmc_driver::registers::*;
    use crate::tmc_driver::tmc2130::Tmc2130;

    #[test]
    fn restore_writes_in_capture_order() {
        let spi = MockSpi::new();
        let mut chip = Tmc2130::new(Box::new(spi.clone()), 10);
        let backup = RegisterBackup {
            gconf: 1,
            chopconf: 2,
            coolconf: 3,
            pwmconf: 4,
            tcoolthrs: 5,
            tpwmthrs: 6,
        };
        backup.restore(&mut chip);
        assert_eq!(
            spi.writes(),
            vec![
                (REG_GCONF, 1),
                (REG_CHOPCONF, 2),
                (REG_COOLCONF, 3),
                (REG_PWMCONF, 4),
                (REG_TCOOLTHRS, 5),
                (REG_TPWMTHRS, 6),
            ]
        );
    }
}

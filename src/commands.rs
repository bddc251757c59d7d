//! Console commands operating on the motor table
//!
//! These are the handlers behind M119, M122, M350, M907, M908 and M914.
//! Motors are addressed by their index in the table; capability checks
//! happen here so the drivers themselves can stay silent about unsupported
//! settings.

use crate::error::StepperError;
use crate::stepper::status::{status_table, StatusSink};
use crate::stepper::StepperDriver;

pub type MotorTable = [Box<dyn StepperDriver>];

fn motor(drivers: &mut MotorTable, index: usize) -> Result<&mut Box<dyn StepperDriver>, StepperError> {
    drivers.get_mut(index).ok_or(StepperError::NoSuchMotor(index))
}

fn unsupported(out: &mut dyn StatusSink, what: &'static str) -> StepperError {
    let error = StepperError::Unsupported(what);
    out.write_line(&format!("Warning: {error}"));
    error
}

/// M350: microstep resolution of one motor.
pub fn set_microsteps(
    drivers: &mut MotorTable,
    index: usize,
    microsteps: u16,
    out: &mut dyn StatusSink,
) -> Result<(), StepperError> {
    let driver = motor(drivers, index)?;
    if !driver.implement_set_microsteps() {
        return Err(unsupported(out, "microsteps"));
    }
    driver.set_microsteps(microsteps);
    Ok(())
}

/// M908: raw motor current of one motor.
pub fn set_motor_current(
    drivers: &mut MotorTable,
    index: usize,
    current: u16,
    out: &mut dyn StatusSink,
) -> Result<(), StepperError> {
    let driver = motor(drivers, index)?;
    if !driver.implement_set_max_current() {
        return Err(unsupported(out, "current"));
    }
    driver.set_motor_current(current);
    Ok(())
}

/// M907: current as a percentage of the motor maximum. Values above 100 are clamped.
pub fn set_motor_current_percent(
    drivers: &mut MotorTable,
    index: usize,
    percent: u8,
) -> Result<(), StepperError> {
    motor(drivers, index)?.set_motor_current_percent(percent.min(100));
    Ok(())
}

/// M914: stall thresholds per motor. Without any value, reports the current ones.
pub fn set_stallguard_thresholds(
    drivers: &mut MotorTable,
    thresholds: &[Option<i8>],
    out: &mut dyn StatusSink,
) -> Result<(), StepperError> {
    if thresholds.len() > drivers.len() {
        return Err(StepperError::NoSuchMotor(drivers.len()));
    }
    if thresholds.iter().all(Option::is_none) {
        out.write_line("Trinamic stallguard threshold");
        let mut line = String::new();
        for (index, driver) in drivers.iter_mut().enumerate() {
            if let Some(threshold) = driver.stallguard_threshold() {
                line.push_str(&format!(" {index}:{threshold}"));
            }
        }
        out.write_line(&line);
        return Ok(());
    }
    for (driver, threshold) in drivers.iter_mut().zip(thresholds) {
        if let Some(threshold) = threshold {
            driver.set_stallguard_threshold(*threshold);
        }
    }
    Ok(())
}

/// M119: one `name_min:H` / `name_max:L` pair per axis with real switches.
pub fn report_endstops(drivers: &MotorTable, names: &[&str], out: &mut dyn StatusSink) {
    let mut line = String::from("endstops hit:");
    for (driver, name) in drivers.iter().zip(names) {
        for (suffix, endstop) in [("min", driver.min_endstop()), ("max", driver.max_endstop())] {
            if endstop.implemented() {
                let level = if endstop.update() { 'H' } else { 'L' };
                line.push_str(&format!(" {name}_{suffix}:{level}"));
            }
        }
    }
    out.write_line(&line);
}

/// M122: status table of all smart drivers, or of the one at `only`.
pub fn report_driver_status(
    drivers: &mut MotorTable,
    only: Option<usize>,
    out: &mut dyn StatusSink,
) -> Result<(), StepperError> {
    let range = match only {
        Some(index) if index < drivers.len() => index..index + 1,
        Some(index) => return Err(StepperError::NoSuchMotor(index)),
        None => 0..drivers.len(),
    };
    let statuses: Vec<_> = drivers[range]
        .iter_mut()
        .filter_map(|driver| driver.driver_status())
        .collect();
    for line in status_table(&statuses) {
        out.write_line(&line);
    }
    Ok(())
}

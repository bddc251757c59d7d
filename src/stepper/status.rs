//! Human readable driver diagnostics
//!
//! Drivers write labelled lines into a [`StatusSink`]. The firmware console
//! forwards them to the host, tests collect them into a `Vec<String>`.

use std::fmt;

const STATUS_COLUMN_WIDTH: usize = 14;

pub trait StatusSink {
    fn write_line(&mut self, line: &str);

    fn field(&mut self, label: &str, value: &dyn fmt::Display) {
        self.write_line(&format!("{label}{value}"));
    }
}

/// Forwards diagnostic lines to the `log` facade at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn write_line(&mut self, line: &str) {
        log::info!("{}", line);
    }
}

impl StatusSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Snapshot of a smart driver's health, one column of the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverStatus {
    pub name: String,
    pub version: u8,
    /// Connection test code, 0 = OK.
    pub connection: u8,
    pub over_temperature: bool,
    pub over_temperature_warning: bool,
    /// RMS current in milliamps.
    pub current: u16,
    pub microsteps: u16,
    pub stallguard_threshold: i8,
    pub stallguard_result: u16,
    pub current_scale_actual: u8,
}

fn alarm(flag: bool) -> String {
    String::from(if flag { "ALARM" } else { "OK" })
}

/// Lays out one row per property and one column per driver.
pub fn status_table(statuses: &[DriverStatus]) -> Vec<String> {
    type Cell = fn(&DriverStatus) -> String;
    let rows: [(&str, Cell); 10] = [
        ("Driver", |s| s.name.clone()),
        ("version", |s| s.version.to_string()),
        ("connection", |s| {
            String::from(if s.connection == 0 { "OK" } else { "ERROR" })
        }),
        ("over temp", |s| alarm(s.over_temperature)),
        ("OT warning", |s| alarm(s.over_temperature_warning)),
        ("current (RMS)", |s| s.current.to_string()),
        ("microsteps", |s| s.microsteps.to_string()),
        ("SG threshold", |s| s.stallguard_threshold.to_string()),
        ("SG result", |s| s.stallguard_result.to_string()),
        ("CS actual", |s| s.current_scale_actual.to_string()),
    ];

    let mut lines = vec![String::from("--- TMC2130 Drivers Status --- ")];
    for (label, cell) in rows {
        let mut line = format!("{label:<STATUS_COLUMN_WIDTH$}");
        for status in statuses {
            let text: String = cell(status).chars().take(STATUS_COLUMN_WIDTH).collect();
            line.push_str(&format!("{text:<STATUS_COLUMN_WIDTH$}"));
        }
        lines.push(line.trim_end().to_owned());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str) -> DriverStatus {
        DriverStatus {
            name: name.to_owned(),
            version: 0x11,
            connection: 0,
            over_temperature: false,
            over_temperature_warning: true,
            current: 795,
            microsteps: 16,
            stallguard_threshold: -3,
            stallguard_result: 412,
            current_scale_actual: 25,
        }
    }

    #[test]
    fn field_joins_label_and_value() {
        let mut out: Vec<String> = Vec::new();
        out.field("\tMicrosteps ", &16);
        assert_eq!(out, vec!["\tMicrosteps 16"]);
    }

    #[test]
    fn table_has_fixed_width_columns() {
        let lines = status_table(&[status("X"), status("Y")]);
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "--- TMC2130 Drivers Status --- ");
        assert_eq!(lines[1], format!("{:<14}{:<14}Y", "Driver", "X"));
        assert_eq!(lines[2], format!("{:<14}{:<14}17", "version", "17"));
        assert_eq!(lines[3], format!("{:<14}{:<14}OK", "connection", "OK"));
        assert_eq!(lines[5], format!("{:<14}{:<14}ALARM", "OT warning", "ALARM"));
        assert_eq!(lines[8], format!("{:<14}{:<14}-3", "SG threshold", "-3"));
    }

    #[test]
    fn long_names_are_cut_on_char_boundaries() {
        let lines = status_table(&[status("Extruder-ABCDü-2"), status("Y")]);
        assert_eq!(lines[1], format!("{:<14}{}Y", "Driver", "Extruder-ABCDü"));
    }

    #[test]
    fn connection_failure_shows_error() {
        let mut broken = status("Z");
        broken.connection = 2;
        let lines = status_table(&[broken]);
        assert_eq!(lines[3], format!("{:<14}ERROR", "connection"));
    }
}

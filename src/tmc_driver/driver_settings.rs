use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CurrentSettings {
    pub rms_current_ma: Option<u16>, // applied by init() when set
    pub hold_multiplier: f32,        // IHOLD = IRUN * multiplier
    pub r_sense_ohms: f32,           // external sense resistor
}

impl Default for CurrentSettings {
    fn default() -> Self {
        Self {
            rms_current_ma: None,
            hold_multiplier: 0.5,
            r_sense_ohms: 0.11,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MicrostepSettings {
    pub microsteps: Option<u16>, // power of two, applied by init() when set
}

#[derive(Debug, Clone, Default)]
pub struct StallGuardSettings {
    pub homing_threshold: Option<i8>, // -64..=63, written by before_homing() when set
}

#[derive(Debug, Clone)]
pub struct Tmc2130Settings {
    pub name: String,
    pub current: CurrentSettings,
    pub microsteps: MicrostepSettings,
    pub stallguard: StallGuardSettings,
    /// How long register writes wait for the motor to come to rest.
    pub standstill_timeout: Duration,
}

impl Default for Tmc2130Settings {
    fn default() -> Self {
        Self {
            name: String::from("TMC2130"),
            current: CurrentSettings::default(),
            microsteps: MicrostepSettings::default(),
            stallguard: StallGuardSettings::default(),
            standstill_timeout: Duration::from_millis(100),
        }
    }
}

impl Tmc2130Settings {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

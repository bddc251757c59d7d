pub mod clock;

#[cfg(target_os = "espidf")]
pub mod digital_pin;
#[cfg(target_os = "espidf")]
pub mod endstop_pin;
#[cfg(target_os = "espidf")]
pub mod spi;

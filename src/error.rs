use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepperError {
    #[error("SPI error: connection test returned {code} (0 = OK, 1 = bus high, 2 = bus low)")]
    Connection { code: u8 },
    #[error("No motor with index {0}")]
    NoSuchMotor(usize),
    #[error("This driver does not support setting {0} by software!")]
    Unsupported(&'static str),
}

pub mod driver_settings;
pub mod pin;
pub mod registers;
pub mod tmc2130;
pub mod traits;

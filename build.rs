fn main() {
    // The ESP-IDF link arguments only exist when building for the chip.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}

//! Rotation sensing — the SPI gyro driver and the velocity classifier.

pub mod gyro;
pub mod rotation;

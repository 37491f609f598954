//! GPIO / peripheral pin assignments for the ESP32-S3 GyroLED board.
//!
//! Single source of truth: `main` builds its drivers from these numbers.

// ---------------------------------------------------------------------------
// User button
// ---------------------------------------------------------------------------

/// Push button, active HIGH (external pull-down).
pub const BUTTON_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Indicator LEDs (active HIGH)
// ---------------------------------------------------------------------------

pub const LED_GREEN_GPIO: i32 = 13;
pub const LED_RED_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Gyroscope (SPI2, mode 3)
// ---------------------------------------------------------------------------

pub const GYRO_SCLK_GPIO: i32 = 6;
pub const GYRO_MOSI_GPIO: i32 = 7;
pub const GYRO_MISO_GPIO: i32 = 15;
pub const GYRO_CS_GPIO: i32 = 16;

/// SPI clock for the gyro.  The part tops out at 10 MHz.
pub const GYRO_SPI_BAUD_HZ: u32 = 5_000_000;

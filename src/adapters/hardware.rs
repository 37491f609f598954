//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the button input, both LED outputs and the gyro, exposing them
//! through [`ButtonInput`], [`RotationSensor`] and [`IndicatorOutput`].
//! It is generic over the `embedded-hal` pin and SPI traits, so the same
//! code drives ESP-IDF `PinDriver`s on target and plain fakes on the host.
//!
//! Individual read failures are logged and the previous good value is
//! retained; write failures are logged and dropped.  The domain never sees
//! a bus error.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::warn;

use crate::app::ports::{ButtonInput, IndicatorOutput, Led, PinLevel, RotationSensor};
use crate::sensors::gyro::Gyro;
use crate::sensors::rotation::RotationSample;

/// Concrete adapter that combines all board I/O behind port traits.
pub struct HardwareAdapter<B, G, R, S> {
    button: B,
    green: G,
    red: R,
    gyro: Gyro<S>,
    last_button: PinLevel,
    last_velocity: RotationSample,
}

impl<B, G, R, S> HardwareAdapter<B, G, R, S>
where
    B: InputPin,
    G: OutputPin,
    R: OutputPin,
    S: SpiDevice,
{
    pub fn new(button: B, green: G, red: R, gyro: Gyro<S>) -> Self {
        Self {
            button,
            green,
            red,
            gyro,
            last_button: PinLevel::Reset,
            last_velocity: 0,
        }
    }
}

// ── ButtonInput implementation ────────────────────────────────

impl<B: InputPin, G, R, S> ButtonInput for HardwareAdapter<B, G, R, S> {
    fn read_button(&mut self) -> PinLevel {
        match self.button.is_high() {
            Ok(high) => self.last_button = PinLevel::from_bool(high),
            Err(e) => warn!("Button: read failed ({e:?}), keeping {:?}", self.last_button),
        }
        self.last_button
    }
}

// ── RotationSensor implementation ─────────────────────────────

impl<B, G, R, S: SpiDevice> RotationSensor for HardwareAdapter<B, G, R, S> {
    fn read_velocity(&mut self) -> RotationSample {
        match self.gyro.read_z() {
            Ok(raw) => self.last_velocity = RotationSample::from(raw),
            Err(e) => warn!("Gyro: {e}, keeping {}", self.last_velocity),
        }
        self.last_velocity
    }
}

// ── IndicatorOutput implementation ────────────────────────────

impl<B, G: OutputPin, R: OutputPin, S> IndicatorOutput for HardwareAdapter<B, G, R, S> {
    fn write_led(&mut self, led: Led, level: PinLevel) {
        match led {
            Led::Green => drive(led, &mut self.green, level),
            Led::Red => drive(led, &mut self.red, level),
        }
    }
}

fn drive<P: OutputPin>(led: Led, pin: &mut P, level: PinLevel) {
    let result = match level {
        PinLevel::Set => pin.set_high(),
        PinLevel::Reset => pin.set_low(),
    };
    if let Err(e) = result {
        warn!("LED {led:?}: write failed ({e:?})");
    }
}

//! Actuation policy: button state + rotation band → LED outputs.
//!
//! ```text
//!   green = pressed  OR  band is counter-clockwise
//!   red   = pressed  AND band is not counter-clockwise
//! ```
//!
//! `NearlyZero` counts as "not counter-clockwise", so a pressed button with
//! the board at rest lights both LEDs.

use serde::{Deserialize, Serialize};

use crate::app::ports::PinLevel;
use crate::sensors::rotation::RotationBand;

/// Debounce-free view of the user button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonState {
    Pressed,
    #[default]
    Released,
}

impl ButtonState {
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

impl From<PinLevel> for ButtonState {
    fn from(level: PinLevel) -> Self {
        match level {
            PinLevel::Set => Self::Pressed,
            PinLevel::Reset => Self::Released,
        }
    }
}

/// The two LED commands for one cycle. Carries no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputDecision {
    pub green_on: bool,
    pub red_on: bool,
}

impl OutputDecision {
    pub const OFF: Self = Self {
        green_on: false,
        red_on: false,
    };

    pub const fn green_level(self) -> PinLevel {
        PinLevel::from_bool(self.green_on)
    }

    pub const fn red_level(self) -> PinLevel {
        PinLevel::from_bool(self.red_on)
    }
}

/// Combine the latest button state and rotation band.
pub const fn decide(button: ButtonState, band: RotationBand) -> OutputDecision {
    let pressed = button.is_pressed();
    let ccw = band.is_counter_clockwise();
    OutputDecision {
        green_on: pressed || ccw,
        red_on: pressed && !ccw,
    }
}

//! Rotation-rate classification.
//!
//! Maps a raw signed gyroscope sample onto one of five ordered bands:
//!
//! | Band                   | Raw sample `v`          |
//! |------------------------|-------------------------|
//! | `CounterClockwiseFast` | `v <= -15000`           |
//! | `CounterClockwiseSlow` | `-15000 < v <= -2000`   |
//! | `NearlyZero`           | `-2000 < v < 2000`      |
//! | `ClockwiseSlow`        | `2000 <= v < 15000`     |
//! | `ClockwiseFast`        | `v >= 15000`            |
//!
//! Each threshold value belongs to the higher-magnitude band.

use serde::{Deserialize, Serialize};

/// Raw angular-velocity sample in sensor counts.
pub type RotationSample = i32;

/// Samples at or below this are counter-clockwise fast.
pub const CCW_FAST_MAX: RotationSample = -15_000;
/// Samples at or below this (and above [`CCW_FAST_MAX`]) are counter-clockwise slow.
pub const CCW_SLOW_MAX: RotationSample = -2_000;
/// Samples at or above this are clockwise slow.
pub const CW_SLOW_MIN: RotationSample = 2_000;
/// Samples at or above this are clockwise fast.
pub const CW_FAST_MIN: RotationSample = 15_000;

/// Discrete rotation band, ordered from fastest counter-clockwise to
/// fastest clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RotationBand {
    CounterClockwiseFast = 0,
    CounterClockwiseSlow = 1,
    NearlyZero = 2,
    ClockwiseSlow = 3,
    ClockwiseFast = 4,
}

impl RotationBand {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::CounterClockwiseFast,
        Self::CounterClockwiseSlow,
        Self::NearlyZero,
        Self::ClockwiseSlow,
        Self::ClockwiseFast,
    ];

    /// True for the two counter-clockwise bands. `NearlyZero` is not
    /// counter-clockwise and is handled like the clockwise bands.
    pub const fn is_counter_clockwise(self) -> bool {
        matches!(self, Self::CounterClockwiseFast | Self::CounterClockwiseSlow)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::CounterClockwiseFast => "CCW_FAST",
            Self::CounterClockwiseSlow => "CCW_SLOW",
            Self::NearlyZero => "NEARLY_ZERO",
            Self::ClockwiseSlow => "CW_SLOW",
            Self::ClockwiseFast => "CW_FAST",
        }
    }
}

impl core::fmt::Display for RotationBand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a raw sample. Total over every `i32`.
pub const fn classify(raw: RotationSample) -> RotationBand {
    if raw <= CCW_FAST_MAX {
        RotationBand::CounterClockwiseFast
    } else if raw <= CCW_SLOW_MAX {
        RotationBand::CounterClockwiseSlow
    } else if raw < CW_SLOW_MIN {
        RotationBand::NearlyZero
    } else if raw < CW_FAST_MIN {
        RotationBand::ClockwiseSlow
    } else {
        RotationBand::ClockwiseFast
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

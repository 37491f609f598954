//! Outbound application events.
//!
//! Strategies and the actuation cycle emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them (serial log, test recorder).

use serde::Serialize;

use crate::control::policy::{ButtonState, OutputDecision};
use crate::error::Fatal;
use crate::scheduler::StrategyKind;
use crate::sensors::rotation::{RotationBand, RotationSample};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The active strategy reached `Running`.
    Started(StrategyKind),

    /// One actuation cycle completed.
    Cycle(CycleReport),

    /// The system entered `Halted`.
    Halted(Fatal),
}

/// What one actuation cycle saw and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub button: ButtonState,
    pub raw_velocity: RotationSample,
    pub band: RotationBand,
    pub outputs: OutputDecision,
}

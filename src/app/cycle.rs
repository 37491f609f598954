//! The actuation cycle shared by every execution strategy.
//!
//! ```text
//!   sample_button ──▶ ButtonState ─┐
//!                                  ├──▶ decide ──▶ write LEDs ──▶ AppEvent::Cycle
//!   read_velocity ──▶ classify ────┘
//! ```
//!
//! Every entry point is gated on [`RunState::Running`]: before start and
//! after a halt they touch no hardware.  The gyro read happens outside the
//! critical section.  The state update and both GPIO writes happen under it,
//! so a halt can never land between the run-state check and the LEDs.
//!
//! [`latch_button`] is the interrupt-context entry point.  It never takes the
//! lock; its sample is folded in by the next [`drive_outputs`].

use log::trace;

use super::events::{AppEvent, CycleReport};
use super::ports::{ButtonInput, EventSink, IndicatorOutput, Led, RotationSensor};
use super::state::SharedControl;
use crate::control::policy::{ButtonState, decide};
use crate::sensors::rotation::classify;

/// Sample the button into the shared state.
///
/// Returns the sampled state, or `None` when the system is not running.
pub fn sample_button(shared: &SharedControl, hw: &mut impl ButtonInput) -> Option<ButtonState> {
    if !shared.run_state().is_running() {
        return None;
    }
    let button = ButtonState::from(hw.read_button());
    shared.with(|s| s.button = button);
    Some(button)
}

/// Sample the button from interrupt context.
///
/// Lock-free: the sample is latched on the shared handle and applied by the
/// next [`drive_outputs`].  Returns `None` when the system is not running.
pub fn latch_button(shared: &SharedControl, hw: &mut impl ButtonInput) -> Option<ButtonState> {
    if !shared.is_live() {
        return None;
    }
    let button = ButtonState::from(hw.read_button());
    shared.latch_button(button);
    Some(button)
}

/// Read the rotation sensor, evaluate the policy against the latest button
/// state and drive both LEDs.
///
/// Returns the cycle report, or `None` when the system is not running.
pub fn drive_outputs(
    shared: &SharedControl,
    hw: &mut (impl RotationSensor + IndicatorOutput),
    sink: &mut impl EventSink,
) -> Option<CycleReport> {
    if !shared.run_state().is_running() {
        return None;
    }

    let raw_velocity = hw.read_velocity();
    let band = classify(raw_velocity);

    let report = shared.with(|s| {
        // A halt may have landed while the sensor was being read.
        if !s.run.is_running() {
            return None;
        }
        if let Some(button) = shared.take_latched() {
            s.button = button;
        }
        let outputs = decide(s.button, band);
        s.raw_velocity = raw_velocity;
        s.band = Some(band);
        s.outputs = outputs;
        s.cycles += 1;
        hw.write_led(Led::Green, outputs.green_level());
        hw.write_led(Led::Red, outputs.red_level());
        Some(CycleReport {
            cycle: s.cycles,
            button: s.button,
            raw_velocity,
            band,
            outputs,
        })
    })?;

    trace!("cycle {} -> {:?}", report.cycle, report.outputs);

    sink.emit(&AppEvent::Cycle(report));
    Some(report)
}

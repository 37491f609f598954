//! Integration tests for the actuation cycle: classify → decide → LEDs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use gyroled::app::cycle;
use gyroled::app::ports::{IndicatorOutput, Led, PinLevel, RotationSensor};
use gyroled::app::state::{RunState, SharedControl};
use gyroled::control::policy::ButtonState;
use gyroled::error::{CreationFault, Fatal};
use gyroled::scheduler::{ExecutionStrategy, Polling};
use gyroled::sensors::rotation::{RotationBand, RotationSample};

use crate::mock_hw::{BoardCall, MockBoard, RecordingSink};

fn running() -> (SharedControl, RecordingSink) {
    let shared = SharedControl::new();
    let mut sink = RecordingSink::new();
    Polling::new(&shared).start(&mut sink).unwrap();
    (shared, sink)
}

#[test]
fn green_then_red_written_once_per_cycle() {
    let (shared, mut sink) = running();
    let mut hw = MockBoard::with(PinLevel::Reset, -15_000);

    cycle::drive_outputs(&shared, &mut hw, &mut sink).unwrap();
    assert_eq!(
        hw.calls,
        [
            BoardCall::ReadVelocity,
            BoardCall::WriteLed(Led::Green, PinLevel::Set),
            BoardCall::WriteLed(Led::Red, PinLevel::Reset),
        ]
    );
}

#[test]
fn scripted_sweep_follows_the_policy_table() {
    let (shared, mut sink) = running();
    let mut hw = MockBoard::with(PinLevel::Set, 0);
    hw.script_velocities(&[-30_000, -15_000, -14_999, -2_000, -1_999, 1_999, 2_000, 15_000]);

    cycle::sample_button(&shared, &mut hw).unwrap();
    for _ in 0..8 {
        cycle::drive_outputs(&shared, &mut hw, &mut sink).unwrap();
    }

    let seen: Vec<(RotationBand, bool, bool)> = sink
        .cycles()
        .iter()
        .map(|r| (r.band, r.outputs.green_on, r.outputs.red_on))
        .collect();
    assert_eq!(
        seen,
        [
            (RotationBand::CounterClockwiseFast, true, false),
            (RotationBand::CounterClockwiseFast, true, false),
            (RotationBand::CounterClockwiseSlow, true, false),
            (RotationBand::CounterClockwiseSlow, true, false),
            (RotationBand::NearlyZero, true, true),
            (RotationBand::NearlyZero, true, true),
            (RotationBand::ClockwiseSlow, true, true),
            (RotationBand::ClockwiseFast, true, true),
        ]
    );
}

#[test]
fn release_turns_red_off_and_green_follows_rotation() {
    let (shared, mut sink) = running();
    let mut hw = MockBoard::with(PinLevel::Set, 5_000);

    cycle::sample_button(&shared, &mut hw);
    cycle::drive_outputs(&shared, &mut hw, &mut sink);
    assert_eq!(hw.led(Led::Red), Some(PinLevel::Set));

    hw.button = PinLevel::Reset;
    cycle::sample_button(&shared, &mut hw);
    cycle::drive_outputs(&shared, &mut hw, &mut sink);
    assert_eq!(hw.led(Led::Green), Some(PinLevel::Reset));
    assert_eq!(hw.led(Led::Red), Some(PinLevel::Reset));

    hw.velocity = -5_000;
    cycle::drive_outputs(&shared, &mut hw, &mut sink);
    assert_eq!(hw.led(Led::Green), Some(PinLevel::Set));
}

#[test]
fn shared_state_mirrors_last_cycle() {
    let (shared, mut sink) = running();
    let mut hw = MockBoard::with(PinLevel::Set, -2_500);

    cycle::sample_button(&shared, &mut hw);
    let report = cycle::drive_outputs(&shared, &mut hw, &mut sink).unwrap();

    let snap = shared.snapshot();
    assert_eq!(snap.button, ButtonState::Pressed);
    assert_eq!(snap.raw_velocity, -2_500);
    assert_eq!(snap.band, Some(RotationBand::CounterClockwiseSlow));
    assert_eq!(snap.outputs, report.outputs);
    assert_eq!(snap.cycles, 1);
}

// ── Concurrent halt ───────────────────────────────────────────

static RACED: SharedControl = SharedControl::new();
static HALT_LANDED: AtomicBool = AtomicBool::new(false);

/// Fires a halt from another thread on the green write and records whether
/// it had landed by each LED write.
struct HaltingBoard {
    halted_at_write: Vec<(Led, bool)>,
    halter: Option<thread::JoinHandle<()>>,
}

impl RotationSensor for HaltingBoard {
    fn read_velocity(&mut self) -> RotationSample {
        0
    }
}

impl IndicatorOutput for HaltingBoard {
    fn write_led(&mut self, led: Led, _level: PinLevel) {
        self.halted_at_write
            .push((led, HALT_LANDED.load(Ordering::SeqCst)));
        if led == Led::Green {
            self.halter = Some(thread::spawn(|| {
                RACED.halt(Fatal::Creation(CreationFault::Timer));
                HALT_LANDED.store(true, Ordering::SeqCst);
            }));
            thread::sleep(Duration::from_millis(20));
        }
    }
}

#[test]
fn halt_cannot_land_between_the_led_writes() {
    let mut sink = RecordingSink::new();
    Polling::new(&RACED).start(&mut sink).unwrap();
    let mut hw = HaltingBoard {
        halted_at_write: Vec::new(),
        halter: None,
    };

    assert!(cycle::drive_outputs(&RACED, &mut hw, &mut sink).is_some());
    hw.halter.take().unwrap().join().unwrap();

    assert_eq!(hw.halted_at_write, [(Led::Green, false), (Led::Red, false)]);
    assert_eq!(
        RACED.run_state(),
        RunState::Halted(Fatal::Creation(CreationFault::Timer))
    );
    assert_eq!(cycle::drive_outputs(&RACED, &mut hw, &mut sink), None);
}

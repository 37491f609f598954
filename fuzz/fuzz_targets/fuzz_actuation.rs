//! Fuzz target: polling actuation cycle
//!
//! Treats the input as a stream of 5-byte records (button bit + i32 gyro
//! sample) and drives each through a running polling strategy.  Every cycle
//! must write exactly the LED levels `decide(button, classify(sample))`
//! predicts, and red must never be lit while green is dark.
//!
//! cargo fuzz run fuzz_actuation

#![no_main]

use gyroled::app::ports::{ButtonInput, EventSink, IndicatorOutput, Led, PinLevel, RotationSensor};
use gyroled::app::events::AppEvent;
use gyroled::app::state::SharedControl;
use gyroled::control::policy::{ButtonState, decide};
use gyroled::scheduler::{ExecutionStrategy, Polling};
use gyroled::sensors::rotation::classify;
use libfuzzer_sys::fuzz_target;

struct Board {
    button: PinLevel,
    velocity: i32,
    green: Option<PinLevel>,
    red: Option<PinLevel>,
}

impl ButtonInput for Board {
    fn read_button(&mut self) -> PinLevel {
        self.button
    }
}

impl RotationSensor for Board {
    fn read_velocity(&mut self) -> i32 {
        self.velocity
    }
}

impl IndicatorOutput for Board {
    fn write_led(&mut self, led: Led, level: PinLevel) {
        match led {
            Led::Green => self.green = Some(level),
            Led::Red => self.red = Some(level),
        }
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let shared = SharedControl::new();
    let mut strategy = Polling::new(&shared);
    let mut sink = Discard;
    if strategy.start(&mut sink).is_err() {
        return;
    }

    for record in data.chunks_exact(5) {
        let mut board = Board {
            button: PinLevel::from_bool(record[0] & 1 == 1),
            velocity: i32::from_le_bytes([record[1], record[2], record[3], record[4]]),
            green: None,
            red: None,
        };
        let outcome = strategy.on_tick(&mut board, &mut sink);
        assert!(outcome.is_ok(), "polling never halts");

        let expected = decide(ButtonState::from(board.button), classify(board.velocity));
        assert_eq!(board.green, Some(expected.green_level()));
        assert_eq!(board.red, Some(expected.red_level()));
        assert!(!(expected.red_on && !expected.green_on));
    }
});

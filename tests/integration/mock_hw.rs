//! Mock board and RTOS adapters for integration tests.
//!
//! Every board and scheduler call is recorded so tests can assert on the
//! full history without touching real GPIO, SPI or RTOS primitives.

use std::collections::VecDeque;

use gyroled::app::events::{AppEvent, CycleReport};
use gyroled::app::ports::{
    ButtonInput, EventSink, IndicatorOutput, InterruptLine, Led, OsStatus, PinLevel,
    RotationSensor, TaskDelay, TaskHandle, TaskSpawner, TaskSpec, ThreadStatus, TimerHandle,
    TimerService, TimerSpec,
};
use gyroled::error::Fatal;
use gyroled::sensors::rotation::RotationSample;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    ReadButton,
    ReadVelocity,
    WriteLed(Led, PinLevel),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Scripted button and gyro.  When a script runs dry the last value repeats.
pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    pub button: PinLevel,
    pub velocity: RotationSample,
    velocity_script: VecDeque<RotationSample>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            button: PinLevel::Reset,
            velocity: 0,
            velocity_script: VecDeque::new(),
        }
    }

    pub fn with(button: PinLevel, velocity: RotationSample) -> Self {
        Self {
            button,
            velocity,
            ..Self::new()
        }
    }

    pub fn script_velocities(&mut self, samples: &[RotationSample]) {
        self.velocity_script.extend(samples.iter().copied());
    }

    pub fn touched(&self) -> bool {
        !self.calls.is_empty()
    }

    pub fn led_writes(&self) -> Vec<(Led, PinLevel)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::WriteLed(led, level) => Some((*led, *level)),
                _ => None,
            })
            .collect()
    }

    /// Latest level written to `led`, if any.
    pub fn led(&self, led: Led) -> Option<PinLevel> {
        self.led_writes()
            .into_iter()
            .rev()
            .find_map(|(l, level)| (l == led).then_some(level))
    }

    pub fn count(&self, call: fn(&BoardCall) -> bool) -> usize {
        self.calls.iter().filter(|c| call(c)).count()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonInput for MockBoard {
    fn read_button(&mut self) -> PinLevel {
        self.calls.push(BoardCall::ReadButton);
        self.button
    }
}

impl RotationSensor for MockBoard {
    fn read_velocity(&mut self) -> RotationSample {
        self.calls.push(BoardCall::ReadVelocity);
        if let Some(next) = self.velocity_script.pop_front() {
            self.velocity = next;
        }
        self.velocity
    }
}

impl IndicatorOutput for MockBoard {
    fn write_led(&mut self, led: Led, level: PinLevel) {
        self.calls.push(BoardCall::WriteLed(led, level));
    }
}

// ── Interrupt line ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCall {
    Enable,
    Disable,
    ClearPending,
}

#[derive(Default)]
pub struct MockLine {
    pub calls: Vec<LineCall>,
}

impl InterruptLine for MockLine {
    fn enable(&mut self) {
        self.calls.push(LineCall::Enable);
    }

    fn disable(&mut self) {
        self.calls.push(LineCall::Disable);
    }

    fn clear_pending(&mut self) {
        self.calls.push(LineCall::ClearPending);
    }
}

// ── Task spawner / delay ──────────────────────────────────────

/// Hands out `handle` on create and reports `state` afterwards.
pub struct MockSpawner {
    pub handle: Option<TaskHandle>,
    pub state: ThreadStatus,
    pub created: Vec<TaskSpec>,
}

#[allow(dead_code)]
impl MockSpawner {
    pub fn ok() -> Self {
        Self {
            handle: Some(TaskHandle(1)),
            state: ThreadStatus::Running,
            created: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            handle: None,
            ..Self::ok()
        }
    }
}

impl TaskSpawner for MockSpawner {
    fn create_task(&mut self, spec: &TaskSpec) -> Option<TaskHandle> {
        self.created.push(*spec);
        self.handle
    }

    fn task_state(&self, _handle: TaskHandle) -> ThreadStatus {
        self.state
    }
}

/// Returns scripted statuses, then `Ok` forever.
#[derive(Default)]
pub struct MockDelay {
    pub script: VecDeque<OsStatus>,
    pub suspended: Vec<u32>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn scripted(statuses: &[OsStatus]) -> Self {
        Self {
            script: statuses.iter().copied().collect(),
            suspended: Vec::new(),
        }
    }
}

impl TaskDelay for MockDelay {
    fn suspend(&mut self, duration_ms: u32) -> OsStatus {
        self.suspended.push(duration_ms);
        self.script.pop_front().unwrap_or(OsStatus::Ok)
    }
}

// ── Timers ────────────────────────────────────────────────────

pub struct MockTimers {
    pub handle: Option<TimerHandle>,
    pub start_status: OsStatus,
    pub created: Vec<TimerSpec>,
    pub started: Vec<(TimerHandle, u32)>,
}

#[allow(dead_code)]
impl MockTimers {
    pub fn ok() -> Self {
        Self {
            handle: Some(TimerHandle(0)),
            start_status: OsStatus::Ok,
            created: Vec::new(),
            started: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            handle: None,
            ..Self::ok()
        }
    }

    pub fn start_returns(status: OsStatus) -> Self {
        Self {
            start_status: status,
            ..Self::ok()
        }
    }
}

impl TimerService for MockTimers {
    fn create_periodic(&mut self, spec: &TimerSpec) -> Option<TimerHandle> {
        self.created.push(*spec);
        self.handle
    }

    fn start(&mut self, handle: TimerHandle, period_ms: u32) -> OsStatus {
        self.started.push((handle, period_ms));
        self.start_status
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycles(&self) -> Vec<CycleReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Cycle(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn halts(&self) -> Vec<Fatal> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Halted(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    pub fn started(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Started(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

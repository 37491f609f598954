//! Execution strategies.
//!
//! One strategy decides *when* the actuation cycle runs.  All four share the
//! run-state machine held in [`SharedControl`]:
//!
//! ```text
//!   Uninitialized ──start()──▶ Running ──fatal──▶ Halted (terminal)
//!         │                                          ▲
//!         └────────────── creation fault ────────────┘
//! ```
//!
//! | Strategy           | Start                      | Tick                                  |
//! |--------------------|----------------------------|---------------------------------------|
//! | [`Polling`]        | mark running               | sample button, actuate                |
//! | [`InterruptDriven`]| enable button IRQ          | count; actuate every N ticks          |
//! | [`TimerDriven`]    | create + start timer       | timer callback: sample, actuate       |
//! | [`TaskDriven`]     | create task                | sample, actuate, suspend, validate    |
//!
//! The strategy is fixed at build time through the `mode-*` Cargo features;
//! [`StrategyKind::SELECTED`] exposes the choice as a constant.

pub mod interrupt;
pub mod polling;
pub mod task;
pub mod timer;

pub use interrupt::InterruptDriven;
pub use polling::Polling;
pub use task::TaskDriven;
pub use timer::TimerDriven;

use crate::app::events::{AppEvent, CycleReport};
use crate::app::ports::{Board, EventSink};
use crate::app::state::{RunState, SharedControl};
use crate::error::Result;

/// Which strategy a build runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StrategyKind {
    Polling = 0,
    InterruptDriven = 1,
    TimerDriven = 2,
    TaskDriven = 3,
}

impl StrategyKind {
    /// The strategy compiled into this build.
    pub const SELECTED: Self = if cfg!(feature = "mode-polling") {
        Self::Polling
    } else if cfg!(feature = "mode-interrupt") {
        Self::InterruptDriven
    } else if cfg!(feature = "mode-timer") {
        Self::TimerDriven
    } else {
        Self::TaskDriven
    };

    pub fn name(self) -> &'static str {
        match self {
            Self::Polling => "POLLING",
            Self::InterruptDriven => "INTERRUPT",
            Self::TimerDriven => "TIMER",
            Self::TaskDriven => "TASK",
        }
    }
}

impl core::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick ran but no actuation cycle was due (or the system has not
    /// started yet).
    Idle,
    /// An actuation cycle ran.
    Actuated(CycleReport),
}

impl TickOutcome {
    pub fn report(self) -> Option<CycleReport> {
        match self {
            Self::Idle => None,
            Self::Actuated(report) => Some(report),
        }
    }
}

impl From<Option<CycleReport>> for TickOutcome {
    fn from(report: Option<CycleReport>) -> Self {
        report.map_or(Self::Idle, Self::Actuated)
    }
}

/// The `{start, on_tick}` capability every strategy provides.
pub trait ExecutionStrategy {
    fn kind(&self) -> StrategyKind;

    fn shared(&self) -> &SharedControl;

    /// Bring the strategy up.  On success the system is `Running`; on a
    /// creation or start fault it is `Halted` and the fault is returned.
    fn start(&mut self, sink: &mut impl EventSink) -> Result<()>;

    /// Drive one tick of the strategy's own cadence.  Once halted, every
    /// tick returns the recorded fault without touching the board.
    fn on_tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<TickOutcome>;

    fn run_state(&self) -> RunState {
        self.shared().run_state()
    }
}

/// Fail fast on a halted system.
pub(crate) fn ensure_not_halted(shared: &SharedControl) -> Result<()> {
    match shared.run_state() {
        RunState::Halted(fatal) => Err(fatal),
        RunState::Uninitialized | RunState::Running => Ok(()),
    }
}

/// Shared tail of every successful `start`.
pub(crate) fn enter_running(
    shared: &SharedControl,
    kind: StrategyKind,
    sink: &mut impl EventSink,
) -> Result<()> {
    let was_running = shared.run_state().is_running();
    shared.mark_running()?;
    if !was_running {
        log::info!("{kind} strategy running");
        sink.emit(&AppEvent::Started(kind));
    }
    Ok(())
}

//! Edge/tick interrupt-driven strategy.
//!
//! Two entry points, two contexts:
//!
//! - [`on_button_edge`] runs in the button's edge ISR.  It masks its own
//!   line, latches a button sample, clears the pending flag and unmasks the
//!   line.  It takes no lock and does not log.
//! - [`InterruptDriven::on_tick`] runs from a fixed-rate tick.  Every
//!   `actuation_tick_divisor` ticks (100 by default) it runs the actuation
//!   cycle, which folds in the latched sample, and resets the counter.
//!
//! There is no health signal in this mode; correctness relies on the tick
//! arriving at its nominal rate.

use super::{ExecutionStrategy, StrategyKind, TickOutcome, ensure_not_halted, enter_running};
use crate::app::cycle;
use crate::app::ports::{Board, ButtonInput, EventSink, InterruptLine};
use crate::app::state::SharedControl;
use crate::config::SystemConfig;
use crate::control::policy::ButtonState;
use crate::error::Result;

/// Button edge handler body.
///
/// The line stays masked for the whole sample, so at most one sample is in
/// flight.  Lock-free: safe to call while a task holds the state lock.
pub fn on_button_edge(
    shared: &SharedControl,
    line: &mut impl InterruptLine,
    button: &mut impl ButtonInput,
) -> Option<ButtonState> {
    line.disable();
    let sampled = cycle::latch_button(shared, button);
    line.clear_pending();
    line.enable();
    sampled
}

pub struct InterruptDriven<'a, L> {
    shared: &'a SharedControl,
    line: L,
    divisor: u32,
    ticks: u32,
}

impl<'a, L: InterruptLine> InterruptDriven<'a, L> {
    pub fn new(shared: &'a SharedControl, config: &SystemConfig, line: L) -> Self {
        Self {
            shared,
            line,
            divisor: config.actuation_tick_divisor.max(1),
            ticks: 0,
        }
    }

    /// Ticks counted since the last actuation.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn on_button_edge(&mut self, button: &mut impl ButtonInput) -> Option<ButtonState> {
        on_button_edge(self.shared, &mut self.line, button)
    }

    /// Count one tick.  Returns `true` when an actuation is due, in which
    /// case the counter has already been reset.
    fn advance(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.divisor {
            self.ticks = 0;
            true
        } else {
            false
        }
    }
}

impl<L: InterruptLine> ExecutionStrategy for InterruptDriven<'_, L> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::InterruptDriven
    }

    fn shared(&self) -> &SharedControl {
        self.shared
    }

    fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        ensure_not_halted(self.shared)?;
        enter_running(self.shared, StrategyKind::InterruptDriven, sink)?;
        // Unmask last: the first edge must already see `Running`.
        self.line.clear_pending();
        self.line.enable();
        Ok(())
    }

    fn on_tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<TickOutcome> {
        ensure_not_halted(self.shared)?;
        if !self.shared.run_state().is_running() || !self.advance() {
            return Ok(TickOutcome::Idle);
        }
        Ok(cycle::drive_outputs(self.shared, hw, sink).into())
    }
}

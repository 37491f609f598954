//! Cooperative polling.
//!
//! No timing source of its own: the enclosing control loop calls
//! [`Polling::sample`] and [`Polling::drive`] (or [`ExecutionStrategy::on_tick`],
//! which does both) as often as it likes.  There is no scheduler health to
//! validate, so a polling system never halts on its own.

use super::{ExecutionStrategy, StrategyKind, TickOutcome, ensure_not_halted, enter_running};
use crate::app::cycle;
use crate::app::events::CycleReport;
use crate::app::ports::{Board, ButtonInput, EventSink, IndicatorOutput, RotationSensor};
use crate::app::state::SharedControl;
use crate::control::policy::ButtonState;
use crate::error::Result;

pub struct Polling<'a> {
    shared: &'a SharedControl,
}

impl<'a> Polling<'a> {
    pub fn new(shared: &'a SharedControl) -> Self {
        Self { shared }
    }

    /// Re-sample the button.
    pub fn sample(&mut self, hw: &mut impl ButtonInput) -> Option<ButtonState> {
        cycle::sample_button(self.shared, hw)
    }

    /// Re-sample the rotation sensor and actuate.
    pub fn drive(
        &mut self,
        hw: &mut (impl RotationSensor + IndicatorOutput),
        sink: &mut impl EventSink,
    ) -> Option<CycleReport> {
        cycle::drive_outputs(self.shared, hw, sink)
    }
}

impl ExecutionStrategy for Polling<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Polling
    }

    fn shared(&self) -> &SharedControl {
        self.shared
    }

    fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        enter_running(self.shared, StrategyKind::Polling, sink)
    }

    fn on_tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<TickOutcome> {
        ensure_not_halted(self.shared)?;
        self.sample(hw);
        Ok(self.drive(hw, sink).into())
    }
}

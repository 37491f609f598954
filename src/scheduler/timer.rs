//! Periodic software-timer strategy.
//!
//! `start` creates one periodic timer and arms it.  A missing handle halts
//! the system before it ever runs; a non-OK start status is validated once
//! and halts it too.  The timer callback ([`on_expiry`]) samples the button
//! and runs the actuation cycle.

use log::info;

use super::{ExecutionStrategy, StrategyKind, TickOutcome, ensure_not_halted, enter_running};
use crate::app::cycle;
use crate::app::ports::{Board, EventSink, TimerHandle, TimerService};
use crate::app::state::SharedControl;
use crate::config::SystemConfig;
use crate::error::Result;
use crate::safety::{FaultValidator, SchedulerHealth};

/// Timer callback body.
pub fn on_expiry(
    shared: &SharedControl,
    hw: &mut impl Board,
    sink: &mut impl EventSink,
) -> Result<TickOutcome> {
    ensure_not_halted(shared)?;
    cycle::sample_button(shared, hw);
    Ok(cycle::drive_outputs(shared, hw, sink).into())
}

pub struct TimerDriven<'a, T> {
    shared: &'a SharedControl,
    config: SystemConfig,
    timers: T,
    handle: Option<TimerHandle>,
}

impl<'a, T: TimerService> TimerDriven<'a, T> {
    pub fn new(shared: &'a SharedControl, config: &SystemConfig, timers: T) -> Self {
        Self {
            shared,
            config: *config,
            timers,
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    /// Give back the timer service (the timers it owns keep running).
    pub fn into_timers(self) -> T {
        self.timers
    }
}

impl<T: TimerService> ExecutionStrategy for TimerDriven<'_, T> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TimerDriven
    }

    fn shared(&self) -> &SharedControl {
        self.shared
    }

    fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        ensure_not_halted(self.shared)?;
        if self.handle.is_some() {
            return Ok(());
        }

        let spec = self.config.timer_spec();
        let handle = match self.timers.create_periodic(&spec) {
            Some(handle) => handle,
            None => {
                return FaultValidator::enforce(
                    self.shared,
                    SchedulerHealth::TimerCreated(None),
                    sink,
                );
            }
        };
        self.handle = Some(handle);

        let status = self.timers.start(handle, spec.period_ms);
        FaultValidator::enforce(self.shared, SchedulerHealth::TimerStarted(status), sink)?;

        info!("{} armed, period {} ms", spec.name, spec.period_ms);
        enter_running(self.shared, StrategyKind::TimerDriven, sink)
    }

    fn on_tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<TickOutcome> {
        on_expiry(self.shared, hw, sink)
    }
}

//! Dedicated scheduled-task strategy.
//!
//! `start` asks the RTOS for one long-lived task.  No handle means the system
//! halts right there.  The task body ([`run_app_task`]) loops forever:
//!
//! ```text
//!   ┌──▶ sample button ──▶ actuate ──▶ suspend(task_delay_ms) ──▶ validate ──┐
//!   └──────────────────────────────── Ok ────────────────────────────────────┘
//!                                      │ not Ok
//!                                      ▼
//!                                   Halted
//! ```
//!
//! The suspend is the only blocking point.  A non-OK suspend status halts the
//! system before another iteration begins.

use log::info;

use super::{ExecutionStrategy, StrategyKind, TickOutcome, ensure_not_halted, enter_running};
use crate::app::cycle;
use crate::app::ports::{Board, EventSink, TaskDelay, TaskHandle, TaskSpawner};
use crate::app::state::SharedControl;
use crate::config::SystemConfig;
use crate::error::{Fatal, Result};
use crate::safety::{FaultValidator, SchedulerHealth};

/// One pass of the task loop.
///
/// Actuation is skipped (but the suspend still happens) while the creating
/// context has not yet marked the system running, which covers a task that
/// is scheduled before `create_task` returns.
pub fn task_iteration(
    shared: &SharedControl,
    config: &SystemConfig,
    hw: &mut impl Board,
    delay: &mut impl TaskDelay,
    sink: &mut impl EventSink,
) -> Result<TickOutcome> {
    ensure_not_halted(shared)?;
    cycle::sample_button(shared, hw);
    let outcome = cycle::drive_outputs(shared, hw, sink).into();

    let status = delay.suspend(config.task_delay_ms);
    FaultValidator::enforce(shared, SchedulerHealth::Suspended(status), sink)?;
    Ok(outcome)
}

/// Task entry body.  Returns only once the system has halted.
pub fn run_app_task(
    shared: &SharedControl,
    config: &SystemConfig,
    hw: &mut impl Board,
    delay: &mut impl TaskDelay,
    sink: &mut impl EventSink,
) -> Fatal {
    loop {
        if let Err(fatal) = task_iteration(shared, config, hw, delay, sink) {
            return fatal;
        }
    }
}

pub struct TaskDriven<'a, S, D> {
    shared: &'a SharedControl,
    config: SystemConfig,
    spawner: S,
    delay: D,
    handle: Option<TaskHandle>,
}

impl<'a, S: TaskSpawner, D: TaskDelay> TaskDriven<'a, S, D> {
    pub fn new(shared: &'a SharedControl, config: &SystemConfig, spawner: S, delay: D) -> Self {
        Self {
            shared,
            config: *config,
            spawner,
            delay,
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// Poll the task's thread state.  `Terminated` or `Error` halts.
    pub fn check_liveness(&mut self, sink: &mut impl EventSink) -> Result<()> {
        ensure_not_halted(self.shared)?;
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let state = self.spawner.task_state(handle);
        FaultValidator::enforce(self.shared, SchedulerHealth::TaskState(state), sink)
    }

    /// Run the task loop in the calling context until the system halts.
    pub fn run(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Fatal {
        run_app_task(self.shared, &self.config, hw, &mut self.delay, sink)
    }
}

impl<S: TaskSpawner, D: TaskDelay> ExecutionStrategy for TaskDriven<'_, S, D> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TaskDriven
    }

    fn shared(&self) -> &SharedControl {
        self.shared
    }

    fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        ensure_not_halted(self.shared)?;
        if self.handle.is_some() {
            return Ok(());
        }

        let spec = self.config.task_spec();
        let handle = self.spawner.create_task(&spec);
        FaultValidator::enforce(self.shared, SchedulerHealth::TaskCreated(handle), sink)?;
        self.handle = handle;

        info!(
            "{} created ({:?} priority, {} B stack)",
            spec.name, spec.priority, spec.stack_bytes
        );
        enter_running(self.shared, StrategyKind::TaskDriven, sink)
    }

    fn on_tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<TickOutcome> {
        task_iteration(self.shared, &self.config, hw, &mut self.delay, sink)
    }
}

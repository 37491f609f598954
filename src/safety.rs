//! Fault validator.
//!
//! Every health signal a strategy produces goes through
//! [`FaultValidator::validate`].  The policy is fail-stop: exactly one
//! outcome per signal is healthy, everything else is fatal.
//!
//! | Signal                  | Healthy                                    |
//! |-------------------------|--------------------------------------------|
//! | task / timer creation   | a handle was returned                      |
//! | timer start             | `OsStatus::Ok`                             |
//! | task suspend            | `OsStatus::Ok`                             |
//! | task liveness           | anything but `Terminated` / `Error`        |
//!
//! ## Fault lifecycle
//!
//! 1. A strategy observes a health signal (after a create, a start or a
//!    suspend, or on a liveness poll).
//! 2. [`FaultValidator::enforce`] validates it.  On a fatal outcome the
//!    shared run state moves to `Halted` and an `AppEvent::Halted` is emitted.
//! 3. `Halted` is terminal: the actuation cycle refuses to run and the
//!    firmware parks the context until an external reset.

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, OsStatus, TaskHandle, ThreadStatus, TimerHandle};
use crate::app::state::SharedControl;
use crate::error::{CreationFault, Fatal, Result, RuntimeFault};

/// A scheduler health signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerHealth {
    TaskCreated(Option<TaskHandle>),
    TimerCreated(Option<TimerHandle>),
    TimerStarted(OsStatus),
    Suspended(OsStatus),
    TaskState(ThreadStatus),
}

pub struct FaultValidator;

impl FaultValidator {
    /// Classify a health signal.  Pure.
    pub fn validate(health: SchedulerHealth) -> Result<()> {
        match health {
            SchedulerHealth::TaskCreated(Some(_)) | SchedulerHealth::TimerCreated(Some(_)) => {
                Ok(())
            }
            SchedulerHealth::TaskCreated(None) => Err(CreationFault::Task.into()),
            SchedulerHealth::TimerCreated(None) => Err(CreationFault::Timer.into()),
            SchedulerHealth::TimerStarted(status) => {
                check_status(status, RuntimeFault::TimerStart)
            }
            SchedulerHealth::Suspended(status) => check_status(status, RuntimeFault::Suspend),
            SchedulerHealth::TaskState(
                state @ (ThreadStatus::Terminated | ThreadStatus::Error),
            ) => Err(RuntimeFault::TaskState(state).into()),
            SchedulerHealth::TaskState(_) => Ok(()),
        }
    }

    /// Validate and, on a fatal outcome, halt the system.
    ///
    /// Returns the fault that is now recorded in the run state, which is the
    /// earlier one if the system was already halted.
    pub fn enforce(
        shared: &SharedControl,
        health: SchedulerHealth,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        Self::validate(health).map_err(|fatal| halt(shared, fatal, sink))
    }
}

fn check_status(status: OsStatus, fault: fn(OsStatus) -> RuntimeFault) -> Result<()> {
    if status.is_ok() {
        Ok(())
    } else {
        Err(fault(status).into())
    }
}

/// Move the system into `Halted` and announce it.
///
/// Only the first fault is announced; later calls return the recorded fault
/// without emitting again.
pub fn halt(shared: &SharedControl, fatal: Fatal, sink: &mut impl EventSink) -> Fatal {
    match shared.halt(fatal) {
        Some(earlier) => earlier,
        None => {
            sink.emit(&AppEvent::Halted(fatal));
            fatal
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

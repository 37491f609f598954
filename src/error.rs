//! Fatal fault types.
//!
//! The firmware has no recoverable-error category at the domain level: every
//! fault the scheduler can observe halts the system.  Faults split into two
//! kinds depending on when they are detected.  Both are `Copy` so they can sit
//! inside the critical-section-guarded run state.

use core::fmt;

use crate::app::ports::{OsStatus, ThreadStatus};

// ---------------------------------------------------------------------------
// Top-level fault
// ---------------------------------------------------------------------------

/// A fault that moves the system into `Halted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// A scheduled unit of work could not be created.
    Creation(CreationFault),
    /// A status check after start-up did not report success.
    Runtime(RuntimeFault),
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation(e) => write!(f, "creation: {e}"),
            Self::Runtime(e) => write!(f, "runtime: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Creation faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationFault {
    /// The RTOS returned no handle for the application task.
    Task,
    /// The RTOS returned no handle for the application timer.
    Timer,
}

impl fmt::Display for CreationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task not created"),
            Self::Timer => write!(f, "timer not created"),
        }
    }
}

impl From<CreationFault> for Fatal {
    fn from(e: CreationFault) -> Self {
        Self::Creation(e)
    }
}

// ---------------------------------------------------------------------------
// Runtime faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFault {
    /// Arming the periodic timer failed.
    TimerStart(OsStatus),
    /// The task's periodic suspend returned an error.
    Suspend(OsStatus),
    /// The task reported itself terminated or in error.
    TaskState(ThreadStatus),
}

impl fmt::Display for RuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerStart(s) => write!(f, "timer start returned {s}"),
            Self::Suspend(s) => write!(f, "task suspend returned {s}"),
            Self::TaskState(s) => write!(f, "task is {s}"),
        }
    }
}

impl From<RuntimeFault> for Fatal {
    fn from(e: RuntimeFault) -> Self {
        Self::Runtime(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Fatal>;

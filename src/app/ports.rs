//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ scheduler strategies / actuation cycle
//! ```
//!
//! Board adapters (button, gyro, LEDs), RTOS adapters (tasks, timers,
//! interrupt lines) and event sinks implement these traits.  The domain
//! consumes them via generics, so nothing above this line touches a
//! register or an RTOS call directly.
//!
//! Every board-side operation is infallible from the domain's point of
//! view: adapters absorb bus errors.  RTOS-side operations report a
//! handle-or-nothing or an [`OsStatus`], which the
//! [`FaultValidator`](crate::safety::FaultValidator) inspects.

use serde::{Deserialize, Serialize};

use crate::sensors::rotation::RotationSample;

// ───────────────────────────────────────────────────────────────
// Digital levels and output channels
// ───────────────────────────────────────────────────────────────

/// Logic level of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Set,
    Reset,
}

impl PinLevel {
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::Set } else { Self::Reset }
    }

    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }
}

/// The two indicator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Green,
    Red,
}

// ───────────────────────────────────────────────────────────────
// Board ports (driven adapters: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the user button.
pub trait ButtonInput {
    /// Current level of the button pin. Synchronous, non-blocking.
    fn read_button(&mut self) -> PinLevel;
}

/// Read-side port for the angular-rate sensor.
pub trait RotationSensor {
    /// Instantaneous rotation rate in raw sensor counts.
    fn read_velocity(&mut self) -> RotationSample;
}

/// Write-side port for the indicator LEDs.
pub trait IndicatorOutput {
    /// Drive one LED. Writing the same level twice is harmless.
    fn write_led(&mut self, led: Led, level: PinLevel);
}

/// Everything one actuation cycle touches.
pub trait Board: ButtonInput + RotationSensor + IndicatorOutput {}

impl<T: ButtonInput + RotationSensor + IndicatorOutput> Board for T {}

// ───────────────────────────────────────────────────────────────
// Interrupt line port
// ───────────────────────────────────────────────────────────────

/// Control over the button's edge interrupt.
pub trait InterruptLine {
    fn enable(&mut self);
    fn disable(&mut self);
    fn clear_pending(&mut self);
}

// ───────────────────────────────────────────────────────────────
// RTOS ports
// ───────────────────────────────────────────────────────────────

/// Status code returned by RTOS calls. Only [`OsStatus::Ok`] is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsStatus {
    Ok,
    Error,
    ErrorTimeout,
    ErrorResource,
    ErrorParameter,
    ErrorNoMemory,
    ErrorIsr,
    /// Any code outside the known set.
    Other(i32),
}

impl OsStatus {
    /// Decode a CMSIS-RTOS2 style status code.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            -1 => Self::Error,
            -2 => Self::ErrorTimeout,
            -3 => Self::ErrorResource,
            -4 => Self::ErrorParameter,
            -5 => Self::ErrorNoMemory,
            -6 => Self::ErrorIsr,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Error => -1,
            Self::ErrorTimeout => -2,
            Self::ErrorResource => -3,
            Self::ErrorParameter => -4,
            Self::ErrorNoMemory => -5,
            Self::ErrorIsr => -6,
            Self::Other(code) => code,
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl core::fmt::Display for OsStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
            Self::ErrorTimeout => write!(f, "timeout"),
            Self::ErrorResource => write!(f, "resource unavailable"),
            Self::ErrorParameter => write!(f, "bad parameter"),
            Self::ErrorNoMemory => write!(f, "out of memory"),
            Self::ErrorIsr => write!(f, "not allowed from ISR"),
            Self::Other(code) => write!(f, "status {code}"),
        }
    }
}

/// Scheduler's view of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadStatus {
    Inactive,
    Ready,
    Running,
    Blocked,
    Terminated,
    Error,
}

impl core::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Inactive => "inactive",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Terminated => "terminated",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Task priority, mapped onto native levels by the RTOS adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    BelowNormal,
    Normal,
    AboveNormal,
    High,
}

/// Opaque handle to a created task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(pub u32);

/// Opaque handle to a created timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(pub u32);

/// Attributes of the scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub priority: TaskPriority,
    pub stack_bytes: u32,
}

/// Attributes of the periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub name: &'static str,
    pub period_ms: u32,
}

/// Creates the scheduled task and reports on its liveness.
///
/// The task body is bound by the adapter when it is constructed; `create_task`
/// only launches it.  `None` means the RTOS refused to create the task.
pub trait TaskSpawner {
    fn create_task(&mut self, spec: &TaskSpec) -> Option<TaskHandle>;

    fn task_state(&self, handle: TaskHandle) -> ThreadStatus;
}

/// Suspends the calling task.
pub trait TaskDelay {
    fn suspend(&mut self, duration_ms: u32) -> OsStatus;
}

/// Creates and arms the periodic timer.
///
/// As with [`TaskSpawner`], the callback is bound at adapter construction.
pub trait TimerService {
    fn create_periodic(&mut self, spec: &TimerSpec) -> Option<TimerHandle>;

    fn start(&mut self, handle: TimerHandle, period_ms: u32) -> OsStatus;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! System configuration parameters
//!
//! Fixed timing parameters for the execution strategies.  These are build-time
//! values: nothing loads or persists them.  Rotation thresholds and the LED
//! policy are constants in their own modules and are not configurable.

use serde::{Deserialize, Serialize};

use crate::app::ports::{TaskPriority, TaskSpec, TimerSpec};

/// Name given to the scheduled application task.
pub const APP_TASK_NAME: &str = "appTask";

/// Name given to the periodic application timer.
pub const APP_TIMER_NAME: &str = "appTimer";

/// Core system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Interrupt-driven ---
    /// Period of the tick source feeding the interrupt-driven strategy (ms)
    pub tick_period_ms: u32,
    /// Ticks between actuation cycles
    pub actuation_tick_divisor: u32,

    // --- Timer-driven ---
    /// Periodic timer period (ms)
    pub timer_period_ms: u32,

    // --- Task-driven ---
    /// Suspend duration at the end of each task iteration (ms)
    pub task_delay_ms: u32,
    /// Requested task stack (bytes)
    pub task_stack_bytes: u32,
    /// Requested task priority
    pub task_priority: TaskPriority,
}

impl SystemConfig {
    pub const fn new() -> Self {
        Self {
            tick_period_ms: 1,           // 1 kHz tick
            actuation_tick_divisor: 100, // actuate every 100 ticks
            timer_period_ms: 100,
            task_delay_ms: 100,
            task_stack_bytes: 400, // 100 words
            task_priority: TaskPriority::Normal,
        }
    }

    pub const fn task_spec(&self) -> TaskSpec {
        TaskSpec {
            name: APP_TASK_NAME,
            priority: self.task_priority,
            stack_bytes: self.task_stack_bytes,
        }
    }

    pub const fn timer_spec(&self) -> TimerSpec {
        TimerSpec {
            name: APP_TIMER_NAME,
            period_ms: self.timer_period_ms,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! RTOS adapters — tasks, delays, periodic timers and the button interrupt.
//!
//! | Adapter             | Implements      | ESP-IDF                            | Host                     |
//! |---------------------|-----------------|------------------------------------|--------------------------|
//! | [`ThreadSpawner`]   | TaskSpawner     | `esp_pthread_set_cfg` + std thread | std thread               |
//! | [`ThreadDelay`]     | TaskDelay       | `FreeRtos::delay_ms`               | `thread::sleep`          |
//! | [`PeriodicTimers`]  | TimerService    | `EspTaskTimerService`              | sleeper thread           |
//! | [`GpioIrqLine`]     | InterruptLine   | `gpio_intr_enable/disable`         | flag only                |
//! | [`RawButton`]       | ButtonInput     | `gpio_get_level` (ISR-safe)        | always released          |
//!
//! # ESP-IDF threading model
//!
//! `std::thread` is backed by pthreads, which are FreeRTOS tasks.
//! `esp_pthread_set_cfg()` sets thread-local configuration for the *next*
//! `pthread_create()` from the calling thread, so the config→spawn pair must
//! not be interleaved with other thread creation on the same thread.
//!
//! The task body and timer callback are bound when the adapter is built;
//! `create_task` / `create_periodic` consume them.  A second create therefore
//! fails the same way an exhausted RTOS would: with no handle.

use std::thread::JoinHandle;

use log::{info, warn};

use crate::app::ports::{
    ButtonInput, InterruptLine, OsStatus, PinLevel, TaskDelay, TaskHandle, TaskPriority,
    TaskSpawner, TaskSpec, ThreadStatus, TimerHandle, TimerService, TimerSpec,
};

#[cfg(target_os = "espidf")]
use esp_idf_sys as sys;

/// Body of the scheduled task.
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

/// Body of a periodic timer.
pub type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// Smallest stack handed to the platform.  Requests below this are raised:
/// Rust std + `log` formatting need more than a bare RTOS task does.
#[cfg(target_os = "espidf")]
pub const MIN_STACK_BYTES: usize = 4096;
#[cfg(not(target_os = "espidf"))]
pub const MIN_STACK_BYTES: usize = 64 * 1024;

/// One callback is bound per service, so one slot is all it can fill.
const MAX_TIMERS: usize = 1;

/// FreeRTOS priority level for a [`TaskPriority`] (ESP-IDF: 0..=24,
/// pthread default 5).
pub const fn native_priority(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Low => 2,
        TaskPriority::BelowNormal => 4,
        TaskPriority::Normal => 5,
        TaskPriority::AboveNormal => 10,
        TaskPriority::High => 15,
    }
}

fn effective_stack(requested: u32) -> usize {
    let requested = requested as usize;
    if requested < MIN_STACK_BYTES {
        warn!("task stack {requested} B below platform floor, using {MIN_STACK_BYTES} B");
        MIN_STACK_BYTES
    } else {
        requested
    }
}

// ───────────────────────────────────────────────────────────────
// Tasks
// ───────────────────────────────────────────────────────────────

pub struct ThreadSpawner {
    entry: Option<TaskEntry>,
    thread: Option<JoinHandle<()>>,
}

const APP_TASK_HANDLE: TaskHandle = TaskHandle(1);

impl ThreadSpawner {
    pub fn new(entry: impl FnOnce() + Send + 'static) -> Self {
        Self {
            entry: Some(Box::new(entry)),
            thread: None,
        }
    }
}

impl TaskSpawner for ThreadSpawner {
    fn create_task(&mut self, spec: &TaskSpec) -> Option<TaskHandle> {
        let Some(entry) = self.entry.take() else {
            warn!("{}: task body already launched", spec.name);
            return None;
        };
        let thread = spawn_thread(spec, entry)?;
        self.thread = Some(thread);
        Some(APP_TASK_HANDLE)
    }

    fn task_state(&self, handle: TaskHandle) -> ThreadStatus {
        match &self.thread {
            Some(thread) if handle == APP_TASK_HANDLE => {
                if thread.is_finished() {
                    ThreadStatus::Terminated
                } else {
                    ThreadStatus::Running
                }
            }
            _ => ThreadStatus::Error,
        }
    }
}

#[cfg(target_os = "espidf")]
fn spawn_thread(spec: &TaskSpec, entry: TaskEntry) -> Option<JoinHandle<()>> {
    let stack = effective_stack(spec.stack_bytes);
    let priority = native_priority(spec.priority);

    // SAFETY: plain FFI on a local config struct; see module docs for the
    // set_cfg → spawn ordering rule.
    let ret = unsafe {
        let mut cfg = sys::esp_create_default_pthread_config();
        cfg.prio = priority as _;
        cfg.stack_size = stack as _;
        sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != sys::ESP_OK {
        warn!("{}: esp_pthread_set_cfg failed (rc={ret})", spec.name);
        return None;
    }

    info!("Spawning '{}' (pri={}, stack={}B)", spec.name, priority, stack);
    std::thread::Builder::new()
        .name(spec.name.into())
        .spawn(entry)
        .map_err(|e| warn!("{}: spawn failed: {e}", spec.name))
        .ok()
}

/// Simulation fallback.  Priority is ignored.
#[cfg(not(target_os = "espidf"))]
fn spawn_thread(spec: &TaskSpec, entry: TaskEntry) -> Option<JoinHandle<()>> {
    let stack = effective_stack(spec.stack_bytes);
    info!("Spawning '{}' (sim, stack={}B)", spec.name, stack);
    std::thread::Builder::new()
        .name(spec.name.into())
        .stack_size(stack)
        .spawn(entry)
        .map_err(|e| warn!("{}: spawn failed: {e}", spec.name))
        .ok()
}

// ───────────────────────────────────────────────────────────────
// Delay
// ───────────────────────────────────────────────────────────────

/// Blocks the calling task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl TaskDelay for ThreadDelay {
    fn suspend(&mut self, duration_ms: u32) -> OsStatus {
        suspend_current(duration_ms)
    }
}

#[cfg(target_os = "espidf")]
fn suspend_current(duration_ms: u32) -> OsStatus {
    // SAFETY: read-only query of the current execution context.
    if unsafe { sys::xPortInIsrContext() } != 0 {
        return OsStatus::ErrorIsr;
    }
    esp_idf_hal::delay::FreeRtos::delay_ms(duration_ms);
    OsStatus::Ok
}

#[cfg(not(target_os = "espidf"))]
fn suspend_current(duration_ms: u32) -> OsStatus {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(duration_ms)));
    OsStatus::Ok
}

// ───────────────────────────────────────────────────────────────
// Periodic timers
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
type TimerSlot = esp_idf_svc::timer::EspTimer<'static>;

#[cfg(not(target_os = "espidf"))]
type TimerSlot = sim::SimTimer;

pub struct PeriodicTimers {
    callback: Option<TimerCallback>,
    slots: heapless::Vec<TimerSlot, MAX_TIMERS>,
    #[cfg(target_os = "espidf")]
    service: esp_idf_svc::timer::EspTaskTimerService,
}

impl PeriodicTimers {
    #[cfg(target_os = "espidf")]
    pub fn new(
        callback: impl FnMut() + Send + 'static,
    ) -> Result<Self, sys::EspError> {
        Ok(Self {
            callback: Some(Box::new(callback)),
            slots: heapless::Vec::new(),
            service: esp_idf_svc::timer::EspTaskTimerService::new()?,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(callback: impl FnMut() + Send + 'static) -> Result<Self, core::convert::Infallible> {
        Ok(Self {
            callback: Some(Box::new(callback)),
            slots: heapless::Vec::new(),
        })
    }

    #[cfg(target_os = "espidf")]
    fn make_slot(&self, callback: TimerCallback) -> Option<TimerSlot> {
        self.service
            .timer(callback)
            .map_err(|e| warn!("esp_timer create failed: {e}"))
            .ok()
    }

    #[cfg(not(target_os = "espidf"))]
    fn make_slot(&self, callback: TimerCallback) -> Option<TimerSlot> {
        Some(sim::SimTimer::new(callback))
    }
}

impl TimerService for PeriodicTimers {
    fn create_periodic(&mut self, spec: &TimerSpec) -> Option<TimerHandle> {
        if self.slots.is_full() {
            warn!("{}: no free timer slot", spec.name);
            return None;
        }
        let Some(callback) = self.callback.take() else {
            warn!("{}: timer callback already bound", spec.name);
            return None;
        };
        let slot = self.make_slot(callback)?;
        let index = self.slots.len();
        self.slots.push(slot).ok()?;
        Some(TimerHandle(index as u32))
    }

    fn start(&mut self, handle: TimerHandle, period_ms: u32) -> OsStatus {
        let Some(slot) = self.slots.get_mut(handle.0 as usize) else {
            return OsStatus::ErrorParameter;
        };
        start_slot(slot, period_ms)
    }
}

#[cfg(target_os = "espidf")]
fn start_slot(slot: &mut TimerSlot, period_ms: u32) -> OsStatus {
    match slot.every(core::time::Duration::from_millis(u64::from(period_ms))) {
        Ok(()) => OsStatus::Ok,
        Err(e) => status_from_esp(e),
    }
}

#[cfg(not(target_os = "espidf"))]
fn start_slot(slot: &mut TimerSlot, period_ms: u32) -> OsStatus {
    slot.start(period_ms)
}

/// Map an ESP-IDF error onto the RTOS status set.
#[cfg(target_os = "espidf")]
pub fn status_from_esp(err: sys::EspError) -> OsStatus {
    let code = err.code();
    if code == sys::ESP_ERR_NO_MEM as i32 {
        OsStatus::ErrorNoMemory
    } else if code == sys::ESP_ERR_INVALID_ARG as i32 {
        OsStatus::ErrorParameter
    } else if code == sys::ESP_ERR_INVALID_STATE as i32 {
        OsStatus::ErrorResource
    } else if code == sys::ESP_ERR_TIMEOUT as i32 {
        OsStatus::ErrorTimeout
    } else {
        OsStatus::Error
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread::JoinHandle;
    use std::time::Duration;

    use super::TimerCallback;
    use crate::app::ports::OsStatus;

    /// Sleeper-thread stand-in for an esp_timer.  Stops when dropped.
    pub struct SimTimer {
        callback: Option<TimerCallback>,
        running: Arc<AtomicBool>,
        thread: Option<JoinHandle<()>>,
    }

    impl SimTimer {
        pub fn new(callback: TimerCallback) -> Self {
            Self {
                callback: Some(callback),
                running: Arc::new(AtomicBool::new(false)),
                thread: None,
            }
        }

        pub fn start(&mut self, period_ms: u32) -> OsStatus {
            if period_ms == 0 {
                return OsStatus::ErrorParameter;
            }
            let Some(mut callback) = self.callback.take() else {
                return OsStatus::ErrorResource;
            };
            let running = Arc::clone(&self.running);
            running.store(true, Ordering::Release);
            let period = Duration::from_millis(u64::from(period_ms));
            let spawned = std::thread::Builder::new()
                .name("sim-timer".into())
                .spawn(move || {
                    while running.load(Ordering::Acquire) {
                        std::thread::sleep(period);
                        if running.load(Ordering::Acquire) {
                            callback();
                        }
                    }
                });
            match spawned {
                Ok(thread) => {
                    self.thread = Some(thread);
                    OsStatus::Ok
                }
                Err(_) => OsStatus::ErrorNoMemory,
            }
        }
    }

    impl Drop for SimTimer {
        fn drop(&mut self) {
            self.running.store(false, Ordering::Release);
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Button interrupt line + ISR-safe button read
// ───────────────────────────────────────────────────────────────

/// Edge-interrupt control for one GPIO.
#[derive(Debug)]
pub struct GpioIrqLine {
    gpio: i32,
    enabled: bool,
}

impl GpioIrqLine {
    pub const fn new(gpio: i32) -> Self {
        Self { gpio, enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl InterruptLine for GpioIrqLine {
    fn enable(&mut self) {
        set_gpio_irq(self.gpio, true);
        self.enabled = true;
    }

    fn disable(&mut self) {
        set_gpio_irq(self.gpio, false);
        self.enabled = false;
    }

    fn clear_pending(&mut self) {
        // The GPIO ISR service acknowledges the status bit before it
        // dispatches to per-pin handlers, so there is nothing left to clear.
    }
}

#[cfg(target_os = "espidf")]
fn set_gpio_irq(gpio: i32, enabled: bool) {
    // Runs in the edge ISR: no logging.  Both calls only fail for an
    // invalid pin, which `install_button_isr` has already rejected.
    // SAFETY: enabling/disabling a configured GPIO's interrupt is ISR-safe.
    let _ = unsafe {
        if enabled {
            sys::gpio_intr_enable(gpio)
        } else {
            sys::gpio_intr_disable(gpio)
        }
    };
}

#[cfg(not(target_os = "espidf"))]
fn set_gpio_irq(_gpio: i32, _enabled: bool) {}

/// Register `handler` as the any-edge ISR for `gpio`.
#[cfg(target_os = "espidf")]
pub fn install_button_isr(
    gpio: i32,
    handler: unsafe extern "C" fn(*mut core::ffi::c_void),
) -> Result<(), sys::EspError> {
    // SAFETY: one-time registration at boot from the main task.
    unsafe {
        let ret = sys::gpio_install_isr_service(0);
        // INVALID_STATE: service already installed.
        if ret != sys::ESP_OK && ret != sys::ESP_ERR_INVALID_STATE as i32 {
            sys::esp!(ret)?;
        }
        sys::esp!(sys::gpio_set_intr_type(
            gpio,
            sys::gpio_int_type_t_GPIO_INTR_ANYEDGE
        ))?;
        sys::esp!(sys::gpio_isr_handler_add(
            gpio,
            Some(handler),
            core::ptr::null_mut()
        ))?;
        sys::esp!(sys::gpio_intr_disable(gpio))?;
    }
    info!("GPIO{gpio}: button ISR installed (any edge, masked)");
    Ok(())
}

/// Button read usable from interrupt context.
#[derive(Debug, Clone, Copy)]
pub struct RawButton {
    gpio: i32,
}

impl RawButton {
    pub const fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ButtonInput for RawButton {
    fn read_button(&mut self) -> PinLevel {
        PinLevel::from_bool(gpio_level(self.gpio))
    }
}

#[cfg(target_os = "espidf")]
fn gpio_level(gpio: i32) -> bool {
    // SAFETY: register read, no side effects.
    unsafe { sys::gpio_get_level(gpio) != 0 }
}

/// Simulation: the button is never pressed.
#[cfg(not(target_os = "espidf"))]
fn gpio_level(_gpio: i32) -> bool {
    false
}

//! GyroLED Firmware — Main Entry Point
//!
//! Composition root: builds the board, picks the execution strategy compiled
//! in through the `mode-*` features and hands control to it.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        Rtos adapters          LogEventSink    │
//! │  (button, gyro, LEDs)   (tasks, timers, ISR)   (EventSink)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   Strategy (Polling · Interrupt · Timer · Task)        │    │
//! │  │   actuation cycle · classify · decide · FaultValidator │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::mpsc;

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{Gpio4, Gpio13, Gpio14, Input, Output, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use gyroled::adapters::hardware::HardwareAdapter;
use gyroled::adapters::log_sink::LogEventSink;
use gyroled::adapters::rtos::{
    self, GpioIrqLine, PeriodicTimers, RawButton, ThreadDelay, ThreadSpawner,
};
use gyroled::app::ports::{TimerService, TimerSpec};
use gyroled::app::state::SharedControl;
use gyroled::config::SystemConfig;
use gyroled::error::Fatal;
use gyroled::pins;
use gyroled::scheduler::{
    ExecutionStrategy, InterruptDriven, Polling, StrategyKind, TaskDriven, TimerDriven,
    interrupt, task, timer,
};
use gyroled::sensors::gyro::Gyro;

/// Run state shared by the main task, the app task, timer callbacks and the
/// button ISR.
static SHARED: SharedControl = SharedControl::new();

/// How often the main task polls the app task's thread state.
const LIVENESS_PERIOD_MS: u32 = 1000;

type Hw = HardwareAdapter<
    PinDriver<'static, Gpio4, Input>,
    PinDriver<'static, Gpio13, Output>,
    PinDriver<'static, Gpio14, Output>,
    SpiDeviceDriver<'static, SpiDriver<'static>>,
>;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GyroLED v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    info!("Strategy: {}", StrategyKind::SELECTED);

    // ── 2. Board ──────────────────────────────────────────────
    let hw = build_board()?;

    // ── 3. Hand over to the selected strategy ─────────────────
    let fatal = match StrategyKind::SELECTED {
        StrategyKind::Polling => run_polling(&config, hw),
        StrategyKind::InterruptDriven => run_interrupt(&config, hw)?,
        StrategyKind::TimerDriven => run_timer(&config, hw)?,
        StrategyKind::TaskDriven => run_task(&config, hw),
    };

    spin_forever(fatal)
}

/// Peripheral setup.  GPIO numbers here must match [`pins`].
fn build_board() -> Result<Hw> {
    let p = Peripherals::take()?;

    let mut button = PinDriver::input(p.pins.gpio4)?;
    button.set_pull(Pull::Down)?;
    let mut green = PinDriver::output(p.pins.gpio13)?;
    let mut red = PinDriver::output(p.pins.gpio14)?;
    green.set_low()?;
    red.set_low()?;

    let spi = SpiDeviceDriver::new_single(
        p.spi2,
        p.pins.gpio6,
        p.pins.gpio7,
        Some(p.pins.gpio15),
        Some(p.pins.gpio16),
        &SpiDriverConfig::new(),
        &SpiConfig::new()
            .baudrate(Hertz(pins::GYRO_SPI_BAUD_HZ))
            .data_mode(embedded_hal::spi::MODE_3),
    )?;
    let mut gyro = Gyro::new(spi);
    if let Err(e) = gyro.init() {
        // Reads will keep failing and the adapter will report zero rotation.
        warn!("{e}, continuing without rotation input");
    }

    Ok(HardwareAdapter::new(button, green, red, gyro))
}

// ── Strategy runners ──────────────────────────────────────────
//
// Each returns the fault that halted the system.

fn run_polling(config: &SystemConfig, mut hw: Hw) -> Fatal {
    let mut sink = LogEventSink::new();
    let mut strategy = Polling::new(&SHARED);
    if let Err(fatal) = strategy.start(&mut sink) {
        return fatal;
    }
    loop {
        if let Err(fatal) = strategy.on_tick(&mut hw, &mut sink) {
            return fatal;
        }
        // Keeps the idle task (and its watchdog) fed.
        FreeRtos::delay_ms(config.tick_period_ms);
    }
}

/// Button edge ISR, registered through the GPIO ISR service.
unsafe extern "C" fn button_isr(_arg: *mut core::ffi::c_void) {
    let mut line = GpioIrqLine::new(pins::BUTTON_GPIO);
    let mut button = RawButton::new(pins::BUTTON_GPIO);
    interrupt::on_button_edge(&SHARED, &mut line, &mut button);
}

fn run_interrupt(config: &SystemConfig, mut hw: Hw) -> Result<Fatal> {
    rtos::install_button_isr(pins::BUTTON_GPIO, button_isr)?;

    let mut strategy = InterruptDriven::new(&SHARED, config, GpioIrqLine::new(pins::BUTTON_GPIO));
    let mut sink = LogEventSink::new();
    if let Err(fatal) = strategy.start(&mut sink) {
        return Ok(fatal);
    }

    // Fixed-rate tick from esp_timer, independent of the FreeRTOS tick rate.
    let (tx, rx) = mpsc::sync_channel::<Fatal>(1);
    let mut tick = PeriodicTimers::new(move || {
        if let Err(fatal) = strategy.on_tick(&mut hw, &mut sink) {
            let _ = tx.try_send(fatal);
        }
    })?;
    let spec = TimerSpec {
        name: "tick",
        period_ms: config.tick_period_ms,
    };
    let handle = tick
        .create_periodic(&spec)
        .ok_or_else(|| anyhow!("tick timer unavailable"))?;
    let status = tick.start(handle, spec.period_ms);
    if !status.is_ok() {
        return Err(anyhow!("tick timer start failed: {status}"));
    }

    rx.recv().map_err(|_| anyhow!("tick timer stopped"))
}

fn run_timer(config: &SystemConfig, mut hw: Hw) -> Result<Fatal> {
    let (tx, rx) = mpsc::sync_channel::<Fatal>(1);
    let mut callback_sink = LogEventSink::new();
    let timers = PeriodicTimers::new(move || {
        if let Err(fatal) = timer::on_expiry(&SHARED, &mut hw, &mut callback_sink) {
            let _ = tx.try_send(fatal);
        }
    })?;

    let mut strategy = TimerDriven::new(&SHARED, config, timers);
    let mut sink = LogEventSink::new();
    if let Err(fatal) = strategy.start(&mut sink) {
        return Ok(fatal);
    }

    // `strategy` owns the armed timer; it must outlive this wait.
    let fatal = rx.recv().map_err(|_| anyhow!("timer callback dropped"))?;
    drop(strategy);
    Ok(fatal)
}

fn run_task(config: &SystemConfig, hw: Hw) -> Fatal {
    let task_config = *config;
    let spawner = ThreadSpawner::new(move || {
        let mut hw = hw;
        let mut sink = LogEventSink::new();
        let fatal = task::run_app_task(&SHARED, &task_config, &mut hw, &mut ThreadDelay, &mut sink);
        warn!("{} exiting: {fatal}", task_config.task_spec().name);
    });

    let mut strategy = TaskDriven::new(&SHARED, config, spawner, ThreadDelay);
    let mut sink = LogEventSink::new();
    if let Err(fatal) = strategy.start(&mut sink) {
        return fatal;
    }
    loop {
        FreeRtos::delay_ms(LIVENESS_PERIOD_MS);
        if let Err(fatal) = strategy.check_liveness(&mut sink) {
            return fatal;
        }
    }
}

/// Terminal state: never returns, never touches the board again.
fn spin_forever(fatal: Fatal) -> ! {
    error!("System halted ({fatal}), spinning");
    loop {
        core::hint::spin_loop();
    }
}

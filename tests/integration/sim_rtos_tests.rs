//! End-to-end runs of the timer and task strategies on the host RTOS
//! simulation (real threads, mock board).

use std::sync::mpsc;
use std::time::Duration;

use gyroled::adapters::rtos::{PeriodicTimers, ThreadDelay, ThreadSpawner};
use gyroled::app::ports::{OsStatus, PinLevel, ThreadStatus};
use gyroled::app::state::SharedControl;
use gyroled::config::SystemConfig;
use gyroled::error::{Fatal, RuntimeFault};
use gyroled::scheduler::{ExecutionStrategy, TaskDriven, TimerDriven, task, timer};

use crate::mock_hw::{MockBoard, MockDelay, RecordingSink};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn app_task_runs_until_suspend_fails_then_liveness_reports_halt() {
    static SHARED: SharedControl = SharedControl::new();

    let mut cfg = SystemConfig::default();
    cfg.task_delay_ms = 1;
    let (tx, rx) = mpsc::channel();
    let spawner = ThreadSpawner::new(move || {
        let mut hw = MockBoard::with(PinLevel::Set, -20_000);
        let mut delay = MockDelay::scripted(&[OsStatus::Ok, OsStatus::Ok, OsStatus::Error]);
        let mut sink = RecordingSink::new();
        let fatal = task::run_app_task(&SHARED, &cfg, &mut hw, &mut delay, &mut sink);
        let _ = tx.send((fatal, sink.cycles().len()));
    });

    let mut sink = RecordingSink::new();
    let mut strategy = TaskDriven::new(&SHARED, &cfg, spawner, ThreadDelay);
    strategy.start(&mut sink).unwrap();

    let (fatal, cycles) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(fatal, Fatal::Runtime(RuntimeFault::Suspend(OsStatus::Error)));
    assert_eq!(cycles, 3);
    assert_eq!(strategy.check_liveness(&mut sink), Err(fatal));
}

#[test]
fn exited_task_is_caught_by_liveness_check() {
    static SHARED: SharedControl = SharedControl::new();

    let cfg = SystemConfig::default();
    let spawner = ThreadSpawner::new(|| {});
    let mut sink = RecordingSink::new();
    let mut strategy = TaskDriven::new(&SHARED, &cfg, spawner, ThreadDelay);
    strategy.start(&mut sink).unwrap();

    let fault = Fatal::Runtime(RuntimeFault::TaskState(ThreadStatus::Terminated));
    let deadline = std::time::Instant::now() + WAIT;
    let result = loop {
        let r = strategy.check_liveness(&mut sink);
        if r.is_err() || std::time::Instant::now() > deadline {
            break r;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(result, Err(fault));
    assert_eq!(sink.halts(), [fault]);
}

#[test]
fn periodic_timer_drives_cycles() {
    static SHARED: SharedControl = SharedControl::new();

    let mut cfg = SystemConfig::default();
    cfg.timer_period_ms = 2;
    let (tx, rx) = mpsc::channel();
    let mut hw = MockBoard::with(PinLevel::Reset, 16_000);
    let mut callback_sink = RecordingSink::new();
    let timers = PeriodicTimers::new(move || {
        if let Ok(outcome) = timer::on_expiry(&SHARED, &mut hw, &mut callback_sink) {
            if let Some(report) = outcome.report() {
                let _ = tx.send(report);
            }
        }
    })
    .unwrap();

    let mut sink = RecordingSink::new();
    let mut strategy = TimerDriven::new(&SHARED, &cfg, timers);
    strategy.start(&mut sink).unwrap();

    let first = rx.recv_timeout(WAIT).unwrap();
    let second = rx.recv_timeout(WAIT).unwrap();
    assert!(second.cycle > first.cycle);
    assert!(!first.outputs.green_on);
    assert!(!first.outputs.red_on);
    drop(strategy);
}

//! Control state shared between the execution contexts.
//!
//! The button sample, the latest rotation reading, the last output decision
//! and the run state live in one [`ControlState`].  It is reachable only
//! through [`SharedControl::with`], which holds a critical section for the
//! duration of the closure, so an interrupt handler and a task never observe
//! a half-written update.
//!
//! ```text
//!   button ISR ──┐
//!   tick / timer ├──▶ SharedControl ──▶ Mutex<CriticalSection, RefCell<ControlState>>
//!   app task   ──┘
//! ```
//!
//! Keep closures short: nothing that blocks or talks to a bus may run inside
//! `with`.
//!
//! Interrupt handlers never take the lock.  They see the run state through
//! [`SharedControl::is_live`] and hand button samples over through
//! [`SharedControl::latch_button`]; the next actuation cycle folds the latched
//! sample into [`ControlState`] under the lock.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::control::policy::{ButtonState, OutputDecision};
use crate::error::Fatal;
use crate::sensors::rotation::{RotationBand, RotationSample};

// ── Run state ─────────────────────────────────────────────────

/// `Uninitialized → Running → Halted`.  `Halted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized,
    Running,
    Halted(Fatal),
}

impl RunState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn fault(self) -> Option<Fatal> {
        match self {
            Self::Halted(fatal) => Some(fatal),
            _ => None,
        }
    }
}

// ── Control state ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub button: ButtonState,
    pub band: Option<RotationBand>,
    pub raw_velocity: RotationSample,
    pub outputs: OutputDecision,
    pub run: RunState,
    /// Completed actuation cycles since boot.
    pub cycles: u64,
}

impl ControlState {
    pub const fn new() -> Self {
        Self {
            button: ButtonState::Released,
            band: None,
            raw_velocity: 0,
            outputs: OutputDecision::OFF,
            run: RunState::Uninitialized,
            cycles: 0,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shared handle ─────────────────────────────────────────────

const NO_EDGE: u8 = 0;
const EDGE_PRESSED: u8 = 1;
const EDGE_RELEASED: u8 = 2;

pub struct SharedControl {
    inner: Mutex<CriticalSectionRawMutex, RefCell<ControlState>>,
    /// Mirrors `run == Running`.  Written only under the lock.
    live: AtomicBool,
    /// Button sample latched from interrupt context, not yet folded in.
    edge: AtomicU8,
}

impl SharedControl {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ControlState::new())),
            live: AtomicBool::new(false),
            edge: AtomicU8::new(NO_EDGE),
        }
    }

    /// Run `f` with exclusive access to the state.
    pub fn with<R>(&self, f: impl FnOnce(&mut ControlState) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn snapshot(&self) -> ControlState {
        self.with(|s| *s)
    }

    pub fn run_state(&self) -> RunState {
        self.with(|s| s.run)
    }

    /// `Uninitialized → Running`.  Already running is a no-op; a halted
    /// system stays halted and reports its fault.
    pub fn mark_running(&self) -> Result<(), Fatal> {
        self.with(|s| match s.run {
            RunState::Halted(fatal) => Err(fatal),
            RunState::Uninitialized | RunState::Running => {
                s.run = RunState::Running;
                self.live.store(true, Ordering::Release);
                Ok(())
            }
        })
    }

    /// Enter `Halted`.  The first fault wins: if the system was already
    /// halted the earlier fault is returned and `fatal` is dropped.
    pub fn halt(&self, fatal: Fatal) -> Option<Fatal> {
        self.with(|s| match s.run {
            RunState::Halted(first) => Some(first),
            RunState::Uninitialized | RunState::Running => {
                s.run = RunState::Halted(fatal);
                self.live.store(false, Ordering::Release);
                None
            }
        })
    }

    /// Lock-free `Running` check.  Safe from interrupt context.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Hand a button sample over from interrupt context.  Lock-free; a newer
    /// sample overwrites one that has not been folded in yet.
    pub fn latch_button(&self, button: ButtonState) {
        let code = match button {
            ButtonState::Pressed => EDGE_PRESSED,
            ButtonState::Released => EDGE_RELEASED,
        };
        self.edge.store(code, Ordering::Release);
    }

    /// Take the latched sample, if one is pending.
    pub fn take_latched(&self) -> Option<ButtonState> {
        match self.edge.swap(NO_EDGE, Ordering::AcqRel) {
            EDGE_PRESSED => Some(ButtonState::Pressed),
            EDGE_RELEASED => Some(ButtonState::Released),
            _ => None,
        }
    }
}

impl Default for SharedControl {
    fn default() -> Self {
        Self::new()
    }
}

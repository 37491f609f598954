//! Application core — pure domain logic, zero I/O.
//!
//! The actuation cycle, the shared run state and the events it produces.
//! All interaction with hardware and the RTOS happens through **port
//! traits** defined in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod cycle;
pub mod events;
pub mod ports;
pub mod state;

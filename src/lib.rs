//! GyroLED firmware library.
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]` within
//! each module, with host simulations alongside.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod safety;
pub mod scheduler;
pub mod sensors;

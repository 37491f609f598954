//! Output policy.

pub mod policy;

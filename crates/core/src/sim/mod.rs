//! Simulation utilities and program loading.
//!
//! Provides the top-level [`Simulator`] that owns the machine and its
//! verification layers, plus helpers for turning raw program images into
//! instruction words.

pub mod loader;
pub mod simulator;

pub use simulator::{RunReport, Simulator};

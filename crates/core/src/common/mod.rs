//! Common types shared across the simulator.
//!
//! This module provides:
//! 1. **Faults and status:** Configuration, load, and run-time fault types.
//! 2. **Word types:** The architectural word width used throughout the core.

pub mod error;

pub use error::{AccessFault, ConfigError, ExitReason, LoadError};

/// Architectural word type: the machine is a 32-bit signed-integer ISA.
pub type Word = i32;

/// Byte width of one architectural word.
pub const WORD_BYTES: u32 = 4;

//! Cycle-accurate behavioral model of a pipelined 32-bit ISA with fixed-function AI units.
//!
//! This crate implements a five-stage in-order pipeline simulator with the following:
//! 1. **Core:** Pipeline (fetch, decode, execute, memory, writeback), register file, and execution units.
//! 2. **Memory:** Banked data memory with conflict arbitration and stride prefetching.
//! 3. **ISA:** Decoding for the base integer set plus the five custom accelerator operations.
//! 4. **Verification:** Golden-model oracle over the commit stream and execution coverage tracking.
//! 5. **Simulation:** Top-level simulator, program loader, and statistics collection.

/// Common types and constants (word width, fault and exit types).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU core (pipeline, register file, execution units).
pub mod core;
/// Instruction set (decode, instruction descriptor, opcode constants).
pub mod isa;
/// Banked data memory subsystem.
pub mod mem;
/// Program loader and top-level simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Golden-model oracle and coverage tracking.
pub mod verify;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main machine-state type; holds the latches, memories, and units.
pub use crate::core::Cpu;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;

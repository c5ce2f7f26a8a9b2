//! Fault and status definitions.
//!
//! This module defines the error handling surfaces of the simulator. It provides:
//! 1. **Configuration faults:** Raised by `Config::validate` before any tick executes.
//! 2. **Load faults:** Raised when a program image cannot be accepted.
//! 3. **Access faults:** Carried through pipeline latches as data, like a hardware trap.
//! 4. **Run status:** The terminal status of a simulation run.
//!
//! Run-time faults are values flowing through the pipeline, never Rust errors:
//! a committed fault surfaces as a terminal `ExitReason` while already-committed
//! register and memory state remains inspectable.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Configuration fault: an operand, window, or coefficient-table size that does
/// not match the configured unit parameters, or an out-of-range structural
/// setting. Raised at configuration time; the run does not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Bank count outside the supported 2–8 range.
    #[error("memory bank count {0} outside supported range 2-8")]
    BankCount(usize),

    /// Bank-interleave stride must be non-zero.
    #[error("bank stride must be non-zero")]
    ZeroBankStride,

    /// Memory size must be a non-zero multiple of the bank count.
    #[error("memory size {words} words is not a non-zero multiple of {banks} banks")]
    MemorySize {
        /// Configured memory size in words.
        words: usize,
        /// Configured bank count.
        banks: usize,
    },

    /// Conv2D coefficient table length does not match the configured kernel area.
    #[error("conv2d coefficient table has {got} entries, kernel {kernel}x{kernel} needs {expected}")]
    KernelCoefficients {
        /// Configured kernel edge length.
        kernel: usize,
        /// Required coefficient count (kernel area).
        expected: usize,
        /// Supplied coefficient count.
        got: usize,
    },

    /// FIR coefficient table length does not match the configured tap count.
    #[error("fir coefficient table has {got} entries, configured tap count is {taps}")]
    TapCoefficients {
        /// Configured tap count.
        taps: usize,
        /// Supplied coefficient count.
        got: usize,
    },

    /// FIR tap count outside the supported range.
    #[error("fir tap count {0} outside supported range 1-64")]
    TapCount(usize),

    /// Pooling window edge outside the supported range.
    #[error("pool window {0}x{0} outside supported range 2-8")]
    PoolWindow(usize),

    /// Pooling element stride must be non-zero.
    #[error("pool element stride must be non-zero")]
    ZeroPoolStride,

    /// Maximum cycle count must be non-zero.
    #[error("max_cycles must be non-zero")]
    ZeroMaxCycles,
}

/// Program-image fault raised by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Image length is not a whole number of 32-bit words.
    #[error("program image length {0} is not a multiple of 4 bytes")]
    RaggedImage(usize),

    /// Image does not fit in instruction memory.
    #[error("program image of {words} words exceeds instruction memory capacity {capacity}")]
    ImageTooLarge {
        /// Image size in words.
        words: usize,
        /// Instruction memory capacity in words.
        capacity: usize,
    },
}

/// Memory access fault, carried through pipeline latches as data.
///
/// Detected in the Memory stage (loads/stores) or at accelerator window reads,
/// and surfaced as a terminal run status when the faulting instruction reaches
/// Writeback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessFault {
    /// Byte address beyond the configured data memory.
    OutOfRange(u32),
    /// Byte address not aligned to the 4-byte word size.
    Misaligned(u32),
}

impl fmt::Display for AccessFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(addr) => write!(f, "OutOfRange({addr:#x})"),
            Self::Misaligned(addr) => write!(f, "Misaligned({addr:#x})"),
        }
    }
}

/// Terminal status of a simulation run.
///
/// Every run ends in exactly one of these; all are reported through the same
/// channel as the final verdict and none are silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitReason {
    /// The program committed its exit instruction (ECALL).
    Halted,
    /// A decoded ILLEGAL instruction reached Writeback; commitment stopped.
    IllegalInstruction(u32),
    /// A memory access fault reached Writeback.
    AccessFault(AccessFault),
    /// The configured maximum cycle count was exceeded. Recorded as a failed
    /// run, not a crash; state up to this point remains inspectable.
    Timeout,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted => write!(f, "Halted"),
            Self::IllegalInstruction(word) => write!(f, "IllegalInstruction({word:#010x})"),
            Self::AccessFault(fault) => write!(f, "AccessFault({fault})"),
            Self::Timeout => write!(f, "Timeout"),
        }
    }
}

impl ExitReason {
    /// True when the run terminated by executing its exit instruction.
    pub fn is_normal(self) -> bool {
        matches!(self, Self::Halted)
    }
}

//! 2D convolution unit.
//!
//! Slides the configured 3x3 or 5x5 kernel over an input window read from
//! data memory (base address in rs1, row stride in words in rs2), computing
//! the dot product against the coefficient table. Latency is proportional to
//! the kernel area; the unit is not pipelined across overlapping windows on
//! the same coefficient table.

use crate::common::Word;
use crate::common::error::AccessFault;
use crate::config::{Conv2dConfig, KernelSize, Precision};
use crate::mem::MemorySubsystem;

use super::saturate::{clamp, narrow};
use super::{AccelOperands, AccelOutcome, AccelUnit};

/// 2D convolution datapath.
#[derive(Debug, Clone)]
pub struct Conv2d {
    kernel: KernelSize,
    /// Row-major coefficient table, kernel-area entries.
    coefficients: Vec<Word>,
}

impl Conv2d {
    /// Builds the unit from a validated configuration.
    pub fn new(config: &Conv2dConfig) -> Self {
        Self {
            kernel: config.kernel,
            coefficients: config.coefficients.clone(),
        }
    }

    /// Configured kernel size.
    pub fn kernel(&self) -> KernelSize {
        self.kernel
    }

    /// Reads one window element, bounds-checking the computed address.
    fn window_word(
        mem: &MemorySubsystem,
        base_word: usize,
        offset: i64,
        base_byte: u32,
    ) -> Result<Word, AccessFault> {
        let idx = base_word as i64 + offset;
        if idx < 0 || idx as usize >= mem.len() {
            return Err(AccessFault::OutOfRange(
                base_byte.wrapping_add((offset as u32).wrapping_mul(4)),
            ));
        }
        Ok(mem.peek(idx as usize))
    }
}

impl AccelUnit for Conv2d {
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault> {
        let base_byte = ops.rs1 as u32;
        let base_word = ops.mem.word_index(base_byte)?;
        let row_stride = i64::from(ops.rs2);
        let edge = self.kernel.edge();

        let mut sum: i64 = 0;
        for r in 0..edge {
            for c in 0..edge {
                let offset = r as i64 * row_stride + c as i64;
                let sample = Self::window_word(ops.mem, base_word, offset, base_byte)?;
                let coeff = narrow(self.coefficients[r * edge + c], precision);
                // Each product fits i64, but the running sum can exceed it
                // at 32-bit precision; a pegged sum still clamps correctly.
                sum = sum.saturating_add(coeff * narrow(sample, precision));
            }
        }

        let (value, saturated) = clamp(sum, precision);
        Ok(AccelOutcome {
            value,
            latency: self.latency(),
            saturated,
        })
    }

    fn latency(&self) -> u64 {
        self.kernel.area() as u64
    }

    fn pipelined(&self) -> bool {
        false
    }
}

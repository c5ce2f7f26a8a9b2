//! Pooling unit.
//!
//! Reduces an NxN window read from data memory (base address in rs1, row
//! stride in words in rs2) by max or average, funct3-selected. Average mode
//! floors before saturation. The configured element stride spaces window
//! columns for dilated pooling; 1 is a dense window.

use crate::common::Word;
use crate::common::error::AccessFault;
use crate::config::{PoolConfig, PoolMode, Precision};
use crate::isa::opcodes::funct3;
use crate::mem::MemorySubsystem;

use super::saturate::{clamp, narrow};
use super::{AccelOperands, AccelOutcome, AccelUnit};

/// Pooling datapath.
#[derive(Debug, Clone)]
pub struct Pool {
    window: usize,
    stride: usize,
    default_mode: PoolMode,
}

impl Pool {
    /// Builds the unit from a validated configuration.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            window: config.window,
            stride: config.stride,
            default_mode: config.mode,
        }
    }

    /// Configured window edge length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Mode selected by the instruction's funct3.
    pub fn mode_for(&self, variant: u32) -> PoolMode {
        match variant {
            funct3::POOL_AVG => PoolMode::Average,
            funct3::POOL_MAX => PoolMode::Max,
            _ => self.default_mode,
        }
    }

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

impl AccelUnit for Pool {
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault> {
        let base_byte = ops.rs1 as u32;
        let base_word = ops.mem.word_index(base_byte)?;
        let row_stride = i64::from(ops.rs2);

        let mut max = i64::MIN;
        let mut sum: i64 = 0;
        for r in 0..self.window {
            for c in 0..self.window {
                let offset = r as i64 * row_stride + (c * self.stride) as i64;
                let sample = narrow(
                    Self::window_word(ops.mem, base_word, offset, base_byte)?,
                    precision,
                );
                max = max.max(sample);
                sum += sample;
            }
        }

        let reduced = match self.mode_for(ops.variant) {
            PoolMode::Max => max,
            // Floor division, so negative sums also round toward -inf.
            PoolMode::Average => sum.div_euclid((self.window * self.window) as i64),
        };

        let (value, saturated) = clamp(reduced, precision);
        Ok(AccelOutcome {
            value,
            latency: self.latency(),
            saturated,
        })
    }

    fn latency(&self) -> u64 {
        (self.window * self.window) as u64
    }

    fn pipelined(&self) -> bool {
        false
    }
}

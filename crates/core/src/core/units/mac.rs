//! Multiply-accumulate unit.
//!
//! `rd = old(rd) + rs1 * rs2` in the configured precision, with the funct3
//! sub-variant selecting the overflow rule (saturating clamp or two's
//! complement wrap). The internal accumulator mirrors the last produced
//! value, so it never exceeds the configured saturation bound.

use crate::common::error::AccessFault;
use crate::config::Precision;
use crate::isa::opcodes::funct3;

use super::saturate::{clamp, narrow, wrap};
use super::{AccelOperands, AccelOutcome, AccelUnit};

/// Fixed latency of a MAC operation in cycles.
const MAC_LATENCY: u64 = 1;

/// Multiply-accumulate datapath.
#[derive(Debug, Clone, Default)]
pub struct Mac {
    accumulator: i64,
}

impl Mac {
    /// Creates a MAC unit with a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulator value (the last produced result).
    pub fn accumulator(&self) -> i64 {
        self.accumulator
    }
}

impl AccelUnit for Mac {
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault> {
        let seed = narrow(ops.rd_old, precision);
        let product = narrow(ops.rs1, precision) * narrow(ops.rs2, precision);
        let sum = seed + product;

        let (value, saturated) = if ops.variant == funct3::MAC_WRAP {
            (wrap(sum, precision), false)
        } else {
            clamp(sum, precision)
        };

        self.accumulator = i64::from(value);
        Ok(AccelOutcome {
            value,
            latency: MAC_LATENCY,
            saturated,
        })
    }

    fn latency(&self) -> u64 {
        MAC_LATENCY
    }

    fn pipelined(&self) -> bool {
        true
    }
}

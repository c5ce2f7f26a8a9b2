//! Rectified-linear activation unit.
//!
//! `rd = max(0, rs1)` in the configured precision. Stateless.

use crate::common::error::AccessFault;
use crate::config::Precision;

use super::saturate::narrow;
use super::{AccelOperands, AccelOutcome, AccelUnit};

/// Fixed latency of a ReLU operation in cycles.
const RELU_LATENCY: u64 = 1;

/// Rectified-linear datapath.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relu;

impl Relu {
    /// Creates the (stateless) ReLU unit.
    pub fn new() -> Self {
        Self
    }
}

impl AccelUnit for Relu {
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault> {
        let value = narrow(ops.rs1, precision).max(0) as i32;
        Ok(AccelOutcome {
            value,
            latency: RELU_LATENCY,
            saturated: false,
        })
    }

    fn latency(&self) -> u64 {
        RELU_LATENCY
    }

    fn pipelined(&self) -> bool {
        true
    }
}

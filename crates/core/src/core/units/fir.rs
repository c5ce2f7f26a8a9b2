//! FIR filter unit.
//!
//! Each invocation shifts the new sample (rs1) into the ring buffer, discards
//! the oldest, and computes `sum(coefficient[i] * sample[i])` over the
//! configured tap count, with sample[0] the newest. Latency is proportional
//! to the tap count.

use std::collections::VecDeque;

use crate::common::error::AccessFault;
use crate::config::{FirConfig, Precision};

use super::saturate::{clamp, narrow};
use super::{AccelOperands, AccelOutcome, AccelUnit};

/// FIR filter datapath.
#[derive(Debug, Clone)]
pub struct Fir {
    coefficients: Vec<i32>,
    /// Sample ring buffer, newest at the front; always `taps` entries.
    samples: VecDeque<i64>,
}

impl Fir {
    /// Builds the unit from a validated configuration with a zeroed buffer.
    pub fn new(config: &FirConfig) -> Self {
        Self {
            coefficients: config.coefficients.clone(),
            samples: VecDeque::from(vec![0; config.taps]),
        }
    }

    /// Configured tap count.
    pub fn taps(&self) -> usize {
        self.coefficients.len()
    }
}

impl AccelUnit for Fir {
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault> {
        self.samples.push_front(narrow(ops.rs1, precision));
        let _ = self.samples.pop_back();

        let mut sum: i64 = 0;
        for (coeff, sample) in self.coefficients.iter().zip(self.samples.iter()) {
            // The running sum can exceed i64 at 32-bit precision; a pegged
            // sum still clamps correctly.
            sum = sum.saturating_add(narrow(*coeff, precision) * sample);
        }

        let (value, saturated) = clamp(sum, precision);
        Ok(AccelOutcome {
            value,
            latency: self.latency(),
            saturated,
        })
    }

    fn latency(&self) -> u64 {
        self.coefficients.len() as u64
    }

    fn pipelined(&self) -> bool {
        false
    }
}

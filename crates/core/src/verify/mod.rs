//! Self-checking layers: the golden-model oracle and the coverage tracker.
//!
//! Both layers observe the stream of commit records published by the
//! Writeback stage. The oracle re-executes each committed instruction on an
//! independent functional model and reports divergence; the coverage tracker
//! counts which operation kinds and hazard paths a run actually exercised.

pub mod coverage;
pub mod oracle;

use serde::Serialize;

use crate::common::Word;
use crate::isa::instruction::Instruction;

pub use coverage::{CoverageReport, CoverageTracker};
pub use oracle::{CorrectnessFault, Mismatch, Oracle};

/// One committed instruction, as observed at Writeback.
///
/// Records carry the full architectural effect of the instruction so the
/// verification layers never need to reach into pipeline state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommitRecord {
    /// Cycle in which the instruction retired.
    pub cycle: u64,
    /// Program counter of the instruction.
    pub pc: u32,
    /// The decoded instruction.
    pub inst: Instruction,
    /// Register write performed, as (rd, value).
    pub wrote: Option<(usize, Word)>,
    /// Memory write performed, as (byte address, value).
    pub store: Option<(u32, Word)>,
    /// The result was clamped to the configured precision range.
    pub saturated: bool,
}

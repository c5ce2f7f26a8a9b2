//! Execution units: the base ALU and the five fixed-function AI datapaths.
//!
//! Opcode-to-datapath muxing is a tagged-variant dispatch over the decoded
//! [`OpKind`](crate::isa::instruction::OpKind): the Execute stage routes each
//! accelerator kind to one unit behind the shared [`AccelUnit`] contract
//! (operands in, result + fixed latency + pipelined flag out).

pub mod alu;
pub mod conv2d;
pub mod fir;
pub mod mac;
pub mod pool;
pub mod relu;
pub mod saturate;

use crate::common::Word;
use crate::common::error::AccessFault;
use crate::config::{Config, Precision};
use crate::mem::MemorySubsystem;

pub use conv2d::Conv2d;
pub use fir::Fir;
pub use mac::Mac;
pub use pool::Pool;
pub use relu::Relu;

/// Operand bundle handed to an accelerator unit at issue time.
///
/// `rs1`/`rs2` are the forwarded source values; `rd_old` carries the old
/// destination value for units that read it (the MAC accumulator seed);
/// `variant` is the instruction's funct3 sub-variant selector.
#[derive(Debug, Clone, Copy)]
pub struct AccelOperands<'m> {
    /// First source operand.
    pub rs1: Word,
    /// Second source operand.
    pub rs2: Word,
    /// Old value of the destination register.
    pub rd_old: Word,
    /// funct3 sub-variant selector.
    pub variant: u32,
    /// Data memory for window reads (no port accounting; the access cost is
    /// folded into the unit's declared latency).
    pub mem: &'m MemorySubsystem,
}

/// Result of issuing one accelerator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelOutcome {
    /// Computed result value.
    pub value: Word,
    /// Cycles until the result is valid. Fixed per operation kind and
    /// precision mode; never varies across unrelated operations.
    pub latency: u64,
    /// Whether the result was clamped by the saturation rule.
    pub saturated: bool,
}

/// Shared contract for the five fixed-function datapaths.
pub trait AccelUnit {
    /// Issues one operation, producing a result and its fixed latency.
    ///
    /// Window reads out of memory range surface as an access fault carried
    /// through the pipeline, never a panic.
    fn issue(
        &mut self,
        ops: AccelOperands<'_>,
        precision: Precision,
    ) -> Result<AccelOutcome, AccessFault>;

    /// Fixed latency in cycles for this unit.
    fn latency(&self) -> u64;

    /// True when the unit can accept a new operation before the previous
    /// result is committed.
    fn pipelined(&self) -> bool;
}

/// Container for all five accelerator units, owned by the CPU.
///
/// Each unit owns its internal state exclusively; no state is aliased
/// between units.
#[derive(Debug, Clone)]
pub struct AccelUnits {
    /// Multiply-accumulate unit.
    pub mac: Mac,
    /// Rectified-linear unit.
    pub relu: Relu,
    /// 2D convolution unit.
    pub conv2d: Conv2d,
    /// FIR filter unit.
    pub fir: Fir,
    /// Pooling unit.
    pub pool: Pool,
}

impl AccelUnits {
    /// Builds all units from a validated configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            mac: Mac::new(),
            relu: Relu::new(),
            conv2d: Conv2d::new(&config.units.conv2d),
            fir: Fir::new(&config.units.fir),
            pool: Pool::new(&config.units.pool),
        }
    }
}

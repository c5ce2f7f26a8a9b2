//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the five pipeline
//! stages: Fetch → Decode → Execute → Memory → Writeback. Each latch holds at
//! most one entry; an empty latch is a bubble.

use crate::common::{AccessFault, Word};
use crate::core::pipeline::signals::ControlSignals;
use crate::isa::instruction::Instruction;

/// Entry in the IF/ID pipeline latch (Fetch to Decode stage).
#[derive(Clone, Copy, Debug)]
pub struct IfIdEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub word: u32,
}

/// Entry in the ID/EX pipeline latch (Decode to Execute stage).
///
/// Carries the decoded instruction together with the operand values read from
/// the register file. `rv_rd` is the old destination value, read for the
/// multiply-accumulate instruction which treats rd as its accumulator seed.
#[derive(Clone, Copy, Debug)]
pub struct IdExEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Control signals for downstream stages.
    pub ctrl: ControlSignals,
    /// Value read from rs1.
    pub rv1: Word,
    /// Value read from rs2.
    pub rv2: Word,
    /// Old value of rd (accumulator seed for multiply-accumulate).
    pub rv_rd: Word,
}

/// Entry in the EX/MEM pipeline latch (Execute to Memory stage).
#[derive(Clone, Copy, Debug)]
pub struct ExMemEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Control signals for downstream stages.
    pub ctrl: ControlSignals,
    /// ALU or accelerator result; effective byte address for loads and stores.
    pub value: Word,
    /// Value to write to memory (stores only, after forwarding).
    pub store_data: Word,
    /// Result was clamped to the configured precision range.
    pub saturated: bool,
    /// Fault raised in Execute (accelerator window access), surfaced at commit.
    pub fault: Option<AccessFault>,
}

/// Entry in the MEM/WB pipeline latch (Memory to Writeback stage).
#[derive(Clone, Copy, Debug)]
pub struct MemWbEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Control signals for the Writeback stage.
    pub ctrl: ControlSignals,
    /// Final value destined for rd (load data for loads).
    pub value: Word,
    /// Completed store, as (byte address, value).
    pub store: Option<(u32, Word)>,
    /// Result was clamped to the configured precision range.
    pub saturated: bool,
    /// Fault carried forward from Execute or Memory.
    pub fault: Option<AccessFault>,
}

impl ExMemEntry {
    /// Builds the MEM/WB entry for an instruction that bypasses data memory.
    pub fn retire(self) -> MemWbEntry {
        MemWbEntry {
            pc: self.pc,
            inst: self.inst,
            ctrl: self.ctrl,
            value: self.value,
            store: None,
            saturated: self.saturated,
            fault: self.fault,
        }
    }
}

//! Data hazard detection and operand forwarding.
//!
//! This module keeps the pipeline consistent when instructions depend on
//! results that have not yet reached the register file. It provides:
//! 1. **Hazard Detection:** Identifies load-use hazards that require pipeline stalls.
//! 2. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards by bypassing the register file.
//! 3. **Path Classification:** Tags every resolution with the forwarding path taken,
//!    keyed by producer/consumer stage distance, for the coverage tracker.

use serde::Serialize;

use crate::common::Word;
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, MemWbEntry};
use crate::isa::instruction::Instruction;

/// A hazard resolution path through the pipeline.
///
/// The three forwarding variants are keyed by the stage distance between
/// producer and consumer at the moment the value is bypassed; the remaining
/// two cover the cases forwarding cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HazardPath {
    /// Producer one stage ahead: result bypassed from the EX/MEM latch.
    ExecuteToExecute,
    /// Producer two stages ahead: result bypassed from the MEM/WB latch.
    /// Load data always takes this path; it is first available here.
    MemoryToExecute,
    /// Producer retiring in the same cycle the consumer reads the register
    /// file: the write lands first, so the read observes the new value.
    WritebackToDecode,
    /// Load-use dependency too close to forward; the consumer stalls in
    /// Decode until the load data is available.
    LoadUseStall,
    /// Taken branch: the wrong-path instructions behind it are squashed.
    ControlFlush,
}

impl HazardPath {
    /// Every path, in pipeline order. Coverage completeness is judged
    /// against this set.
    pub const ALL: [Self; 5] = [
        Self::ExecuteToExecute,
        Self::MemoryToExecute,
        Self::WritebackToDecode,
        Self::LoadUseStall,
        Self::ControlFlush,
    ];
}

/// Operand values after forwarding, with the paths that produced them.
#[derive(Debug, Clone, Default)]
pub struct Forwarded {
    /// First source operand.
    pub rv1: Word,
    /// Second source operand.
    pub rv2: Word,
    /// Old destination value (multiply-accumulate seed).
    pub rv_rd: Word,
    /// Forwarding paths exercised, one per bypassed source.
    pub paths: Vec<HazardPath>,
}

/// Checks whether the instruction in Decode must stall on a load-use hazard.
///
/// A load's data is produced by the Memory stage, so a dependent instruction
/// cannot enter Execute while the load sits in the EX/MEM latch; it would
/// reach Execute ahead of the data. Decode never runs while ID/EX is
/// occupied, so EX/MEM is the only latch a too-close load can occupy here.
/// The consumer repeats its Decode cycle until the load has moved on to
/// MEM/WB, where forwarding can satisfy it.
pub fn need_stall_load_use(next: &Instruction, ex_mem: Option<&ExMemEntry>) -> bool {
    let Some(rd) = ex_mem.filter(|e| e.ctrl.mem_read).map(|e| e.inst.rd) else {
        return false;
    };
    if rd == 0 {
        return false;
    }
    (next.reads_rs1() && next.rs1 == rd)
        || (next.reads_rs2() && next.rs2 == rd)
        || (next.reads_rd() && next.rd == rd)
}

/// Forwards register values from later pipeline stages into an instruction
/// entering Execute.
///
/// `ex_mem` holds the producer one instruction ahead (its result was computed
/// this cycle); `mem_wb` holds the producer two ahead (it retires this
/// cycle). The nearer producer is applied last so the newest value wins when
/// both write the same register.
pub fn forward_operands(
    entry: &IdExEntry,
    ex_mem: Option<&MemWbEntry>,
    mem_wb: Option<&MemWbEntry>,
) -> Forwarded {
    let mut fwd = Forwarded {
        rv1: entry.rv1,
        rv2: entry.rv2,
        rv_rd: entry.rv_rd,
        paths: Vec::new(),
    };

    for (producer, distance_one) in [(mem_wb, false), (ex_mem, true)] {
        let Some(p) = producer else { continue };
        if p.fault.is_some() || !p.ctrl.reg_write || p.inst.rd == 0 {
            continue;
        }
        // Load data is produced by the Memory stage regardless of which
        // latch it is bypassed from.
        let path = if distance_one && !p.ctrl.mem_read {
            HazardPath::ExecuteToExecute
        } else {
            HazardPath::MemoryToExecute
        };

        let inst = &entry.inst;
        if inst.reads_rs1() && inst.rs1 == p.inst.rd {
            fwd.rv1 = p.value;
            fwd.paths.push(path);
        }
        if inst.reads_rs2() && inst.rs2 == p.inst.rd {
            fwd.rv2 = p.value;
            fwd.paths.push(path);
        }
        if inst.reads_rd() && inst.rd == p.inst.rd {
            fwd.rv_rd = p.value;
            fwd.paths.push(path);
        }
    }

    fwd
}

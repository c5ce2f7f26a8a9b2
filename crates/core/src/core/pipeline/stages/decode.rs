//! Instruction Decode (ID) Stage.
//!
//! Decodes the fetched word, reads source operands from the register file,
//! and performs load-use hazard detection. A dependent instruction repeats
//! its decode cycle while the producing load is still in front of the MEM/WB
//! latch; forwarding covers every other read-after-write distance.

use crate::core::Cpu;
use crate::core::pipeline::hazards::{self, HazardPath};
use crate::core::pipeline::latches::IdExEntry;
use crate::core::pipeline::signals::ControlSignals;
use crate::isa::decode::decode;

/// Executes the instruction decode stage of the pipeline.
///
/// Holds while the ID/EX latch is occupied (Execute is stalled). Register
/// reads happen after this cycle's Writeback has committed, so a producer
/// retiring in the same cycle is observed through the register file; that
/// same-cycle write/read pair is recorded as the writeback-to-decode path.
pub fn decode_stage(cpu: &mut Cpu) {
    if cpu.id_ex.is_some() {
        return;
    }
    let Some(fetched) = cpu.if_id else {
        return;
    };

    let inst = decode(fetched.word);

    if hazards::need_stall_load_use(&inst, cpu.ex_mem.as_ref()) {
        cpu.stats.stalls_data += 1;
        cpu.coverage.record_hazard(HazardPath::LoadUseStall);
        tracing::trace!(pc = fetched.pc, "ID load-use stall");
        return;
    }

    if let Some(done) = cpu.wb_done.as_ref() {
        if done.inst.writes_rd() {
            let rd = done.inst.rd;
            let same_cycle = (inst.reads_rs1() && inst.rs1 == rd)
                || (inst.reads_rs2() && inst.rs2 == rd)
                || (inst.reads_rd() && inst.rd == rd);
            if same_cycle {
                cpu.coverage.record_hazard(HazardPath::WritebackToDecode);
            }
        }
    }

    let entry = IdExEntry {
        pc: fetched.pc,
        ctrl: ControlSignals::derive(&inst),
        rv1: cpu.regs.read(inst.rs1),
        rv2: cpu.regs.read(inst.rs2),
        rv_rd: cpu.regs.read(inst.rd),
        inst,
    };
    tracing::trace!(pc = entry.pc, kind = ?inst.kind, "ID");
    cpu.if_id = None;
    cpu.id_ex = Some(entry);
}

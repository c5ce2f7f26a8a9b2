//! Writeback (WB) Stage.
//!
//! The final stage: commits results to the register file, publishes a commit
//! record for the verification layers, and raises the machine's exit
//! condition when a halt, illegal instruction, or access fault retires.
//! Instructions behind a terminating one never commit.

use crate::common::error::ExitReason;
use crate::core::Cpu;
use crate::isa::instruction::OpKind;
use crate::verify::CommitRecord;

/// Executes the writeback stage of the pipeline.
///
/// Runs first within each cycle, so a value committed here is visible to
/// this cycle's register-file reads in Decode.
pub fn wb_stage(cpu: &mut Cpu) {
    let Some(entry) = cpu.mem_wb.take() else {
        return;
    };

    if let Some(fault) = entry.fault {
        tracing::debug!(pc = entry.pc, %fault, "WB access fault");
        cpu.exit = Some(ExitReason::AccessFault(fault));
        return;
    }
    if entry.inst.kind == OpKind::Illegal {
        tracing::debug!(pc = entry.pc, word = format_args!("{:#010x}", entry.inst.word), "WB illegal instruction");
        cpu.exit = Some(ExitReason::IllegalInstruction(entry.inst.word));
        return;
    }

    let wrote = if entry.inst.writes_rd() {
        cpu.regs.write(entry.inst.rd, entry.value);
        Some((entry.inst.rd, entry.value))
    } else {
        None
    };

    cpu.stats.retired += 1;
    cpu.coverage.record_op(entry.inst.kind);
    if entry.saturated {
        cpu.stats.saturation_events += 1;
        cpu.coverage.record_saturation();
    }

    cpu.commits.push(CommitRecord {
        cycle: cpu.cycle,
        pc: entry.pc,
        inst: entry.inst,
        wrote,
        store: entry.store,
        saturated: entry.saturated,
    });
    tracing::trace!(pc = entry.pc, kind = ?entry.inst.kind, ?wrote, "WB");

    if entry.inst.kind == OpKind::Halt {
        cpu.exit = Some(ExitReason::Halted);
        return;
    }
    cpu.wb_done = Some(entry);
}

//! Execute (EX) Stage.
//!
//! Runs the ALU for base-integer instructions, resolves conditional branches,
//! computes effective addresses for loads and stores, and issues the custom
//! accelerator operations. Multi-cycle accelerator results are held in a
//! pending slot that keeps the stage busy until the declared latency elapses.

use crate::core::Cpu;
use crate::core::cpu::PendingExec;
use crate::core::pipeline::hazards::{self, HazardPath};
use crate::core::pipeline::latches::ExMemEntry;
use crate::core::pipeline::signals::OpBSrc;
use crate::core::units::alu::Alu;
use crate::core::units::{AccelOperands, AccelUnit};
use crate::isa::instruction::OpKind;

/// Executes the execute stage of the pipeline.
///
/// Operand forwarding happens here: the two nearest uncommitted producers
/// are checked before the register-file values carried in the ID/EX entry
/// are used, with the nearer producer taking priority.
pub fn execute_stage(cpu: &mut Cpu) {
    // Drain a multi-cycle accelerator operation before accepting new work.
    if let Some(pending) = cpu.ex_pending.as_mut() {
        if pending.remaining > 1 {
            pending.remaining -= 1;
            cpu.stats.stalls_accel += 1;
            return;
        }
        if cpu.ex_mem.is_none() {
            if let Some(done) = cpu.ex_pending.take() {
                cpu.ex_mem = Some(done.entry);
            }
        } else {
            cpu.stats.stalls_accel += 1;
        }
        return;
    }

    if cpu.ex_mem.is_some() {
        // Memory stage still holds the previous result.
        return;
    }
    let Some(entry) = cpu.id_ex.take() else {
        return;
    };

    let fwd = hazards::forward_operands(&entry, cpu.mem_wb.as_ref(), cpu.wb_done.as_ref());
    for path in &fwd.paths {
        cpu.stats.forwards += 1;
        cpu.coverage.record_hazard(*path);
    }

    let inst = entry.inst;
    let ctrl = entry.ctrl;
    let mut out = ExMemEntry {
        pc: entry.pc,
        inst,
        ctrl,
        value: 0,
        store_data: fwd.rv2,
        saturated: false,
        fault: None,
    };
    let mut latency = 1u64;

    match inst.kind {
        OpKind::Alu => {
            let b = match ctrl.b_src {
                OpBSrc::Reg => fwd.rv2,
                OpBSrc::Imm => inst.imm,
            };
            out.value = Alu::execute(ctrl.alu_op, fwd.rv1, b);
        }
        OpKind::Load | OpKind::Store => {
            out.value = fwd.rv1.wrapping_add(inst.imm);
        }
        OpKind::Branch => {
            if Alu::branch_taken(inst.funct3, fwd.rv1, fwd.rv2) {
                cpu.pc = entry.pc.wrapping_add(inst.imm as u32);
                cpu.if_id = None;
                cpu.stats.flushes += 1;
                cpu.stats.stalls_control += 2;
                cpu.coverage.record_hazard(HazardPath::ControlFlush);
                tracing::trace!(pc = entry.pc, target = cpu.pc, "EX branch taken, flush");
            }
        }
        OpKind::Mac | OpKind::Relu | OpKind::Conv2d | OpKind::Fir | OpKind::Pool => {
            let ops = AccelOperands {
                rs1: fwd.rv1,
                rs2: fwd.rv2,
                rd_old: fwd.rv_rd,
                variant: inst.funct3,
                mem: &cpu.mem,
            };
            let issued = match inst.kind {
                OpKind::Mac => cpu.units.mac.issue(ops, cpu.precision),
                OpKind::Relu => cpu.units.relu.issue(ops, cpu.precision),
                OpKind::Conv2d => cpu.units.conv2d.issue(ops, cpu.precision),
                OpKind::Fir => cpu.units.fir.issue(ops, cpu.precision),
                _ => cpu.units.pool.issue(ops, cpu.precision),
            };
            match issued {
                Ok(result) => {
                    out.value = result.value;
                    out.saturated = result.saturated;
                    latency = result.latency;
                }
                Err(fault) => out.fault = Some(fault),
            }
        }
        OpKind::Halt | OpKind::Illegal => {}
    }

    tracing::trace!(pc = out.pc, kind = ?inst.kind, value = out.value, latency, "EX");
    if latency > 1 {
        cpu.ex_pending = Some(PendingExec {
            entry: out,
            remaining: latency - 1,
        });
    } else {
        cpu.ex_mem = Some(out);
    }
}

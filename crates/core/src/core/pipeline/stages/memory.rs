//! Memory Access (MEM) Stage.
//!
//! Drives the banked data memory. Loads and stores claim a port on the bank
//! that owns their word; a bank with every port busy produces a bank conflict
//! and the stage retries next cycle, stalling everything behind it. Completed
//! accesses move to the MEM/WB latch together with the loaded data.

use crate::core::Cpu;
use crate::mem::Access;

/// Executes the memory access stage of the pipeline.
///
/// Instructions that do not touch data memory pass straight through. An
/// effective address that is misaligned or out of range raises an access
/// fault carried to Writeback; the access itself never starts.
pub fn mem_stage(cpu: &mut Cpu) {
    if cpu.mem_wb.is_some() {
        return;
    }
    let Some(entry) = cpu.ex_mem else {
        return;
    };

    if entry.fault.is_some() || (!entry.ctrl.mem_read && !entry.ctrl.mem_write) {
        cpu.mem_wb = Some(entry.retire());
        cpu.ex_mem = None;
        return;
    }

    let byte_addr = entry.value as u32;
    let word_addr = match cpu.mem.word_index(byte_addr) {
        Ok(idx) => idx,
        Err(fault) => {
            let mut done = entry.retire();
            done.fault = Some(fault);
            cpu.mem_wb = Some(done);
            cpu.ex_mem = None;
            return;
        }
    };

    // Wait out the latency of an access already in flight.
    if let Some(at) = cpu.mem_ready_at {
        if cpu.cycle < at {
            cpu.stats.stalls_mem += 1;
            return;
        }
        complete(cpu, word_addr, byte_addr);
        return;
    }

    let access = if entry.ctrl.mem_read {
        cpu.mem.begin_load(word_addr, cpu.cycle)
    } else {
        cpu.mem.begin_store(word_addr, entry.store_data, cpu.cycle)
    };

    match access {
        Access::BankConflict => {
            cpu.stats.bank_conflicts += 1;
            cpu.stats.stalls_mem += 1;
            tracing::trace!(pc = entry.pc, addr = byte_addr, "MEM bank conflict");
        }
        Access::Ready { at, prefetch_hit } => {
            if prefetch_hit {
                cpu.stats.prefetch_hits += 1;
            }
            // Stores post in their first tick; the bank port stays occupied
            // for the access latency and later accesses contend with it.
            if !entry.ctrl.mem_read || cpu.cycle >= at {
                complete(cpu, word_addr, byte_addr);
            } else {
                cpu.mem_ready_at = Some(at);
                cpu.stats.stalls_mem += 1;
            }
        }
    }
}

/// Moves the finished access from EX/MEM to MEM/WB.
fn complete(cpu: &mut Cpu, word_addr: usize, byte_addr: u32) {
    cpu.mem_ready_at = None;
    let Some(entry) = cpu.ex_mem.take() else {
        return;
    };
    let mut done = entry.retire();
    if entry.ctrl.mem_read {
        done.value = cpu.mem.peek(word_addr);
    } else {
        done.store = Some((byte_addr, entry.store_data));
    }
    tracing::trace!(pc = done.pc, addr = byte_addr, value = done.value, "MEM");
    cpu.mem_wb = Some(done);
}

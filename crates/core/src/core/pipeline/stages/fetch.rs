//! Instruction Fetch (IF) Stage.
//!
//! Reads the next instruction word from program memory at the current PC and
//! deposits it in the IF/ID latch. Program memory is a separate word array
//! with no access latency; all timing effects live in the data-side banks.

use crate::common::WORD_BYTES;
use crate::core::Cpu;
use crate::core::pipeline::latches::IfIdEntry;

/// Executes the instruction fetch stage of the pipeline.
///
/// Fetches one word per cycle while the IF/ID latch is free. A PC that is
/// misaligned or past the end of the program image yields an all-zero word,
/// which decodes as an illegal instruction and stops the machine when it
/// reaches Writeback.
pub fn fetch_stage(cpu: &mut Cpu) {
    if cpu.if_id.is_some() {
        return;
    }

    let word = if cpu.pc % WORD_BYTES == 0 {
        let idx = (cpu.pc / WORD_BYTES) as usize;
        cpu.imem.get(idx).copied().unwrap_or(0)
    } else {
        0
    };

    tracing::trace!(pc = cpu.pc, word = format_args!("{word:#010x}"), "IF");
    cpu.if_id = Some(IfIdEntry { pc: cpu.pc, word });
    cpu.pc = cpu.pc.wrapping_add(WORD_BYTES);
}

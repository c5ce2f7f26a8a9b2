//! Pipeline clocking engine.
//!
//! One call to [`tick`] advances the machine by exactly one clock cycle.
//! Stages run in reverse pipeline order (Writeback first, Fetch last) so
//! every stage consumes the latch contents its predecessor produced on the
//! previous cycle; no instruction moves through two stages in one tick.

use crate::core::Cpu;
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage};

/// Advances the pipeline by one clock cycle.
///
/// When the retiring instruction raises an exit condition the remaining
/// stages are skipped; the latches keep their contents for post-mortem
/// inspection and the machine never commits past the exit point.
pub fn tick(cpu: &mut Cpu) {
    cpu.cycle += 1;
    cpu.stats.cycles += 1;
    cpu.wb_done = None;

    wb_stage(cpu);
    if cpu.exit.is_some() {
        return;
    }
    mem_stage(cpu);
    execute_stage(cpu);
    decode_stage(cpu);
    fetch_stage(cpu);
}

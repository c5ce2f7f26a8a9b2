//! Machine state for the pipelined core.
//!
//! The [`Cpu`] owns everything a cycle touches: the program counter, the
//! register file, both memories, the execution units, the inter-stage
//! latches, and the bookkeeping the verification layers consume. The stages
//! in [`crate::core::pipeline`] mutate this state; the engine clocks it.

use crate::common::error::ExitReason;
use crate::config::{Config, Precision};
use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, MemWbEntry};
use crate::core::units::AccelUnits;
use crate::mem::MemorySubsystem;
use crate::stats::SimStats;
use crate::verify::{CommitRecord, CoverageTracker};

/// A multi-cycle accelerator result waiting out its latency in Execute.
#[derive(Debug, Clone, Copy)]
pub struct PendingExec {
    /// The finished result, released when `remaining` reaches zero.
    pub entry: ExMemEntry,
    /// Cycles left before the result may leave the stage.
    pub remaining: u64,
}

/// The complete architectural and microarchitectural state of the machine.
#[derive(Debug, Clone)]
pub struct Cpu {
    /// Program counter of the next instruction to fetch.
    pub pc: u32,
    /// General-purpose register file.
    pub regs: Gpr,
    /// Program memory, one word per instruction slot.
    pub imem: Vec<u32>,
    /// Banked data memory.
    pub mem: MemorySubsystem,
    /// The five fixed-function accelerator units.
    pub units: AccelUnits,
    /// Numeric precision every datapath narrows and saturates to.
    pub precision: Precision,

    /// Current cycle number; the first tick is cycle 1.
    pub cycle: u64,
    /// IF/ID latch.
    pub if_id: Option<IfIdEntry>,
    /// ID/EX latch.
    pub id_ex: Option<IdExEntry>,
    /// EX/MEM latch.
    pub ex_mem: Option<ExMemEntry>,
    /// MEM/WB latch.
    pub mem_wb: Option<MemWbEntry>,
    /// The entry retired by Writeback this cycle, for same-cycle forwarding.
    pub wb_done: Option<MemWbEntry>,
    /// Multi-cycle accelerator operation occupying Execute.
    pub ex_pending: Option<PendingExec>,
    /// Completion cycle of the data-memory access in flight.
    pub mem_ready_at: Option<u64>,

    /// Set when the machine has stopped; no instruction commits afterwards.
    pub exit: Option<ExitReason>,
    /// Performance counters.
    pub stats: SimStats,
    /// Coverage counters fed by Writeback and the hazard unit.
    pub coverage: CoverageTracker,
    /// Commit records not yet drained by the simulator.
    pub commits: Vec<CommitRecord>,
}

impl Cpu {
    /// Builds a machine from a validated configuration with empty program
    /// memory and zeroed architectural state.
    pub fn new(config: &Config) -> Self {
        Self {
            pc: 0,
            regs: Gpr::new(),
            imem: vec![0; config.memory.imem_words],
            mem: MemorySubsystem::new(&config.memory),
            units: AccelUnits::new(config),
            precision: config.general.precision,
            cycle: 0,
            if_id: None,
            id_ex: None,
            ex_mem: None,
            mem_wb: None,
            wb_done: None,
            ex_pending: None,
            mem_ready_at: None,
            exit: None,
            stats: SimStats::default(),
            coverage: CoverageTracker::new(),
            commits: Vec::new(),
        }
    }

    /// True while the machine can still make progress.
    pub fn running(&self) -> bool {
        self.exit.is_none()
    }

    /// Removes and returns the commit records accumulated since the last
    /// drain, oldest first.
    pub fn drain_commits(&mut self) -> Vec<CommitRecord> {
        std::mem::take(&mut self.commits)
    }
}

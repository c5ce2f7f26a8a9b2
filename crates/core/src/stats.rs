//! Simulation statistics collection and reporting.
//!
//! This module tracks performance counters for the pipeline model. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics.
//! 2. **Stalls:** Data, control, memory, and accelerator-occupancy stall counts.
//! 3. **Memory behavior:** Bank conflicts and prefetch hits.
//! 4. **Numeric behavior:** Saturation events under the configured precision.

use serde::Serialize;

/// Performance counters accumulated over a run.
///
/// All counters are monotonically increasing; the struct serializes directly
/// into the machine-readable run report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub retired: u64,
    /// Stall cycles due to load-use data hazards.
    pub stalls_data: u64,
    /// Stall cycles due to control hazards (taken-branch flushes).
    pub stalls_control: u64,
    /// Stall cycles waiting on data memory (latency and bank conflicts).
    pub stalls_mem: u64,
    /// Stall cycles waiting on a busy multi-cycle accelerator unit.
    pub stalls_accel: u64,
    /// Operand values bypassed around the register file.
    pub forwards: u64,
    /// Taken-branch pipeline flushes.
    pub flushes: u64,
    /// Accesses rejected because every port of the target bank was busy.
    pub bank_conflicts: u64,
    /// Loads satisfied by the stride prefetcher.
    pub prefetch_hits: u64,
    /// Results clamped to the configured precision range.
    pub saturation_events: u64,
}

impl SimStats {
    /// Instructions per cycle; zero when no cycle has elapsed.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.retired as f64 / self.cycles as f64
        }
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        let cyc = self.cycles.max(1);
        println!("\n==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.retired);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("----------------------------------------------------------");
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            (self.stalls_data as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            (self.stalls_control as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.memory          {} ({:.2}%)",
            self.stalls_mem,
            (self.stalls_mem as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.accel           {} ({:.2}%)",
            self.stalls_accel,
            (self.stalls_accel as f64 / cyc as f64) * 100.0
        );
        println!("  forwards               {}", self.forwards);
        println!("  flushes                {}", self.flushes);
        println!("  mem.bank_conflicts     {}", self.bank_conflicts);
        println!("  mem.prefetch_hits      {}", self.prefetch_hits);
        println!("  precision.saturations  {}", self.saturation_events);
        println!("==========================================================");
    }
}

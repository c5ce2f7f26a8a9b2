//! Test harness: a simulator with fluent program and data loading.

use rvnn_core::Simulator;
use rvnn_core::common::Word;
use rvnn_core::config::Config;
use rvnn_core::core::Cpu;
use rvnn_core::sim::RunReport;

/// Owns a full simulator for end-to-end pipeline tests.
pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Builds a context with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Builds a context with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let sim = match Simulator::new(config) {
            Ok(sim) => sim,
            Err(e) => panic!("test configuration must validate: {e}"),
        };
        Self { sim }
    }

    /// Loads a program at address zero.
    pub fn load_program(mut self, instructions: &[u32]) -> Self {
        self.sim
            .load_words(instructions)
            .unwrap_or_else(|e| panic!("program must fit: {e}"));
        self
    }

    /// Seeds data memory starting at the given word address.
    pub fn load_data(mut self, base: usize, values: &[Word]) -> Self {
        self.sim.load_data(base, values);
        self
    }

    /// Convenience accessor for the machine state.
    pub fn cpu(&self) -> &Cpu {
        self.sim.cpu()
    }

    /// Reads a general-purpose register.
    pub fn reg(&self, idx: usize) -> Word {
        self.cpu().regs.read(idx)
    }

    /// Reads a data-memory word.
    pub fn mem(&self, word_addr: usize) -> Word {
        self.cpu().mem.peek(word_addr)
    }

    /// Runs to termination and returns the report.
    pub fn run(&mut self) -> RunReport {
        self.sim.run()
    }

    /// Advances the machine a fixed number of cycles.
    pub fn run_cycles(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.tick();
        }
    }
}

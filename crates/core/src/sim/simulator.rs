//! Top-level simulator: the machine plus its verification layers.
//!
//! Owns the [`Cpu`], the golden-model oracle, and the commit trace
//! side-by-side, wiring the Writeback commit stream into each on every tick.
//! Independent instances share nothing; two simulators with the same
//! configuration and image replay identical cycle-for-cycle histories.

use serde::Serialize;

use crate::common::Word;
use crate::common::error::{ConfigError, ExitReason, LoadError};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::pipeline::engine;
use crate::sim::loader;
use crate::stats::SimStats;
use crate::verify::{CommitRecord, CorrectnessFault, CoverageReport, Oracle};

/// Callback invoked once per committed instruction, in commit order.
pub type CommitObserver = Box<dyn FnMut(&CommitRecord) + Send>;

/// End-of-run summary, serializable as the machine-readable report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Why the run stopped.
    pub exit: ExitReason,
    /// Performance counters for the whole run.
    pub stats: SimStats,
    /// Coverage snapshot at the end of the run.
    pub coverage: CoverageReport,
    /// Oracle divergences observed during the run.
    pub faults: Vec<CorrectnessFault>,
    /// True when the run halted normally and the oracle stayed clean.
    pub passed: bool,
}

/// Top-level simulator instance.
pub struct Simulator {
    cpu: Cpu,
    oracle: Oracle,
    config: Config,
    trace: Vec<CommitRecord>,
    observer: Option<CommitObserver>,
}

impl Simulator {
    /// Builds a simulator from a configuration, validating it first.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let cpu = Cpu::new(&config);
        let oracle = Oracle::new(&config, cpu.mem.snapshot());
        Ok(Self {
            cpu,
            oracle,
            config,
            trace: Vec::new(),
            observer: None,
        })
    }

    /// Loads a raw little-endian program image at address zero.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let words = loader::parse_image(bytes, self.cpu.imem.len())?;
        self.load_words(&words)
    }

    /// Loads pre-assembled instruction words at address zero.
    pub fn load_words(&mut self, words: &[u32]) -> Result<(), LoadError> {
        if words.len() > self.cpu.imem.len() {
            return Err(LoadError::ImageTooLarge {
                words: words.len(),
                capacity: self.cpu.imem.len(),
            });
        }
        self.cpu.imem[..words.len()].copy_from_slice(words);
        Ok(())
    }

    /// Seeds data memory starting at the given word address, mirrored into
    /// the oracle's shadow image.
    pub fn load_data(&mut self, base: usize, values: &[Word]) {
        self.cpu.mem.load_words(base, values);
        self.oracle.load_words(base, values);
    }

    /// Registers a callback observing every committed instruction.
    pub fn set_commit_observer(&mut self, observer: CommitObserver) {
        self.observer = Some(observer);
    }

    /// Advances the machine by one clock cycle and drains the commit stream
    /// through the oracle, the trace buffer, and the observer.
    pub fn tick(&mut self) {
        if !self.cpu.running() {
            return;
        }
        engine::tick(&mut self.cpu);

        for rec in self.cpu.drain_commits() {
            self.oracle.check(&rec);
            if let Some(observer) = self.observer.as_mut() {
                observer(&rec);
            }
            if self.config.general.trace_commits {
                self.trace.push(rec);
            }
        }

        if self.cpu.running() && self.cpu.cycle >= self.config.general.max_cycles {
            tracing::debug!(cycles = self.cpu.cycle, "cycle budget exceeded");
            self.cpu.exit = Some(ExitReason::Timeout);
        }
    }

    /// Runs until the machine stops, returning the end-of-run report.
    pub fn run(&mut self) -> RunReport {
        while self.cpu.running() {
            self.tick();
        }
        self.report()
    }

    /// Builds the report for the run so far.
    pub fn report(&self) -> RunReport {
        let exit = self.cpu.exit.unwrap_or(ExitReason::Timeout);
        RunReport {
            exit,
            stats: self.cpu.stats.clone(),
            coverage: self.cpu.coverage.report(),
            faults: self.oracle.faults().to_vec(),
            passed: self.oracle.is_clean() && exit == ExitReason::Halted,
        }
    }

    /// The machine state, for register and memory inspection.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable machine state, for test harnesses.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Performance counters accumulated so far.
    pub fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Cycle-indexed committed-instruction trace. Populated only when
    /// `general.trace_commits` is set.
    pub fn trace(&self) -> &[CommitRecord] {
        &self.trace
    }

    /// Oracle divergences recorded so far.
    pub fn faults(&self) -> &[CorrectnessFault] {
        self.oracle.faults()
    }
}

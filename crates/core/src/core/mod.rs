//! CPU core: architectural state, pipeline, and execution units.

pub mod arch;
pub mod cpu;
pub mod pipeline;
pub mod units;

pub use cpu::Cpu;

//! Configuration system for the simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory geometry, unit parameters).
//! 2. **Structures:** Hierarchical config for general, memory, and accelerator units.
//! 3. **Validation:** `Config::validate` raises every configuration fault before a
//!    run starts; a simulator is never constructed from an invalid config.
//!
//! Configuration is supplied as JSON (`serde_json`) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration document.
mod defaults {
    /// Data memory size in 32-bit words (64 KiW = 256 KiB).
    pub const MEMORY_WORDS: usize = 64 * 1024;

    /// Instruction memory capacity in 32-bit words.
    pub const IMEM_WORDS: usize = 16 * 1024;

    /// Number of memory banks (2-8).
    pub const BANK_COUNT: usize = 4;

    /// Per-access bank latency in cycles.
    pub const BANK_LATENCY: u64 = 2;

    /// Bank-interleave stride in words (used by stride mapping).
    pub const BANK_STRIDE: usize = 1;

    /// Prefetch stride in words (0 disables the prefetcher).
    pub const PREFETCH_STRIDE: usize = 0;

    /// Prefetch window: addresses prefetched ahead per trigger.
    pub const PREFETCH_WINDOW: usize = 4;

    /// FIR tap count.
    pub const FIR_TAPS: usize = 8;

    /// Pooling window edge length.
    pub const POOL_WINDOW: usize = 2;

    /// Pooling element stride (1 = dense window).
    pub const POOL_STRIDE: usize = 1;

    /// Maximum cycles before a run is marked as timed out.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Operand precision mode, fixed for the duration of a run.
///
/// Selects the operand width and the saturation bounds applied by the
/// accelerator datapaths. The base ALU always operates at the 32-bit
/// architectural width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Precision {
    /// 8-bit operands; results clamp to [-128, 127].
    Int8,
    /// 16-bit operands; results clamp to [-32768, 32767].
    Int16,
    /// 32-bit operands; results clamp to the i32 range.
    #[default]
    Int32,
}

impl Precision {
    /// Operand width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Int8 => 8,
            Self::Int16 => 16,
            Self::Int32 => 32,
        }
    }

    /// Largest representable value at this precision.
    pub fn max(self) -> i64 {
        (1i64 << (self.bits() - 1)) - 1
    }

    /// Smallest representable value at this precision.
    pub fn min(self) -> i64 {
        -(1i64 << (self.bits() - 1))
    }
}

/// Address-to-bank mapping function, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BankMapping {
    /// Word address modulo bank count (fine interleave).
    #[default]
    Modulo,
    /// Word address divided by a configured stride, then modulo bank count
    /// (block interleave).
    Stride,
}

/// Bank port configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PortMode {
    /// One in-flight access per bank per tick.
    #[default]
    Single,
    /// Two in-flight accesses per bank per tick.
    Dual,
}

impl PortMode {
    /// Number of ports implied by this mode.
    pub fn ports(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
        }
    }
}

/// Conv2D kernel edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum KernelSize {
    /// 3x3 kernel.
    #[default]
    #[serde(rename = "3x3")]
    K3,
    /// 5x5 kernel.
    #[serde(rename = "5x5")]
    K5,
}

impl KernelSize {
    /// Kernel edge length in elements.
    pub fn edge(self) -> usize {
        match self {
            Self::K3 => 3,
            Self::K5 => 5,
        }
    }

    /// Kernel area (coefficient count and latency in cycles).
    pub fn area(self) -> usize {
        self.edge() * self.edge()
    }
}

/// Pooling reduction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PoolMode {
    /// Maximum over the window.
    #[default]
    Max,
    /// Average over the window, floored before saturation.
    Average,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use rvnn_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.memory.banks, 4);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use rvnn_core::config::{Config, Precision, PoolMode};
///
/// let json = r#"{
///     "general": { "precision": "INT8", "max_cycles": 50000 },
///     "memory":  { "banks": 2, "port_mode": "Dual", "latency": 3 },
///     "units":   { "pool": { "mode": "Average", "window": 2 } }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.general.precision, Precision::Int8);
/// assert_eq!(config.units.pool.mode, PoolMode::Average);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory subsystem geometry and timing.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Accelerator unit parameters and coefficient tables.
    #[serde(default)]
    pub units: UnitsConfig,
}

impl Config {
    /// Checks every configuration invariant, returning the first violation.
    ///
    /// Operand/coefficient-table size mismatches for the accelerator units are
    /// configuration faults reported here, before any tick executes — never
    /// per-operation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=8).contains(&self.memory.banks) {
            return Err(ConfigError::BankCount(self.memory.banks));
        }
        if self.memory.bank_stride == 0 {
            return Err(ConfigError::ZeroBankStride);
        }
        if self.memory.size_words == 0 || self.memory.size_words % self.memory.banks != 0 {
            return Err(ConfigError::MemorySize {
                words: self.memory.size_words,
                banks: self.memory.banks,
            });
        }
        if self.general.max_cycles == 0 {
            return Err(ConfigError::ZeroMaxCycles);
        }

        let kernel = self.units.conv2d.kernel;
        if self.units.conv2d.coefficients.len() != kernel.area() {
            return Err(ConfigError::KernelCoefficients {
                kernel: kernel.edge(),
                expected: kernel.area(),
                got: self.units.conv2d.coefficients.len(),
            });
        }

        if !(1..=64).contains(&self.units.fir.taps) {
            return Err(ConfigError::TapCount(self.units.fir.taps));
        }
        if self.units.fir.coefficients.len() != self.units.fir.taps {
            return Err(ConfigError::TapCoefficients {
                taps: self.units.fir.taps,
                got: self.units.fir.coefficients.len(),
            });
        }

        if !(2..=8).contains(&self.units.pool.window) {
            return Err(ConfigError::PoolWindow(self.units.pool.window));
        }
        if self.units.pool.stride == 0 {
            return Err(ConfigError::ZeroPoolStride);
        }

        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Operand precision for the accelerator datapaths.
    #[serde(default)]
    pub precision: Precision,

    /// Maximum cycles before the run is marked as timed out.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Record a cycle-indexed trace of every committed instruction.
    #[serde(default)]
    pub trace_commits: bool,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            max_cycles: defaults::MAX_CYCLES,
            trace_commits: false,
        }
    }
}

/// Memory subsystem configuration.
///
/// Data memory is word-addressable and split over 2-8 banks; the
/// address-to-bank mapping is a fixed modulo or stride function chosen here.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Data memory size in 32-bit words.
    #[serde(default = "MemoryConfig::default_size_words")]
    pub size_words: usize,

    /// Instruction memory capacity in 32-bit words.
    #[serde(default = "MemoryConfig::default_imem_words")]
    pub imem_words: usize,

    /// Number of banks (2-8).
    #[serde(default = "MemoryConfig::default_banks")]
    pub banks: usize,

    /// Ports per bank.
    #[serde(default)]
    pub port_mode: PortMode,

    /// Per-access latency in cycles.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// Address-to-bank mapping function.
    #[serde(default)]
    pub mapping: BankMapping,

    /// Interleave stride in words (used by `BankMapping::Stride`).
    #[serde(default = "MemoryConfig::default_bank_stride")]
    pub bank_stride: usize,

    /// Prefetch stride in words; 0 disables prefetching.
    #[serde(default = "MemoryConfig::default_prefetch_stride")]
    pub prefetch_stride: usize,

    /// Prefetch window: addresses fetched ahead per triggering load.
    #[serde(default = "MemoryConfig::default_prefetch_window")]
    pub prefetch_window: usize,
}

impl MemoryConfig {
    fn default_size_words() -> usize {
        defaults::MEMORY_WORDS
    }

    fn default_imem_words() -> usize {
        defaults::IMEM_WORDS
    }

    fn default_banks() -> usize {
        defaults::BANK_COUNT
    }

    fn default_latency() -> u64 {
        defaults::BANK_LATENCY
    }

    fn default_bank_stride() -> usize {
        defaults::BANK_STRIDE
    }

    fn default_prefetch_stride() -> usize {
        defaults::PREFETCH_STRIDE
    }

    fn default_prefetch_window() -> usize {
        defaults::PREFETCH_WINDOW
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_words: defaults::MEMORY_WORDS,
            imem_words: defaults::IMEM_WORDS,
            banks: defaults::BANK_COUNT,
            port_mode: PortMode::default(),
            latency: defaults::BANK_LATENCY,
            mapping: BankMapping::default(),
            bank_stride: defaults::BANK_STRIDE,
            prefetch_stride: defaults::PREFETCH_STRIDE,
            prefetch_window: defaults::PREFETCH_WINDOW,
        }
    }
}

/// Accelerator unit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitsConfig {
    /// Conv2D kernel size and coefficient table.
    #[serde(default)]
    pub conv2d: Conv2dConfig,
    /// FIR tap count and coefficient table.
    #[serde(default)]
    pub fir: FirConfig,
    /// Pooling mode, window, and element stride.
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Conv2D unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Conv2dConfig {
    /// Kernel edge length (3x3 or 5x5).
    #[serde(default)]
    pub kernel: KernelSize,

    /// Row-major coefficient table; length must equal the kernel area.
    #[serde(default = "Conv2dConfig::default_coefficients")]
    pub coefficients: Vec<i32>,
}

impl Conv2dConfig {
    /// Identity kernel: zero everywhere except 1 at the center.
    fn default_coefficients() -> Vec<i32> {
        let area = KernelSize::default().area();
        let mut coeffs = vec![0; area];
        coeffs[area / 2] = 1;
        coeffs
    }
}

impl Default for Conv2dConfig {
    fn default() -> Self {
        Self {
            kernel: KernelSize::default(),
            coefficients: Self::default_coefficients(),
        }
    }
}

/// FIR unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FirConfig {
    /// Tap count (sample buffer depth).
    #[serde(default = "FirConfig::default_taps")]
    pub taps: usize,

    /// Coefficient table; length must equal the tap count.
    #[serde(default = "FirConfig::default_coefficients")]
    pub coefficients: Vec<i32>,
}

impl FirConfig {
    fn default_taps() -> usize {
        defaults::FIR_TAPS
    }

    /// Pass-through filter: [1, 0, 0, ...].
    fn default_coefficients() -> Vec<i32> {
        let mut coeffs = vec![0; defaults::FIR_TAPS];
        coeffs[0] = 1;
        coeffs
    }
}

impl Default for FirConfig {
    fn default() -> Self {
        Self {
            taps: defaults::FIR_TAPS,
            coefficients: Self::default_coefficients(),
        }
    }
}

/// Pooling unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Reduction mode applied when the instruction's funct3 selects the
    /// configured default (funct3 still overrides per-instruction).
    #[serde(default)]
    pub mode: PoolMode,

    /// Window edge length (NxN).
    #[serde(default = "PoolConfig::default_window")]
    pub window: usize,

    /// Element stride within a window row (1 = dense, >1 = dilated).
    #[serde(default = "PoolConfig::default_stride")]
    pub stride: usize,
}

impl PoolConfig {
    fn default_window() -> usize {
        defaults::POOL_WINDOW
    }

    fn default_stride() -> usize {
        defaults::POOL_STRIDE
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            mode: PoolMode::default(),
            window: defaults::POOL_WINDOW,
            stride: defaults::POOL_STRIDE,
        }
    }
}

//! General-purpose register file.
//!
//! This module implements the architectural register file. It performs the following:
//! 1. **Storage:** Maintains 32 signed 32-bit registers (`x0`-`x31`).
//! 2. **Invariant enforcement:** Register `x0` is hardwired to zero; writes to
//!    it are silently discarded.
//! 3. **Debugging:** Provides a dump of the complete register state.

use crate::common::Word;

/// General-purpose register file: 32 fixed-width signed integers.
#[derive(Debug, Clone)]
pub struct Gpr {
    regs: [Word; 32],
}

impl Gpr {
    /// Creates a register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads a register. Register `x0` always returns 0.
    #[inline]
    pub fn read(&self, idx: usize) -> Word {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a register. Writes to `x0` are discarded.
    #[inline]
    pub fn write(&mut self, idx: usize, val: Word) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Returns a snapshot of all 32 registers (x0 reported as 0).
    pub fn snapshot(&self) -> [Word; 32] {
        let mut out = self.regs;
        out[0] = 0;
        out
    }

    /// Formats the contents of all registers, two per line, for state dumps.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for i in (0..32).step_by(2) {
            out.push_str(&format!(
                "x{:<2}={:#010x} x{:<2}={:#010x}\n",
                i,
                self.read(i),
                i + 1,
                self.read(i + 1)
            ));
        }
        out
    }
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}

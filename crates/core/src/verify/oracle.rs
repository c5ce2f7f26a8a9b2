//! Golden-model oracle.
//!
//! An independent single-cycle functional model of the instruction set. It
//! consumes the commit stream in order and recomputes every architectural
//! effect from its own shadow state: register file, data memory, program
//! counter, and the FIR sample history. Any disagreement with what the
//! pipeline actually committed is recorded as a correctness fault; faults
//! are diagnostics, never panics, and the run continues.

use std::collections::VecDeque;

use serde::Serialize;

use crate::common::{WORD_BYTES, Word};
use crate::config::{Config, KernelSize, PoolMode, Precision};
use crate::core::units::alu::Alu;
use crate::core::units::saturate::{clamp, narrow, wrap};
use crate::core::pipeline::signals::{ControlSignals, OpBSrc};
use crate::isa::instruction::{Instruction, OpKind};
use crate::isa::opcodes::funct3;
use crate::verify::CommitRecord;

/// The effect the oracle disagreed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Mismatch {
    /// The instruction committed at an unexpected program counter.
    Pc {
        /// Program counter the oracle expected next.
        expected: u32,
        /// Program counter the pipeline committed.
        got: u32,
    },
    /// The register write differed (destination or value).
    Write {
        /// Write the oracle computed, as (rd, value).
        expected: Option<(usize, Word)>,
        /// Write the pipeline performed.
        got: Option<(usize, Word)>,
    },
    /// The memory write differed (address or value).
    Store {
        /// Store the oracle computed, as (byte address, value).
        expected: Option<(u32, Word)>,
        /// Store the pipeline performed.
        got: Option<(u32, Word)>,
    },
}

/// One disagreement between the pipeline and the golden model.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectnessFault {
    /// Cycle in which the offending instruction retired.
    pub cycle: u64,
    /// Program counter of the offending instruction.
    pub pc: u32,
    /// Raw encoding of the offending instruction.
    pub word: u32,
    /// What diverged.
    pub mismatch: Mismatch,
}

/// Shadow machine cross-checking the commit stream.
///
/// After recording a fault the shadow state is resynchronized to the
/// pipeline's observed effects, so one divergence produces one fault rather
/// than a cascade.
#[derive(Debug, Clone)]
pub struct Oracle {
    precision: Precision,
    pc: u32,
    regs: [Word; 32],
    mem: Vec<Word>,
    conv_kernel: KernelSize,
    conv_coefficients: Vec<Word>,
    fir_coefficients: Vec<Word>,
    fir_samples: VecDeque<i64>,
    pool_mode: PoolMode,
    pool_window: usize,
    pool_stride: usize,
    faults: Vec<CorrectnessFault>,
    checked: u64,
}

impl Oracle {
    /// Builds the shadow machine from the validated configuration and the
    /// initial data-memory image.
    pub fn new(config: &Config, image: Vec<Word>) -> Self {
        Self {
            precision: config.general.precision,
            pc: 0,
            regs: [0; 32],
            mem: image,
            conv_kernel: config.units.conv2d.kernel,
            conv_coefficients: config.units.conv2d.coefficients.clone(),
            fir_coefficients: config.units.fir.coefficients.clone(),
            fir_samples: VecDeque::from(vec![0; config.units.fir.taps]),
            pool_mode: config.units.pool.mode,
            pool_window: config.units.pool.window,
            pool_stride: config.units.pool.stride,
            faults: Vec::new(),
            checked: 0,
        }
    }

    /// Mirrors a data-image write into the shadow memory.
    pub fn load_words(&mut self, base: usize, values: &[Word]) {
        for (i, value) in values.iter().enumerate() {
            if let Some(slot) = self.mem.get_mut(base + i) {
                *slot = *value;
            }
        }
    }

    /// Instructions checked so far.
    pub fn checked(&self) -> u64 {
        self.checked
    }

    /// True when no divergence has been recorded.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    /// The faults recorded so far.
    pub fn faults(&self) -> &[CorrectnessFault] {
        &self.faults
    }

    /// Cross-checks one committed instruction and advances the shadow state.
    pub fn check(&mut self, rec: &CommitRecord) {
        self.checked += 1;
        let inst = rec.inst;

        if rec.pc != self.pc {
            self.push_fault(rec, Mismatch::Pc {
                expected: self.pc,
                got: rec.pc,
            });
            self.pc = rec.pc;
        }

        let expected_write = self.expected_write(&inst);
        let expected_store = self.expected_store(&inst);

        if expected_write != rec.wrote {
            self.push_fault(rec, Mismatch::Write {
                expected: expected_write,
                got: rec.wrote,
            });
        }
        if expected_store != rec.store {
            self.push_fault(rec, Mismatch::Store {
                expected: expected_store,
                got: rec.store,
            });
        }

        // Next-pc must be derived before the register resync below.
        let next_pc = match inst.kind {
            OpKind::Branch if Alu::branch_taken(inst.funct3, self.reg(inst.rs1), self.reg(inst.rs2)) => {
                self.pc.wrapping_add(inst.imm as u32)
            }
            OpKind::Halt => self.pc,
            _ => self.pc.wrapping_add(WORD_BYTES),
        };

        // Resynchronize to the observed effects.
        if let Some((rd, value)) = rec.wrote {
            if rd != 0 {
                self.regs[rd] = value;
            }
        }
        if let Some((addr, value)) = rec.store {
            let idx = (addr / WORD_BYTES) as usize;
            if idx < self.mem.len() {
                self.mem[idx] = value;
            }
        }
        self.pc = next_pc;
    }

    fn push_fault(&mut self, rec: &CommitRecord, mismatch: Mismatch) {
        tracing::warn!(pc = rec.pc, cycle = rec.cycle, ?mismatch, "oracle divergence");
        self.faults.push(CorrectnessFault {
            cycle: rec.cycle,
            pc: rec.pc,
            word: rec.inst.word,
            mismatch,
        });
    }

    fn reg(&self, idx: usize) -> Word {
        self.regs[idx]
    }

    /// Reads a shadow-memory word addressed relative to a window base.
    fn window(&self, base_word: i64, offset: i64) -> i64 {
        let idx = base_word + offset;
        if idx < 0 {
            return 0;
        }
        narrow(
            self.mem.get(idx as usize).copied().unwrap_or(0),
            self.precision,
        )
    }

    fn expected_write(&mut self, inst: &Instruction) -> Option<(usize, Word)> {
        if !inst.writes_rd() {
            return None;
        }
        let p = self.precision;
        let a = self.reg(inst.rs1);
        let b = self.reg(inst.rs2);

        let value = match inst.kind {
            OpKind::Alu => {
                let ctrl = ControlSignals::derive(inst);
                let rhs = match ctrl.b_src {
                    OpBSrc::Reg => b,
                    OpBSrc::Imm => inst.imm,
                };
                Alu::execute(ctrl.alu_op, a, rhs)
            }
            OpKind::Load => {
                let idx = (a.wrapping_add(inst.imm) as u32 / WORD_BYTES) as usize;
                self.mem.get(idx).copied().unwrap_or(0)
            }
            OpKind::Mac => {
                let sum = narrow(self.reg(inst.rd), p) + narrow(a, p) * narrow(b, p);
                if inst.funct3 == funct3::MAC_WRAP {
                    wrap(sum, p)
                } else {
                    clamp(sum, p).0
                }
            }
            OpKind::Relu => narrow(a, p).max(0) as Word,
            OpKind::Conv2d => {
                let base = i64::from(a) / i64::from(WORD_BYTES);
                let stride = i64::from(b);
                let edge = self.conv_kernel.edge();
                let mut sum: i64 = 0;
                for r in 0..edge {
                    for c in 0..edge {
                        let coeff = narrow(self.conv_coefficients[r * edge + c], p);
                        sum = sum
                            .saturating_add(coeff * self.window(base, r as i64 * stride + c as i64));
                    }
                }
                clamp(sum, p).0
            }
            OpKind::Fir => {
                self.fir_samples.push_front(narrow(a, p));
                let _ = self.fir_samples.pop_back();
                let mut sum: i64 = 0;
                for (coeff, sample) in self.fir_coefficients.iter().zip(self.fir_samples.iter()) {
                    sum = sum.saturating_add(narrow(*coeff, p) * sample);
                }
                clamp(sum, p).0
            }
            OpKind::Pool => {
                let base = i64::from(a) / i64::from(WORD_BYTES);
                let stride = i64::from(b);
                let mut max = i64::MIN;
                let mut sum: i64 = 0;
                for r in 0..self.pool_window {
                    for c in 0..self.pool_window {
                        let offset = r as i64 * stride + (c * self.pool_stride) as i64;
                        let sample = self.window(base, offset);
                        max = max.max(sample);
                        sum += sample;
                    }
                }
                let mode = match inst.funct3 {
                    funct3::POOL_AVG => PoolMode::Average,
                    funct3::POOL_MAX => PoolMode::Max,
                    _ => self.pool_mode,
                };
                let reduced = match mode {
                    PoolMode::Max => max,
                    PoolMode::Average => {
                        sum.div_euclid((self.pool_window * self.pool_window) as i64)
                    }
                };
                clamp(reduced, p).0
            }
            OpKind::Store | OpKind::Branch | OpKind::Halt | OpKind::Illegal => return None,
        };
        Some((inst.rd, value))
    }

    fn expected_store(&self, inst: &Instruction) -> Option<(u32, Word)> {
        if inst.kind != OpKind::Store {
            return None;
        }
        let addr = self.reg(inst.rs1).wrapping_add(inst.imm) as u32;
        Some((addr, self.reg(inst.rs2)))
    }
}

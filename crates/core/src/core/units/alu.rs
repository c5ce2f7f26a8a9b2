//! Base integer ALU.
//!
//! Executes the R-type/I-type arithmetic subset and evaluates branch
//! conditions. All base arithmetic is 32-bit wrapping; saturation is an
//! accelerator-datapath concern only.

use crate::common::Word;
use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit for base integer operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alu;

impl Alu {
    /// Executes an ALU operation on two operands.
    pub fn execute(op: AluOp, a: Word, b: Word) -> Word {
        match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Sll => a.wrapping_shl(b as u32 & 0x1F),
            AluOp::Slt => Word::from(a < b),
            AluOp::Sltu => Word::from((a as u32) < (b as u32)),
            AluOp::Xor => a ^ b,
            AluOp::Srl => ((a as u32).wrapping_shr(b as u32 & 0x1F)) as Word,
            AluOp::Sra => a.wrapping_shr(b as u32 & 0x1F),
            AluOp::Or => a | b,
            AluOp::And => a & b,
            AluOp::CopyB => b,
        }
    }

    /// Evaluates a branch condition (funct3-selected comparison).
    pub fn branch_taken(funct3: u32, a: Word, b: Word) -> bool {
        use crate::isa::opcodes::funct3 as f3;
        match funct3 {
            f3::BEQ => a == b,
            f3::BNE => a != b,
            f3::BLT => a < b,
            f3::BGE => a >= b,
            f3::BLTU => (a as u32) < (b as u32),
            f3::BGEU => (a as u32) >= (b as u32),
            _ => false,
        }
    }
}

//! Instruction representation and field extraction.
//!
//! Provides bit extraction for the R/I/S/B/U instruction formats and the
//! typed `Instruction` descriptor produced by the decoder. An `Instruction`
//! is immutable once decoded.

use serde::Serialize;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting a 5-bit register index field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;

/// Trait for extracting instruction fields from a 32-bit encoding.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;
    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;
    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;
    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;
    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;
    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }
}

/// Decoded operation kind: selects the datapath an instruction dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OpKind {
    /// Base integer arithmetic/logic (R-type, I-type, LUI).
    Alu,
    /// Word load (LW).
    Load,
    /// Word store (SW).
    Store,
    /// Conditional branch.
    Branch,
    /// Multiply-accumulate datapath.
    Mac,
    /// Rectified-linear activation datapath.
    Relu,
    /// 2D convolution datapath.
    Conv2d,
    /// FIR filter datapath.
    Fir,
    /// Pooling datapath.
    Pool,
    /// Program exit (ECALL).
    Halt,
    /// Unrecognized opcode/funct combination. A normal decoded value; it
    /// halts commitment only when it reaches Writeback.
    Illegal,
}

impl OpKind {
    /// The executable operation kinds tracked for coverage completeness.
    pub const EXECUTABLE: [Self; 9] = [
        Self::Alu,
        Self::Load,
        Self::Store,
        Self::Branch,
        Self::Mac,
        Self::Relu,
        Self::Conv2d,
        Self::Fir,
        Self::Pool,
    ];

    /// True for the five custom accelerator kinds.
    pub fn is_accel(self) -> bool {
        matches!(
            self,
            Self::Mac | Self::Relu | Self::Conv2d | Self::Fir | Self::Pool
        )
    }
}

/// A fully decoded instruction descriptor.
///
/// Produced by [`crate::isa::decode::decode`]; immutable once decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Raw 32-bit encoding.
    pub word: u32,
    /// Major opcode (bits 0-6).
    pub opcode: u32,
    /// funct3 sub-variant selector.
    pub funct3: u32,
    /// funct7 sub-variant selector.
    pub funct7: u32,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Destination register index.
    pub rd: usize,
    /// Sign-extended immediate value (format-dependent; 0 for R-type).
    pub imm: i32,
    /// Decoded operation kind.
    pub kind: OpKind,
}

impl Instruction {
    /// A pipeline bubble: the canonical NOP (`addi x0, x0, 0`).
    pub const NOP: Self = Self {
        word: 0x0000_0013,
        opcode: 0b0010011,
        funct3: 0,
        funct7: 0,
        rs1: 0,
        rs2: 0,
        rd: 0,
        imm: 0,
        kind: OpKind::Alu,
    };

    /// True when this instruction writes a destination register.
    pub fn writes_rd(&self) -> bool {
        !matches!(
            self.kind,
            OpKind::Store | OpKind::Branch | OpKind::Halt | OpKind::Illegal
        ) && self.rd != 0
    }

    /// True when this instruction reads its rd field as a third source
    /// operand (the MAC accumulator seed).
    pub fn reads_rd(&self) -> bool {
        self.kind == OpKind::Mac
    }

    /// True when rs1 carries a live source operand.
    pub fn reads_rs1(&self) -> bool {
        match self.kind {
            OpKind::Alu => self.opcode != super::opcodes::OP_LUI,
            OpKind::Halt | OpKind::Illegal => false,
            _ => true,
        }
    }

    /// True when rs2 carries a live source operand.
    pub fn reads_rs2(&self) -> bool {
        match self.kind {
            OpKind::Alu => self.opcode == super::opcodes::OP_REG,
            OpKind::Store | OpKind::Branch => true,
            // rs2 supplies the row stride for the windowed units.
            OpKind::Mac | OpKind::Conv2d | OpKind::Pool => true,
            _ => false,
        }
    }
}

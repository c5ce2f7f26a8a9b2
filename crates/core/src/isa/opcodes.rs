//! Major opcodes (bits 6-0) for the base integer set and the custom
//! accelerator space.
//!
//! The accelerator extension occupies the documented custom space
//! 0001011-0001111; each of the five opcodes maps one-to-one to a
//! fixed-function datapath.

/// Load instructions (LW).
pub const OP_LOAD: u32 = 0b0000011;

/// Immediate arithmetic instructions (ADDI, ANDI, SLLI, etc.).
pub const OP_IMM: u32 = 0b0010011;

/// Store instructions (SW).
pub const OP_STORE: u32 = 0b0100011;

/// Register-register arithmetic (ADD, SUB, SLL, etc.).
pub const OP_REG: u32 = 0b0110011;

/// Load Upper Immediate (LUI).
pub const OP_LUI: u32 = 0b0110111;

/// Conditional branch instructions (BEQ, BNE, BLT, BGE, BLTU, BGEU).
pub const OP_BRANCH: u32 = 0b1100011;

/// System instructions; only ECALL (program exit) is recognized.
pub const OP_SYSTEM: u32 = 0b1110011;

/// FIR filter step (custom space).
pub const OP_FIR: u32 = 0b0001011;

/// Multiply-accumulate (custom space).
pub const OP_MAC: u32 = 0b0001100;

/// Rectified-linear activation (custom space).
pub const OP_RELU: u32 = 0b0001101;

/// 2D convolution window (custom space).
pub const OP_CONV2D: u32 = 0b0001110;

/// Pooling window (custom space).
pub const OP_POOL: u32 = 0b0001111;

/// funct3 selectors within the base and custom opcodes.
pub mod funct3 {
    /// ADD/SUB (R-type) or ADDI (I-type); also the default custom variant.
    pub const ADD_SUB: u32 = 0b000;
    /// SLL / SLLI.
    pub const SLL: u32 = 0b001;
    /// SLT / SLTI.
    pub const SLT: u32 = 0b010;
    /// SLTU / SLTIU.
    pub const SLTU: u32 = 0b011;
    /// XOR / XORI.
    pub const XOR: u32 = 0b100;
    /// SRL/SRA (R-type) or SRLI/SRAI.
    pub const SRL_SRA: u32 = 0b101;
    /// OR / ORI.
    pub const OR: u32 = 0b110;
    /// AND / ANDI.
    pub const AND: u32 = 0b111;

    /// LW (the only supported load width).
    pub const LW: u32 = 0b010;
    /// SW (the only supported store width).
    pub const SW: u32 = 0b010;

    /// BEQ.
    pub const BEQ: u32 = 0b000;
    /// BNE.
    pub const BNE: u32 = 0b001;
    /// BLT.
    pub const BLT: u32 = 0b100;
    /// BGE.
    pub const BGE: u32 = 0b101;
    /// BLTU.
    pub const BLTU: u32 = 0b110;
    /// BGEU.
    pub const BGEU: u32 = 0b111;

    /// Saturating MAC (custom).
    pub const MAC_SAT: u32 = 0b000;
    /// Wrapping MAC (custom).
    pub const MAC_WRAP: u32 = 0b001;
    /// Max pooling (custom).
    pub const POOL_MAX: u32 = 0b000;
    /// Average pooling (custom).
    pub const POOL_AVG: u32 = 0b001;
}

/// funct7 values in the base R-type space.
pub mod funct7 {
    /// Default encoding (ADD, SRL, ...).
    pub const BASE: u32 = 0b0000000;
    /// Alternate encoding (SUB, SRA).
    pub const ALT: u32 = 0b0100000;
}

/// Full encoding of ECALL — the normal program-exit instruction.
pub const ECALL: u32 = 0x0000_0073;

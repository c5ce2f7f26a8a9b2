//! Instruction decoder.
//!
//! Maps a 32-bit word to a typed [`Instruction`] descriptor. The decoder is a
//! pure function with no side effects: unrecognized opcode/funct combinations
//! yield [`OpKind::Illegal`], which downstream stages treat as a normal
//! decoded value until it reaches Writeback.

use crate::isa::instruction::{Instruction, InstructionBits, OpKind};
use crate::isa::opcodes::{self, funct3, funct7};

/// Number of immediate bits in the I-type and S-type formats.
const IMM12_BITS: u32 = 12;

/// Number of immediate bits in the B-type format (13, including the
/// implicit zero bit 0).
const B_IMM_BITS: u32 = 13;

/// Sign-extends the low `bits` bits of `value`.
#[inline]
fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Extracts the sign-extended I-type immediate (bits 31-20).
#[inline]
fn imm_i(word: u32) -> i32 {
    sign_extend(word >> 20, IMM12_BITS)
}

/// Extracts the sign-extended S-type immediate (bits 31-25 | 11-7).
#[inline]
fn imm_s(word: u32) -> i32 {
    let low = (word >> 7) & 0x1F;
    let high = (word >> 25) & 0x7F;
    sign_extend((high << 5) | low, IMM12_BITS)
}

/// Extracts the sign-extended B-type immediate
/// (bit 31 | bit 7 | bits 30-25 | bits 11-8, scaled by 2).
#[inline]
fn imm_b(word: u32) -> i32 {
    let bit11 = (word >> 7) & 1;
    let bits4_1 = (word >> 8) & 0xF;
    let bits10_5 = (word >> 25) & 0x3F;
    let bit12 = (word >> 31) & 1;
    let raw = (bit12 << 12) | (bit11 << 11) | (bits10_5 << 5) | (bits4_1 << 1);
    sign_extend(raw, B_IMM_BITS)
}

/// Extracts the U-type immediate (bits 31-12, left-aligned).
#[inline]
fn imm_u(word: u32) -> i32 {
    (word & 0xFFFF_F000) as i32
}

/// Decodes a 32-bit word into an [`Instruction`].
///
/// Recognized base-ISA opcodes map to {ALU, LOAD, STORE, BRANCH, HALT}; the
/// five custom opcodes map one-to-one to {FIR, MAC, RELU, CONV2D, POOL} with
/// funct3 selecting sub-variants (saturating vs wrapping MAC, max vs average
/// pooling). Everything else decodes to ILLEGAL.
pub fn decode(word: u32) -> Instruction {
    let opcode = word.opcode();
    let f3 = word.funct3();
    let f7 = word.funct7();

    let (kind, imm) = match opcode {
        opcodes::OP_REG => (classify_op_reg(f3, f7), 0),
        opcodes::OP_IMM => (classify_op_imm(f3, f7), imm_i(word)),
        opcodes::OP_LUI => (OpKind::Alu, imm_u(word)),
        opcodes::OP_LOAD if f3 == funct3::LW => (OpKind::Load, imm_i(word)),
        opcodes::OP_STORE if f3 == funct3::SW => (OpKind::Store, imm_s(word)),
        opcodes::OP_BRANCH => (classify_branch(f3), imm_b(word)),
        opcodes::OP_SYSTEM if word == opcodes::ECALL => (OpKind::Halt, 0),
        opcodes::OP_FIR if f3 == 0 && f7 == 0 => (OpKind::Fir, 0),
        opcodes::OP_MAC if mac_variant(f3) && f7 == 0 => (OpKind::Mac, 0),
        opcodes::OP_RELU if f3 == 0 && f7 == 0 => (OpKind::Relu, 0),
        opcodes::OP_CONV2D if f3 == 0 && f7 == 0 => (OpKind::Conv2d, 0),
        opcodes::OP_POOL if pool_variant(f3) && f7 == 0 => (OpKind::Pool, 0),
        _ => (OpKind::Illegal, 0),
    };

    Instruction {
        word,
        opcode,
        funct3: f3,
        funct7: f7,
        rs1: word.rs1(),
        rs2: word.rs2(),
        rd: word.rd(),
        imm,
        kind,
    }
}

/// Classifies an R-type base opcode; invalid funct combinations are ILLEGAL.
fn classify_op_reg(f3: u32, f7: u32) -> OpKind {
    let valid = match f3 {
        funct3::ADD_SUB | funct3::SRL_SRA => f7 == funct7::BASE || f7 == funct7::ALT,
        funct3::SLL | funct3::SLT | funct3::SLTU | funct3::XOR | funct3::OR | funct3::AND => {
            f7 == funct7::BASE
        }
        _ => false,
    };
    if valid { OpKind::Alu } else { OpKind::Illegal }
}

/// Classifies an I-type arithmetic opcode; shift encodings constrain funct7.
fn classify_op_imm(f3: u32, f7: u32) -> OpKind {
    let valid = match f3 {
        funct3::SLL => f7 == funct7::BASE,
        funct3::SRL_SRA => f7 == funct7::BASE || f7 == funct7::ALT,
        _ => true,
    };
    if valid { OpKind::Alu } else { OpKind::Illegal }
}

/// Classifies a branch funct3; the two reserved encodings are ILLEGAL.
fn classify_branch(f3: u32) -> OpKind {
    match f3 {
        funct3::BEQ | funct3::BNE | funct3::BLT | funct3::BGE | funct3::BLTU | funct3::BGEU => {
            OpKind::Branch
        }
        _ => OpKind::Illegal,
    }
}

/// True for the recognized MAC funct3 variants (saturating or wrapping).
fn mac_variant(f3: u32) -> bool {
    f3 == funct3::MAC_SAT || f3 == funct3::MAC_WRAP
}

/// True for the recognized POOL funct3 variants (max or average).
fn pool_variant(f3: u32) -> bool {
    f3 == funct3::POOL_MAX || f3 == funct3::POOL_AVG
}

//! Word-level instruction encoders for test programs.
//!
//! Hand-rolled encoders for every instruction the machine accepts, so tests
//! can write programs as readable sequences instead of magic words.

/// The program-exit instruction (ECALL encoding).
pub const ECALL: u32 = 0x0000_0073;

const OP_LOAD: u32 = 0b0000011;
const OP_IMM: u32 = 0b0010011;
const OP_STORE: u32 = 0b0100011;
const OP_REG: u32 = 0b0110011;
const OP_LUI: u32 = 0b0110111;
const OP_BRANCH: u32 = 0b1100011;
const OP_FIR: u32 = 0b0001011;
const OP_MAC: u32 = 0b0001100;
const OP_RELU: u32 = 0b0001101;
const OP_CONV2D: u32 = 0b0001110;
const OP_POOL: u32 = 0b0001111;

fn r_type(opcode: u32, funct3: u32, funct7: u32, rd: usize, rs1: usize, rs2: usize) -> u32 {
    funct7 << 25
        | (rs2 as u32) << 20
        | (rs1 as u32) << 15
        | funct3 << 12
        | (rd as u32) << 7
        | opcode
}

fn i_type(opcode: u32, funct3: u32, rd: usize, rs1: usize, imm: i32) -> u32 {
    ((imm as u32) & 0xFFF) << 20 | (rs1 as u32) << 15 | funct3 << 12 | (rd as u32) << 7 | opcode
}

fn b_type(funct3: u32, rs1: usize, rs2: usize, offset: i32) -> u32 {
    let imm = offset as u32;
    ((imm >> 12) & 1) << 31
        | ((imm >> 5) & 0x3F) << 25
        | (rs2 as u32) << 20
        | (rs1 as u32) << 15
        | funct3 << 12
        | ((imm >> 1) & 0xF) << 8
        | ((imm >> 11) & 1) << 7
        | OP_BRANCH
}

/// `addi rd, rs1, imm`
pub fn addi(rd: usize, rs1: usize, imm: i32) -> u32 {
    i_type(OP_IMM, 0b000, rd, rs1, imm)
}

/// `add rd, rs1, rs2`
pub fn add(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_REG, 0b000, 0, rd, rs1, rs2)
}

/// `sub rd, rs1, rs2`
pub fn sub(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_REG, 0b000, 0b0100000, rd, rs1, rs2)
}

/// `xor rd, rs1, rs2`
pub fn xor(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_REG, 0b100, 0, rd, rs1, rs2)
}

/// `lui rd, imm20` (imm20 is the raw upper-20-bit field)
pub fn lui(rd: usize, imm20: u32) -> u32 {
    (imm20 & 0xF_FFFF) << 12 | (rd as u32) << 7 | OP_LUI
}

/// `lw rd, imm(rs1)`
pub fn lw(rd: usize, rs1: usize, imm: i32) -> u32 {
    i_type(OP_LOAD, 0b010, rd, rs1, imm)
}

/// `sw rs2, imm(rs1)`
pub fn sw(rs2: usize, rs1: usize, imm: i32) -> u32 {
    let imm = imm as u32;
    ((imm >> 5) & 0x7F) << 25
        | (rs2 as u32) << 20
        | (rs1 as u32) << 15
        | 0b010 << 12
        | (imm & 0x1F) << 7
        | OP_STORE
}

/// `beq rs1, rs2, offset` (byte offset from the branch itself)
pub fn beq(rs1: usize, rs2: usize, offset: i32) -> u32 {
    b_type(0b000, rs1, rs2, offset)
}

/// `bne rs1, rs2, offset`
pub fn bne(rs1: usize, rs2: usize, offset: i32) -> u32 {
    b_type(0b001, rs1, rs2, offset)
}

/// `blt rs1, rs2, offset`
pub fn blt(rs1: usize, rs2: usize, offset: i32) -> u32 {
    b_type(0b100, rs1, rs2, offset)
}

/// `mac rd, rs1, rs2` (saturating variant)
pub fn mac(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_MAC, 0b000, 0, rd, rs1, rs2)
}

/// `mac.wrap rd, rs1, rs2` (wrapping variant)
pub fn mac_wrap(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_MAC, 0b001, 0, rd, rs1, rs2)
}

/// `relu rd, rs1`
pub fn relu(rd: usize, rs1: usize) -> u32 {
    r_type(OP_RELU, 0b000, 0, rd, rs1, 0)
}

/// `conv2d rd, rs1, rs2` (rs1 = window base byte address, rs2 = row stride in words)
pub fn conv2d(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_CONV2D, 0b000, 0, rd, rs1, rs2)
}

/// `fir rd, rs1`
pub fn fir(rd: usize, rs1: usize) -> u32 {
    r_type(OP_FIR, 0b000, 0, rd, rs1, 0)
}

/// `pool.max rd, rs1, rs2`
pub fn pool_max(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_POOL, 0b000, 0, rd, rs1, rs2)
}

/// `pool.avg rd, rs1, rs2`
pub fn pool_avg(rd: usize, rs1: usize, rs2: usize) -> u32 {
    r_type(OP_POOL, 0b001, 0, rd, rs1, rs2)
}

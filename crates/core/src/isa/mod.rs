//! Instruction set: opcodes, instruction representation, and decoding.

pub mod decode;
pub mod instruction;
pub mod opcodes;

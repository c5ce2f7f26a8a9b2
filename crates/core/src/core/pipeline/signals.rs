//! Pipeline control signals and operation types.
//!
//! This module defines the signals generated during instruction decode that
//! steer the downstream pipeline stages. It performs:
//! 1. **Operation Classification:** Selects the ALU operation for integer instructions.
//! 2. **Operand Selection:** Chooses the second ALU input (register or immediate).
//! 3. **Memory Control:** Marks load and store instructions for the Memory stage.
//! 4. **Control Flow:** Marks conditional branches for resolution in Execute.

use crate::isa::instruction::{Instruction, OpKind};
use crate::isa::opcodes::{self, funct3, funct7};

/// ALU operation types for the base integer instruction set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Default value (integer addition).
    #[default]
    Add,

    /// Integer subtraction.
    Sub,

    /// Shift left logical.
    Sll,

    /// Set less than (signed).
    Slt,

    /// Set less than unsigned.
    Sltu,

    /// Bitwise XOR.
    Xor,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Bitwise OR.
    Or,

    /// Bitwise AND.
    And,

    /// Pass the second operand through unchanged (LUI).
    CopyB,
}

/// Source of the second ALU operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Value read from rs2.
    #[default]
    Reg,

    /// Sign-extended immediate.
    Imm,
}

/// Control signals carried alongside an instruction from Decode onward.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlSignals {
    /// ALU operation to perform in Execute.
    pub alu_op: AluOp,
    /// Source of the second ALU operand.
    pub b_src: OpBSrc,
    /// Instruction writes a result to rd in Writeback.
    pub reg_write: bool,
    /// Instruction reads data memory in the Memory stage.
    pub mem_read: bool,
    /// Instruction writes data memory in the Memory stage.
    pub mem_write: bool,
    /// Instruction is a conditional branch resolved in Execute.
    pub branch: bool,
}

impl ControlSignals {
    /// Derives the control signals for a decoded instruction.
    ///
    /// Accelerator instructions carry `reg_write` only; their datapath lives
    /// in the fixed-function units rather than the ALU.
    pub fn derive(inst: &Instruction) -> Self {
        match inst.kind {
            OpKind::Alu => Self {
                alu_op: alu_op_for(inst),
                b_src: if inst.opcode == opcodes::OP_REG {
                    OpBSrc::Reg
                } else {
                    OpBSrc::Imm
                },
                reg_write: true,
                ..Self::default()
            },
            OpKind::Load => Self {
                alu_op: AluOp::Add,
                b_src: OpBSrc::Imm,
                reg_write: true,
                mem_read: true,
                ..Self::default()
            },
            OpKind::Store => Self {
                alu_op: AluOp::Add,
                b_src: OpBSrc::Imm,
                mem_write: true,
                ..Self::default()
            },
            OpKind::Branch => Self {
                branch: true,
                ..Self::default()
            },
            OpKind::Mac | OpKind::Relu | OpKind::Conv2d | OpKind::Fir | OpKind::Pool => Self {
                reg_write: true,
                ..Self::default()
            },
            OpKind::Halt | OpKind::Illegal => Self::default(),
        }
    }
}

/// Maps an ALU-class instruction onto its ALU operation.
fn alu_op_for(inst: &Instruction) -> AluOp {
    if inst.opcode == opcodes::OP_LUI {
        return AluOp::CopyB;
    }
    let alt = inst.opcode == opcodes::OP_REG && inst.funct7 == funct7::ALT;
    match inst.funct3 {
        funct3::ADD_SUB if alt => AluOp::Sub,
        funct3::ADD_SUB => AluOp::Add,
        funct3::SLL => AluOp::Sll,
        funct3::SLT => AluOp::Slt,
        funct3::SLTU => AluOp::Sltu,
        funct3::XOR => AluOp::Xor,
        funct3::SRL_SRA if alt => AluOp::Sra,
        funct3::SRL_SRA => AluOp::Srl,
        funct3::OR => AluOp::Or,
        _ => AluOp::And,
    }
}

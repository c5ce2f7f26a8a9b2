//! Instruction Decode Properties.
//!
//! Verifies that `decode()` correctly extracts register fields, function
//! codes, and sign-extended immediates for every instruction format the
//! machine accepts, and that it is total: any 32-bit word decodes to some
//! descriptor without panicking, with unrecognized encodings mapped to the
//! illegal kind.

use proptest::prelude::*;

use rvnn_core::isa::decode::decode;
use rvnn_core::isa::instruction::OpKind;

use crate::common::asm;

#[test]
fn i_type_immediates_sign_extend() {
    let inst = decode(asm::addi(1, 2, -1));
    assert_eq!(inst.kind, OpKind::Alu);
    assert_eq!(inst.rd, 1);
    assert_eq!(inst.rs1, 2);
    assert_eq!(inst.imm, -1);

    assert_eq!(decode(asm::addi(1, 0, 2047)).imm, 2047);
    assert_eq!(decode(asm::addi(1, 0, -2048)).imm, -2048);
}

#[test]
fn s_and_b_immediates_reassemble() {
    let store = decode(asm::sw(7, 3, -4));
    assert_eq!(store.kind, OpKind::Store);
    assert_eq!(store.rs1, 3);
    assert_eq!(store.rs2, 7);
    assert_eq!(store.imm, -4);

    let branch = decode(asm::beq(1, 2, -8));
    assert_eq!(branch.kind, OpKind::Branch);
    assert_eq!(branch.imm, -8);
    assert_eq!(decode(asm::bne(1, 2, 4094)).imm, 4094);
}

#[test]
fn custom_opcodes_map_one_to_one() {
    assert_eq!(decode(asm::mac(1, 2, 3)).kind, OpKind::Mac);
    assert_eq!(decode(asm::mac_wrap(1, 2, 3)).kind, OpKind::Mac);
    assert_eq!(decode(asm::relu(1, 2)).kind, OpKind::Relu);
    assert_eq!(decode(asm::conv2d(1, 2, 3)).kind, OpKind::Conv2d);
    assert_eq!(decode(asm::fir(1, 2)).kind, OpKind::Fir);
    assert_eq!(decode(asm::pool_max(1, 2, 3)).kind, OpKind::Pool);
    assert_eq!(decode(asm::pool_avg(1, 2, 3)).kind, OpKind::Pool);
    assert_eq!(decode(asm::ECALL).kind, OpKind::Halt);
}

#[test]
fn nonzero_funct7_in_custom_space_is_illegal() {
    // mac with funct7 = 1: reserved, must not alias onto the defined op.
    let word = asm::mac(1, 2, 3) | 1 << 25;
    assert_eq!(decode(word).kind, OpKind::Illegal);
}

proptest! {
    /// Decoding never panics and never loses the raw word.
    #[test]
    fn decode_is_total(word in any::<u32>()) {
        let inst = decode(word);
        prop_assert_eq!(inst.word, word);
    }

    /// Register fields always come from the fixed bit positions.
    #[test]
    fn register_fields_extract(rd in 0usize..32, rs1 in 0usize..32, rs2 in 0usize..32) {
        let inst = decode(asm::add(rd, rs1, rs2));
        prop_assert_eq!(inst.rd, rd);
        prop_assert_eq!(inst.rs1, rs1);
        prop_assert_eq!(inst.rs2, rs2);
    }

    /// Every branch immediate survives an encode/decode trip, sign included.
    #[test]
    fn branch_offsets_round_trip(offset in (-2048i32..2047).prop_map(|v| v * 2)) {
        let inst = decode(asm::beq(1, 2, offset));
        prop_assert_eq!(inst.kind, OpKind::Branch);
        prop_assert_eq!(inst.imm, offset);
    }

    /// An illegal word never claims an executable kind's datapath.
    #[test]
    fn garbage_low_bits_decode_illegal(upper in any::<u32>()) {
        // Opcode 0b1111111 is unassigned.
        let word = (upper & !0x7F) | 0x7F;
        prop_assert_eq!(decode(word).kind, OpKind::Illegal);
    }
}

//! Data Forwarding Tests — RAW Hazard Resolution.
//!
//! Runs short dependency chains end to end and checks both the architectural
//! results (the forwarded values were the right ones) and the hazard
//! bookkeeping (which bypass path each resolution was attributed to).

use rvnn_core::core::pipeline::hazards::HazardPath;

use crate::common::asm;
use crate::common::harness::TestContext;

#[test]
fn back_to_back_alu_forwards_execute_to_execute() {
    // add x2 consumes x1 one cycle after it is produced.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 21),
        asm::add(2, 1, 1),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(2), 42);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::ExecuteToExecute) >= 2);
}

#[test]
fn two_apart_forwards_memory_to_execute() {
    // add x3 reads x1 (two ahead, MEM/WB latch) and x2 (one ahead, EX/MEM).
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 1),
        asm::add(2, 1, 1),
        asm::add(3, 1, 2),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(2), 2);
    assert_eq!(ctx.reg(3), 3);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::MemoryToExecute) >= 1);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::ExecuteToExecute) >= 1);
}

#[test]
fn three_apart_resolves_through_the_register_file() {
    // The producer retires in the cycle the consumer decodes; Writeback
    // lands before the register read, so no bypass network is involved.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 9),
        asm::addi(6, 0, 0),
        asm::addi(7, 0, 0),
        asm::add(4, 1, 1),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(4), 18);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::WritebackToDecode) >= 1);
}

#[test]
fn nearest_producer_wins_when_both_write_the_register() {
    // x1 is written twice in a row; the consumer must see the second value.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 10),
        asm::addi(1, 0, 20),
        asm::add(2, 1, 1),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(2), 40);
}

#[test]
fn x0_results_are_never_forwarded() {
    // A "write" to x0 is discarded; the reader must still see zero.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(0, 0, 55),
        asm::add(2, 0, 0),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.reg(2), 0);
}

#[test]
fn mac_accumulator_seed_is_forwarded() {
    // The second MAC reads x3 through its destination field, one cycle
    // after the first MAC produced it.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 3),
        asm::addi(2, 0, 4),
        asm::addi(3, 0, 10),
        asm::mac(3, 1, 2),
        asm::mac(3, 1, 2),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(3), 34);
}

#[test]
fn mac_result_forwards_to_the_next_consumer() {
    // mac x1, x2, x3 with x1=5, x2=3, x3=4 accumulates 5 + 3*4 = 17; the
    // add one cycle behind must see 17 through the bypass network, not the
    // stale register file value.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 5),
        asm::addi(2, 0, 3),
        asm::addi(3, 0, 4),
        asm::mac(1, 2, 3),
        asm::add(5, 1, 0),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(1), 17);
    assert_eq!(ctx.reg(5), 17);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::ExecuteToExecute) >= 1);
}

#[test]
fn forward_count_matches_the_bypassed_sources() {
    // add x2, x1, x1 needs x1 twice: both resolutions are counted.
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 1),
        asm::add(2, 1, 1),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.forwards, 2);
}

#[test]
fn independent_instructions_do_not_forward() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 1),
        asm::addi(2, 0, 2),
        asm::addi(3, 0, 3),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.forwards, 0);
    assert_eq!(ctx.reg(1) + ctx.reg(2) + ctx.reg(3), 6);
}

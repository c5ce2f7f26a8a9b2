//! Load-Use Hazard Tests.
//!
//! A load's data only exists after its Memory access completes, so a
//! dependent instruction must lose at least one Decode cycle. These tests
//! check both the stall accounting and that the consumer still sees the
//! loaded value once it finally issues.

use rvnn_core::core::pipeline::hazards::HazardPath;

use crate::common::asm;
use crate::common::harness::TestContext;

#[test]
fn dependent_consumer_stalls_and_sees_the_loaded_value() {
    let mut ctx = TestContext::new()
        .load_program(&[asm::lw(1, 0, 0), asm::add(2, 1, 1), asm::ECALL])
        .load_data(0, &[99]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(1), 99);
    assert_eq!(ctx.reg(2), 198);
    assert!(report.stats.stalls_data >= 1);
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::LoadUseStall) >= 1);
    // Load data arrives through the far bypass after the stall.
    assert!(ctx.cpu().coverage.hazard_count(HazardPath::MemoryToExecute) >= 1);
}

#[test]
fn independent_instruction_between_avoids_some_stalls() {
    let close = {
        let mut ctx = TestContext::new()
            .load_program(&[asm::lw(1, 0, 0), asm::add(2, 1, 1), asm::ECALL])
            .load_data(0, &[5]);
        ctx.run().stats.stalls_data
    };
    let spaced = {
        let mut ctx = TestContext::new()
            .load_program(&[
                asm::lw(1, 0, 0),
                asm::addi(9, 0, 0),
                asm::add(2, 1, 1),
                asm::ECALL,
            ])
            .load_data(0, &[5]);
        ctx.run().stats.stalls_data
    };
    assert!(spaced < close, "filler should absorb stall cycles: {spaced} vs {close}");
}

#[test]
fn store_address_dependency_on_a_load_stalls() {
    // sw uses x1 as its base register immediately after the load writes it.
    let mut ctx = TestContext::new()
        .load_program(&[asm::lw(1, 0, 0), asm::sw(1, 1, 4), asm::ECALL])
        .load_data(0, &[16]);
    let report = ctx.run();
    assert!(report.passed);
    assert!(report.stats.stalls_data >= 1);
    // mem[16/4 + 1] = 16: the loaded value used as both base and data.
    assert_eq!(ctx.mem(5), 16);
}

#[test]
fn mac_destination_dependency_on_a_load_stalls() {
    // The MAC reads x1 as its accumulator seed.
    let mut ctx = TestContext::new()
        .load_program(&[
            asm::addi(2, 0, 3),
            asm::addi(3, 0, 4),
            asm::lw(1, 0, 0),
            asm::mac(1, 2, 3),
            asm::ECALL,
        ])
        .load_data(0, &[100]);
    let report = ctx.run();
    assert!(report.passed);
    assert!(report.stats.stalls_data >= 1);
    assert_eq!(ctx.reg(1), 112);
}

#[test]
fn unrelated_load_does_not_stall_anyone() {
    let mut ctx = TestContext::new()
        .load_program(&[asm::lw(1, 0, 0), asm::addi(2, 0, 7), asm::ECALL])
        .load_data(0, &[3]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.stalls_data, 0);
    assert_eq!(ctx.reg(1), 3);
    assert_eq!(ctx.reg(2), 7);
}

#[test]
fn longer_memory_latency_lengthens_the_stall() {
    let stalls_at = |latency: u64| {
        let mut config = rvnn_core::config::Config::default();
        config.memory.latency = latency;
        let mut ctx = TestContext::with_config(config)
            .load_program(&[asm::lw(1, 0, 0), asm::add(2, 1, 1), asm::ECALL])
            .load_data(0, &[1]);
        let report = ctx.run();
        assert!(report.passed);
        report.stats.cycles
    };
    assert!(stalls_at(4) > stalls_at(1));
}

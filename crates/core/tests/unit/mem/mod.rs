//! Memory Subsystem Integration Tests.
//!
//! Drives the banked memory through the pipeline: bank contention between a
//! posted store and a trailing load, port-mode effects, mapping functions,
//! and the stride prefetcher.

use rvnn_core::config::{BankMapping, Config, PortMode};

use crate::common::asm;
use crate::common::harness::TestContext;

fn memory_config(banks: usize, latency: u64) -> Config {
    let mut config = Config::default();
    config.memory.banks = banks;
    config.memory.latency = latency;
    config
}

/// Store to word 0, then load word 2. With two banks both words live in
/// bank 0, so the load contends with the posted store's port occupancy.
fn store_then_load(config: Config) -> (rvnn_core::sim::RunReport, i32) {
    let mut ctx = TestContext::with_config(config)
        .load_program(&[
            asm::addi(1, 0, 5),
            asm::sw(1, 0, 0),
            asm::lw(2, 0, 8),
            asm::ECALL,
        ])
        .load_data(2, &[77]);
    let report = ctx.run();
    (report, ctx.reg(2))
}

#[test]
fn posted_store_conflicts_with_a_trailing_same_bank_load() {
    let (report, loaded) = store_then_load(memory_config(2, 4));
    assert!(report.passed);
    assert_eq!(loaded, 77);
    assert!(report.stats.bank_conflicts >= 1, "single port must contend");
}

#[test]
fn dual_ports_absorb_the_contention() {
    let mut config = memory_config(2, 4);
    config.memory.port_mode = PortMode::Dual;
    let (report, loaded) = store_then_load(config);
    assert!(report.passed);
    assert_eq!(loaded, 77);
    assert_eq!(report.stats.bank_conflicts, 0);
}

#[test]
fn different_banks_never_conflict() {
    // Word 1 lives in bank 1 under modulo mapping; the store owns bank 0.
    let mut ctx = TestContext::with_config(memory_config(2, 4))
        .load_program(&[
            asm::addi(1, 0, 5),
            asm::sw(1, 0, 0),
            asm::lw(2, 0, 4),
            asm::ECALL,
        ])
        .load_data(1, &[33]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(2), 33);
    assert_eq!(report.stats.bank_conflicts, 0);
}

#[test]
fn stride_mapping_groups_neighboring_words() {
    // bank_stride 4: words 0-3 share bank 0, so the load now contends with
    // the store that modulo mapping would have kept out of its way.
    let mut config = memory_config(2, 4);
    config.memory.mapping = BankMapping::Stride;
    config.memory.bank_stride = 4;
    let mut ctx = TestContext::with_config(config)
        .load_program(&[
            asm::addi(1, 0, 5),
            asm::sw(1, 0, 0),
            asm::lw(2, 0, 4),
            asm::ECALL,
        ])
        .load_data(1, &[33]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(2), 33);
    assert!(report.stats.bank_conflicts >= 1);
}

#[test]
fn stride_prefetcher_hides_the_latency_of_a_strided_walk() {
    let mut config = memory_config(2, 4);
    config.memory.prefetch_stride = 1;
    config.memory.prefetch_window = 4;
    // Walk words 0 and 2 (both bank 0); the first load stages the second.
    let mut ctx = TestContext::with_config(config)
        .load_program(&[
            asm::lw(1, 0, 0),
            asm::lw(2, 0, 8),
            asm::ECALL,
        ])
        .load_data(0, &[10, 0, 30]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.reg(1), 10);
    assert_eq!(ctx.reg(2), 30);
    assert_eq!(report.stats.prefetch_hits, 1);
}

#[test]
fn prefetcher_disabled_by_default() {
    let mut ctx = TestContext::new()
        .load_program(&[asm::lw(1, 0, 0), asm::lw(2, 0, 8), asm::ECALL])
        .load_data(0, &[1, 0, 2]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.prefetch_hits, 0);
}

#[test]
fn store_updates_memory_and_commits_its_address() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addi(1, 0, 13),
        asm::sw(1, 0, 20),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(ctx.mem(5), 13);
}

#[test]
fn misaligned_load_faults_the_run() {
    let mut ctx = TestContext::new().load_program(&[asm::lw(1, 0, 2), asm::ECALL]);
    let report = ctx.run();
    assert!(!report.passed);
    assert!(matches!(
        report.exit,
        rvnn_core::common::error::ExitReason::AccessFault(
            rvnn_core::common::error::AccessFault::Misaligned(2)
        )
    ));
}

#[test]
fn out_of_range_store_faults_without_writing() {
    // lui x1, 64 is the first byte past the 64Ki-word data memory.
    let mut ctx = TestContext::new().load_program(&[
        asm::lui(1, 64),
        asm::addi(2, 0, 9),
        asm::sw(2, 1, 0),
        asm::ECALL,
    ]);
    let report = ctx.run();
    assert!(!report.passed);
    assert!(matches!(
        report.exit,
        rvnn_core::common::error::ExitReason::AccessFault(
            rvnn_core::common::error::AccessFault::OutOfRange(_)
        )
    ));
}

//! Pipeline Timing Tests — Cycle-Accurate Latency Accounting.
//!
//! Pins down the cycle counts of straight-line code, memory latency, and the
//! multi-cycle accelerator operations. A five-stage pipeline with no stalls
//! retires the instruction at index `k` on cycle `k + 5`.

use rstest::rstest;

use crate::common::asm;
use crate::common::harness::TestContext;

#[rstest]
#[case(0)]
#[case(1)]
#[case(7)]
#[case(20)]
fn straight_line_code_fills_the_pipeline(#[case] nops: usize) {
    let mut program = vec![asm::addi(0, 0, 0); nops];
    program.push(asm::ECALL);
    let mut ctx = TestContext::new().load_program(&program);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.retired as usize, nops + 1);
    assert_eq!(report.stats.cycles as usize, nops + 5);
}

#[test]
fn single_cycle_memory_adds_no_stall() {
    let mut config = rvnn_core::config::Config::default();
    config.memory.latency = 1;
    let mut ctx = TestContext::with_config(config)
        .load_program(&[asm::lw(1, 0, 0), asm::ECALL])
        .load_data(0, &[8]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.cycles, 6);
    assert_eq!(report.stats.stalls_mem, 0);
}

#[test]
fn two_cycle_memory_stalls_the_pipeline_once() {
    let mut ctx = TestContext::new()
        .load_program(&[asm::lw(1, 0, 0), asm::ECALL])
        .load_data(0, &[8]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.cycles, 7);
    assert_eq!(report.stats.stalls_mem, 1);
}

// Each accelerator occupies Execute for its declared latency, so a
// one-operation program runs in `5 + latency` cycles. ReLU and MAC are
// single-cycle; Conv2D costs the kernel area, FIR the tap count, and
// pooling the window area.
#[rstest]
#[case::relu(asm::relu(2, 1), 1)]
#[case::mac(asm::mac(2, 1, 1), 1)]
#[case::pool(asm::pool_max(2, 0, 0), 4)]
#[case::fir(asm::fir(2, 1), 8)]
#[case::conv2d(asm::conv2d(2, 0, 0), 9)]
fn accelerator_latency_shows_up_in_the_cycle_count(#[case] word: u32, #[case] latency: u64) {
    let mut ctx = TestContext::new().load_program(&[word, asm::ECALL]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.cycles, 5 + latency);
    assert_eq!(
        report.stats.stalls_accel,
        latency.saturating_sub(2),
        "drain cycles beyond issue and handoff"
    );
}

#[test]
fn kernel_size_scales_conv2d_latency() {
    let mut config = rvnn_core::config::Config::default();
    config.units.conv2d.kernel = rvnn_core::config::KernelSize::K5;
    config.units.conv2d.coefficients = vec![0; 25];
    let mut ctx = TestContext::with_config(config)
        .load_program(&[asm::conv2d(2, 0, 0), asm::ECALL]);
    let report = ctx.run();
    assert!(report.passed);
    assert_eq!(report.stats.cycles, 5 + 25);
}

#[test]
fn ipc_reflects_retirement_over_cycles() {
    let mut program = vec![asm::addi(0, 0, 0); 15];
    program.push(asm::ECALL);
    let mut ctx = TestContext::new().load_program(&program);
    let report = ctx.run();
    let ipc = report.stats.ipc();
    assert!(ipc > 0.7 && ipc < 1.0, "16 retired over 20 cycles: {ipc}");
}

#[test]
fn cycle_counter_matches_tick_count() {
    let mut ctx = TestContext::new().load_program(&[asm::addi(1, 0, 1), asm::ECALL]);
    ctx.run_cycles(3);
    assert_eq!(ctx.cpu().cycle, 3);
    assert!(ctx.cpu().exit.is_none());
}

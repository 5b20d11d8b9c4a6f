//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --test config_tests

use subghz_firmware::config::*;
use subghz_firmware::radio::regulatory::RegulatoryGate;
use subghz_firmware::types::{FrequencyRange, Path};

// =============================================================================
// Build Tests
// =============================================================================

#[test]
fn host_build_leaves_target_stack_out() {
    assert!(cfg!(feature = "std"));
    assert!(!cfg!(feature = "embedded"));
}

// =============================================================================
// Clock Tests
// =============================================================================

#[test]
fn system_clock_valid() {
    // STM32G474 max clock is 170 MHz
    assert_eq!(SYSTEM_CLOCK_HZ, 170_000_000);
}

#[test]
fn prescaler_produces_microsecond_ticks() {
    assert_eq!(TICK_HZ, 1_000_000);
    assert_eq!(TIMER_CLOCK_HZ / (u32::from(TIMER_PRESCALER) + 1), TICK_HZ);
}

#[test]
fn spi_clock_within_burst_limit() {
    // CC1101 burst access is limited to 6.5 MHz
    assert!(SPI_FREQUENCY_HZ <= 6_500_000);
}

// =============================================================================
// Async Buffer Tests
// =============================================================================

#[test]
fn reload_ring_splits_evenly() {
    assert_eq!(ASYNC_TX_BUFFER_HALF * 2, ASYNC_TX_BUFFER_FULL);
    assert_eq!(ASYNC_TX_BUFFER_FULL, 256);
}

#[test]
fn guard_and_lead_in_timing() {
    assert_eq!(ASYNC_TX_GUARD_TIME, 999);
    assert_eq!(ASYNC_TX_LEAD_IN, 1000);
    assert!(RELOAD_FLOOR >= 1);
}

#[test]
fn capture_counter_is_31_bit() {
    assert!(CAPTURE_AUTO_RELOAD < 1 << 31);
}

#[test]
fn capture_filter_fits_icf_field() {
    // ICxF is a 4-bit field; 0b1111 samples at fDTS/32 with N = 8
    assert!(CAPTURE_FILTER <= 0b1111);
    assert_eq!(CAPTURE_FILTER, 0b1111);
}

#[test]
fn poll_bounds_allow_several_steps() {
    assert!(CHIP_POLL_TIMEOUT_US >= POLL_STEP_US * 100);
    assert!(SELF_TEST_TIMEOUT_US >= POLL_STEP_US * 100);
}

// =============================================================================
// Synthesizer Tests
// =============================================================================

#[test]
fn synthesizer_constants() {
    assert_eq!(CC1101_XTAL_HZ, 26_000_000);
    assert_eq!(CC1101_FREQ_DIV, 1 << 16);
}

#[test]
fn default_frequency_is_tunable() {
    let gate = RegulatoryGate::cc1101();
    assert!(gate.is_frequency_valid(DEFAULT_FREQUENCY_HZ));
    assert_eq!(Path::for_frequency(DEFAULT_FREQUENCY_HZ), Some(Path::Mhz433));
}

// =============================================================================
// Type Tests
// =============================================================================

#[test]
fn frequency_range_is_inclusive() {
    let range = FrequencyRange::new(100, 200);
    assert!(range.contains(100));
    assert!(range.contains(200));
    assert!(!range.contains(201));
}

// =============================================================================
// Pin Tests
// =============================================================================

#[test]
fn mirror_pin_on_port_b() {
    assert!(pins::ASYNC_MIRROR.starts_with("PB"));
}

#[test]
fn dma_streams_are_distinct() {
    // Index 0 (DMA1 channel 1) carries the reload ring
    assert_ne!(dma::MIRROR_CHANNEL, 0);
    assert_ne!(timers::FALLING_CHANNEL, timers::RISING_CHANNEL);
}

//! Duration Normalizer Tests
//!
//! Tests merging of level runs, the guard gap, the end marker and the
//! reload clamping.
//! Run with: cargo test --test middleware_tests

mod common;

use common::script;
use subghz_firmware::config::{ASYNC_TX_GUARD_TIME, RELOAD_FLOOR};
use subghz_firmware::radio::middleware::{reload_value, DurationNormalizer, MiddlewareState};
use subghz_firmware::types::LevelDuration;

fn drain(levels: Vec<LevelDuration>, max: usize) -> Vec<u32> {
    let mut source = script(levels);
    let mut normalizer = DurationNormalizer::new();
    let mut out = Vec::new();
    for _ in 0..max {
        let duration = normalizer.next_duration(&mut source);
        out.push(duration);
        if duration == 0 {
            break;
        }
    }
    out
}

// =============================================================================
// Merging Tests
// =============================================================================

#[test]
fn alternating_runs_pass_through() {
    let durations = drain(
        vec![
            LevelDuration::high(400),
            LevelDuration::low(800),
            LevelDuration::high(400),
            LevelDuration::Reset,
        ],
        10,
    );
    assert_eq!(durations, vec![400, 800, 400, 0]);
}

#[test]
fn same_level_runs_are_merged() {
    let durations = drain(
        vec![
            LevelDuration::high(100),
            LevelDuration::high(250),
            LevelDuration::low(50),
            LevelDuration::low(50),
            LevelDuration::high(10),
            LevelDuration::Reset,
        ],
        10,
    );
    assert_eq!(durations, vec![350, 100, 10, 0]);
}

#[test]
fn trailing_low_run_is_not_emitted() {
    let durations = drain(
        vec![
            LevelDuration::high(300),
            LevelDuration::low(700),
            LevelDuration::Reset,
        ],
        10,
    );
    assert_eq!(durations, vec![300, 0]);
}

#[test]
fn idle_skips_levels_matching_the_line() {
    let durations = drain(
        vec![
            LevelDuration::low(900),
            LevelDuration::low(900),
            LevelDuration::high(120),
            LevelDuration::Reset,
        ],
        10,
    );
    assert_eq!(durations, vec![120, 0]);
}

// =============================================================================
// Marker Tests
// =============================================================================

#[test]
fn wait_adds_guard_time() {
    let durations = drain(
        vec![
            LevelDuration::high(500),
            LevelDuration::Wait,
            LevelDuration::high(500),
            LevelDuration::Reset,
        ],
        10,
    );
    // The wait flushes the pending high run plus the guard
    assert_eq!(durations[0], 500 + ASYNC_TX_GUARD_TIME);
}

#[test]
fn wait_alone_yields_guard_time() {
    let mut source = script(vec![LevelDuration::Wait]);
    let mut normalizer = DurationNormalizer::new();
    assert_eq!(normalizer.next_duration(&mut source), ASYNC_TX_GUARD_TIME);
}

#[test]
fn reset_is_sticky() {
    let mut calls = 0u32;
    let mut source = || {
        calls += 1;
        if calls == 1 {
            LevelDuration::high(10)
        } else if calls == 2 {
            LevelDuration::Reset
        } else {
            LevelDuration::high(999)
        }
    };
    let mut normalizer = DurationNormalizer::new();

    assert_eq!(normalizer.next_duration(&mut source), 10);
    assert_eq!(normalizer.state(), MiddlewareState::ResetPending);
    for _ in 0..5 {
        assert_eq!(normalizer.next_duration(&mut source), 0);
    }
    // Source not polled after the end marker
    assert_eq!(calls, 2);
}

#[test]
fn consecutive_resets_behave_as_one() {
    let durations = drain(
        vec![
            LevelDuration::high(80),
            LevelDuration::Reset,
            LevelDuration::Reset,
        ],
        10,
    );
    assert_eq!(durations, vec![80, 0]);
}

#[test]
fn restart_leaves_reset_pending() {
    let mut source = script(vec![
        LevelDuration::Reset,
        LevelDuration::high(42),
        LevelDuration::Reset,
    ]);
    let mut normalizer = DurationNormalizer::new();
    assert_eq!(normalizer.next_duration(&mut source), 0);

    normalizer.restart();
    assert_eq!(normalizer.state(), MiddlewareState::Idle);
    assert_eq!(normalizer.pending(), 0);
    assert_eq!(normalizer.next_duration(&mut source), 42);
}

// =============================================================================
// Reload Clamping Tests
// =============================================================================

#[test]
fn reload_values_are_clamped() {
    let reloads: Vec<u32> = [1, 2, 3, 1000].into_iter().map(reload_value).collect();
    assert_eq!(reloads, vec![RELOAD_FLOOR, RELOAD_FLOOR, 2, 999]);
}

#[test]
fn reload_pipeline_ends_with_zero() {
    let mut source = script(vec![
        LevelDuration::high(1),
        LevelDuration::low(2),
        LevelDuration::high(3),
        LevelDuration::low(1000),
        LevelDuration::high(5),
        LevelDuration::Reset,
    ]);
    let mut normalizer = DurationNormalizer::new();
    let reloads: Vec<u32> = (0..6).map(|_| normalizer.next_reload(&mut source)).collect();
    assert_eq!(reloads, vec![1, 1, 2, 999, 4, 0]);
}

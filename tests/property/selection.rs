// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Least-Errors Selection
//!
//! Verifies that for any pool and any sequence of reported errors the
//! selector converges on the connection with the fewest errors, breaking
//! ties by registration order, and only ever rescans lazily.

use aicq::{ConnectionDescriptor, ConnectionPool, ConnectionSelector, SelectorState};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Pool size and a sequence of error reports against pool members
fn pool_and_reports() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..6).prop_flat_map(|size| (Just(size), prop::collection::vec(0..size, 0..40)))
}

fn selector_of(size: usize) -> ConnectionSelector {
    let mut pool = ConnectionPool::new();
    for i in 0..size {
        pool.add(ConnectionDescriptor::new(
            format!("10.0.0.{}", i + 1),
            443,
            "admin",
            "pw",
            "tz",
        ));
    }
    ConnectionSelector::new(pool).unwrap()
}

/// Expected choice: minimum error count, lowest sequence id on ties
fn expected_choice(counts: &[u64]) -> u32 {
    let mut best = 0;
    for (i, count) in counts.iter().enumerate() {
        if *count < counts[best] {
            best = i;
        }
    }
    best as u32
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: After any report sequence, active() picks the strict minimum
    ///
    /// Ties go to the first-registered connection.
    #[test]
    fn prop_active_is_least_errors((size, reports) in pool_and_reports()) {
        let selector = selector_of(size);
        let snapshot = selector.snapshot();
        let mut counts = vec![0u64; size];

        for idx in &reports {
            selector.report_error(&snapshot[*idx]);
            counts[*idx] += 1;
        }

        let active = selector.active();
        if reports.is_empty() {
            prop_assert_eq!(active.sequence_id, 0, "Clean selector keeps the first connection");
        } else {
            prop_assert_eq!(
                active.sequence_id,
                expected_choice(&counts),
                "Rescan must pick min (error_count, sequence_id)"
            );
        }
        prop_assert_eq!(selector.state(), SelectorState::Clean);
    }

    /// Property: Error counts only grow, one per report
    #[test]
    fn prop_report_error_is_monotonic((size, reports) in pool_and_reports()) {
        let selector = selector_of(size);
        let snapshot = selector.snapshot();

        for idx in &reports {
            let before = selector.error_count(*idx as u32).unwrap();
            selector.report_error(&snapshot[*idx]);
            let after = selector.error_count(*idx as u32).unwrap();

            prop_assert_eq!(after, before + 1, "Each report adds exactly one error");
            prop_assert_eq!(selector.state(), SelectorState::Dirty);
        }

        let total: u64 = selector.snapshot().iter().map(|c| c.error_count).sum();
        prop_assert_eq!(total, reports.len() as u64);
    }

    /// Property: A clean selector hands back the same connection every time
    #[test]
    fn prop_clean_selector_is_stable((size, reports) in pool_and_reports(), repeats in 1usize..10) {
        let selector = selector_of(size);
        let snapshot = selector.snapshot();
        for idx in &reports {
            selector.report_error(&snapshot[*idx]);
        }

        let first = selector.active().sequence_id;
        for _ in 0..repeats {
            prop_assert_eq!(selector.active().sequence_id, first);
        }
    }

    /// Property: Sequence ids are unique and follow registration order
    #[test]
    fn prop_sequence_ids_follow_registration(size in 1usize..10) {
        let selector = selector_of(size);
        let ids: Vec<u32> = selector.snapshot().iter().map(|c| c.sequence_id).collect();
        let expected: Vec<u32> = (0..size as u32).collect();

        prop_assert_eq!(ids, expected);
    }
}

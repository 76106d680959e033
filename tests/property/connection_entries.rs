// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Connection Entries
//!
//! Verifies that well-formed `ip:port:user:password:timeout:http_timeout:
//! retries:redirects` entries always parse, and that any other field count
//! is rejected as a configuration error.

use std::time::Duration;

use aicq::settings::parse_connection;
use aicq::PluginError;
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

fn host() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,20}"
}

fn word() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,12}"
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Every well-formed entry yields a matching descriptor
    #[test]
    fn prop_well_formed_entry_parses(
        host in host(),
        port in any::<u16>(),
        user in word(),
        password in word(),
        timeout in 1u64..600,
        http_timeout in 1u64..600,
        retries in 0u32..10,
        redirects in 0u32..10,
    ) {
        let raw = format!(
            "{}:{}:{}:{}:{}:{}:{}:{}",
            host, port, user, password, timeout, http_timeout, retries, redirects
        );

        let conn = parse_connection("conn1", &raw, "tz").unwrap();

        prop_assert_eq!(conn.endpoint_host, host);
        prop_assert_eq!(conn.port, port);
        prop_assert_eq!(conn.request_timeout, Duration::from_secs(timeout));
        prop_assert_eq!(conn.http_timeout, Duration::from_secs(http_timeout));
        prop_assert_eq!(conn.retry_count, retries);
        prop_assert_eq!(conn.redirect_count, redirects);
        prop_assert_eq!(conn.error_count, 0);
    }

    /// Property: Any other field count is a configuration error
    #[test]
    fn prop_wrong_field_count_rejected(fields in prop::collection::vec(word(), 1..12)) {
        prop_assume!(fields.len() != 8);

        let raw = fields.join(":");
        let result = parse_connection("conn1", &raw, "tz");

        prop_assert!(matches!(result, Err(PluginError::ConfigurationError(_))));
    }
}

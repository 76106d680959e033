// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify
//! connection selection and connection entry parsing.

mod connection_entries;
mod selection;

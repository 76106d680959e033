// Copyright (c) 2025 - Cowboy AI, Inc.

//! Controller connections and failover
//!
//! A [`ConnectionPool`] is built once from configuration and handed to a
//! [`ConnectionSelector`], which owns it for the rest of the process and
//! tracks per-connection error counts.

pub mod pool;
pub mod selector;

pub use pool::{
    ConnectionDescriptor, ConnectionPool, DEFAULT_HTTP_TIMEOUT, DEFAULT_REDIRECTS,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRIES,
};
pub use selector::{ConnectionSelector, SelectorState};

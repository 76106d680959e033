// Copyright (c) 2025 - Cowboy AI, Inc.

//! Network plugin adapter for a clustered SDN controller
//!
//! Translates tenant-scoped network and port operations into logical switch
//! and logical port requests against one of several redundant controller
//! connections, failing over to the connection with the fewest errors.
//!
//! Layers, each depending only on the one below:
//!
//! - [`plugin`]: operation set consumed by the orchestration framework
//! - [`translator`]: ownership checks, fault mapping, result envelopes
//! - [`controller`]: REST client for logical switches and ports
//! - [`connection`]: connection pool and least-errors selection
//!
//! [`settings`] loads the connection pool at startup.

pub mod connection;
pub mod controller;
pub mod envelope;
pub mod errors;
pub mod plugin;
pub mod settings;
pub mod translator;

// Re-export commonly used types
pub use connection::{ConnectionDescriptor, ConnectionPool, ConnectionSelector, SelectorState};
pub use controller::{Controller, ControllerFault, ControllerResult, HttpController};
pub use envelope::{
    NetworkDetails, NetworkInfo, NetworkRef, NetworkSummary, NetworkUpdate, PortDetails,
    PortFilter, PortInfo, PortRef, PortState, PortUpdate, PortUpdateInfo,
};
pub use errors::{PluginError, PluginResult};
pub use plugin::{NvpPlugin, QuantumPluginBase};
pub use settings::{ConfigSource, IniConfigSource, MemoryConfigSource};
pub use translator::ResourceTranslator;

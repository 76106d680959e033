// Copyright (c) 2025 - Cowboy AI, Inc.

//! Error types surfaced to the orchestration framework
//!
//! Every public operation either returns its result envelope or fails with
//! exactly one [`PluginError`]. Controller faults never cross this boundary
//! unmapped; the translator converts them first.

use thiserror::Error;

/// Normalized errors returned by plugin operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    /// Configuration could not be loaded (startup only)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Network does not exist or is not owned by the calling tenant
    #[error("Network {net_id} could not be found")]
    NetworkNotFound { net_id: String },

    /// Port does not exist on the network
    #[error("Port {port_id} could not be found on network {net_id}")]
    PortNotFound { port_id: String, net_id: String },

    /// Requested port state is not one of ACTIVE or DOWN
    #[error("Unsupported port state: {port_state}")]
    StateInvalid { port_state: String },

    /// Port already carries an attachment
    #[error(
        "Unable to plug the attachment {att_id} into port {port_id} for network {net_id}. \
         The port already carries attachment {existing_att_id}"
    )]
    AlreadyAttached {
        att_id: String,
        port_id: String,
        net_id: String,
        existing_att_id: String,
    },

    /// Catch-all controller or transport failure
    #[error("An unknown exception occurred: {0}")]
    QuantumException(String),
}

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

impl PluginError {
    pub(crate) fn network_not_found(net_id: impl Into<String>) -> Self {
        PluginError::NetworkNotFound {
            net_id: net_id.into(),
        }
    }

    pub(crate) fn port_not_found(port_id: impl Into<String>, net_id: impl Into<String>) -> Self {
        PluginError::PortNotFound {
            port_id: port_id.into(),
            net_id: net_id.into(),
        }
    }
}

impl From<ini::Error> for PluginError {
    fn from(err: ini::Error) -> Self {
        PluginError::ConfigurationError(err.to_string())
    }
}

impl From<ini::ParseError> for PluginError {
    fn from(err: ini::ParseError) -> Self {
        PluginError::ConfigurationError(err.to_string())
    }
}

impl From<csv::Error> for PluginError {
    fn from(err: csv::Error) -> Self {
        PluginError::ConfigurationError(err.to_string())
    }
}

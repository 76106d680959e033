// Copyright (c) 2025 - Cowboy AI, Inc.

//! Normalized results handed back to the orchestration framework
//!
//! Field names follow the framework's mapping keys (`net-id`,
//! `port-op-status`, ...), so serializing any of these types yields the
//! mapping the framework expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::controller::LinkState;
use crate::errors::PluginError;

/// Operational status reported for every network the controller returns
pub const NETWORK_OP_STATUS: &str = "UP";

/// Administrative state of a port as the framework spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortState {
    Active,
    Down,
}

impl PortState {
    pub fn admin_enabled(&self) -> bool {
        matches!(self, PortState::Active)
    }

    pub fn from_admin_enabled(enabled: bool) -> Self {
        if enabled {
            PortState::Active
        } else {
            PortState::Down
        }
    }
}

impl FromStr for PortState {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PortState::Active),
            "DOWN" => Ok(PortState::Down),
            other => Err(PluginError::StateInvalid {
                port_state: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Active => write!(f, "ACTIVE"),
            PortState::Down => write!(f, "DOWN"),
        }
    }
}

/// Entry of a tenant's network listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    #[serde(rename = "net-id")]
    pub net_id: String,
    #[serde(rename = "net-name")]
    pub net_name: String,
}

/// Result of creating or updating a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(rename = "net-id")]
    pub net_id: String,
    #[serde(rename = "net-name")]
    pub net_name: String,
    #[serde(rename = "net-op-status")]
    pub net_op_status: String,
}

/// Network with the remote interfaces attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDetails {
    #[serde(rename = "net-id")]
    pub net_id: String,
    #[serde(rename = "net-name")]
    pub net_name: String,
    #[serde(rename = "net-op-status")]
    pub net_op_status: String,
    #[serde(rename = "net-ifaces")]
    pub net_ifaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRef {
    #[serde(rename = "net-id")]
    pub net_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    #[serde(rename = "port-id")]
    pub port_id: String,
}

/// Result of creating a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    #[serde(rename = "port-id")]
    pub port_id: String,
    #[serde(rename = "port-op-status")]
    pub port_op_status: LinkState,
}

/// Result of updating a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortUpdateInfo {
    #[serde(rename = "port-id")]
    pub port_id: String,
    pub port_state: PortState,
    #[serde(rename = "port-op-status")]
    pub port_op_status: LinkState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDetails {
    #[serde(rename = "port-id")]
    pub port_id: String,
    #[serde(rename = "net-id")]
    pub net_id: String,
    /// VIF bound to the port, if any
    pub attachment: Option<String>,
    pub port_state: PortState,
    #[serde(rename = "port-op-status")]
    pub port_op_status: LinkState,
}

/// Optional changes to a network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkUpdate {
    pub name: Option<String>,
}

/// Optional changes to a port; `state` is validated before use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortUpdate {
    pub state: Option<String>,
}

/// Filters accepted by port listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortFilter {
    /// Only ports bound to this VIF
    pub attachment: Option<String>,
}

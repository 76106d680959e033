// Copyright (c) 2025 - Cowboy AI, Inc.

//! Controller client abstraction
//!
//! [`Controller`] is the seam between the translator and the remote
//! controller. [`HttpController`] is the production implementation; tests
//! substitute an in-memory one.
//!
//! Implementations report [`ControllerFault`]s only. Those never leave the
//! crate: the translator maps every one of them onto a
//! [`PluginError`](crate::errors::PluginError).

pub mod http;
pub mod resources;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpController;
pub use resources::{
    LinkState, LogicalPort, LogicalPortSpec, LogicalSwitch, LogicalSwitchSpec,
    LogicalSwitchUpdate, PortAttachment, PortQuery, PortStats, SwitchQuery, Tag, TransportZone,
    TransportZoneBinding,
};

/// Controller-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerFault {
    /// Addressed resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request conflicts with the resource's current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport failure, timeout, or any other controller error
    #[error("Controller fault: {0}")]
    Fault(String),
}

/// Result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerFault>;

impl From<reqwest::Error> for ControllerFault {
    fn from(err: reqwest::Error) -> Self {
        ControllerFault::Fault(err.to_string())
    }
}

impl From<serde_json::Error> for ControllerFault {
    fn from(err: serde_json::Error) -> Self {
        ControllerFault::Fault(format!("undecodable controller response: {}", err))
    }
}

/// Logical switch and logical port operations against the active controller
#[async_trait]
pub trait Controller: Send + Sync {
    /// Default transport zone of the active connection
    fn default_transport_zone(&self) -> String;

    /// Active connection in human readable form
    fn describe_connection(&self) -> String;

    async fn read_transport_zone(&self, zone_id: &str) -> ControllerResult<TransportZone>;

    async fn read_switch(&self, switch_id: &str) -> ControllerResult<LogicalSwitch>;

    async fn create_switch(&self, spec: &LogicalSwitchSpec) -> ControllerResult<LogicalSwitch>;

    async fn update_switch(
        &self,
        switch_id: &str,
        update: &LogicalSwitchUpdate,
    ) -> ControllerResult<LogicalSwitch>;

    async fn delete_switch(&self, switch_id: &str) -> ControllerResult<()>;

    async fn query_switches(&self, query: &SwitchQuery) -> ControllerResult<Vec<LogicalSwitch>>;

    /// Read one port, optionally expanding a relation such as its attachment
    async fn read_port(
        &self,
        switch_id: &str,
        port_id: &str,
        relations: Option<&str>,
    ) -> ControllerResult<LogicalPort>;

    async fn create_port(
        &self,
        switch_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort>;

    async fn update_port(
        &self,
        switch_id: &str,
        port_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort>;

    async fn delete_port(&self, switch_id: &str, port_id: &str) -> ControllerResult<()>;

    async fn query_ports(
        &self,
        switch_id: &str,
        query: &PortQuery,
    ) -> ControllerResult<Vec<LogicalPort>>;

    /// Replace a port's attachment; a port that already has one answers Conflict
    async fn set_attachment(
        &self,
        switch_id: &str,
        port_id: &str,
        attachment: &PortAttachment,
    ) -> ControllerResult<()>;

    async fn read_link_status(&self, switch_id: &str, port_id: &str)
        -> ControllerResult<LinkState>;

    async fn read_port_stats(&self, switch_id: &str, port_id: &str)
        -> ControllerResult<PortStats>;
}

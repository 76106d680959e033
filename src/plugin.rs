// Copyright (c) 2025 - Cowboy AI, Inc.

//! Operation set consumed by the orchestration framework
//!
//! [`QuantumPluginBase`] is the framework-facing contract. [`NvpPlugin`]
//! implements it by delegating every call to a [`ResourceTranslator`]; it
//! adds no logic of its own beyond building the translator at startup.
//!
//! # Example
//!
//! ```rust,no_run
//! use aicq::plugin::{NvpPlugin, QuantumPluginBase};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plugin = NvpPlugin::from_config_file("/etc/quantum/plugins/nvp/nvp.ini")?;
//! plugin.check_default_transport_zone().await?;
//!
//! let net = plugin.create_network("tenant-1", "net-A").await?;
//! let port = plugin.create_port("tenant-1", &net.net_id, "ACTIVE").await?;
//! plugin
//!     .plug_interface("tenant-1", &net.net_id, &port.port_id, "vif-1")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::connection::ConnectionSelector;
use crate::controller::{Controller, HttpController, PortStats};
use crate::envelope::{
    NetworkDetails, NetworkInfo, NetworkRef, NetworkSummary, NetworkUpdate, PortDetails,
    PortFilter, PortInfo, PortRef, PortUpdate, PortUpdateInfo,
};
use crate::errors::{PluginError, PluginResult};
use crate::settings::{self, ConfigSource};
use crate::translator::ResourceTranslator;

/// Network and port operations the orchestration framework calls
#[async_trait]
pub trait QuantumPluginBase: Send + Sync {
    async fn get_all_networks(&self, tenant_id: &str) -> PluginResult<Vec<NetworkSummary>>;

    async fn create_network(&self, tenant_id: &str, net_name: &str) -> PluginResult<NetworkInfo>;

    async fn delete_network(&self, tenant_id: &str, net_id: &str) -> PluginResult<NetworkRef>;

    async fn get_network_details(
        &self,
        tenant_id: &str,
        net_id: &str,
    ) -> PluginResult<NetworkDetails>;

    async fn update_network(
        &self,
        tenant_id: &str,
        net_id: &str,
        update: &NetworkUpdate,
    ) -> PluginResult<NetworkInfo>;

    async fn get_all_ports(
        &self,
        tenant_id: &str,
        net_id: &str,
        filter: &PortFilter,
    ) -> PluginResult<Vec<PortRef>>;

    async fn create_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_state: &str,
    ) -> PluginResult<PortInfo>;

    async fn update_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        update: &PortUpdate,
    ) -> PluginResult<PortUpdateInfo>;

    async fn delete_port(&self, tenant_id: &str, net_id: &str, port_id: &str)
        -> PluginResult<PortRef>;

    async fn get_port_details(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortDetails>;

    async fn plug_interface(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        remote_interface_id: &str,
    ) -> PluginResult<()>;

    async fn unplug_interface(&self, tenant_id: &str, net_id: &str, port_id: &str)
        -> PluginResult<()>;

    async fn get_port_stats(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortStats>;
}

/// Plugin backed by a controller cluster
pub struct NvpPlugin<C = HttpController> {
    translator: ResourceTranslator<C>,
}

impl NvpPlugin<HttpController> {
    /// Build the plugin from a configuration source
    ///
    /// Fails with `ConfigurationError` when neither configuration layout
    /// yields a connection. This is the only startup failure.
    pub fn from_source(source: &dyn ConfigSource) -> PluginResult<Self> {
        let pool = settings::load_pool(source)?;
        let selector = Arc::new(ConnectionSelector::new(pool)?);
        let controller = HttpController::new(selector)
            .map_err(|e| PluginError::ConfigurationError(e.to_string()))?;

        info!(
            "NVP plugin ready, {} controller connection(s)",
            controller.selector().snapshot().len()
        );
        Ok(Self::with_controller(controller))
    }

    /// Build the plugin from an INI file
    pub fn from_config_file(path: impl AsRef<Path>) -> PluginResult<Self> {
        let source = settings::IniConfigSource::from_file(path)?;
        Self::from_source(&source)
    }
}

impl<C: Controller> NvpPlugin<C> {
    pub fn with_controller(controller: C) -> Self {
        Self {
            translator: ResourceTranslator::new(controller),
        }
    }

    pub fn translator(&self) -> &ResourceTranslator<C> {
        &self.translator
    }

    pub async fn create_custom_network(
        &self,
        tenant_id: &str,
        net_name: &str,
        transport_zone: &str,
        transport_type: Option<&str>,
    ) -> PluginResult<NetworkInfo> {
        self.translator
            .create_custom_network(tenant_id, net_name, transport_zone, transport_type)
            .await
    }

    pub async fn delete_all_ports(&self, tenant_id: &str, net_id: &str) -> PluginResult<Vec<PortRef>> {
        self.translator.delete_all_ports(tenant_id, net_id).await
    }

    pub async fn check_default_transport_zone(&self) -> PluginResult<()> {
        self.translator.check_default_transport_zone().await
    }
}

#[async_trait]
impl<C: Controller> QuantumPluginBase for NvpPlugin<C> {
    async fn get_all_networks(&self, tenant_id: &str) -> PluginResult<Vec<NetworkSummary>> {
        self.translator.get_all_networks(tenant_id).await
    }

    async fn create_network(&self, tenant_id: &str, net_name: &str) -> PluginResult<NetworkInfo> {
        self.translator.create_network(tenant_id, net_name).await
    }

    async fn delete_network(&self, tenant_id: &str, net_id: &str) -> PluginResult<NetworkRef> {
        self.translator.delete_network(tenant_id, net_id).await
    }

    async fn get_network_details(
        &self,
        tenant_id: &str,
        net_id: &str,
    ) -> PluginResult<NetworkDetails> {
        self.translator.get_network_details(tenant_id, net_id).await
    }

    async fn update_network(
        &self,
        tenant_id: &str,
        net_id: &str,
        update: &NetworkUpdate,
    ) -> PluginResult<NetworkInfo> {
        self.translator.update_network(tenant_id, net_id, update).await
    }

    async fn get_all_ports(
        &self,
        tenant_id: &str,
        net_id: &str,
        filter: &PortFilter,
    ) -> PluginResult<Vec<PortRef>> {
        self.translator.get_all_ports(tenant_id, net_id, filter).await
    }

    async fn create_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_state: &str,
    ) -> PluginResult<PortInfo> {
        self.translator
            .create_port(tenant_id, net_id, port_state)
            .await
    }

    async fn update_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        update: &PortUpdate,
    ) -> PluginResult<PortUpdateInfo> {
        self.translator
            .update_port(tenant_id, net_id, port_id, update)
            .await
    }

    async fn delete_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortRef> {
        self.translator.delete_port(tenant_id, net_id, port_id).await
    }

    async fn get_port_details(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortDetails> {
        self.translator
            .get_port_details(tenant_id, net_id, port_id)
            .await
    }

    async fn plug_interface(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        remote_interface_id: &str,
    ) -> PluginResult<()> {
        self.translator
            .plug_interface(tenant_id, net_id, port_id, remote_interface_id)
            .await
    }

    async fn unplug_interface(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<()> {
        self.translator
            .unplug_interface(tenant_id, net_id, port_id)
            .await
    }

    async fn get_port_stats(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortStats> {
        self.translator
            .get_port_stats(tenant_id, net_id, port_id)
            .await
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.

//! Network and port operations in framework terms
//!
//! [`ResourceTranslator`] owns the operation catalogue. Every operation
//! follows the same steps:
//!
//! 1. Validate caller input (port states) before anything goes on the wire
//! 2. Verify the tenant owns the target network (all but list and create)
//! 3. Issue the controller call(s)
//! 4. Map controller faults onto [`PluginError`]
//! 5. Reshape the controller response into the result envelope
//!
//! Ownership is the `{scope: os_tid, tag: <tenant>}` tag on the logical
//! switch. A network the tenant does not own is reported exactly like a
//! network that does not exist.

use std::collections::HashSet;

use tracing::{debug, error, info};

use crate::controller::resources::{ATTACHMENT_RELATION, DEFAULT_TRANSPORT_TYPE};
use crate::controller::{
    Controller, ControllerFault, LinkState, LogicalPortSpec, LogicalSwitch, LogicalSwitchSpec,
    LogicalSwitchUpdate, PortAttachment, PortQuery, PortStats, SwitchQuery, Tag,
    TransportZoneBinding,
};
use crate::envelope::{
    NetworkDetails, NetworkInfo, NetworkRef, NetworkSummary, NetworkUpdate, PortDetails,
    PortFilter, PortInfo, PortRef, PortState, PortUpdate, PortUpdateInfo, NETWORK_OP_STATUS,
};
use crate::errors::{PluginError, PluginResult};

/// Existing attachment reported when the conflicting port cannot be read
const UNKNOWN_ATTACHMENT: &str = "UNKNOWN";

/// Map a controller fault, naming what a not-found answer means here
fn translate(fault: ControllerFault, not_found: PluginError) -> PluginError {
    match fault {
        ControllerFault::NotFound(detail) => {
            error!("{} ({})", not_found, detail);
            not_found
        }
        ControllerFault::Conflict(detail) | ControllerFault::Fault(detail) => {
            error!("Controller request failed: {}", detail);
            PluginError::QuantumException(detail)
        }
    }
}

/// Translates framework operations into controller calls
pub struct ResourceTranslator<C> {
    controller: C,
}

impl<C: Controller> ResourceTranslator<C> {
    pub fn new(controller: C) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    // ------------------------------------------------------------------
    // Ownership and health
    // ------------------------------------------------------------------

    /// Read a network, failing with NetworkNotFound unless the tenant owns it
    pub async fn check_tenant(&self, tenant_id: &str, net_id: &str) -> PluginResult<LogicalSwitch> {
        let switch = self
            .controller
            .read_switch(net_id)
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        if !switch.owned_by(tenant_id) {
            debug!("Network {} is not owned by tenant {}", net_id, tenant_id);
            return Err(PluginError::network_not_found(net_id));
        }
        Ok(switch)
    }

    /// Verify the active connection's default transport zone exists
    pub async fn check_default_transport_zone(&self) -> PluginResult<()> {
        let zone_id = self.controller.default_transport_zone();
        match self.controller.read_transport_zone(&zone_id).await {
            Ok(zone) => {
                info!("Default transport zone {} found ({})", zone.uuid, zone.display_name);
                Ok(())
            }
            Err(ControllerFault::NotFound(_)) => Err(PluginError::QuantumException(format!(
                "Unable to find zone \"{}\" for controller \"{}\"",
                zone_id,
                self.controller.describe_connection()
            ))),
            Err(fault) => Err(translate(fault, PluginError::QuantumException(zone_id))),
        }
    }

    // ------------------------------------------------------------------
    // Networks
    // ------------------------------------------------------------------

    /// Networks tagged for the tenant, de-duplicated by id
    pub async fn get_all_networks(&self, tenant_id: &str) -> PluginResult<Vec<NetworkSummary>> {
        let switches = self
            .controller
            .query_switches(&SwitchQuery::for_tenant(tenant_id))
            .await
            .map_err(|f| translate(f, PluginError::QuantumException(tenant_id.to_string())))?;

        let mut seen = HashSet::new();
        let networks: Vec<NetworkSummary> = switches
            .into_iter()
            .filter(|s| seen.insert(s.uuid.clone()))
            .map(|s| NetworkSummary {
                net_id: s.uuid,
                net_name: s.display_name,
            })
            .collect();

        debug!(
            "get_all_networks() completed for tenant {}: {} network(s)",
            tenant_id,
            networks.len()
        );
        Ok(networks)
    }

    /// Create a network bound to the default transport zone
    pub async fn create_network(&self, tenant_id: &str, net_name: &str) -> PluginResult<NetworkInfo> {
        let zone = self.controller.default_transport_zone();
        self.create_custom_network(tenant_id, net_name, &zone, None)
            .await
    }

    /// Create a network bound to an explicit transport zone
    pub async fn create_custom_network(
        &self,
        tenant_id: &str,
        net_name: &str,
        transport_zone: &str,
        transport_type: Option<&str>,
    ) -> PluginResult<NetworkInfo> {
        let spec = LogicalSwitchSpec {
            display_name: net_name.to_string(),
            transport_zones: vec![TransportZoneBinding {
                zone_uuid: transport_zone.to_string(),
                transport_type: transport_type.unwrap_or(DEFAULT_TRANSPORT_TYPE).to_string(),
            }],
            tags: vec![Tag::tenant(tenant_id)],
        };

        let switch = self
            .controller
            .create_switch(&spec)
            .await
            .map_err(|f| translate(f, PluginError::QuantumException(net_name.to_string())))?;

        debug!(
            "create_network() completed for tenant {}: {}",
            tenant_id, switch.uuid
        );
        Ok(NetworkInfo {
            net_id: switch.uuid,
            net_name: switch.display_name,
            net_op_status: NETWORK_OP_STATUS.to_string(),
        })
    }

    /// Network name plus the VIFs attached to its ports
    pub async fn get_network_details(
        &self,
        tenant_id: &str,
        net_id: &str,
    ) -> PluginResult<NetworkDetails> {
        let switch = self.check_tenant(tenant_id, net_id).await?;

        let ports = self
            .controller
            .query_ports(net_id, &PortQuery::with_attachments())
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        let net_ifaces = ports
            .iter()
            .filter_map(|p| p.vif_uuid().map(str::to_string))
            .collect();

        debug!("get_network_details() completed for tenant {}", tenant_id);
        Ok(NetworkDetails {
            net_id: net_id.to_string(),
            net_name: switch.display_name,
            net_op_status: NETWORK_OP_STATUS.to_string(),
            net_ifaces,
        })
    }

    pub async fn update_network(
        &self,
        tenant_id: &str,
        net_id: &str,
        update: &NetworkUpdate,
    ) -> PluginResult<NetworkInfo> {
        self.check_tenant(tenant_id, net_id).await?;

        let body = LogicalSwitchUpdate {
            display_name: update.name.clone(),
        };
        let switch = self
            .controller
            .update_switch(net_id, &body)
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        debug!("update_network() completed for tenant {}", tenant_id);
        Ok(NetworkInfo {
            net_id: net_id.to_string(),
            net_name: switch.display_name,
            net_op_status: NETWORK_OP_STATUS.to_string(),
        })
    }

    pub async fn delete_network(&self, tenant_id: &str, net_id: &str) -> PluginResult<NetworkRef> {
        self.check_tenant(tenant_id, net_id).await?;

        self.controller
            .delete_switch(net_id)
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        debug!("delete_network() completed for tenant {}", tenant_id);
        Ok(NetworkRef {
            net_id: net_id.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    /// Port ids on a network, optionally only those bound to one VIF
    pub async fn get_all_ports(
        &self,
        tenant_id: &str,
        net_id: &str,
        filter: &PortFilter,
    ) -> PluginResult<Vec<PortRef>> {
        self.check_tenant(tenant_id, net_id).await?;

        let query = PortQuery {
            attachment_vif_uuid: filter.attachment.clone(),
            ..PortQuery::uuids()
        };
        let ports = self
            .controller
            .query_ports(net_id, &query)
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        debug!(
            "get_all_ports() completed for tenant {}: {} port(s)",
            tenant_id,
            ports.len()
        );
        Ok(ports
            .into_iter()
            .map(|p| PortRef { port_id: p.uuid })
            .collect())
    }

    /// Create a port in the requested admin state
    ///
    /// `port_state` must be `ACTIVE` or `DOWN`; anything else fails before
    /// the controller is contacted.
    pub async fn create_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_state: &str,
    ) -> PluginResult<PortInfo> {
        let state = Self::validate_state(port_state)?;
        self.check_tenant(tenant_id, net_id).await?;

        let spec = LogicalPortSpec {
            admin_status_enabled: Some(state.admin_enabled()),
        };
        let port = self
            .controller
            .create_port(net_id, &spec)
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        let port_op_status = self.link_status(net_id, &port.uuid).await?;

        debug!("create_port() completed for tenant {}: {}", tenant_id, port.uuid);
        Ok(PortInfo {
            port_id: port.uuid,
            port_op_status,
        })
    }

    /// Update a port; without a state the admin status is left as is
    pub async fn update_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        update: &PortUpdate,
    ) -> PluginResult<PortUpdateInfo> {
        let state = update
            .state
            .as_deref()
            .map(Self::validate_state)
            .transpose()?;
        self.check_tenant(tenant_id, net_id).await?;

        let spec = LogicalPortSpec {
            admin_status_enabled: state.map(|s| s.admin_enabled()),
        };
        let port = self
            .controller
            .update_port(net_id, port_id, &spec)
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))?;

        let port_op_status = self.link_status(net_id, port_id).await?;

        debug!("update_port() completed for tenant {}", tenant_id);
        Ok(PortUpdateInfo {
            port_id: port_id.to_string(),
            port_state: PortState::from_admin_enabled(port.admin_status_enabled),
            port_op_status,
        })
    }

    pub async fn delete_port(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortRef> {
        self.check_tenant(tenant_id, net_id).await?;

        self.controller
            .delete_port(net_id, port_id)
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))?;

        debug!("delete_port() completed for tenant {}", tenant_id);
        Ok(PortRef {
            port_id: port_id.to_string(),
        })
    }

    /// Delete every port on a network, one request per port
    ///
    /// A failed deletion does not stop the remaining ones, and nothing
    /// already deleted is restored. The first failure is returned once
    /// every port has been attempted.
    pub async fn delete_all_ports(&self, tenant_id: &str, net_id: &str) -> PluginResult<Vec<PortRef>> {
        self.check_tenant(tenant_id, net_id).await?;

        let ports = self
            .controller
            .query_ports(net_id, &PortQuery::uuids())
            .await
            .map_err(|f| translate(f, PluginError::network_not_found(net_id)))?;

        let mut deleted = Vec::with_capacity(ports.len());
        let mut first_failure = None;
        for port in ports {
            match self.controller.delete_port(net_id, &port.uuid).await {
                Ok(()) => deleted.push(PortRef { port_id: port.uuid }),
                Err(fault) => {
                    let err = translate(fault, PluginError::port_not_found(&port.uuid, net_id));
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => {
                debug!(
                    "delete_all_ports() removed {} port(s) for tenant {}",
                    deleted.len(),
                    tenant_id
                );
                Ok(deleted)
            }
        }
    }

    /// Port admin state, attachment and link status
    pub async fn get_port_details(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortDetails> {
        self.check_tenant(tenant_id, net_id).await?;

        let port = self
            .controller
            .read_port(net_id, port_id, Some(ATTACHMENT_RELATION))
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))?;
        let port_op_status = self.link_status(net_id, port_id).await?;

        Ok(PortDetails {
            port_id: port_id.to_string(),
            net_id: net_id.to_string(),
            attachment: port.vif_uuid().map(str::to_string),
            port_state: PortState::from_admin_enabled(port.admin_status_enabled),
            port_op_status,
        })
    }

    /// Bind a remote interface (VIF) to a port
    pub async fn plug_interface(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
        remote_interface_id: &str,
    ) -> PluginResult<()> {
        self.check_tenant(tenant_id, net_id).await?;

        let attachment = PortAttachment::VifAttachment {
            vif_uuid: remote_interface_id.to_string(),
        };
        match self
            .controller
            .set_attachment(net_id, port_id, &attachment)
            .await
        {
            Ok(()) => {
                debug!(
                    "plug_interface() completed for tenant {}: {} on {}",
                    tenant_id, remote_interface_id, port_id
                );
                Ok(())
            }
            Err(ControllerFault::Conflict(detail)) => {
                error!("Conflict while making attachment to port: {}", detail);
                let existing_att_id = self.current_attachment(net_id, port_id).await;
                Err(PluginError::AlreadyAttached {
                    att_id: remote_interface_id.to_string(),
                    port_id: port_id.to_string(),
                    net_id: net_id.to_string(),
                    existing_att_id,
                })
            }
            Err(fault) => Err(translate(fault, PluginError::port_not_found(port_id, net_id))),
        }
    }

    /// Clear a port's attachment
    pub async fn unplug_interface(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<()> {
        self.check_tenant(tenant_id, net_id).await?;

        self.controller
            .set_attachment(net_id, port_id, &PortAttachment::NoAttachment)
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))?;

        debug!("unplug_interface() completed for tenant {}", tenant_id);
        Ok(())
    }

    pub async fn get_port_stats(
        &self,
        tenant_id: &str,
        net_id: &str,
        port_id: &str,
    ) -> PluginResult<PortStats> {
        self.check_tenant(tenant_id, net_id).await?;

        let stats = self
            .controller
            .read_port_stats(net_id, port_id)
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))?;

        debug!("Returning stats for port {} on {}: {:?}", port_id, net_id, stats);
        Ok(stats)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn validate_state(port_state: &str) -> PluginResult<PortState> {
        port_state.parse::<PortState>().map_err(|e| {
            error!(
                "Invalid port state (ACTIVE and DOWN are valid states): {}",
                port_state
            );
            e
        })
    }

    async fn link_status(&self, net_id: &str, port_id: &str) -> PluginResult<LinkState> {
        self.controller
            .read_link_status(net_id, port_id)
            .await
            .map_err(|f| translate(f, PluginError::port_not_found(port_id, net_id)))
    }

    /// VIF currently bound to a port, as far as it can be read
    async fn current_attachment(&self, net_id: &str, port_id: &str) -> String {
        match self
            .controller
            .read_port(net_id, port_id, Some(ATTACHMENT_RELATION))
            .await
        {
            Ok(port) => port
                .vif_uuid()
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_ATTACHMENT.to_string()),
            Err(fault) => {
                debug!("Could not read conflicting attachment: {}", fault);
                UNKNOWN_ATTACHMENT.to_string()
            }
        }
    }
}

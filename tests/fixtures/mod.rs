// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for aicq
//!
//! Provides an in-memory controller that stands in for a controller cluster
//! in translator and plugin tests.
//!
//! # Design Principles
//! - Seeding helpers (`add_network`, `add_port`) bypass the call counter
//! - Every `Controller` call is counted and logged by name
//! - Faults are injected per resource, never at random

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use aicq::controller::resources::PortRelations;
use aicq::controller::{
    Controller, ControllerFault, ControllerResult, LinkState, LogicalPort, LogicalPortSpec,
    LogicalSwitch, LogicalSwitchSpec, LogicalSwitchUpdate, PortAttachment, PortQuery, PortStats,
    SwitchQuery, Tag, TransportZone, TransportZoneBinding,
};

pub const TENANT_1: &str = "tenant-1";
pub const TENANT_2: &str = "tenant-2";
pub const DEFAULT_ZONE: &str = "01934f4a-7a00-7000-8000-00000000a001";

#[derive(Debug, Default)]
struct FakeState {
    switches: BTreeMap<String, LogicalSwitch>,
    /// Ports per switch, in creation order
    ports: BTreeMap<String, Vec<LogicalPort>>,
    zones: HashSet<String>,
    link_up: bool,
    failing_deletes: HashSet<String>,
    calls: Vec<String>,
}

/// In-memory controller with call counting and fault injection
#[derive(Debug)]
pub struct FakeController {
    default_zone: String,
    state: Mutex<FakeState>,
}

impl Default for FakeController {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeController {
    /// Controller whose default zone exists and whose links are up
    pub fn new() -> Self {
        let mut state = FakeState {
            link_up: true,
            ..FakeState::default()
        };
        state.zones.insert(DEFAULT_ZONE.to_string());

        Self {
            default_zone: DEFAULT_ZONE.to_string(),
            state: Mutex::new(state),
        }
    }

    /// Controller whose configured default zone does not exist
    pub fn without_default_zone() -> Self {
        let fake = Self::new();
        fake.state.lock().zones.clear();
        fake
    }

    pub fn set_link_up(&self, up: bool) {
        self.state.lock().link_up = up;
    }

    /// Seed a network owned by a tenant
    pub fn add_network(&self, tenant_id: &str, name: &str) -> String {
        let uuid = Uuid::now_v7().to_string();
        let switch = LogicalSwitch {
            uuid: uuid.clone(),
            display_name: name.to_string(),
            transport_zones: vec![TransportZoneBinding {
                zone_uuid: self.default_zone.clone(),
                transport_type: "gre".to_string(),
            }],
            tags: vec![Tag::tenant(tenant_id)],
        };

        let mut state = self.state.lock();
        state.switches.insert(uuid.clone(), switch);
        state.ports.insert(uuid.clone(), Vec::new());
        uuid
    }

    /// Seed a port, optionally bound to a VIF
    pub fn add_port(&self, net_id: &str, vif: Option<&str>) -> String {
        let uuid = Uuid::now_v7().to_string();
        let port = LogicalPort {
            uuid: uuid.clone(),
            display_name: None,
            admin_status_enabled: true,
            relations: Some(PortRelations {
                attachment: vif.map(|v| PortAttachment::VifAttachment {
                    vif_uuid: v.to_string(),
                }),
            }),
        };

        self.state
            .lock()
            .ports
            .entry(net_id.to_string())
            .or_default()
            .push(port);
        uuid
    }

    /// Make every delete of this port fail with a generic fault
    pub fn fail_delete_of(&self, port_id: &str) {
        self.state.lock().failing_deletes.insert(port_id.to_string());
    }

    /// Number of controller calls made so far
    pub fn calls(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Names of the controller calls made so far
    pub fn call_log(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn switch(&self, net_id: &str) -> Option<LogicalSwitch> {
        self.state.lock().switches.get(net_id).cloned()
    }

    pub fn port(&self, net_id: &str, port_id: &str) -> Option<LogicalPort> {
        self.state
            .lock()
            .ports
            .get(net_id)
            .and_then(|ports| ports.iter().find(|p| p.uuid == port_id).cloned())
    }

    pub fn port_ids(&self, net_id: &str) -> Vec<String> {
        self.state
            .lock()
            .ports
            .get(net_id)
            .map(|ports| ports.iter().map(|p| p.uuid.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: &str) {
        self.state.lock().calls.push(call.to_string());
    }

    fn not_found(what: &str, id: &str) -> ControllerFault {
        ControllerFault::NotFound(format!("{} {}", what, id))
    }

    fn with_port<T>(
        &self,
        switch_id: &str,
        port_id: &str,
        f: impl FnOnce(&mut LogicalPort) -> ControllerResult<T>,
    ) -> ControllerResult<T> {
        let mut state = self.state.lock();
        let ports = state
            .ports
            .get_mut(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))?;
        let port = ports
            .iter_mut()
            .find(|p| p.uuid == port_id)
            .ok_or_else(|| Self::not_found("lport", port_id))?;
        f(port)
    }
}

#[async_trait]
impl Controller for FakeController {
    fn default_transport_zone(&self) -> String {
        self.default_zone.clone()
    }

    fn describe_connection(&self) -> String {
        "fake-controller:443 (#0)".to_string()
    }

    async fn read_transport_zone(&self, zone_id: &str) -> ControllerResult<TransportZone> {
        self.record("read_transport_zone");
        if self.state.lock().zones.contains(zone_id) {
            Ok(TransportZone {
                uuid: zone_id.to_string(),
                display_name: "default".to_string(),
            })
        } else {
            Err(Self::not_found("transport-zone", zone_id))
        }
    }

    async fn read_switch(&self, switch_id: &str) -> ControllerResult<LogicalSwitch> {
        self.record("read_switch");
        self.switch(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))
    }

    async fn create_switch(&self, spec: &LogicalSwitchSpec) -> ControllerResult<LogicalSwitch> {
        self.record("create_switch");
        let switch = LogicalSwitch {
            uuid: Uuid::now_v7().to_string(),
            display_name: spec.display_name.clone(),
            transport_zones: spec.transport_zones.clone(),
            tags: spec.tags.clone(),
        };

        let mut state = self.state.lock();
        state.switches.insert(switch.uuid.clone(), switch.clone());
        state.ports.insert(switch.uuid.clone(), Vec::new());
        Ok(switch)
    }

    async fn update_switch(
        &self,
        switch_id: &str,
        update: &LogicalSwitchUpdate,
    ) -> ControllerResult<LogicalSwitch> {
        self.record("update_switch");
        let mut state = self.state.lock();
        let switch = state
            .switches
            .get_mut(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))?;
        if let Some(name) = &update.display_name {
            switch.display_name = name.clone();
        }
        Ok(switch.clone())
    }

    async fn delete_switch(&self, switch_id: &str) -> ControllerResult<()> {
        self.record("delete_switch");
        let mut state = self.state.lock();
        state.ports.remove(switch_id);
        state
            .switches
            .remove(switch_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("lswitch", switch_id))
    }

    async fn query_switches(&self, query: &SwitchQuery) -> ControllerResult<Vec<LogicalSwitch>> {
        self.record("query_switches");
        let state = self.state.lock();
        Ok(state
            .switches
            .values()
            .filter(|s| query.tags.iter().all(|t| s.tags.contains(t)))
            .cloned()
            .collect())
    }

    async fn read_port(
        &self,
        switch_id: &str,
        port_id: &str,
        relations: Option<&str>,
    ) -> ControllerResult<LogicalPort> {
        self.record("read_port");
        let mut port = self.with_port(switch_id, port_id, |p| Ok(p.clone()))?;
        if relations.is_none() {
            port.relations = None;
        }
        Ok(port)
    }

    async fn create_port(
        &self,
        switch_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort> {
        self.record("create_port");
        let port = LogicalPort {
            uuid: Uuid::now_v7().to_string(),
            display_name: None,
            admin_status_enabled: spec.admin_status_enabled.unwrap_or(true),
            relations: Some(PortRelations::default()),
        };

        let mut state = self.state.lock();
        let ports = state
            .ports
            .get_mut(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))?;
        ports.push(port.clone());
        Ok(LogicalPort {
            relations: None,
            ..port
        })
    }

    async fn update_port(
        &self,
        switch_id: &str,
        port_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort> {
        self.record("update_port");
        self.with_port(switch_id, port_id, |p| {
            if let Some(enabled) = spec.admin_status_enabled {
                p.admin_status_enabled = enabled;
            }
            Ok(LogicalPort {
                relations: None,
                ..p.clone()
            })
        })
    }

    async fn delete_port(&self, switch_id: &str, port_id: &str) -> ControllerResult<()> {
        self.record("delete_port");
        let mut state = self.state.lock();
        if state.failing_deletes.contains(port_id) {
            return Err(ControllerFault::Fault(format!(
                "503 Service Unavailable deleting {}",
                port_id
            )));
        }

        let ports = state
            .ports
            .get_mut(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))?;
        let before = ports.len();
        ports.retain(|p| p.uuid != port_id);
        if ports.len() == before {
            return Err(Self::not_found("lport", port_id));
        }
        Ok(())
    }

    async fn query_ports(
        &self,
        switch_id: &str,
        query: &PortQuery,
    ) -> ControllerResult<Vec<LogicalPort>> {
        self.record("query_ports");
        let state = self.state.lock();
        let ports = state
            .ports
            .get(switch_id)
            .ok_or_else(|| Self::not_found("lswitch", switch_id))?;

        Ok(ports
            .iter()
            .filter(|p| match &query.attachment_vif_uuid {
                Some(vif) => p.vif_uuid() == Some(vif.as_str()),
                None => true,
            })
            .map(|p| LogicalPort {
                relations: query.relations.as_ref().and(p.relations.clone()),
                ..p.clone()
            })
            .collect())
    }

    async fn set_attachment(
        &self,
        switch_id: &str,
        port_id: &str,
        attachment: &PortAttachment,
    ) -> ControllerResult<()> {
        self.record("set_attachment");
        self.with_port(switch_id, port_id, |p| {
            if let PortAttachment::VifAttachment { .. } = attachment {
                if let Some(existing) = p.vif_uuid() {
                    return Err(ControllerFault::Conflict(format!(
                        "port {} already attached to {}",
                        port_id, existing
                    )));
                }
            }
            let stored = match attachment {
                PortAttachment::NoAttachment => None,
                other => Some(other.clone()),
            };
            p.relations = Some(PortRelations { attachment: stored });
            Ok(())
        })
    }

    async fn read_link_status(
        &self,
        switch_id: &str,
        port_id: &str,
    ) -> ControllerResult<LinkState> {
        self.record("read_link_status");
        self.with_port(switch_id, port_id, |_| Ok(()))?;
        if self.state.lock().link_up {
            Ok(LinkState::Up)
        } else {
            Ok(LinkState::Down)
        }
    }

    async fn read_port_stats(
        &self,
        switch_id: &str,
        port_id: &str,
    ) -> ControllerResult<PortStats> {
        self.record("read_port_stats");
        self.with_port(switch_id, port_id, |_| {
            Ok(PortStats {
                rx_packets: 10,
                rx_bytes: 1500,
                tx_packets: 7,
                tx_bytes: 980,
                ..PortStats::default()
            })
        })
    }
}

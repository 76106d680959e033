// Copyright (c) 2025 - Cowboy AI, Inc.

//! Controller resource representations
//!
//! These mirror the JSON the controller exchanges for logical switches,
//! logical ports and their sub-resources. Fields that a field-projected
//! query may omit default instead of failing to decode.

use serde::{Deserialize, Serialize};

/// Tag scope marking the owning tenant of a resource
pub const TENANT_SCOPE: &str = "os_tid";

/// Relation name carrying a port's attachment
pub const ATTACHMENT_RELATION: &str = "LogicalPortAttachment";

/// Transport type bound to networks when none is given
pub const DEFAULT_TRANSPORT_TYPE: &str = "gre";

/// A `{scope, tag}` pair attached to a controller resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub scope: String,
}

impl Tag {
    /// Ownership tag for a tenant
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            tag: tenant_id.into(),
            scope: TENANT_SCOPE.to_string(),
        }
    }

    pub fn marks_tenant(&self, tenant_id: &str) -> bool {
        self.scope == TENANT_SCOPE && self.tag == tenant_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportZoneBinding {
    pub zone_uuid: String,
    pub transport_type: String,
}

/// Logical switch as returned by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSwitch {
    pub uuid: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub transport_zones: Vec<TransportZoneBinding>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl LogicalSwitch {
    /// True when the switch carries the tenant's ownership tag
    pub fn owned_by(&self, tenant_id: &str) -> bool {
        self.tags.iter().any(|t| t.marks_tenant(tenant_id))
    }
}

/// Body of a logical switch creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSwitchSpec {
    pub display_name: String,
    pub transport_zones: Vec<TransportZoneBinding>,
    pub tags: Vec<Tag>,
}

/// Body of a logical switch update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSwitchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Attachment relation of a logical port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PortAttachment {
    VifAttachment { vif_uuid: String },
    NoAttachment,
    /// Any attachment type this adapter does not manage
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRelations {
    #[serde(
        rename = "LogicalPortAttachment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attachment: Option<PortAttachment>,
}

/// Logical port as returned by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalPort {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub admin_status_enabled: bool,
    #[serde(rename = "_relations", default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<PortRelations>,
}

impl LogicalPort {
    /// Remote interface bound to the port, if it has a VIF attachment
    pub fn vif_uuid(&self) -> Option<&str> {
        match self.relations.as_ref()?.attachment.as_ref()? {
            PortAttachment::VifAttachment { vif_uuid } => Some(vif_uuid),
            _ => None,
        }
    }
}

/// Body of a logical port create or update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalPortSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_status_enabled: Option<bool>,
}

/// Link state derived from a port's status sub-resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkState {
    Up,
    Down,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "UP",
            LinkState::Down => "DOWN",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatus {
    #[serde(default)]
    pub link_status_up: bool,
}

impl From<PortStatus> for LinkState {
    fn from(status: PortStatus) -> Self {
        if status.link_status_up {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }
}

/// Traffic counters of a logical port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStats {
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default)]
    pub tx_errors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportZone {
    pub uuid: String,
    #[serde(default)]
    pub display_name: String,
}

/// Envelope of every controller query response
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub result_count: Option<u64>,
}

/// Logical switch query: projected fields plus tag filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchQuery {
    pub fields: Vec<String>,
    pub tags: Vec<Tag>,
}

impl SwitchQuery {
    /// Switches owned by a tenant, projected to id and name
    pub fn for_tenant(tenant_id: &str) -> Self {
        Self {
            fields: vec!["uuid".to_string(), "display_name".to_string()],
            tags: vec![Tag::tenant(tenant_id)],
        }
    }
}

/// Logical port query on one switch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortQuery {
    pub fields: Vec<String>,
    pub relations: Option<String>,
    pub attachment_vif_uuid: Option<String>,
}

impl PortQuery {
    /// Port ids only
    pub fn uuids() -> Self {
        Self {
            fields: vec!["uuid".to_string()],
            ..Self::default()
        }
    }

    /// Full ports including their attachment relation
    pub fn with_attachments() -> Self {
        Self {
            fields: vec!["*".to_string()],
            relations: Some(ATTACHMENT_RELATION.to_string()),
            attachment_vif_uuid: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_switch_ownership() {
        let switch: LogicalSwitch = serde_json::from_value(json!({
            "uuid": "ls-1",
            "display_name": "net-A",
            "tags": [
                {"tag": "tenant-2", "scope": "other"},
                {"tag": "tenant-1", "scope": "os_tid"}
            ]
        }))
        .unwrap();

        assert!(switch.owned_by("tenant-1"));
        assert!(!switch.owned_by("tenant-2"));
        assert!(switch.transport_zones.is_empty());
    }

    #[test]
    fn test_attachment_relation_decoding() {
        let port: LogicalPort = serde_json::from_value(json!({
            "uuid": "lp-1",
            "admin_status_enabled": true,
            "_relations": {
                "LogicalPortAttachment": {"type": "VifAttachment", "vif_uuid": "vif-1"}
            }
        }))
        .unwrap();
        assert_eq!(port.vif_uuid(), Some("vif-1"));

        let port: LogicalPort = serde_json::from_value(json!({
            "uuid": "lp-2",
            "_relations": {
                "LogicalPortAttachment": {"type": "L3GatewayAttachment", "l3_gateway_service_uuid": "x"}
            }
        }))
        .unwrap();
        assert_eq!(port.vif_uuid(), None);
        assert_eq!(
            port.relations.unwrap().attachment,
            Some(PortAttachment::Unsupported)
        );
    }

    #[test]
    fn test_attachment_request_bodies() {
        let plug = serde_json::to_value(PortAttachment::VifAttachment {
            vif_uuid: "vif-9".to_string(),
        })
        .unwrap();
        assert_eq!(plug, json!({"type": "VifAttachment", "vif_uuid": "vif-9"}));

        let unplug = serde_json::to_value(PortAttachment::NoAttachment).unwrap();
        assert_eq!(unplug, json!({"type": "NoAttachment"}));
    }

    #[test]
    fn test_link_state_from_status() {
        assert_eq!(LinkState::from(PortStatus { link_status_up: true }), LinkState::Up);
        assert_eq!(LinkState::from(PortStatus::default()), LinkState::Down);
        assert_eq!(serde_json::to_value(LinkState::Up).unwrap(), json!("UP"));
    }
}

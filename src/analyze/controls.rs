//! # Security Control Checks
//!
//! Four independent pass/fail controls read from the enriched document:
//! network firewall, network segmentation, database security, and
//! centralized audit logging. Each check is self-contained; one failing
//! never affects another.

use serde::{Deserialize, Serialize};

use crate::document::{ArchitectureSecurityMetadata, GraphDocument};

/// Pass/fail verdict, serialized as `"PASS"` / `"FAIL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlStatus {
    Pass,
    Fail,
}

impl ControlStatus {
    pub fn from_bool(pass: bool) -> Self {
        if pass {
            ControlStatus::Pass
        } else {
            ControlStatus::Fail
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, ControlStatus::Pass)
    }
}

impl std::fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlStatus::Pass => write!(f, "PASS"),
            ControlStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Network firewall control: passes iff the metadata declares one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallControl {
    pub present: bool,
    #[serde(rename = "type")]
    pub firewall_type: String,
    pub status: ControlStatus,
}

/// Network segmentation control: passes iff the flag is set and at least
/// two subnets are declared across the four tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationControl {
    pub present: bool,
    pub subnet_count: usize,
    pub status: ControlStatus,
}

/// Database security control: passes iff no database node faces the
/// internet and at least one is activity-monitored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseControl {
    pub direct_internet_access: bool,
    pub activity_monitoring: bool,
    pub status: ControlStatus,
}

/// Audit logging control: passes iff logging is centralized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditControl {
    pub centralized: bool,
    pub tool: String,
    pub status: ControlStatus,
}

pub fn evaluate_firewall(meta: &ArchitectureSecurityMetadata) -> FirewallControl {
    let present = meta.has_network_firewall;
    FirewallControl {
        present,
        firewall_type: meta.firewall_type.clone().unwrap_or_else(|| "none".into()),
        status: ControlStatus::from_bool(present),
    }
}

pub fn evaluate_segmentation(meta: &ArchitectureSecurityMetadata) -> SegmentationControl {
    let present = meta.has_network_segmentation;
    let subnet_count = meta.network_segmentation_details.total_subnets();
    SegmentationControl {
        present,
        subnet_count,
        status: ControlStatus::from_bool(present && subnet_count >= 2),
    }
}

/// Evaluate database exposure and monitoring across every database node.
///
/// A node without flags, or with the `directInternetAccess` field absent,
/// counts as internet-exposed (fail-closed). Monitoring needs only one
/// positively monitored database to count.
pub fn evaluate_database_security(doc: &GraphDocument) -> DatabaseControl {
    let mut direct_internet_access = false;
    let mut activity_monitoring = false;

    for node in doc.database_nodes() {
        let flags = node.data.security_flags.as_ref();
        if flags.map_or(true, |f| f.direct_internet_access.unwrap_or(true)) {
            direct_internet_access = true;
        }
        if flags.is_some_and(|f| f.activity_monitoring) {
            activity_monitoring = true;
        }
    }

    DatabaseControl {
        direct_internet_access,
        activity_monitoring,
        status: ControlStatus::from_bool(!direct_internet_access && activity_monitoring),
    }
}

pub fn evaluate_audit_logging(meta: &ArchitectureSecurityMetadata) -> AuditControl {
    let centralized = meta.centralized_audit_logging;
    AuditControl {
        centralized,
        tool: meta.siem_tool.clone().unwrap_or_else(|| "none".into()),
        status: ControlStatus::from_bool(centralized),
    }
}

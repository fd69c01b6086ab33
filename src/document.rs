//! # Architecture Document Schema
//!
//! Typed schema for the architecture diagram document (`kohGrid.json`).
//! The document is a flat graph: nodes are named system components, edges
//! are directed connections carrying protocol labels. Both sides can carry
//! a `securityFlags` record, attached by the enricher and consumed by the
//! analyzer.
//!
//! The document is rewritten in place by the enricher, so every struct
//! keeps a flattened map of unknown fields: anything the schema does not
//! model (layout positions, renderer hints) survives the round trip.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AtlasResult;

/// Node `data.type` values that denote persistent data holders. Only these
/// participate in the encryption-at-rest coverage calculation.
pub const DATA_BEARING_TYPES: [&str; 4] = ["database", "cache", "storage", "monitoring"];

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The architecture diagram document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    /// Document schema version (e.g. "2.1.0").
    #[serde(default)]
    pub version: String,

    /// Architecture-wide security metadata.
    #[serde(default)]
    pub architecture_security_metadata: ArchitectureSecurityMetadata,

    /// Graph vertices: one per named system component.
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Directed connections between components.
    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphDocument {
    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> AtlasResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc: GraphDocument = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded document from {} ({} nodes, {} edges)",
            path.display(),
            doc.nodes.len(),
            doc.edges.len(),
        );
        Ok(doc)
    }

    /// Write the document back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> AtlasResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content + "\n")?;
        Ok(())
    }

    /// Nodes whose declared `data.type` marks them as data holders.
    pub fn data_bearing_nodes(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| {
                n.data
                    .node_type
                    .as_deref()
                    .is_some_and(|t| DATA_BEARING_TYPES.contains(&t))
            })
            .collect()
    }

    /// Nodes labeled as PostgreSQL databases.
    pub fn database_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_database()).collect()
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Architecture-wide security posture declared by the document itself.
/// Missing fields default to false/empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchitectureSecurityMetadata {
    pub has_network_firewall: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_type: Option<String>,

    pub has_network_segmentation: bool,

    pub network_segmentation_details: SegmentationDetails,

    pub centralized_audit_logging: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub siem_tool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_in_transit_percentage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_at_rest_percentage: Option<f64>,

    pub compliance_frameworks: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Declared subnet layout, grouped by trust tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentationDetails {
    pub public_subnets: Vec<String>,
    pub private_subnets: Vec<String>,
    pub data_subnets: Vec<String>,
    pub isolated_subnets: Vec<String>,
}

impl SegmentationDetails {
    /// Total subnet entries across all four tiers.
    pub fn total_subnets(&self) -> usize {
        self.public_subnets.len()
            + self.private_subnets.len()
            + self.data_subnets.len()
            + self.isolated_subnets.len()
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A graph vertex: one named architecture component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(default)]
    pub data: NodeData,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Whether this node is a PostgreSQL database component.
    pub fn is_database(&self) -> bool {
        self.data.label.to_lowercase().contains("postgresql")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub label: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_flags: Option<NodeSecurityFlags>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-node security attribute record.
///
/// Optional fields serialize only when present: the enrichment catalog
/// deliberately omits e.g. `hasBackup` for stateless components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSecurityFlags {
    pub encrypted_at_rest: bool,
    pub encrypted_in_transit: bool,
    pub has_firewall: bool,

    #[serde(rename = "hasWAF")]
    pub has_waf: bool,

    pub audit_logging_enabled: bool,
    pub audit_logging_destination: String,
    pub activity_monitoring: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_monitoring_tool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_backup: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_frequency: Option<String>,

    pub network_segmentation: String,

    /// Absent means "assume exposed": consumers must treat a missing value
    /// as `true` (fail-closed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_internet_access: Option<bool>,

    pub mfa_required: bool,
    pub rbac_enabled: bool,
    pub secrets_management: String,
    pub vulnerability_scanning: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_scanning_tool: Option<String>,

    pub compliance_frameworks: Vec<String>,
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// A directed connection between two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,

    pub source: String,
    pub target: String,

    /// Protocol label (e.g. "HTTPS", "mTLS"). Drives edge enrichment rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub data: EdgeData,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_flags: Option<EdgeSecurityFlags>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-edge security attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSecurityFlags {
    pub encrypted: bool,
    pub encryption_protocol: String,
    pub authenticated: bool,
    pub authentication_type: String,
    pub authorization_enabled: bool,
    pub rate_limited: bool,
    pub rate_limit_value: String,
    pub bidirectional: bool,
    pub data_flow_direction: String,
    pub logging_enabled: bool,
    pub network_zone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_doc_json() -> &'static str {
        r#"{
            "version": "2.1.0",
            "architectureSecurityMetadata": {
                "hasNetworkFirewall": true,
                "hasNetworkSegmentation": true,
                "networkSegmentationDetails": {
                    "publicSubnets": ["10.0.1.0/24"],
                    "privateSubnets": ["10.0.2.0/24"],
                    "dataSubnets": ["10.0.3.0/24"],
                    "isolatedSubnets": ["10.0.4.0/24"]
                },
                "centralizedAuditLogging": true,
                "complianceFrameworks": ["SOC2"]
            },
            "nodes": [
                {
                    "id": "7",
                    "position": {"x": 100, "y": 200},
                    "data": {"label": "PostgreSQL Primary", "type": "database"}
                }
            ],
            "edges": [
                {"id": "e5-7", "source": "5", "target": "7", "label": "mTLS 5432"}
            ]
        }"#
    }

    #[test]
    fn test_parse_minimal_document() {
        let doc: GraphDocument = serde_json::from_str(minimal_doc_json()).unwrap();
        assert_eq!(doc.version, "2.1.0");
        assert!(doc.architecture_security_metadata.has_network_firewall);
        assert_eq!(
            doc.architecture_security_metadata
                .network_segmentation_details
                .total_subnets(),
            4
        );
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.edges.len(), 1);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let doc: GraphDocument = serde_json::from_str(minimal_doc_json()).unwrap();
        let rendered = serde_json::to_string(&doc).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        // "position" is not part of the schema but must not be dropped
        assert_eq!(reparsed["nodes"][0]["position"]["x"], 100);
    }

    #[test]
    fn test_database_node_detection() {
        let doc: GraphDocument = serde_json::from_str(minimal_doc_json()).unwrap();
        assert_eq!(doc.database_nodes().len(), 1);
        assert_eq!(doc.data_bearing_nodes().len(), 1);
    }

    #[test]
    fn test_missing_metadata_defaults_to_false() {
        let doc: GraphDocument =
            serde_json::from_str(r#"{"version": "1.0", "nodes": [], "edges": []}"#).unwrap();
        let meta = &doc.architecture_security_metadata;
        assert!(!meta.has_network_firewall);
        assert!(!meta.centralized_audit_logging);
        assert!(meta.compliance_frameworks.is_empty());
        assert_eq!(meta.network_segmentation_details.total_subnets(), 0);
    }

    #[test]
    fn test_optional_node_flags_not_serialized_when_absent() {
        let flags = NodeSecurityFlags {
            encrypted_at_rest: false,
            encrypted_in_transit: true,
            has_firewall: true,
            has_waf: true,
            audit_logging_enabled: true,
            audit_logging_destination: "Sentry".to_string(),
            activity_monitoring: false,
            activity_monitoring_tool: None,
            has_backup: None,
            backup_frequency: None,
            network_segmentation: "public-subnet".to_string(),
            direct_internet_access: Some(true),
            mfa_required: false,
            rbac_enabled: false,
            secrets_management: "none".to_string(),
            vulnerability_scanning: true,
            vulnerability_scanning_tool: Some("Snyk".to_string()),
            compliance_frameworks: vec!["SOC2".to_string(), "GDPR".to_string()],
        };
        let json = serde_json::to_string(&flags).unwrap();
        assert!(json.contains("\"hasWAF\":true"));
        assert!(!json.contains("hasBackup"));
        assert!(!json.contains("activityMonitoringTool"));
        assert!(json.contains("\"directInternetAccess\":true"));
    }
}

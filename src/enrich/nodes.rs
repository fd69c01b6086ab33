// SENTINEL Atlas - Enrichment
// nodes.rs - Per-component security flag catalog
//
// Copyright (c) 2026 CIPS Corps. All rights reserved.

use crate::document::NodeSecurityFlags;

fn frameworks(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Build the catalog of constant security flag records, keyed by node id.
///
/// The reference architecture has eleven named components. Each entry is
/// the complete, reviewed security posture for that component; the
/// enricher attaches it verbatim, overwriting whatever was there. Nodes
/// outside this set are left untouched.
///
/// Optional fields are deliberately uneven: stateless components carry no
/// backup entry at all, and the frontend has no monitoring tool.
pub fn flag_catalog() -> Vec<(&'static str, NodeSecurityFlags)> {
    vec![
        // 1: React Frontend PWA -- browser storage, HTTPS via WAF/CDN
        (
            "1",
            NodeSecurityFlags {
                encrypted_at_rest: false,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: true,
                audit_logging_enabled: true,
                audit_logging_destination: "Sentry".into(),
                activity_monitoring: false,
                activity_monitoring_tool: None,
                has_backup: None,
                backup_frequency: None,
                network_segmentation: "public-subnet".into(),
                direct_internet_access: Some(true),
                mfa_required: false,
                rbac_enabled: false,
                secrets_management: "none".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Snyk".into()),
                compliance_frameworks: frameworks(&["SOC2", "GDPR"]),
            },
        ),
        // 2: CloudFlare CDN -- encrypted edge cache
        (
            "2",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: true,
                audit_logging_enabled: true,
                audit_logging_destination: "CloudFlare Logs".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("CloudFlare Analytics".into()),
                has_backup: None,
                backup_frequency: None,
                network_segmentation: "edge-network".into(),
                direct_internet_access: Some(true),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "CloudFlare".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("CloudFlare".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001", "PCI-DSS"]),
            },
        ),
        // 3: ModSecurity WAF
        (
            "3",
            NodeSecurityFlags {
                encrypted_at_rest: false,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: true,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("ModSecurity Audit Log".into()),
                has_backup: None,
                backup_frequency: None,
                network_segmentation: "public-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Trivy".into()),
                compliance_frameworks: frameworks(&["SOC2", "PCI-DSS", "NIST-800-53"]),
            },
        ),
        // 4: HAProxy Load Balancer
        (
            "4",
            NodeSecurityFlags {
                encrypted_at_rest: false,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("HAProxy Stats".into()),
                has_backup: Some(false),
                backup_frequency: None,
                network_segmentation: "public-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Trivy".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001"]),
            },
        ),
        // 5: API Gateway
        (
            "5",
            NodeSecurityFlags {
                encrypted_at_rest: false,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: true,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("Prometheus + Grafana".into()),
                has_backup: Some(false),
                backup_frequency: None,
                network_segmentation: "private-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Snyk".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001", "GDPR", "HIPAA"]),
            },
        ),
        // 6: HashiCorp Vault -- manages its own secrets
        (
            "6",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("Vault Audit Device".into()),
                has_backup: Some(true),
                backup_frequency: Some("6h".into()),
                network_segmentation: "data-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: true,
                rbac_enabled: true,
                secrets_management: "self".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("HashiCorp Security".into()),
                compliance_frameworks: frameworks(&[
                    "SOC2",
                    "ISO27001",
                    "HIPAA",
                    "PCI-DSS",
                    "NIST-800-53",
                ]),
            },
        ),
        // 7: PostgreSQL Primary -- 5-minute RPO
        (
            "7",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("pgAudit".into()),
                has_backup: Some(true),
                backup_frequency: Some("5min".into()),
                network_segmentation: "data-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: true,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("AWS Inspector".into()),
                compliance_frameworks: frameworks(&[
                    "SOC2",
                    "ISO27001",
                    "GDPR",
                    "HIPAA",
                    "PCI-DSS",
                ]),
            },
        ),
        // 8: Redis Cluster
        (
            "8",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("Redis Sentinel".into()),
                has_backup: Some(true),
                backup_frequency: Some("daily".into()),
                network_segmentation: "data-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Trivy".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001", "PCI-DSS"]),
            },
        ),
        // 9: Background Workers
        (
            "9",
            NodeSecurityFlags {
                encrypted_at_rest: false,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("Prometheus".into()),
                has_backup: Some(false),
                backup_frequency: None,
                network_segmentation: "private-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: false,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Snyk".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001"]),
            },
        ),
        // 10: S3 Object Storage -- scanning handled by the provider
        (
            "10",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "SIEM".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("S3 Access Logs".into()),
                has_backup: Some(true),
                backup_frequency: Some("continuous".into()),
                network_segmentation: "isolated-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: true,
                rbac_enabled: true,
                secrets_management: "AWS KMS".into(),
                vulnerability_scanning: false,
                vulnerability_scanning_tool: None,
                compliance_frameworks: frameworks(&["SOC2", "ISO27001", "GDPR", "HIPAA"]),
            },
        ),
        // 11: Monitoring Stack -- watches itself
        (
            "11",
            NodeSecurityFlags {
                encrypted_at_rest: true,
                encrypted_in_transit: true,
                has_firewall: true,
                has_waf: false,
                audit_logging_enabled: true,
                audit_logging_destination: "self".into(),
                activity_monitoring: true,
                activity_monitoring_tool: Some("self-monitoring".into()),
                has_backup: Some(true),
                backup_frequency: Some("daily".into()),
                network_segmentation: "isolated-subnet".into(),
                direct_internet_access: Some(false),
                mfa_required: true,
                rbac_enabled: true,
                secrets_management: "Vault".into(),
                vulnerability_scanning: true,
                vulnerability_scanning_tool: Some("Trivy".into()),
                compliance_frameworks: frameworks(&["SOC2", "ISO27001"]),
            },
        ),
    ]
}

/// Look up the constant flag record for a node id.
pub fn flags_for(node_id: &str) -> Option<NodeSecurityFlags> {
    flag_catalog()
        .into_iter()
        .find(|(id, _)| *id == node_id)
        .map(|(_, flags)| flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_eleven_components() {
        let catalog = flag_catalog();
        assert_eq!(catalog.len(), 11);
        for id in 1..=11 {
            assert!(
                flags_for(&id.to_string()).is_some(),
                "catalog missing node {}",
                id
            );
        }
    }

    #[test]
    fn test_unknown_id_has_no_entry() {
        assert!(flags_for("12").is_none());
        assert!(flags_for("frontend").is_none());
    }

    #[test]
    fn test_database_entry_is_locked_down() {
        let flags = flags_for("7").unwrap();
        assert!(flags.encrypted_at_rest);
        assert!(flags.encrypted_in_transit);
        assert_eq!(flags.direct_internet_access, Some(false));
        assert!(flags.activity_monitoring);
        assert_eq!(flags.backup_frequency.as_deref(), Some("5min"));
    }

    #[test]
    fn test_stateless_components_carry_no_backup_entry() {
        for id in ["1", "2", "3"] {
            let flags = flags_for(id).unwrap();
            assert!(flags.has_backup.is_none(), "node {} should omit backup", id);
        }
        assert_eq!(flags_for("4").unwrap().has_backup, Some(false));
    }

    #[test]
    fn test_only_edge_components_face_the_internet() {
        let exposed: Vec<&str> = flag_catalog()
            .iter()
            .filter(|(_, f)| f.direct_internet_access == Some(true))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(exposed, ["1", "2"]);
    }
}

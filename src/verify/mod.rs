//! # Verifier
//!
//! Third pass of the pipeline: a fixed acceptance check against golden
//! constants, not a general property test. It re-runs the analyzer as a
//! blocking subprocess, loads the report it wrote plus the enriched
//! document, and evaluates three check groups:
//!
//! 1. **Analyzer report** -- eight checks against the expected score,
//!    coverage percentages, control verdicts, and compliance level.
//! 2. **Document structure** -- five checks that the enriched document has
//!    the shape the analyzer depends on.
//! 3. **Enrichment idempotency** -- re-enriching the document in memory
//!    must change nothing.
//!
//! Individual failures are reported and counted, never fatal; only the
//! final summary decides the exit code. The verifier mutates no files.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use crate::analyze::SecurityReport;
use crate::document::GraphDocument;
use crate::enrich;
use crate::{AtlasConfig, AtlasError, AtlasResult};

/// Expected security score for the shipped architecture.
pub const EXPECTED_SCORE: i64 = 88;

/// Expected encryption coverage, both in transit and at rest.
pub const EXPECTED_ENCRYPTION_PCT: f64 = 100.0;

/// Compliance must exceed this percentage.
pub const MIN_COMPLIANCE_PCT: f64 = 80.0;

/// The shipped metadata declares at least this many subnets.
pub const MIN_SUBNET_COUNT: usize = 4;

/// Metadata keys the document must carry for the analyzer to be trusted.
const REQUIRED_METADATA_FIELDS: [&str; 5] = [
    "hasNetworkFirewall",
    "hasNetworkSegmentation",
    "centralizedAuditLogging",
    "encryptionInTransitPercentage",
    "encryptionAtRestPercentage",
];

// ---------------------------------------------------------------------------
// Check bookkeeping
// ---------------------------------------------------------------------------

/// Outcome of a single acceptance check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
    pub detail: String,
}

/// A named group of checks, evaluated and reported together.
#[derive(Debug, Clone)]
pub struct CheckGroup {
    pub title: String,
    pub results: Vec<CheckResult>,
}

impl CheckGroup {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            results: Vec::new(),
        }
    }

    fn check(&mut self, label: &str, passed: bool, detail: String) {
        self.results.push(CheckResult {
            label: label.to_string(),
            passed,
            detail,
        });
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total()
    }
}

// ---------------------------------------------------------------------------
// Check groups
// ---------------------------------------------------------------------------

/// Eight golden checks against the analyzer's report.
pub fn check_report(report: &SecurityReport) -> CheckGroup {
    let mut group = CheckGroup::new("Analyzer report");

    group.check(
        "score",
        report.summary.score == EXPECTED_SCORE,
        format!(
            "{}/{} (expected {})",
            report.summary.score, report.summary.max_score, EXPECTED_SCORE
        ),
    );

    let transit = &report.encryption.in_transit;
    group.check(
        "encryption in transit",
        transit.percentage == EXPECTED_ENCRYPTION_PCT,
        format!(
            "{}% ({}/{})",
            transit.percentage, transit.encrypted, transit.total
        ),
    );

    let rest = &report.encryption.at_rest;
    group.check(
        "encryption at rest",
        rest.percentage == EXPECTED_ENCRYPTION_PCT,
        format!("{}% ({}/{})", rest.percentage, rest.encrypted, rest.total),
    );

    let firewall = &report.security_controls.network_firewall;
    group.check(
        "network firewall",
        firewall.status.passed() && firewall.present,
        format!("{} (type: {})", firewall.status, firewall.firewall_type),
    );

    let segmentation = &report.security_controls.network_segmentation;
    group.check(
        "network segmentation",
        segmentation.status.passed() && segmentation.subnet_count >= MIN_SUBNET_COUNT,
        format!(
            "{} ({} subnets, expected >= {})",
            segmentation.status, segmentation.subnet_count, MIN_SUBNET_COUNT
        ),
    );

    let database = &report.security_controls.database_security;
    group.check(
        "database security",
        database.status.passed()
            && !database.direct_internet_access
            && database.activity_monitoring,
        format!(
            "{} (direct access: {}, monitoring: {})",
            database.status, database.direct_internet_access, database.activity_monitoring
        ),
    );

    let audit = &report.security_controls.audit_logging;
    group.check(
        "audit logging",
        audit.status.passed() && audit.centralized,
        format!("{} (tool: {})", audit.status, audit.tool),
    );

    let compliance = &report.compliance;
    group.check(
        "compliance",
        compliance.status.passed() && compliance.percentage > MIN_COMPLIANCE_PCT,
        format!(
            "{}% (grade {}, expected > {}%)",
            compliance.percentage, compliance.grade, MIN_COMPLIANCE_PCT
        ),
    );

    group
}

/// Five structural checks on the enriched document.
///
/// Takes the raw JSON alongside the typed document: field *presence* is a
/// structural property the typed view erases through its defaults.
pub fn check_document(doc: &GraphDocument, raw: &Value) -> CheckGroup {
    let mut group = CheckGroup::new("Document structure");

    let meta_raw = &raw["architectureSecurityMetadata"];
    let missing: Vec<&str> = REQUIRED_METADATA_FIELDS
        .iter()
        .filter(|f| meta_raw.get(**f).is_none())
        .copied()
        .collect();
    group.check(
        "architecture metadata fields",
        missing.is_empty(),
        if missing.is_empty() {
            "all present".to_string()
        } else {
            format!("missing: {}", missing.join(", "))
        },
    );

    let nodes_with_flags = doc
        .nodes
        .iter()
        .filter(|n| n.data.security_flags.is_some())
        .count();
    group.check(
        "node securityFlags",
        nodes_with_flags == doc.nodes.len(),
        format!("{}/{} nodes", nodes_with_flags, doc.nodes.len()),
    );

    let edges_with_flags = doc
        .edges
        .iter()
        .filter(|e| e.data.security_flags.is_some())
        .count();
    group.check(
        "edge securityFlags",
        edges_with_flags == doc.edges.len(),
        format!("{}/{} edges", edges_with_flags, doc.edges.len()),
    );

    let encrypted_edges = doc
        .edges
        .iter()
        .filter(|e| e.data.security_flags.as_ref().is_some_and(|f| f.encrypted))
        .count();
    group.check(
        "all connections encrypted",
        encrypted_edges == doc.edges.len(),
        format!("{}/{} edges", encrypted_edges, doc.edges.len()),
    );

    let db_ok = doc.database_nodes().first().is_some_and(|node| {
        node.data.security_flags.as_ref().is_some_and(|f| {
            f.encrypted_at_rest
                && f.encrypted_in_transit
                && !f.direct_internet_access.unwrap_or(false)
                && f.activity_monitoring
        })
    });
    group.check(
        "database node flags",
        db_ok,
        if doc.database_nodes().is_empty() {
            "no PostgreSQL node found".to_string()
        } else {
            "encrypted, isolated, monitored".to_string()
        },
    );

    group
}

/// One check: re-enriching the document must be a no-op.
pub fn check_idempotency(doc: &GraphDocument) -> CheckGroup {
    let mut group = CheckGroup::new("Enrichment idempotency");

    let mut re_enriched = doc.clone();
    enrich::enrich_document(&mut re_enriched);
    group.check(
        "re-enrichment is a no-op",
        re_enriched == *doc,
        "flags are overwritten, not merged".to_string(),
    );

    group
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

fn print_group(group: &CheckGroup) {
    println!("{}", "=".repeat(80));
    println!("{}", group.title.to_uppercase());
    println!("{}", "=".repeat(80));
    for result in &group.results {
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", verdict, result.label, result.detail);
    }
    println!(
        "{}: {}/{} checks passed",
        group.title,
        group.passed_count(),
        group.total()
    );
    println!();
}

/// Re-run the analyzer as a subprocess, then evaluate all check groups.
///
/// Returns `Ok(true)` iff every group fully passed. Infrastructure
/// failures (subprocess, missing report, unreadable document) are errors;
/// check mismatches are not.
pub fn run(
    input: &Path,
    config: &AtlasConfig,
    config_path: Option<&Path>,
) -> AtlasResult<bool> {
    let exe = std::env::current_exe()?;

    let mut command = Command::new(&exe);
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    command.arg("analyze").arg(input);

    log::info!("Re-running analyzer: {} analyze {}", exe.display(), input.display());
    let output = command.output()?;
    if !output.status.success() {
        return Err(AtlasError::Verify(format!(
            "analyzer subprocess exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim(),
        )));
    }

    let report_content = std::fs::read_to_string(&config.general.report_file)?;
    let report: SecurityReport = serde_json::from_str(&report_content)?;

    let doc_content = std::fs::read_to_string(input)?;
    let doc: GraphDocument = serde_json::from_str(&doc_content)?;
    let raw: Value = serde_json::from_str(&doc_content)?;

    let groups = [
        check_report(&report),
        check_document(&doc, &raw),
        check_idempotency(&doc),
    ];

    for group in &groups {
        print_group(group);
    }

    println!("{}", "=".repeat(80));
    println!("FINAL RESULTS");
    println!("{}", "=".repeat(80));
    for group in &groups {
        let verdict = if group.all_passed() { "PASS" } else { "FAIL" };
        println!(
            "{:<24} {} ({}/{})",
            group.title, verdict, group.passed_count(), group.total()
        );
    }
    println!();

    let all_passed = groups.iter().all(|g| g.all_passed());
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;

    fn fixture_doc() -> GraphDocument {
        let mut doc: GraphDocument = serde_json::from_str(
            r#"{
                "version": "2.1.0",
                "architectureSecurityMetadata": {
                    "hasNetworkFirewall": true,
                    "firewallType": "AWS Network Firewall + Security Groups",
                    "hasNetworkSegmentation": true,
                    "networkSegmentationDetails": {
                        "publicSubnets": ["10.0.1.0/24"],
                        "privateSubnets": ["10.0.2.0/24"],
                        "dataSubnets": ["10.0.3.0/24"],
                        "isolatedSubnets": ["10.0.4.0/24"]
                    },
                    "centralizedAuditLogging": true,
                    "siemTool": "Splunk",
                    "encryptionInTransitPercentage": 100.0,
                    "encryptionAtRestPercentage": 100.0,
                    "complianceFrameworks": [
                        "SOC2", "ISO27001", "GDPR", "HIPAA",
                        "PCI-DSS", "NIST-800-53", "CIS"
                    ]
                },
                "nodes": [
                    {"id": "7", "data": {"label": "PostgreSQL Primary", "type": "database"}},
                    {"id": "8", "data": {"label": "Redis Cluster", "type": "cache"}},
                    {"id": "10", "data": {"label": "S3 Object Storage", "type": "storage"}},
                    {"id": "11", "data": {"label": "Monitoring Stack", "type": "monitoring"}}
                ],
                "edges": [
                    {"id": "e5-7", "source": "5", "target": "7", "label": "mTLS"},
                    {"id": "e5-8", "source": "5", "target": "8", "label": "TLS"}
                ]
            }"#,
        )
        .unwrap();
        enrich::enrich_document(&mut doc);
        doc
    }

    fn fixture_raw(doc: &GraphDocument) -> Value {
        serde_json::to_value(doc).unwrap()
    }

    #[test]
    fn test_report_group_all_pass_on_fixture() {
        let doc = fixture_doc();
        let report = analyze::analyze_document(&doc, &AtlasConfig::default());
        let group = check_report(&report);
        assert_eq!(group.passed_count(), 8, "failures: {:?}", group.results);
        assert!(group.all_passed());
    }

    #[test]
    fn test_wrong_score_fails_one_check() {
        let doc = fixture_doc();
        let mut report = analyze::analyze_document(&doc, &AtlasConfig::default());
        report.summary.score = 90;
        let group = check_report(&report);
        assert_eq!(group.passed_count(), 7);
        assert!(!group.results[0].passed);
    }

    #[test]
    fn test_structure_group_all_pass_on_fixture() {
        let doc = fixture_doc();
        let raw = fixture_raw(&doc);
        let group = check_document(&doc, &raw);
        assert_eq!(group.passed_count(), 5, "failures: {:?}", group.results);
    }

    #[test]
    fn test_unencrypted_edge_reduces_structure_count() {
        let mut doc = fixture_doc();
        doc.edges[0]
            .data
            .security_flags
            .as_mut()
            .unwrap()
            .encrypted = false;
        let raw = fixture_raw(&doc);
        let group = check_document(&doc, &raw);
        assert_eq!(group.passed_count(), 4);
    }

    #[test]
    fn test_missing_metadata_field_fails_structure_check() {
        let doc = fixture_doc();
        let mut raw = fixture_raw(&doc);
        raw["architectureSecurityMetadata"]
            .as_object_mut()
            .unwrap()
            .remove("encryptionInTransitPercentage");
        let group = check_document(&doc, &raw);
        assert!(!group.results[0].passed);
        assert!(group.results[0].detail.contains("encryptionInTransitPercentage"));
    }

    #[test]
    fn test_missing_node_flags_fails_structure_check() {
        let mut doc = fixture_doc();
        doc.nodes[1].data.security_flags = None;
        let raw = fixture_raw(&doc);
        let group = check_document(&doc, &raw);
        // node flags check and (node 8 is not the database) nothing else
        assert_eq!(group.passed_count(), 4);
    }

    #[test]
    fn test_idempotency_passes_on_enriched_doc() {
        let doc = fixture_doc();
        assert!(check_idempotency(&doc).all_passed());
    }

    #[test]
    fn test_idempotency_fails_on_tampered_doc() {
        let mut doc = fixture_doc();
        doc.nodes[0]
            .data
            .security_flags
            .as_mut()
            .unwrap()
            .mfa_required = false;
        assert!(!check_idempotency(&doc).all_passed());
    }
}

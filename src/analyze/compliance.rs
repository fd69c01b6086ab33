//! # Compliance Coverage
//!
//! Compliance is an assumed-coverage model: each framework the document's
//! metadata declares maps to a fixed percentage from the configuration
//! table, and the compliance score is the plain average. A framework the
//! table does not know scores zero, dragging the average down instead of
//! being skipped.

use crate::ComplianceConfig;

/// Average assumed coverage over the declared frameworks.
///
/// Returns 0.0 when no frameworks are declared.
pub fn compliance_percentage(frameworks: &[String], config: &ComplianceConfig) -> f64 {
    if frameworks.is_empty() {
        return 0.0;
    }

    let total: f64 = frameworks
        .iter()
        .map(|f| config.coverage.get(f).copied().unwrap_or(0.0))
        .sum();
    total / frameworks.len() as f64
}

/// Map a compliance percentage to a letter grade.
pub fn compliance_grade(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 90.0 => "A",
        p if p >= 85.0 => "B+",
        p if p >= 80.0 => "B",
        p if p >= 75.0 => "B-",
        p if p >= 70.0 => "C",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtlasConfig;

    fn config() -> ComplianceConfig {
        AtlasConfig::default().compliance
    }

    fn fws(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_seven_frameworks_average() {
        let frameworks = fws(&[
            "SOC2",
            "ISO27001",
            "GDPR",
            "HIPAA",
            "PCI-DSS",
            "NIST-800-53",
            "CIS",
        ]);
        let pct = compliance_percentage(&frameworks, &config());
        // (90+85+80+75+85+80+90)/7
        assert!((pct - 83.571428).abs() < 0.001);
        assert_eq!(compliance_grade(pct), "B");
    }

    #[test]
    fn test_unknown_framework_scores_zero() {
        let pct = compliance_percentage(&fws(&["SOC2", "FEDRAMP"]), &config());
        assert!((pct - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_frameworks_is_zero() {
        assert_eq!(compliance_percentage(&[], &config()), 0.0);
    }

    #[test]
    fn test_compliance_grade_thresholds() {
        assert_eq!(compliance_grade(90.0), "A");
        assert_eq!(compliance_grade(89.9), "B+");
        assert_eq!(compliance_grade(83.6), "B");
        assert_eq!(compliance_grade(79.9), "B-");
        assert_eq!(compliance_grade(70.0), "C");
        assert_eq!(compliance_grade(69.9), "F");
    }
}

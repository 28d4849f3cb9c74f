//! Text and JSON rendering of command results.

use chrono::{DateTime, Utc};
use cleancare_permissions::{FeatureGroup, SaveReport};
use serde::Serialize;

/// A diff wrapped for the audit log.
#[derive(Debug, Serialize)]
pub struct AuditRecord {
    pub generated_at: DateTime<Utc>,
    pub changes: Vec<String>,
}

/// One row of the flag catalogue.
#[derive(Debug, Serialize)]
pub struct FeatureEntry {
    pub group: &'static str,
    pub key: &'static str,
    pub label: &'static str,
}

pub fn report_text(report: &SaveReport) -> String {
    let mut out = String::new();
    if report.valid {
        out.push_str("valid\n");
    } else {
        out.push_str("invalid\n");
    }
    for error in &report.errors {
        out.push_str(&format!("  error: {error}\n"));
    }
    for warning in &report.warnings {
        out.push_str(&format!("  warning: {warning}\n"));
    }
    out
}

pub fn changes_text(changes: &[String]) -> String {
    if changes.is_empty() {
        return "no changes\n".to_string();
    }
    changes.iter().map(|c| format!("{c}\n")).collect()
}

pub fn feature_catalogue() -> Vec<FeatureEntry> {
    FeatureGroup::ALL
        .into_iter()
        .flat_map(|group| {
            group.features().map(move |feature| FeatureEntry {
                group: group.label(),
                key: feature.key(),
                label: feature.label(),
            })
        })
        .collect()
}

pub fn catalogue_text(entries: &[FeatureEntry]) -> String {
    let mut out = String::new();
    let mut current = "";
    for entry in entries {
        if entry.group != current {
            out.push_str(&format!("{}\n", entry.group));
            current = entry.group;
        }
        out.push_str(&format!("  {:<26} {}\n", entry.key, entry.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_text_lists_errors_then_warnings() {
        let report = SaveReport {
            valid: false,
            errors: vec!["Delete Users requires Edit Users permission".into()],
            warnings: vec!["Delete Users is enabled without Edit Users. This is unusual.".into()],
        };
        assert_eq!(
            report_text(&report),
            "invalid\n  error: Delete Users requires Edit Users permission\n  warning: Delete Users is enabled without Edit Users. This is unusual.\n"
        );
    }

    #[test]
    fn test_changes_text_empty() {
        assert_eq!(changes_text(&[]), "no changes\n");
        assert_eq!(
            changes_text(&["Added wards: 4".to_string()]),
            "Added wards: 4\n"
        );
    }

    #[test]
    fn test_catalogue_groups_headers_once() {
        let entries = feature_catalogue();
        assert_eq!(entries.len(), 21);
        let text = catalogue_text(&entries);
        assert_eq!(text.matches("Messaging\n").count(), 1);
        assert!(text.starts_with("Complaint Management\n  canViewComplaints"));
        assert!(text.trim_end().ends_with("View Only Mode"));
    }

    #[test]
    fn test_audit_record_serializes_timestamp() {
        let record = AuditRecord {
            generated_at: DateTime::from_timestamp(0, 0).unwrap(),
            changes: vec!["Removed zones: 1".into()],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["generated_at"], "1970-01-01T00:00:00Z");
        assert_eq!(value["changes"][0], "Removed zones: 1");
    }
}

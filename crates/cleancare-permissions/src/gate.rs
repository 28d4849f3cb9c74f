//! The single check run before a permission set is persisted.

use crate::types::PermissionSet;
use crate::{conflicts, structure, warnings};
use serde::Serialize;
use serde_json::Value;

/// Error reported for any structurally malformed candidate.
pub const INVALID_STRUCTURE: &str = "Invalid permission structure. Please check all fields.";

/// Verdict for a candidate permission set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SaveReport {
    /// True iff `errors` is empty. Warnings never affect this.
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SaveReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn malformed() -> Self {
        Self::from_findings(vec![INVALID_STRUCTURE.to_string()], Vec::new())
    }
}

/// Validate a raw candidate: structure first, then conflicts and warnings.
///
/// A malformed candidate yields the generic structure error and nothing else.
pub fn validate_before_save(candidate: &Value) -> SaveReport {
    match structure::check(candidate) {
        Ok(permissions) => validate_permissions(&permissions),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed permission set");
            SaveReport::malformed()
        }
    }
}

/// Conflict and warning checks for an already-typed permission set.
pub fn validate_permissions(permissions: &PermissionSet) -> SaveReport {
    let errors = conflicts::find_conflicts(permissions);
    let warnings = warnings::get_warnings(permissions);
    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "validated permission set"
    );
    SaveReport::from_findings(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Feature;
    use serde_json::json;

    fn to_value(set: &PermissionSet) -> Value {
        serde_json::to_value(set).unwrap()
    }

    #[test]
    fn test_malformed_short_circuits() {
        let report = validate_before_save(&json!({ "zones": [] }));
        assert_eq!(
            report,
            SaveReport {
                valid: false,
                errors: vec![INVALID_STRUCTURE.to_string()],
                warnings: vec![],
            }
        );
    }

    #[test]
    fn test_clean_set_is_valid() {
        let report = validate_before_save(&to_value(&PermissionSet::full_access()));
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_warnings_do_not_block() {
        let report = validate_before_save(&to_value(&PermissionSet::none()));
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_errors_and_warnings_both_collected() {
        let set = PermissionSet::none().with_features(
            [Feature::ViewUsers, Feature::DeleteUsers].into_iter().collect(),
        );
        let report = validate_before_save(&to_value(&set));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Delete Users requires Edit Users permission"]);
        assert_eq!(
            report.warnings,
            vec!["Delete Users is enabled without Edit Users. This is unusual."]
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = validate_before_save(&Value::Null);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "valid": false,
                "errors": [INVALID_STRUCTURE],
                "warnings": [],
            })
        );
    }
}

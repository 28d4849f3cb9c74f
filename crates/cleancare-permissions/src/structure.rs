//! Structural validation of raw permission-set values.
//!
//! Checks run in order and stop at the first failure: object, `zones`,
//! `wards`, `categories`, `features`, then every flag of [`Feature::ALL`].

use crate::error::StructureError;
use crate::types::{Feature, FeatureFlags, PermissionSet};
use serde_json::Value;
use std::collections::HashSet;

/// Whether `candidate` is a well-formed permission set.
///
/// Scope elements are type-checked too: `zones` and `wards` must hold
/// integers (`1.0` and `"3"` are rejected) and `categories` must hold strings.
pub fn is_valid(candidate: &Value) -> bool {
    check(candidate).is_ok()
}

/// Narrow `candidate` to a typed [`PermissionSet`], or `None` if malformed.
pub fn parse(candidate: &Value) -> Option<PermissionSet> {
    check(candidate).ok()
}

/// Like [`parse`], reporting the first structural failure.
pub fn check(candidate: &Value) -> Result<PermissionSet, StructureError> {
    let Value::Object(object) = candidate else {
        return Err(StructureError::NotAnObject);
    };

    let zones = id_list(object.get("zones"), "zones")?;
    let wards = id_list(object.get("wards"), "wards")?;
    let categories = category_list(object.get("categories"))?;

    let features = match object.get("features") {
        Some(value) => check_features(value)?,
        None => return Err(StructureError::FeaturesNotAnObject),
    };

    Ok(PermissionSet {
        zones,
        wards,
        categories,
        features,
    })
}

/// Validate a `features` object. Unknown keys are ignored.
pub fn check_features(value: &Value) -> Result<FeatureFlags, StructureError> {
    let Value::Object(map) = value else {
        return Err(StructureError::FeaturesNotAnObject);
    };

    let mut flags = FeatureFlags::none();
    for feature in Feature::ALL {
        match map.get(feature.key()) {
            Some(Value::Bool(enabled)) => flags.set(feature, *enabled),
            Some(_) => return Err(StructureError::NotBoolean { key: feature.key() }),
            None => return Err(StructureError::MissingFlag { key: feature.key() }),
        }
    }
    Ok(flags)
}

fn array<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a [Value], StructureError> {
    match value {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        _ => Err(StructureError::NotAnArray { field }),
    }
}

fn id_list(value: Option<&Value>, field: &'static str) -> Result<Vec<i64>, StructureError> {
    let items = array(value, field)?;
    let mut ids = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = item.as_i64().ok_or(StructureError::BadElement {
            field,
            index,
            expected: "an integer",
        })?;
        if seen.insert(id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn category_list(value: Option<&Value>) -> Result<Vec<String>, StructureError> {
    let items = array(value, "categories")?;
    let mut categories: Vec<String> = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(category) = item.as_str() else {
            return Err(StructureError::BadElement {
                field: "categories",
                index,
                expected: "a string",
            });
        };
        if seen.insert(category) {
            categories.push(category.to_string());
        }
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn all_flags(enabled: bool) -> Map<String, Value> {
        Feature::ALL
            .iter()
            .map(|f| (f.key().to_string(), Value::Bool(enabled)))
            .collect()
    }

    fn candidate(features: Map<String, Value>) -> Value {
        json!({
            "zones": [1, 2],
            "wards": [10],
            "categories": ["garbage"],
            "features": features,
        })
    }

    #[test]
    fn test_valid_candidate() {
        let value = candidate(all_flags(false));
        assert!(is_valid(&value));
        let set = parse(&value).unwrap();
        assert_eq!(set.zones, vec![1, 2]);
        assert_eq!(set.wards, vec![10]);
        assert_eq!(set.categories, vec!["garbage".to_string()]);
        assert_eq!(set.features.enabled().count(), 0);
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(check(&Value::Null), Err(StructureError::NotAnObject));
        assert_eq!(check(&json!([1, 2])), Err(StructureError::NotAnObject));
        assert!(!is_valid(&json!("permissions")));
    }

    #[test]
    fn test_checks_run_in_order() {
        // zones and features both wrong: zones reported first
        let value = json!({ "zones": 3, "wards": [], "categories": [], "features": null });
        assert_eq!(
            check(&value),
            Err(StructureError::NotAnArray { field: "zones" })
        );

        let value = json!({ "zones": [], "wards": {}, "categories": [], "features": {} });
        assert_eq!(
            check(&value),
            Err(StructureError::NotAnArray { field: "wards" })
        );

        let value = json!({ "zones": [], "wards": [], "features": {} });
        assert_eq!(
            check(&value),
            Err(StructureError::NotAnArray { field: "categories" })
        );
    }

    #[test]
    fn test_features_must_be_object() {
        let value = json!({ "zones": [], "wards": [], "categories": [], "features": null });
        assert_eq!(check(&value), Err(StructureError::FeaturesNotAnObject));

        let value = json!({ "zones": [], "wards": [], "categories": [] });
        assert_eq!(check(&value), Err(StructureError::FeaturesNotAnObject));
    }

    #[test]
    fn test_missing_flag_reports_first_in_canonical_order() {
        let mut features = all_flags(true);
        features.remove("canAddAdmins");
        features.remove("canViewUsers");
        assert_eq!(
            check(&candidate(features)),
            Err(StructureError::MissingFlag { key: "canViewUsers" })
        );
    }

    #[test]
    fn test_non_boolean_flag_rejected() {
        let mut features = all_flags(false);
        features.insert("viewOnlyMode".into(), json!("false"));
        assert_eq!(
            check(&candidate(features)),
            Err(StructureError::NotBoolean { key: "viewOnlyMode" })
        );

        let mut features = all_flags(false);
        features.insert("canExportData".into(), json!(1));
        assert!(!is_valid(&candidate(features)));
    }

    #[test]
    fn test_unknown_flags_ignored() {
        let mut features = all_flags(false);
        features.insert("canFeedPigeons".into(), json!(true));
        assert!(is_valid(&candidate(features)));
    }

    #[test]
    fn test_scope_element_types() {
        let value = json!({
            "zones": [1, "2"],
            "wards": [],
            "categories": [],
            "features": all_flags(false),
        });
        assert_eq!(
            check(&value),
            Err(StructureError::BadElement {
                field: "zones",
                index: 1,
                expected: "an integer"
            })
        );

        let value = json!({
            "zones": [],
            "wards": [],
            "categories": [7],
            "features": all_flags(false),
        });
        assert!(matches!(
            check(&value),
            Err(StructureError::BadElement { field: "categories", .. })
        ));
    }

    #[test]
    fn test_scope_ids_must_be_integers() {
        for zones in [json!([1.0]), json!(["3"]), json!([null])] {
            let value = json!({
                "zones": zones,
                "wards": [],
                "categories": [],
                "features": all_flags(false),
            });
            assert!(!is_valid(&value), "accepted zones {zones}");
        }

        let value = json!({
            "zones": [],
            "wards": [2.5],
            "categories": [],
            "features": all_flags(false),
        });
        assert!(matches!(
            check(&value),
            Err(StructureError::BadElement { field: "wards", index: 0, .. })
        ));
    }

    #[test]
    fn test_large_scope_dedup_keeps_first_seen_order() {
        let zones: Vec<i64> = (0..5000).rev().chain(0..5000).collect();
        let categories: Vec<String> = (0..2000)
            .chain(0..2000)
            .map(|i| format!("cat-{i}"))
            .collect();
        let value = json!({
            "zones": zones,
            "wards": [],
            "categories": categories,
            "features": all_flags(false),
        });
        let set = parse(&value).unwrap();
        assert_eq!(set.zones, (0..5000).rev().collect::<Vec<i64>>());
        assert_eq!(set.categories.len(), 2000);
        assert_eq!(set.categories[0], "cat-0");
        assert_eq!(set.categories[1999], "cat-1999");
    }

    #[test]
    fn test_duplicates_collapsed_first_wins() {
        let value = json!({
            "zones": [3, 1, 3, 2, 1],
            "wards": [5, 5],
            "categories": ["a", "b", "a"],
            "features": all_flags(false),
        });
        let set = parse(&value).unwrap();
        assert_eq!(set.zones, vec![3, 1, 2]);
        assert_eq!(set.wards, vec![5]);
        assert_eq!(set.categories, vec!["a".to_string(), "b".to_string()]);
    }
}

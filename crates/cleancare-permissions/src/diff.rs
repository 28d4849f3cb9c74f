//! Audit diffs between two permission sets.
//!
//! Categories are not compared.

use crate::types::{Feature, PermissionSet};

/// Which jurisdiction list a scope change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Zones,
    Wards,
}

impl Scope {
    fn as_str(self) -> &'static str {
        match self {
            Scope::Zones => "zones",
            Scope::Wards => "wards",
        }
    }
}

/// One audited change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Flag { feature: Feature, from: bool, to: bool },
    Added { scope: Scope, ids: Vec<i64> },
    Removed { scope: Scope, ids: Vec<i64> },
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Flag { feature, from, to } => {
                write!(f, "{}: {} → {}", feature.key(), state(*from), state(*to))
            }
            Change::Added { scope, ids } => write!(f, "Added {}: {}", scope.as_str(), join(ids)),
            Change::Removed { scope, ids } => {
                write!(f, "Removed {}: {}", scope.as_str(), join(ids))
            }
        }
    }
}

fn state(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn join(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Typed changes from `old` to `new`: flags in canonical order, then zones
/// added/removed, then wards added/removed.
pub fn changes(old: &PermissionSet, new: &PermissionSet) -> Vec<Change> {
    let mut changes: Vec<Change> = Feature::ALL
        .into_iter()
        .filter(|f| old.features.get(*f) != new.features.get(*f))
        .map(|feature| Change::Flag {
            feature,
            from: old.features.get(feature),
            to: new.features.get(feature),
        })
        .collect();

    scope_changes(&mut changes, Scope::Zones, &old.zones, &new.zones);
    scope_changes(&mut changes, Scope::Wards, &old.wards, &new.wards);
    changes
}

fn scope_changes(out: &mut Vec<Change>, scope: Scope, old: &[i64], new: &[i64]) {
    let added = missing_from(new, old);
    if !added.is_empty() {
        out.push(Change::Added { scope, ids: added });
    }
    let removed = missing_from(old, new);
    if !removed.is_empty() {
        out.push(Change::Removed { scope, ids: removed });
    }
}

/// Entries of `from` absent in `other`, in `from`'s order.
fn missing_from(from: &[i64], other: &[i64]) -> Vec<i64> {
    from.iter().filter(|id| !other.contains(*id)).copied().collect()
}

/// Human-readable change descriptions from `old` to `new`.
pub fn diff(old: &PermissionSet, new: &PermissionSet) -> Vec<String> {
    changes(old, new).iter().map(ToString::to_string).collect()
}

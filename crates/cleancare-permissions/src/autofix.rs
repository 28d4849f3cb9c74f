//! One-click remediation for the conflicts that have an unambiguous fix.
//!
//! Delete-without-edit is never fixed here; it needs a human decision.

use crate::types::{Domain, Feature, FeatureFlags, PermissionSet};

/// Return a copy of `permissions` with fixable conflicts resolved.
///
/// With view-only mode on, the result is exactly the view-only shape: the
/// four record views on, every action and analytics flag off. Otherwise the
/// view flags implied by enabled actions are switched on and nothing is
/// switched off. Scopes are copied unchanged.
pub fn auto_fix(permissions: &PermissionSet) -> PermissionSet {
    let mut fixed = permissions.clone();
    if permissions.features.view_only() {
        tracing::debug!("auto-fix: collapsing to view-only permissions");
        fixed.features = view_only_flags();
    } else {
        backfill_views(&mut fixed.features);
    }
    fixed
}

fn view_only_flags() -> FeatureFlags {
    let mut flags = FeatureFlags::none();
    for view in [
        Feature::ViewComplaints,
        Feature::ViewUsers,
        Feature::ViewAdmins,
        Feature::ViewMessages,
    ] {
        flags.set(view, true);
    }
    flags.set(Feature::ViewOnlyMode, true);
    flags
}

fn backfill_views(flags: &mut FeatureFlags) {
    let mut implied = Vec::new();
    for domain in Domain::ALL {
        if flags.any(domain.actions()) {
            implied.push(domain.view());
        }
    }
    if flags.any(&Feature::SEND_MESSAGES) {
        implied.push(Feature::ViewMessages);
    }
    if flags.any(&Feature::EXPORTS) {
        implied.push(Feature::ViewAnalytics);
    }

    for view in implied {
        if !flags.get(view) {
            tracing::debug!(flag = view.key(), "auto-fix: enabling implied view flag");
            flags.set(view, true);
        }
    }
}

//! Advisory warnings. These never block a save.

use crate::types::{Domain, Feature, PermissionSet};

/// An unusual but not contradictory flag combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Nothing is enabled and view-only mode is off.
    NoPermissions,
    /// Only view flags are enabled; view-only mode would say the same thing.
    SuggestViewOnly,
    /// The domain's delete flag is on without its edit flag.
    DeleteWithoutEdit(Domain),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::NoPermissions => f.write_str(
                "No permissions are enabled. This admin will not be able to perform any actions.",
            ),
            Warning::SuggestViewOnly => f.write_str(
                "Only view permissions are enabled. Consider enabling View Only Mode for clarity.",
            ),
            Warning::DeleteWithoutEdit(domain) => write!(
                f,
                "{} is enabled without {}. This is unusual.",
                domain.delete().label(),
                domain.edit().label()
            ),
        }
    }
}

/// Collect applicable warnings, in fixed order.
pub fn detect(permissions: &PermissionSet) -> Vec<Warning> {
    let flags = &permissions.features;
    let view_only = flags.view_only();
    let mut warnings = Vec::new();

    let any_enabled = flags.enabled().any(|f| f != Feature::ViewOnlyMode);
    if !any_enabled && !view_only {
        warnings.push(Warning::NoPermissions);
    }

    let any_view = flags.any(&Feature::VIEWS);
    let any_action = flags.enabled().any(Feature::is_action);
    if any_view && !any_action && !view_only {
        warnings.push(Warning::SuggestViewOnly);
    }

    for domain in Domain::ALL {
        if flags.get(domain.delete()) && !flags.get(domain.edit()) {
            warnings.push(Warning::DeleteWithoutEdit(domain));
        }
    }

    warnings
}

/// Warning messages for `permissions`, ready for display.
pub fn get_warnings(permissions: &PermissionSet) -> Vec<String> {
    detect(permissions).iter().map(ToString::to_string).collect()
}

//! Conflict detection: flag combinations that block a save.

use crate::types::{Domain, Feature, PermissionSet};

/// A contradictory combination of enabled flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// View-only mode is on alongside an action flag.
    ViewOnlyWithAction(Feature),
    /// The domain's delete flag is on but its edit flag is off.
    DeleteWithoutEdit(Domain),
    /// A send-message flag is on but viewing messages is off.
    SendWithoutViewMessages,
    /// Export or report download is on but viewing analytics is off.
    ExportWithoutViewAnalytics,
    /// An action flag is on but the domain's view flag is off.
    ActionWithoutView { action: Feature, domain: Domain },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::ViewOnlyWithAction(action) => write!(
                f,
                "View Only Mode conflicts with {}: view-only admins cannot perform actions",
                action.key()
            ),
            Conflict::DeleteWithoutEdit(domain) => write!(
                f,
                "{} requires {} permission",
                domain.delete().label(),
                domain.edit().label()
            ),
            Conflict::SendWithoutViewMessages => {
                f.write_str("Sending messages requires View Messages permission")
            }
            Conflict::ExportWithoutViewAnalytics => f.write_str(
                "Exporting data or downloading reports requires View Analytics permission",
            ),
            Conflict::ActionWithoutView { action, domain } => write!(
                f,
                "{} is enabled without {}",
                action.label(),
                domain.view().label()
            ),
        }
    }
}

/// Collect every conflict in `permissions`, in fixed priority order:
/// view-only vs. actions, delete without edit, messaging, analytics,
/// then actions without the matching view flag per domain.
pub fn detect(permissions: &PermissionSet) -> Vec<Conflict> {
    let flags = &permissions.features;
    let mut conflicts = Vec::new();

    if flags.view_only() {
        conflicts.extend(
            flags
                .enabled()
                .filter(|f| f.is_action())
                .map(Conflict::ViewOnlyWithAction),
        );
    }

    for domain in Domain::ALL {
        if flags.get(domain.delete()) && !flags.get(domain.edit()) {
            conflicts.push(Conflict::DeleteWithoutEdit(domain));
        }
    }

    if flags.any(&Feature::SEND_MESSAGES) && !flags.get(Feature::ViewMessages) {
        conflicts.push(Conflict::SendWithoutViewMessages);
    }

    if flags.any(&Feature::EXPORTS) && !flags.get(Feature::ViewAnalytics) {
        conflicts.push(Conflict::ExportWithoutViewAnalytics);
    }

    for domain in Domain::ALL {
        if flags.get(domain.view()) {
            continue;
        }
        conflicts.extend(
            domain
                .actions()
                .iter()
                .filter(|action| flags.get(**action))
                .map(|action| Conflict::ActionWithoutView {
                    action: *action,
                    domain,
                }),
        );
    }

    conflicts
}

/// Conflict messages for `permissions`, ready for display.
pub fn find_conflicts(permissions: &PermissionSet) -> Vec<String> {
    detect(permissions).iter().map(ToString::to_string).collect()
}

//! Core types for admin permission sets.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A zone identifier within a city corporation.
pub type ZoneId = i64;

/// A ward identifier within a zone.
pub type WardId = i64;

/// A named feature flag on an admin account.
///
/// Declaration order is the canonical order: every check, fix, warning and
/// diff walks flags in this order, so message lists are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    ViewComplaints,
    ApproveComplaints,
    RejectComplaints,
    MarkComplaintsPending,
    EditComplaints,
    DeleteComplaints,
    ViewUsers,
    EditUsers,
    DeleteUsers,
    AddUsers,
    ViewAdmins,
    EditAdmins,
    DeleteAdmins,
    AddAdmins,
    ViewMessages,
    SendMessagesToUsers,
    SendMessagesToAdmins,
    ViewAnalytics,
    ExportData,
    DownloadReports,
    ViewOnlyMode,
}

impl Feature {
    pub const COUNT: usize = 21;

    /// Every flag, in canonical order.
    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::ViewComplaints,
        Feature::ApproveComplaints,
        Feature::RejectComplaints,
        Feature::MarkComplaintsPending,
        Feature::EditComplaints,
        Feature::DeleteComplaints,
        Feature::ViewUsers,
        Feature::EditUsers,
        Feature::DeleteUsers,
        Feature::AddUsers,
        Feature::ViewAdmins,
        Feature::EditAdmins,
        Feature::DeleteAdmins,
        Feature::AddAdmins,
        Feature::ViewMessages,
        Feature::SendMessagesToUsers,
        Feature::SendMessagesToAdmins,
        Feature::ViewAnalytics,
        Feature::ExportData,
        Feature::DownloadReports,
        Feature::ViewOnlyMode,
    ];

    /// The five read-access flags.
    pub const VIEWS: [Feature; 5] = [
        Feature::ViewComplaints,
        Feature::ViewUsers,
        Feature::ViewAdmins,
        Feature::ViewMessages,
        Feature::ViewAnalytics,
    ];

    /// Flags that send a message on the admin's behalf.
    pub const SEND_MESSAGES: [Feature; 2] =
        [Feature::SendMessagesToUsers, Feature::SendMessagesToAdmins];

    /// Flags that take data out of the console.
    pub const EXPORTS: [Feature; 2] = [Feature::ExportData, Feature::DownloadReports];

    /// Wire name used in stored and submitted permission sets.
    pub fn key(self) -> &'static str {
        match self {
            Feature::ViewComplaints => "canViewComplaints",
            Feature::ApproveComplaints => "canApproveComplaints",
            Feature::RejectComplaints => "canRejectComplaints",
            Feature::MarkComplaintsPending => "canMarkComplaintsPending",
            Feature::EditComplaints => "canEditComplaints",
            Feature::DeleteComplaints => "canDeleteComplaints",
            Feature::ViewUsers => "canViewUsers",
            Feature::EditUsers => "canEditUsers",
            Feature::DeleteUsers => "canDeleteUsers",
            Feature::AddUsers => "canAddUsers",
            Feature::ViewAdmins => "canViewAdmins",
            Feature::EditAdmins => "canEditAdmins",
            Feature::DeleteAdmins => "canDeleteAdmins",
            Feature::AddAdmins => "canAddAdmins",
            Feature::ViewMessages => "canViewMessages",
            Feature::SendMessagesToUsers => "canSendMessagesToUsers",
            Feature::SendMessagesToAdmins => "canSendMessagesToAdmins",
            Feature::ViewAnalytics => "canViewAnalytics",
            Feature::ExportData => "canExportData",
            Feature::DownloadReports => "canDownloadReports",
            Feature::ViewOnlyMode => "viewOnlyMode",
        }
    }

    /// Human-readable label for console display.
    pub fn label(self) -> &'static str {
        match self {
            Feature::ViewComplaints => "View Complaints",
            Feature::ApproveComplaints => "Approve Complaints",
            Feature::RejectComplaints => "Reject Complaints",
            Feature::MarkComplaintsPending => "Mark Complaints Pending",
            Feature::EditComplaints => "Edit Complaints",
            Feature::DeleteComplaints => "Delete Complaints",
            Feature::ViewUsers => "View Users",
            Feature::EditUsers => "Edit Users",
            Feature::DeleteUsers => "Delete Users",
            Feature::AddUsers => "Add Users",
            Feature::ViewAdmins => "View Admins",
            Feature::EditAdmins => "Edit Admins",
            Feature::DeleteAdmins => "Delete Admins",
            Feature::AddAdmins => "Add Admins",
            Feature::ViewMessages => "View Messages",
            Feature::SendMessagesToUsers => "Send Messages to Users",
            Feature::SendMessagesToAdmins => "Send Messages to Admins",
            Feature::ViewAnalytics => "View Analytics",
            Feature::ExportData => "Export Data",
            Feature::DownloadReports => "Download Reports",
            Feature::ViewOnlyMode => "View Only Mode",
        }
    }

    /// Look up a flag by its wire name.
    pub fn from_key(key: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn group(self) -> FeatureGroup {
        match self {
            Feature::ViewComplaints
            | Feature::ApproveComplaints
            | Feature::RejectComplaints
            | Feature::MarkComplaintsPending
            | Feature::EditComplaints
            | Feature::DeleteComplaints => FeatureGroup::ComplaintManagement,
            Feature::ViewUsers | Feature::EditUsers | Feature::DeleteUsers | Feature::AddUsers => {
                FeatureGroup::UserManagement
            }
            Feature::ViewAdmins
            | Feature::EditAdmins
            | Feature::DeleteAdmins
            | Feature::AddAdmins => FeatureGroup::AdminManagement,
            Feature::ViewMessages
            | Feature::SendMessagesToUsers
            | Feature::SendMessagesToAdmins => FeatureGroup::Messaging,
            Feature::ViewAnalytics | Feature::ExportData | Feature::DownloadReports => {
                FeatureGroup::AnalyticsReports
            }
            Feature::ViewOnlyMode => FeatureGroup::Mode,
        }
    }

    pub fn is_view(self) -> bool {
        Feature::VIEWS.contains(&self)
    }

    /// Whether this flag lets the admin change something (anything that is
    /// neither a view flag nor the mode flag).
    pub fn is_action(self) -> bool {
        !self.is_view() && self != Feature::ViewOnlyMode
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The six sections the admin console groups flags under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    ComplaintManagement,
    UserManagement,
    AdminManagement,
    Messaging,
    AnalyticsReports,
    Mode,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 6] = [
        FeatureGroup::ComplaintManagement,
        FeatureGroup::UserManagement,
        FeatureGroup::AdminManagement,
        FeatureGroup::Messaging,
        FeatureGroup::AnalyticsReports,
        FeatureGroup::Mode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FeatureGroup::ComplaintManagement => "Complaint Management",
            FeatureGroup::UserManagement => "User Management",
            FeatureGroup::AdminManagement => "Admin Management",
            FeatureGroup::Messaging => "Messaging",
            FeatureGroup::AnalyticsReports => "Analytics & Reports",
            FeatureGroup::Mode => "Mode",
        }
    }

    /// Members of this group, in canonical order.
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| f.group() == self)
    }
}

/// A managed record type with its own view / edit / delete flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Complaints,
    Users,
    Admins,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Complaints, Domain::Users, Domain::Admins];

    pub fn view(self) -> Feature {
        match self {
            Domain::Complaints => Feature::ViewComplaints,
            Domain::Users => Feature::ViewUsers,
            Domain::Admins => Feature::ViewAdmins,
        }
    }

    pub fn edit(self) -> Feature {
        match self {
            Domain::Complaints => Feature::EditComplaints,
            Domain::Users => Feature::EditUsers,
            Domain::Admins => Feature::EditAdmins,
        }
    }

    pub fn delete(self) -> Feature {
        match self {
            Domain::Complaints => Feature::DeleteComplaints,
            Domain::Users => Feature::DeleteUsers,
            Domain::Admins => Feature::DeleteAdmins,
        }
    }

    /// Action flags of this domain, in canonical order.
    pub fn actions(self) -> &'static [Feature] {
        match self {
            Domain::Complaints => &[
                Feature::ApproveComplaints,
                Feature::RejectComplaints,
                Feature::MarkComplaintsPending,
                Feature::EditComplaints,
                Feature::DeleteComplaints,
            ],
            Domain::Users => &[Feature::EditUsers, Feature::DeleteUsers, Feature::AddUsers],
            Domain::Admins => &[Feature::EditAdmins, Feature::DeleteAdmins, Feature::AddAdmins],
        }
    }
}

/// On/off state for every [`Feature`].
///
/// Serializes as a map keyed by wire name, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags([bool; Feature::COUNT]);

impl FeatureFlags {
    /// All flags off.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: Feature) -> bool {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        self.0[feature.index()] = enabled;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }

    pub fn any(&self, features: &[Feature]) -> bool {
        features.iter().any(|f| self.get(*f))
    }

    /// Enabled flags in canonical order.
    pub fn enabled(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|f| self.get(*f))
    }

    pub fn view_only(&self) -> bool {
        self.get(Feature::ViewOnlyMode)
    }
}

impl FromIterator<Feature> for FeatureFlags {
    /// Flags with exactly the given features enabled.
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut flags = FeatureFlags::none();
        for feature in iter {
            flags.set(feature, true);
        }
        flags
    }
}

impl Serialize for FeatureFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Feature::COUNT))?;
        for feature in Feature::ALL {
            map.serialize_entry(feature.key(), &self.get(feature))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::structure::check_features(&value).map_err(serde::de::Error::custom)
    }
}

/// What one admin account may do, and where.
///
/// Replaced wholesale on every save. Scope lists carry set semantics:
/// duplicates are dropped on parse, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PermissionSet {
    pub zones: Vec<ZoneId>,
    pub wards: Vec<WardId>,
    pub categories: Vec<String>,
    pub features: FeatureFlags,
}

impl PermissionSet {
    /// No scope, every flag off.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read access to complaints, users, admins and messages, nothing else.
    pub fn view_only() -> Self {
        Self {
            features: [
                Feature::ViewComplaints,
                Feature::ViewUsers,
                Feature::ViewAdmins,
                Feature::ViewMessages,
                Feature::ViewOnlyMode,
            ]
            .into_iter()
            .collect(),
            ..Self::default()
        }
    }

    /// Every flag on except view-only mode.
    pub fn full_access() -> Self {
        Self {
            features: Feature::ALL
                .into_iter()
                .filter(|f| *f != Feature::ViewOnlyMode)
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn covers_zone(&self, zone: ZoneId) -> bool {
        self.zones.contains(&zone)
    }

    pub fn covers_ward(&self, ward: WardId) -> bool {
        self.wards.contains(&ward)
    }

    pub fn covers_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::structure::check(&value).map_err(serde::de::Error::custom)
    }
}

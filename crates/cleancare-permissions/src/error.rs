//! Structural validation errors.

use thiserror::Error;

/// Why a candidate value is not a well-formed permission set.
///
/// Only the first failure is reported; checks run in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("permission set must be an object")]
    NotAnObject,

    #[error("'{field}' must be an array")]
    NotAnArray { field: &'static str },

    #[error("'{field}' entry at index {index} must be {expected}")]
    BadElement {
        field: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error("'features' must be an object")]
    FeaturesNotAnObject,

    #[error("feature flag '{key}' is missing")]
    MissingFlag { key: &'static str },

    #[error("feature flag '{key}' must be a boolean")]
    NotBoolean { key: &'static str },
}

//! Admin permission sets for the Clean Care console.
//!
//! Structure check, conflict detection, auto-fix, warnings, the save gate
//! and audit diffs. Every operation is a pure function over its input.

pub mod autofix;
pub mod conflicts;
pub mod diff;
pub mod error;
pub mod gate;
pub mod structure;
pub mod types;
pub mod warnings;

pub use autofix::auto_fix;
pub use conflicts::{Conflict, find_conflicts};
pub use diff::{Change, Scope, changes, diff};
pub use error::StructureError;
pub use gate::{INVALID_STRUCTURE, SaveReport, validate_before_save, validate_permissions};
pub use structure::{is_valid, parse};
pub use types::*;
pub use warnings::{Warning, get_warnings};

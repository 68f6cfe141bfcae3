//! The tri-state checked-status filter dimension.

use serde::{Deserialize, Serialize};

/// Filter over the publish state of content rows.
///
/// Listings can show everything, only rows that passed review, or only rows
/// still awaiting review. Filtered (searched) listings are forced to
/// [`CheckedStatus::CheckedOnly`] by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckedStatus {
    /// No publish-state restriction.
    #[default]
    All,
    /// Only rows whose checked flag is set.
    CheckedOnly,
    /// Only rows still pending review.
    PendingOnly,
}

impl CheckedStatus {
    /// Returns true when the filter admits every row.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

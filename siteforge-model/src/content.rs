use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use siteforge_types::{ChannelId, ContentId};

/// System column names shared by every physical content table.
///
/// Stored lowercase; extensible attribute names never collide with these.
pub mod columns {
    pub const ID: &str = "id";
    pub const CHANNEL_ID: &str = "channel_id";
    pub const TITLE: &str = "title";
    pub const IS_CHECKED: &str = "is_checked";
    pub const CHECKED_LEVEL: &str = "checked_level";
    pub const IS_TOP: &str = "is_top";
    pub const TAXIS: &str = "taxis";
    pub const ADDED_BY: &str = "added_by";
    pub const LAST_EDITED_BY: &str = "last_edited_by";
    pub const ADD_DATE: &str = "add_date";
    pub const LAST_EDIT_DATE: &str = "last_edit_date";
    pub const SOURCE_ID: &str = "source_id";
    pub const ATTRIBUTES: &str = "attributes";
}

/// Sentinel `source_id` marking a row as preview content.
pub const PREVIEW_SOURCE_ID: i64 = -99;

/// One content row from a channel's physical table.
///
/// System columns are fixed; everything channel-specific lives in the
/// `attributes` map (EAV semantics). Attribute names not present in the
/// resolved schema are ignored by projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub channel_id: ChannelId,
    pub title: String,
    pub is_checked: bool,
    pub checked_level: i32,
    pub is_top: bool,
    /// Custom ordering weight; higher sorts first.
    pub taxis: i64,
    pub added_by: String,
    pub last_edited_by: String,
    pub add_date: DateTime<Utc>,
    pub last_edit_date: DateTime<Utc>,
    /// Origin marker; [`PREVIEW_SOURCE_ID`] flags a temporary preview row.
    pub source_id: i64,
    /// Extensible attribute values keyed by lowercased attribute name.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl ContentRecord {
    /// True when this row is temporary preview content.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.source_id == PREVIEW_SOURCE_ID
    }

    /// Extracts a string attribute value (case-insensitive name).
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(|v| v.as_str())
    }

    /// Extracts a boolean attribute value.
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attr(name).and_then(|v| v.as_bool())
    }

    /// Extracts a numeric attribute value.
    pub fn attr_number(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|v| v.as_f64())
    }

    /// Raw attribute lookup; names are stored lowercase.
    pub fn attr(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(&name.to_lowercase())
    }
}

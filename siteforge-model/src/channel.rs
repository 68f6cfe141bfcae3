use serde::{Deserialize, Serialize};
use siteforge_types::{ChannelId, SiteId};

/// Read-only site metadata, owned by the surrounding CMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub id: SiteId,
    pub name: String,
    /// Default physical content table for channels without an override.
    pub table_name: String,
    /// Listing page size configured for this site.
    pub page_size: usize,
}

/// Read-only channel metadata, owned by the surrounding CMS.
///
/// The listing engine never mutates channels; it reads the parent chain for
/// scope resolution, the table override for table resolution, and the
/// per-channel flags that shape the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub site_id: SiteId,
    /// `None` for a site's root channel.
    pub parent_id: Option<ChannelId>,
    pub name: String,
    /// Physical table override; falls back to the site default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Cached row count, maintained by write operations outside this engine.
    /// Eventually consistent with the live count.
    pub content_count: u64,
    /// Channels flagged for preview accumulate temporary rows that are
    /// purged in the background on each listing.
    pub preview_contents: bool,
    /// Ordering applied to unsearched listings.
    #[serde(default)]
    pub order: ContentOrder,
}

/// The display order a channel is configured to list content in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrder {
    /// Pinned rows first, then custom weight, then newest id.
    #[default]
    TopWeightDesc,
    /// Newest add-date first.
    AddDateDesc,
}

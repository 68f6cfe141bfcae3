//! Channel directory: table resolution and scope-chain computation.
//!
//! The directory is an in-memory view of the site/channel hierarchy, loaded
//! and cache-invalidated by the surrounding CMS. The listing engine only
//! reads it.

use crate::channel::{ChannelInfo, SiteInfo};
use siteforge_types::{ChannelId, ScopeId, SiteId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while resolving channels against the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("channel {0} not found")]
    ChannelNotFound(ChannelId),

    #[error("channel {channel} does not belong to site {site}")]
    SiteMismatch { channel: ChannelId, site: SiteId },

    #[error("parent cycle detected at channel {0}")]
    ParentCycle(ChannelId),
}

/// An ordered sequence of scope identities, most specific first.
///
/// Built once per listing request from the target channel; used for both
/// schema merging and permission inheritance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeChain {
    scopes: Vec<ScopeId>,
}

impl ScopeChain {
    pub(crate) fn new(scopes: Vec<ScopeId>) -> Self {
        Self { scopes }
    }

    /// Scopes from most specific (target channel) to least (system).
    pub fn scopes(&self) -> &[ScopeId] {
        &self.scopes
    }

    /// A stable string form usable as a cache-key component.
    pub fn signature(&self) -> String {
        let parts: Vec<String> = self.scopes.iter().map(|s| s.to_string()).collect();
        parts.join(">")
    }
}

/// In-memory site/channel hierarchy lookup.
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    sites: HashMap<SiteId, SiteInfo>,
    channels: HashMap<ChannelId, ChannelInfo>,
}

impl ChannelDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_site(&mut self, site: SiteInfo) {
        self.sites.insert(site.id, site);
    }

    pub fn insert_channel(&mut self, channel: ChannelInfo) {
        self.channels.insert(channel.id, channel);
    }

    pub fn site(&self, id: SiteId) -> Option<&SiteInfo> {
        self.sites.get(&id)
    }

    pub fn channel(&self, id: ChannelId) -> Option<&ChannelInfo> {
        self.channels.get(&id)
    }

    /// Looks up a channel and verifies it belongs to the given site.
    /// Cross-site channel ids are rejected rather than silently served.
    pub fn channel_of_site(
        &self,
        site_id: SiteId,
        channel_id: ChannelId,
    ) -> Result<&ChannelInfo, DirectoryError> {
        if !self.sites.contains_key(&site_id) {
            return Err(DirectoryError::SiteNotFound(site_id));
        }
        let channel = self
            .channels
            .get(&channel_id)
            .ok_or(DirectoryError::ChannelNotFound(channel_id))?;
        if channel.site_id != site_id {
            return Err(DirectoryError::SiteMismatch {
                channel: channel_id,
                site: site_id,
            });
        }
        Ok(channel)
    }

    /// Resolves the physical table backing a channel's content: the
    /// channel's own override if set, the nearest ancestor's otherwise,
    /// falling back to the site default.
    pub fn resolve_table(
        &self,
        site_id: SiteId,
        channel_id: ChannelId,
    ) -> Result<String, DirectoryError> {
        let channel = self.channel_of_site(site_id, channel_id)?;

        if let Some(table) = &channel.table_name {
            return Ok(table.clone());
        }
        for ancestor in self.ancestors(channel)? {
            if let Some(table) = &ancestor.table_name {
                return Ok(table.clone());
            }
        }

        let site = self
            .sites
            .get(&site_id)
            .ok_or(DirectoryError::SiteNotFound(site_id))?;
        Ok(site.table_name.clone())
    }

    /// Computes the ordered scope chain for a channel: the channel itself,
    /// each ancestor channel walking up the parent chain, the owning site,
    /// then the system scope. Pure function of the hierarchy.
    pub fn scope_chain(&self, channel_id: ChannelId) -> Result<ScopeChain, DirectoryError> {
        let channel = self
            .channels
            .get(&channel_id)
            .ok_or(DirectoryError::ChannelNotFound(channel_id))?;

        let mut scopes = vec![ScopeId::Channel(channel.id)];
        for ancestor in self.ancestors(channel)? {
            scopes.push(ScopeId::Channel(ancestor.id));
        }
        scopes.push(ScopeId::Site(channel.site_id));
        scopes.push(ScopeId::System);

        Ok(ScopeChain::new(scopes))
    }

    /// Walks the parent chain from (but excluding) `channel` to the root.
    fn ancestors(&self, channel: &ChannelInfo) -> Result<Vec<&ChannelInfo>, DirectoryError> {
        let mut out = Vec::new();
        let mut current = channel;
        // Bounded walk: a chain longer than the channel count is a cycle.
        let limit = self.channels.len();

        while let Some(parent_id) = current.parent_id {
            if out.len() > limit {
                return Err(DirectoryError::ParentCycle(current.id));
            }
            let parent = self
                .channels
                .get(&parent_id)
                .ok_or(DirectoryError::ChannelNotFound(parent_id))?;
            out.push(parent);
            current = parent;
        }
        Ok(out)
    }
}

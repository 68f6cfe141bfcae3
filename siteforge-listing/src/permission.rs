//! Channel-level permission model for listing viewers.
//!
//! Grants are attached to scopes; a viewer's effective rights on a channel
//! come from the channel's scope chain, so a grant at a parent channel or
//! at the site level covers every descendant. A system administrator
//! bypasses per-scope grants entirely.

use crate::error::{ListingError, ListingResult};
use serde::{Deserialize, Serialize};
use siteforge_model::ScopeChain;
use siteforge_types::ScopeId;
use std::collections::{HashMap, HashSet};

/// Individual operation a viewer may hold on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPermission {
    ContentView,
    ContentAdd,
    ContentEdit,
    ContentDelete,
    ContentTranslate,
}

impl ChannelPermission {
    /// Every recognized permission kind; a listing is reachable with any one.
    pub const ALL: [Self; 5] = [
        Self::ContentView,
        Self::ContentAdd,
        Self::ContentEdit,
        Self::ContentDelete,
        Self::ContentTranslate,
    ];
}

/// Permissions granted at one scope, with the optional self-only modifier.
#[derive(Debug, Clone, Default)]
pub struct ChannelGrant {
    permissions: HashSet<ChannelPermission>,
    /// When set, the view grant only covers content the viewer authored.
    view_own_only: bool,
}

impl ChannelGrant {
    pub fn new<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = ChannelPermission>,
    {
        Self {
            permissions: permissions.into_iter().collect(),
            view_own_only: false,
        }
    }

    /// Restricts the view grant to the viewer's own content.
    #[must_use]
    pub fn own_content_only(mut self) -> Self {
        self.view_own_only = true;
        self
    }

    pub fn holds(&self, permission: ChannelPermission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_view_own_only(&self) -> bool {
        self.view_own_only
    }
}

/// The requesting principal: identity plus per-scope permission grants.
#[derive(Debug, Clone)]
pub struct Viewer {
    user_name: String,
    is_authenticated: bool,
    is_system_administrator: bool,
    grants: HashMap<ScopeId, ChannelGrant>,
}

impl Viewer {
    /// An unauthenticated visitor. Any listing attempt yields
    /// [`ListingError::Unauthenticated`].
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user_name: String::new(),
            is_authenticated: false,
            is_system_administrator: false,
            grants: HashMap::new(),
        }
    }

    /// An authenticated viewer with no grants yet.
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.into(),
            is_authenticated: true,
            is_system_administrator: false,
            grants: HashMap::new(),
        }
    }

    /// A system administrator: every operation allowed, never owner-restricted.
    pub fn system_administrator(user_name: &str) -> Self {
        Self {
            is_system_administrator: true,
            ..Self::new(user_name)
        }
    }

    /// Attaches a grant at a scope.
    #[must_use]
    pub fn with_grant(mut self, scope: ScopeId, grant: ChannelGrant) -> Self {
        self.grants.insert(scope, grant);
        self
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_system_administrator(&self) -> bool {
        self.is_system_administrator
    }

    fn grant_at(&self, scope: ScopeId) -> Option<&ChannelGrant> {
        self.grants.get(&scope)
    }
}

/// A viewer's rights evaluated against one channel's scope chain.
///
/// Built once per listing request and reused for both the access gate and
/// the capability-gated command set on projected rows.
pub struct PermissionScope<'a> {
    viewer: &'a Viewer,
    chain: &'a ScopeChain,
}

impl<'a> PermissionScope<'a> {
    pub fn new(viewer: &'a Viewer, chain: &'a ScopeChain) -> Self {
        Self { viewer, chain }
    }

    /// Grants access when the viewer holds at least one of `required_any`
    /// anywhere on the chain. Distinguishes the unauthenticated signal
    /// (login redirect) from the insufficient-rights signal (forbidden).
    pub fn authorize(&self, required_any: &[ChannelPermission]) -> ListingResult<()> {
        if !self.viewer.is_authenticated() {
            return Err(ListingError::Unauthenticated);
        }
        if self.viewer.is_system_administrator() {
            return Ok(());
        }
        let allowed = required_any.iter().any(|&p| self.holds(p));
        if allowed {
            Ok(())
        } else {
            Err(ListingError::Forbidden {
                message: "You do not have permission to operate on this channel".to_string(),
            })
        }
    }

    /// True when the viewer may perform the operation on this channel.
    pub fn can(&self, permission: ChannelPermission) -> bool {
        if !self.viewer.is_authenticated() {
            return false;
        }
        self.viewer.is_system_administrator() || self.holds(permission)
    }

    /// Returns the viewer's identity when their view grant is scoped to
    /// self-only content; the listing injects it as a mandatory equality
    /// filter on the added-by column. The most specific scope that carries
    /// a view grant decides.
    pub fn owner_restriction(&self) -> Option<String> {
        if self.viewer.is_system_administrator() {
            return None;
        }
        for &scope in self.chain.scopes() {
            if let Some(grant) = self.viewer.grant_at(scope) {
                if grant.holds(ChannelPermission::ContentView) {
                    return grant
                        .is_view_own_only()
                        .then(|| self.viewer.user_name().to_string());
                }
            }
        }
        None
    }

    fn holds(&self, permission: ChannelPermission) -> bool {
        self.chain
            .scopes()
            .iter()
            .filter_map(|&s| self.viewer.grant_at(s))
            .any(|g| g.holds(permission))
    }
}

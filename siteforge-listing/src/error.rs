//! Error taxonomy for the listing engine.
//!
//! The variants are outward signals, not internals: `Unauthenticated` tells
//! the caller to start a login flow, `Forbidden` carries a displayable
//! message, `NotFound` maps to a not-found response, `InvalidFilter` to a
//! bad-request response. Store errors pass through unmodified.

use siteforge_model::DirectoryError;
use siteforge_store::StoreError;
use thiserror::Error;

/// Result type for listing operations.
pub type ListingResult<T> = Result<T, ListingError>;

/// Errors surfaced by the listing engine.
#[derive(Debug, Error)]
pub enum ListingError {
    /// No viewer session; the caller should redirect to login.
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated but lacking every required permission.
    #[error("access denied: {message}")]
    Forbidden { message: String },

    /// Missing channel, or a channel/site mismatch.
    #[error("not found: {0}")]
    NotFound(String),

    /// A search parameter failed validation against the resolved schema.
    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },

    /// Invalid engine configuration (e.g. a zero page size).
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying query execution failure; propagated unmodified.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ListingError {
    pub(crate) fn invalid_filter(reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            reason: reason.into(),
        }
    }
}

impl From<DirectoryError> for ListingError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::SiteNotFound(_)
            | DirectoryError::ChannelNotFound(_)
            | DirectoryError::SiteMismatch { .. } => Self::NotFound(err.to_string()),
            DirectoryError::ParentCycle(_) => Self::Config(err.to_string()),
        }
    }
}

//! Core type definitions for Siteforge.
//!
//! This crate defines the fundamental, channel-agnostic types used throughout
//! the listing engine:
//! - Site, channel, content and scope identifiers
//! - The tri-state checked-status filter dimension
//!
//! Domain-specific structures (schemas, channels, content records) belong in
//! `siteforge-model`, not here.

mod checked;
mod ids;

pub use checked::CheckedStatus;
pub use ids::{ChannelId, ContentId, ScopeId, SiteId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),
}

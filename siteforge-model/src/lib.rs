//! Content model for Siteforge.
//!
//! Defines the universal types the listing engine depends on:
//! - [`AttributeDefinition`] / [`InputKind`] — one field of a channel's extensible schema
//! - [`ResolvedSchema`] — the merged, scope-chain-resolved field set for one table
//! - [`ChannelInfo`] / [`SiteInfo`] — read-only channel and site metadata
//! - [`ChannelDirectory`] — table resolution and scope-chain computation
//! - [`ContentRecord`] — one content row: fixed system columns plus open-ended
//!   named attribute values
//!
//! Channel tables are not fixed at compile time: each channel can define its
//! own field set on top of a shared set of system columns, so everything here
//! is schema-driven rather than struct-per-table.

mod channel;
mod content;
mod directory;
mod schema;

pub use channel::{ChannelInfo, ContentOrder, SiteInfo};
pub use content::{columns, ContentRecord, PREVIEW_SOURCE_ID};
pub use directory::{ChannelDirectory, DirectoryError, ScopeChain};
pub use schema::{AttributeDefinition, AttributeOption, InputKind, ResolvedSchema};

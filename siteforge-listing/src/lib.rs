//! Dynamic content listing engine for Siteforge.
//!
//! Channel content tables are not fixed at compile time: each channel can
//! define its own field set over a shared table shape. This crate turns a
//! validated (site, channel, viewer) triple into a permission-scoped,
//! schema-projected page of content rows:
//!
//! 1. resolve the physical table and scope chain ([`siteforge_model::ChannelDirectory`])
//! 2. resolve one merged schema snapshot ([`AttributeSchemaCatalog`])
//! 3. gate access and derive owner scoping ([`PermissionScope`])
//! 4. build the parameterized predicate (`siteforge-store`)
//! 5. count, window ([`PageWindow`]), fetch the page
//! 6. project rows for display ([`ResultProjector`])
//!
//! Preview-flagged channels additionally enqueue a background purge of
//! stale preview rows ([`PurgeQueue`]) that never blocks the response.

mod catalog;
mod error;
mod paginator;
mod permission;
mod projector;
mod purge;
mod service;

pub use catalog::{AttributeSchemaCatalog, InMemorySchemaSource, SchemaSource};
pub use error::{ListingError, ListingResult};
pub use paginator::PageWindow;
pub use permission::{ChannelGrant, ChannelPermission, PermissionScope, Viewer};
pub use projector::{ContentCommand, ProjectedField, ProjectedRow, ResultProjector};
pub use purge::{PurgeQueue, PurgeTask};
pub use service::{ContentFilter, ContentPage, ListQuery, ListingService};

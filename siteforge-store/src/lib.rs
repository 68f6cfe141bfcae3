//! SQLite storage layer for Siteforge content tables.
//!
//! Each channel's content lives in a physical table resolved at request
//! time; tables share a fixed set of system columns plus a JSON column for
//! extensible attribute values.
//!
//! # Architecture
//!
//! - [`Predicate`] / [`PredicateBuilder`] — immutable, parameterized filter
//!   expressions; identifiers are allow-listed, values are always bound
//! - [`ContentStore`] — count and page execution over a predicate, plus the
//!   preview-row purge and the writes tests need
//!
//! The store is synchronous; the listing engine runs it inside a request and
//! dispatches only the preview purge to a background task.

mod content_store;
mod error;
mod predicate;

pub use content_store::ContentStore;
pub use error::{StoreError, StoreResult};
pub use predicate::{OrderClause, Predicate, PredicateBuilder, SearchTarget, SqlParam};

//! Attribute schema catalog: scope-chain merging with a read-mostly cache.
//!
//! Resolution walks the chain most specific first; the first definition for
//! a name suppresses any same-named definition from a broader scope. The
//! cache hands out `Arc<ResolvedSchema>` snapshots, so a listing in flight
//! keeps the schema version it started with even if an invalidation lands
//! mid-request — readers see the old merge or the new one, never a partial.

use siteforge_model::{AttributeDefinition, ResolvedSchema, ScopeChain};
use siteforge_types::ScopeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Provider of raw field definitions per (table, scope).
///
/// Backed by whatever the surrounding CMS stores schema in; the catalog
/// only requires deterministic output for a given (table, scope) pair.
pub trait SchemaSource: Send + Sync {
    fn field_definitions(&self, table: &str, scope: ScopeId) -> Vec<AttributeDefinition>;
}

/// In-memory schema source, used by tests and small deployments.
#[derive(Default)]
pub struct InMemorySchemaSource {
    defs: RwLock<HashMap<(String, ScopeId), Vec<AttributeDefinition>>>,
}

impl InMemorySchemaSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field definition for a table at a scope.
    pub fn define(&self, table: &str, def: AttributeDefinition) {
        let mut defs = self.defs.write().unwrap();
        defs.entry((table.to_string(), def.scope))
            .or_default()
            .push(def);
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn field_definitions(&self, table: &str, scope: ScopeId) -> Vec<AttributeDefinition> {
        let defs = self.defs.read().unwrap();
        defs.get(&(table.to_string(), scope))
            .cloned()
            .unwrap_or_default()
    }
}

/// Caching resolver of merged schemas, shared across requests.
///
/// Concurrent readers never block each other; invalidation takes the write
/// lock only long enough to drop stale entries.
pub struct AttributeSchemaCatalog {
    source: Arc<dyn SchemaSource>,
    cache: RwLock<HashMap<(String, String), Arc<ResolvedSchema>>>,
}

impl AttributeSchemaCatalog {
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the merged schema for a table under a scope chain.
    ///
    /// Deterministic and cacheable by (table, chain signature); the returned
    /// snapshot stays valid for the whole request that fetched it.
    pub fn resolve(&self, table: &str, chain: &ScopeChain) -> Arc<ResolvedSchema> {
        let key = (table.to_string(), chain.signature());

        if let Some(schema) = self.cache.read().unwrap().get(&key) {
            return Arc::clone(schema);
        }

        let merged = Arc::new(ResolvedSchema::merge(
            chain
                .scopes()
                .iter()
                .map(|&scope| self.source.field_definitions(table, scope)),
        ));
        debug!(table, chain = %chain.signature(), fields = merged.len(), "resolved schema");

        let mut cache = self.cache.write().unwrap();
        // A racing resolver may have inserted first; keep its snapshot so
        // concurrent requests share one version.
        Arc::clone(cache.entry(key).or_insert(merged))
    }

    /// Drops every cached merge involving the given table. Called when a
    /// field definition changes at any scope.
    pub fn invalidate_table(&self, table: &str) {
        let mut cache = self.cache.write().unwrap();
        cache.retain(|(t, _), _| t != table);
    }

    /// Drops the entire cache.
    pub fn invalidate_all(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Number of cached (table, chain) entries.
    pub fn cached_entries(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

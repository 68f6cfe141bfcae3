mod common;

use common::*;
use siteforge_model::AttributeDefinition;
use siteforge_types::ScopeId;

// ── Caching ──────────────────────────────────────────────────────

#[test]
fn repeated_resolution_shares_one_snapshot() {
    let f = fixture();
    let chain = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let a = f.catalog.resolve(TABLE, &chain);
    let b = f.catalog.resolve(TABLE, &chain);
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(f.catalog.cached_entries(), 1);
}

#[test]
fn distinct_chains_cache_separately() {
    let f = fixture();
    let local = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let parent = f.directory.scope_chain(NEWS).unwrap();
    f.catalog.resolve(TABLE, &local);
    f.catalog.resolve(TABLE, &parent);
    assert_eq!(f.catalog.cached_entries(), 2);
}

#[test]
fn resolution_is_deterministic() {
    let f = fixture();
    let chain = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let a = f.catalog.resolve(TABLE, &chain);
    f.catalog.invalidate_all();
    let b = f.catalog.resolve(TABLE, &chain);
    let names = |s: &siteforge_model::ResolvedSchema| {
        s.fields()
            .iter()
            .map(|d| d.attribute_name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&a), names(&b));
}

// ── Invalidation & snapshot isolation ────────────────────────────

#[test]
fn invalidation_picks_up_new_definitions() {
    let f = fixture();
    let chain = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let before = f.catalog.resolve(TABLE, &chain);
    assert!(!before.contains("subtitle"));

    f.source.define(
        TABLE,
        AttributeDefinition::text("subtitle", "Subtitle", ScopeId::System),
    );
    f.catalog.invalidate_table(TABLE);

    let after = f.catalog.resolve(TABLE, &chain);
    assert!(after.contains("subtitle"));
}

#[test]
fn held_snapshot_survives_invalidation_unchanged() {
    // An in-flight listing keeps the schema version it started with; an
    // invalidation mid-request must not mutate it.
    let f = fixture();
    let chain = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let snapshot = f.catalog.resolve(TABLE, &chain);
    let fields_before = snapshot.len();

    f.source.define(
        TABLE,
        AttributeDefinition::text("late_field", "Late", ScopeId::System),
    );
    f.catalog.invalidate_table(TABLE);
    f.catalog.resolve(TABLE, &chain);

    assert_eq!(snapshot.len(), fields_before);
    assert!(!snapshot.contains("late_field"));
}

#[test]
fn invalidate_table_only_drops_that_table() {
    let f = fixture();
    let chain = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    f.catalog.resolve(TABLE, &chain);
    f.catalog.resolve("other_table", &chain);
    assert_eq!(f.catalog.cached_entries(), 2);

    f.catalog.invalidate_table(TABLE);
    assert_eq!(f.catalog.cached_entries(), 1);
}

// ── Merge semantics through the chain ────────────────────────────

#[test]
fn channel_override_suppresses_site_definition() {
    let f = fixture();
    f.source.define(
        TABLE,
        AttributeDefinition::number("author", "Author Id", ScopeId::Channel(LOCAL_NEWS)),
    );

    let local = f.directory.scope_chain(LOCAL_NEWS).unwrap();
    let schema = f.catalog.resolve(TABLE, &local);
    let def = schema.get("author").unwrap();
    assert_eq!(def.display_name, "Author Id");
    assert_eq!(def.scope, ScopeId::Channel(LOCAL_NEWS));

    // The sibling chain without the override keeps the site definition.
    let parent = f.directory.scope_chain(NEWS).unwrap();
    let parent_schema = f.catalog.resolve(TABLE, &parent);
    assert_eq!(parent_schema.get("author").unwrap().display_name, "Author");
}

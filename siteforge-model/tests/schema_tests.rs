use pretty_assertions::assert_eq;
use siteforge_model::{AttributeDefinition, AttributeOption, InputKind, ResolvedSchema};
use siteforge_types::{ChannelId, ScopeId, SiteId};

fn channel_scope(id: i32) -> ScopeId {
    ScopeId::Channel(ChannelId::new(id))
}

fn site_scope(id: i32) -> ScopeId {
    ScopeId::Site(SiteId::new(id))
}

// ── Constructors ─────────────────────────────────────────────────

#[test]
fn text_field_defaults() {
    let f = AttributeDefinition::text("subtitle", "Subtitle", ScopeId::System);
    assert_eq!(f.attribute_name, "subtitle");
    assert_eq!(f.display_name, "Subtitle");
    assert_eq!(f.input_kind, InputKind::Text);
    assert!(f.visible_in_list);
    assert!(f.searchable);
}

#[test]
fn text_editor_is_not_searchable_by_default() {
    let f = AttributeDefinition::text_editor("body", "Body", ScopeId::System);
    assert!(!f.searchable);
    assert!(f.input_kind.is_unbounded_text());
}

#[test]
fn hidden_removes_from_listing() {
    let f = AttributeDefinition::text("internal", "Internal", ScopeId::System).hidden();
    assert!(!f.visible_in_list);
}

#[test]
fn option_label_lookup() {
    let f = AttributeDefinition::select_one(
        "category",
        "Category",
        vec![
            AttributeOption::new("1", "News"),
            AttributeOption::new("2", "Opinion"),
        ],
        ScopeId::System,
    );
    assert_eq!(f.option_label("2"), Some("Opinion"));
    assert_eq!(f.option_label("9"), None);
}

// ── Scope-chain merging ──────────────────────────────────────────

#[test]
fn more_specific_scope_wins() {
    let schema = ResolvedSchema::merge([
        vec![AttributeDefinition::number("weight", "Weight (kg)", channel_scope(5))],
        vec![AttributeDefinition::text("weight", "Weight", site_scope(1))],
    ]);
    let def = schema.get("weight").unwrap();
    assert_eq!(def.input_kind, InputKind::Number);
    assert_eq!(def.display_name, "Weight (kg)");
    assert_eq!(def.scope, channel_scope(5));
    assert_eq!(schema.len(), 1);
}

#[test]
fn override_replaces_never_merges() {
    // The specific definition has no options; the broader one's options
    // must not bleed through.
    let schema = ResolvedSchema::merge([
        vec![AttributeDefinition::text("kind", "Kind", channel_scope(5))],
        vec![AttributeDefinition::select_one(
            "kind",
            "Kind",
            vec![AttributeOption::new("a", "Alpha")],
            site_scope(1),
        )],
    ]);
    let def = schema.get("kind").unwrap();
    assert!(def.options.is_empty());
    assert_eq!(def.input_kind, InputKind::Text);
}

#[test]
fn merge_is_idempotent() {
    let defs = || {
        [
            vec![AttributeDefinition::text("title", "Title", channel_scope(5))],
            vec![
                AttributeDefinition::date("published", "Published", site_scope(1)),
                AttributeDefinition::text("author", "Author", site_scope(1)),
            ],
        ]
    };
    let a = ResolvedSchema::merge(defs());
    let b = ResolvedSchema::merge(defs());
    let names_a: Vec<&str> = a.fields().iter().map(|f| f.attribute_name.as_str()).collect();
    let names_b: Vec<&str> = b.fields().iter().map(|f| f.attribute_name.as_str()).collect();
    assert_eq!(names_a, names_b);
}

#[test]
fn lookup_is_case_insensitive() {
    let schema = ResolvedSchema::merge([vec![AttributeDefinition::text(
        "SubTitle",
        "Subtitle",
        ScopeId::System,
    )]]);
    assert!(schema.contains("subtitle"));
    assert!(schema.contains("SUBTITLE"));
}

// ── Derived field sets ───────────────────────────────────────────

#[test]
fn listing_columns_exclude_unbounded_text() {
    let schema = ResolvedSchema::merge([vec![
        AttributeDefinition::text("title", "Title", ScopeId::System),
        AttributeDefinition::text_editor("body", "Body", ScopeId::System),
        AttributeDefinition::date("published", "Published", ScopeId::System),
    ]]);
    let cols = schema.listing_columns();
    assert_eq!(cols, vec!["title".to_string(), "published".to_string()]);
}

#[test]
fn display_fields_exclude_hidden_and_editor() {
    let schema = ResolvedSchema::merge([vec![
        AttributeDefinition::text("title", "Title", ScopeId::System),
        AttributeDefinition::text("hidden", "Hidden", ScopeId::System).hidden(),
        AttributeDefinition::text_editor("body", "Body", ScopeId::System),
    ]]);
    let shown: Vec<&str> = schema
        .display_fields()
        .map(|f| f.attribute_name.as_str())
        .collect();
    assert_eq!(shown, vec!["title"]);
}

#[test]
fn searchable_fields_follow_flags() {
    let schema = ResolvedSchema::merge([vec![
        AttributeDefinition::text("title", "Title", ScopeId::System),
        AttributeDefinition::text("secret", "Secret", ScopeId::System).with_searchable(false),
        AttributeDefinition::text_editor("body", "Body", ScopeId::System),
    ]]);
    let searchable: Vec<&str> = schema
        .searchable_fields()
        .map(|f| f.attribute_name.as_str())
        .collect();
    assert_eq!(searchable, vec!["title"]);
}

#[test]
fn empty_schema() {
    let schema = ResolvedSchema::merge(Vec::<Vec<AttributeDefinition>>::new());
    assert!(schema.is_empty());
    assert!(schema.get("anything").is_none());
    assert!(schema.listing_columns().is_empty());
}

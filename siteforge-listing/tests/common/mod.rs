//! Shared fixture for listing engine tests: one site, a small channel
//! tree, a schema spread over three scopes, and an in-memory store.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use siteforge_listing::{
    AttributeSchemaCatalog, ChannelGrant, ChannelPermission, InMemorySchemaSource,
    ListingService, Viewer,
};
use siteforge_model::{
    AttributeDefinition, AttributeOption, ChannelDirectory, ChannelInfo, ContentRecord, SiteInfo,
};
use siteforge_store::ContentStore;
use siteforge_types::{ChannelId, ContentId, ScopeId, SiteId};
use std::sync::Arc;

pub const TABLE: &str = "contents_1";
pub const SITE: SiteId = SiteId::new(1);
pub const NEWS: ChannelId = ChannelId::new(10);
pub const LOCAL_NEWS: ChannelId = ChannelId::new(11);
pub const PREVIEWED: ChannelId = ChannelId::new(12);

pub struct Fixture {
    pub directory: Arc<ChannelDirectory>,
    pub source: Arc<InMemorySchemaSource>,
    pub catalog: Arc<AttributeSchemaCatalog>,
    pub store: ContentStore,
    pub service: ListingService,
}

/// Installs a test-writer subscriber so engine logs surface on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn fixture() -> Fixture {
    init_tracing();
    let mut directory = ChannelDirectory::new();
    directory.insert_site(SiteInfo {
        id: SITE,
        name: "main".into(),
        table_name: TABLE.into(),
        page_size: 10,
    });
    directory.insert_channel(ChannelInfo {
        id: NEWS,
        site_id: SITE,
        parent_id: None,
        name: "news".into(),
        table_name: None,
        content_count: 0,
        preview_contents: false,
        order: Default::default(),
    });
    directory.insert_channel(ChannelInfo {
        id: LOCAL_NEWS,
        site_id: SITE,
        parent_id: Some(NEWS),
        name: "local".into(),
        table_name: None,
        content_count: 0,
        preview_contents: false,
        order: Default::default(),
    });
    directory.insert_channel(ChannelInfo {
        id: PREVIEWED,
        site_id: SITE,
        parent_id: Some(NEWS),
        name: "drafts".into(),
        table_name: None,
        content_count: 0,
        preview_contents: true,
        order: Default::default(),
    });

    let source = Arc::new(InMemorySchemaSource::new());
    // System scope: the universal fields.
    source.define(
        TABLE,
        AttributeDefinition::text("title", "Title", ScopeId::System),
    );
    source.define(
        TABLE,
        AttributeDefinition::date("published", "Published", ScopeId::System),
    );
    source.define(
        TABLE,
        AttributeDefinition::text_editor("body", "Body", ScopeId::System),
    );
    // Site scope: shared editorial fields.
    source.define(
        TABLE,
        AttributeDefinition::text("author", "Author", ScopeId::Site(SITE)),
    );
    source.define(
        TABLE,
        AttributeDefinition::select_one(
            "category",
            "Category",
            vec![
                AttributeOption::new("1", "Politics"),
                AttributeOption::new("2", "Sports"),
            ],
            ScopeId::Site(SITE),
        ),
    );
    source.define(
        TABLE,
        AttributeDefinition::check_box("featured", "Featured", ScopeId::Site(SITE)),
    );

    let catalog = Arc::new(AttributeSchemaCatalog::new(source.clone()));
    let store = ContentStore::open_in_memory().unwrap();
    store.init_table(TABLE).unwrap();

    let directory = Arc::new(directory);
    let service = ListingService::new(directory.clone(), catalog.clone(), store.clone());

    Fixture {
        directory,
        source,
        catalog,
        store,
        service,
    }
}

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, day, 9, 0, 0).unwrap()
}

pub fn record(channel: ChannelId, title: &str, author: &str) -> ContentRecord {
    let mut attributes = serde_json::Map::new();
    attributes.insert("author".into(), author.into());
    ContentRecord {
        id: ContentId::new(0),
        channel_id: channel,
        title: title.to_string(),
        is_checked: true,
        checked_level: 1,
        is_top: false,
        taxis: 0,
        added_by: author.to_string(),
        last_edited_by: author.to_string(),
        add_date: at(1),
        last_edit_date: at(1),
        source_id: 0,
        attributes,
    }
}

/// A viewer with full channel rights at the news subtree.
pub fn editor(name: &str) -> Viewer {
    Viewer::new(name).with_grant(
        ScopeId::Channel(NEWS),
        ChannelGrant::new([
            ChannelPermission::ContentView,
            ChannelPermission::ContentAdd,
            ChannelPermission::ContentEdit,
            ChannelPermission::ContentDelete,
            ChannelPermission::ContentTranslate,
        ]),
    )
}

/// A viewer who may only see their own rows.
pub fn restricted(name: &str) -> Viewer {
    Viewer::new(name).with_grant(
        ScopeId::Site(SITE),
        ChannelGrant::new([ChannelPermission::ContentView]).own_content_only(),
    )
}

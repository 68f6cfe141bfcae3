//! The listing entry point: resolve → authorize → query → project.

use crate::catalog::AttributeSchemaCatalog;
use crate::error::{ListingError, ListingResult};
use crate::paginator::PageWindow;
use crate::permission::{ChannelPermission, PermissionScope, Viewer};
use crate::projector::{ProjectedRow, ResultProjector};
use crate::purge::{PurgeQueue, PurgeTask};
use chrono::{NaiveDate, NaiveTime};
use siteforge_model::{columns, ChannelDirectory};
use siteforge_store::{ContentStore, OrderClause, PredicateBuilder, SearchTarget};
use siteforge_types::{ChannelId, CheckedStatus, SiteId};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// System columns that may serve as keyword-search targets; every other
/// schema field is searched inside the attributes payload.
const SYSTEM_SEARCH_COLUMNS: [&str; 3] =
    [columns::TITLE, columns::ADDED_BY, columns::LAST_EDITED_BY];

/// User-supplied search parameters. The presence of a filter switches the
/// listing into filtered mode even when keyword and date are empty.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Attribute name to search; validated against the resolved schema.
    pub search_field: String,
    /// Substring to match; empty means no keyword clause.
    pub keyword: String,
    /// Lower bound on the add-date.
    pub date_from: Option<NaiveDate>,
}

/// One page of projected rows plus the window that produced it.
#[derive(Debug)]
pub struct ContentPage {
    pub rows: Vec<ProjectedRow>,
    pub window: PageWindow,
}

/// Listing parameters in query-string form, as the HTTP layer hands them
/// over: `channelId` (required), `page` (default 1), `searchType`,
/// `keyword`, `dateFrom`.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub channel_id: ChannelId,
    pub page: u64,
    pub filter: Option<ContentFilter>,
}

impl ListQuery {
    /// Parses decoded query pairs. The presence of `searchType` selects
    /// filtered mode; a malformed `channelId` or `dateFrom` is rejected.
    pub fn from_query_pairs<'a, I>(pairs: I) -> ListingResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params: HashMap<&str, &str> = pairs.into_iter().collect();

        let channel_id = params
            .get("channelId")
            .ok_or_else(|| ListingError::invalid_filter("channelId is required"))?;
        let channel_id = ChannelId::from_str(channel_id)
            .map_err(|_| ListingError::invalid_filter(format!("invalid channelId: {channel_id}")))?;

        let page = params
            .get("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);

        let filter = match params.get("searchType") {
            Some(search_field) => {
                let date_from = match params.get("dateFrom").filter(|d| !d.is_empty()) {
                    Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(
                        |_| ListingError::invalid_filter(format!("invalid dateFrom: {raw}")),
                    )?),
                    None => None,
                };
                Some(ContentFilter {
                    search_field: search_field.to_string(),
                    keyword: params.get("keyword").unwrap_or(&"").to_string(),
                    date_from,
                })
            }
            None => None,
        };

        Ok(Self {
            channel_id,
            page,
            filter,
        })
    }
}

/// The dynamic content listing engine.
///
/// Stateless between requests apart from the shared schema catalog cache;
/// each call resolves its own scope chain, schema snapshot and predicate.
pub struct ListingService {
    directory: Arc<ChannelDirectory>,
    catalog: Arc<AttributeSchemaCatalog>,
    store: ContentStore,
    purge: Option<PurgeQueue>,
}

impl ListingService {
    pub fn new(
        directory: Arc<ChannelDirectory>,
        catalog: Arc<AttributeSchemaCatalog>,
        store: ContentStore,
    ) -> Self {
        Self {
            directory,
            catalog,
            store,
            purge: None,
        }
    }

    /// Attaches the background preview-purge queue.
    #[must_use]
    pub fn with_purge_queue(mut self, purge: PurgeQueue) -> Self {
        self.purge = Some(purge);
        self
    }

    /// Lists one page of a channel's content for a viewer.
    ///
    /// Synchronous within the request: resolve scope → authorize → build
    /// predicate → count → page → project. The only detached side effect is
    /// the preview purge submission, which never blocks or fails the call.
    pub fn list_contents(
        &self,
        site_id: SiteId,
        channel_id: ChannelId,
        viewer: &Viewer,
        filter: Option<&ContentFilter>,
        page: u64,
        page_size: u64,
    ) -> ListingResult<ContentPage> {
        let site = self
            .directory
            .site(site_id)
            .ok_or_else(|| ListingError::NotFound(format!("site {site_id} not found")))?;
        let channel = self.directory.channel_of_site(site_id, channel_id)?;
        let table = self.directory.resolve_table(site_id, channel_id)?;
        let chain = self.directory.scope_chain(channel_id)?;

        // One schema snapshot for the whole call; a concurrent invalidation
        // cannot mix versions within this listing.
        let schema = self.catalog.resolve(&table, &chain);

        let scope = PermissionScope::new(viewer, &chain);
        scope.authorize(&ChannelPermission::ALL)?;
        let owner = scope.owner_restriction();

        if channel.preview_contents {
            if let Some(purge) = &self.purge {
                purge.submit(PurgeTask {
                    table: table.clone(),
                    channel: channel_id,
                });
            }
        }

        let mut builder = PredicateBuilder::for_channels([channel_id]).owned_by(owner);

        if let Some(filter) = filter {
            // Filtered mode only surfaces published rows.
            builder = builder.checked_status(CheckedStatus::CheckedOnly);

            if let Some(date) = filter.date_from {
                builder = builder.date_from(Some(date.and_time(NaiveTime::MIN).and_utc()));
            }

            if !filter.search_field.is_empty() {
                let target = self.search_target(&schema, &filter.search_field)?;
                if !filter.keyword.is_empty() {
                    builder = builder.keyword(target, &filter.keyword);
                }
            } else if !filter.keyword.is_empty() {
                return Err(ListingError::invalid_filter(
                    "a search field is required for keyword search",
                ));
            }
        } else {
            builder = builder.checked_status(CheckedStatus::All);
        }

        let predicate = builder.build()?;
        let total = self.store.count(&table, &predicate)?;
        let window = PageWindow::new(total, page_size, page)?;
        debug!(
            %site_id, %channel_id, %table, total,
            page = window.page_number(),
            filtered = filter.is_some(),
            "listing contents"
        );

        let rows = if window.is_empty() {
            Vec::new()
        } else {
            let records = self.store.page(
                &table,
                &predicate,
                OrderClause::for_order(channel.order),
                window.offset(),
                window.limit(),
                &schema.listing_columns(),
            )?;
            let mut projector = ResultProjector::new(&schema, site, channel, &scope);
            records.iter().map(|r| projector.project(r)).collect()
        };

        Ok(ContentPage { rows, window })
    }

    /// Lists using query-string parameters and the site's configured page
    /// size — the contract consumed by the HTTP layer.
    pub fn list_by_query(
        &self,
        site_id: SiteId,
        query: &ListQuery,
        viewer: &Viewer,
    ) -> ListingResult<ContentPage> {
        let page_size = self
            .directory
            .site(site_id)
            .ok_or_else(|| ListingError::NotFound(format!("site {site_id} not found")))?
            .page_size as u64;
        self.list_contents(
            site_id,
            query.channel_id,
            viewer,
            query.filter.as_ref(),
            query.page,
            page_size,
        )
    }

    /// Validates a search field name against the resolved schema and maps
    /// it to its storage location. An absent or non-searchable name is an
    /// `InvalidFilter`, never a silent fallback to the title field.
    fn search_target(
        &self,
        schema: &siteforge_model::ResolvedSchema,
        field: &str,
    ) -> ListingResult<SearchTarget> {
        let def = schema.get(field).ok_or_else(|| {
            ListingError::invalid_filter(format!("unknown search field: {field}"))
        })?;
        if !def.searchable {
            return Err(ListingError::invalid_filter(format!(
                "field is not searchable: {field}"
            )));
        }
        let name = def.attribute_name.to_lowercase();
        if SYSTEM_SEARCH_COLUMNS.contains(&name.as_str()) {
            Ok(SearchTarget::Column(name))
        } else {
            Ok(SearchTarget::Attribute(name))
        }
    }
}

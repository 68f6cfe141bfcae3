//! SQLite-backed content row storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use siteforge_model::{columns, ContentRecord, PREVIEW_SOURCE_ID};
use siteforge_types::{ChannelId, ContentId};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::predicate::{ensure_identifier, OrderClause, Predicate, SqlParam};

const SYSTEM_COLUMNS: &str = "id, channel_id, title, is_checked, checked_level, is_top, taxis, \
     added_by, last_edited_by, add_date, last_edit_date, source_id, attributes";

/// Store for content rows across any number of physical tables.
///
/// One connection serves the whole store; the listing path runs count and
/// page queries on it, and the background purge worker shares it via clone.
#[derive(Clone)]
pub struct ContentStore {
    conn: Arc<Mutex<Connection>>,
}

impl ContentStore {
    /// Opens (or creates) a content store at the given path.
    pub fn open(path: &str) -> StoreResult<Self> {
        Ok(Self {
            conn: Arc::new(Mutex::new(Connection::open(path)?)),
        })
    }

    /// Opens an in-memory content store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
        })
    }

    /// Creates a physical content table if it does not exist yet.
    ///
    /// Every content table shares the same system columns; channel-specific
    /// fields live in the `attributes` JSON column.
    pub fn init_table(&self, table: &str) -> StoreResult<()> {
        let table = ensure_identifier(table)?;
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                is_checked INTEGER NOT NULL DEFAULT 0,
                checked_level INTEGER NOT NULL DEFAULT 0,
                is_top INTEGER NOT NULL DEFAULT 0,
                taxis INTEGER NOT NULL DEFAULT 0,
                added_by TEXT NOT NULL DEFAULT '',
                last_edited_by TEXT NOT NULL DEFAULT '',
                add_date INTEGER NOT NULL,
                last_edit_date INTEGER NOT NULL,
                source_id INTEGER NOT NULL DEFAULT 0,
                attributes TEXT NOT NULL DEFAULT '{{}}'
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_channel
                ON {table} (channel_id, is_checked, taxis);
            "
        ))?;
        Ok(())
    }

    /// Inserts a row and returns its assigned id.
    pub fn insert(&self, table: &str, record: &ContentRecord) -> StoreResult<ContentId> {
        let table = ensure_identifier(table)?;
        let attributes = serde_json::to_string(&record.attributes)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO {table} (channel_id, title, is_checked, checked_level, is_top, \
                 taxis, added_by, last_edited_by, add_date, last_edit_date, source_id, attributes) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                record.channel_id.as_i32(),
                record.title,
                record.is_checked,
                record.checked_level,
                record.is_top,
                record.taxis,
                record.added_by,
                record.last_edited_by,
                record.add_date.timestamp_millis(),
                record.last_edit_date.timestamp_millis(),
                record.source_id,
                attributes,
            ],
        )?;
        Ok(ContentId::new(conn.last_insert_rowid()))
    }

    /// Counts every row in a table, preview rows included. Maintenance and
    /// monitoring helper; listings always count through a predicate.
    pub fn count_all(&self, table: &str) -> StoreResult<u64> {
        let table = ensure_identifier(table)?;
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Executes the count-only form of a predicate.
    pub fn count(&self, table: &str, predicate: &Predicate) -> StoreResult<u64> {
        let table = ensure_identifier(table)?;
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {}", predicate.sql());
        let count: i64 =
            conn.query_row(&sql, params_from_iter(predicate.params()), |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Executes the page query: same predicate as the count, plus ordering
    /// and a row window.
    ///
    /// `return_attributes` is the minimal attribute-name list for listings;
    /// attribute entries not named there (unbounded text fields in
    /// particular) are dropped during row mapping so projection never sees
    /// them.
    pub fn page(
        &self,
        table: &str,
        predicate: &Predicate,
        order: OrderClause,
        offset: u64,
        limit: u64,
        return_attributes: &[String],
    ) -> StoreResult<Vec<ContentRecord>> {
        let table = ensure_identifier(table)?;
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {SYSTEM_COLUMNS} FROM {table} WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            predicate.sql(),
            order.sql()
        );

        let mut bound: Vec<SqlParam> = predicate.params().to_vec();
        bound.push(SqlParam::Int(limit as i64));
        bound.push(SqlParam::Int(offset as i64));

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(&bound))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(map_record(row, return_attributes)?);
        }
        Ok(out)
    }

    /// Deletes stale preview rows for a channel. Invoked from the
    /// background purge worker, never from the request path.
    pub fn delete_preview_contents(&self, table: &str, channel: ChannelId) -> StoreResult<usize> {
        let table = ensure_identifier(table)?;
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            &format!("DELETE FROM {table} WHERE channel_id = ? AND source_id = ?"),
            params![channel.as_i32(), PREVIEW_SOURCE_ID],
        )?;
        if deleted > 0 {
            debug!(table, %channel, deleted, "purged preview contents");
        }
        Ok(deleted)
    }
}

fn map_record(row: &Row<'_>, return_attributes: &[String]) -> StoreResult<ContentRecord> {
    let attributes_json: String = row.get(columns::ATTRIBUTES)?;
    let mut attributes: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&attributes_json)?;
    attributes.retain(|name, _| return_attributes.iter().any(|a| a == name));

    let add_date: i64 = row.get(columns::ADD_DATE)?;
    let last_edit_date: i64 = row.get(columns::LAST_EDIT_DATE)?;

    Ok(ContentRecord {
        id: ContentId::new(row.get(columns::ID)?),
        channel_id: ChannelId::new(row.get(columns::CHANNEL_ID)?),
        title: row.get(columns::TITLE)?,
        is_checked: row.get(columns::IS_CHECKED)?,
        checked_level: row.get(columns::CHECKED_LEVEL)?,
        is_top: row.get(columns::IS_TOP)?,
        taxis: row.get(columns::TAXIS)?,
        added_by: row.get(columns::ADDED_BY)?,
        last_edited_by: row.get(columns::LAST_EDITED_BY)?,
        add_date: millis_to_datetime(add_date)?,
        last_edit_date: millis_to_datetime(last_edit_date)?,
        source_id: row.get(columns::SOURCE_ID)?,
        attributes,
    })
}

fn millis_to_datetime(millis: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {millis}")))
}

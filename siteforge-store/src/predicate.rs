//! Parameterized filter and ordering construction for listing queries.
//!
//! A [`Predicate`] is an immutable pair of SQL text and bound values, valid
//! for the physical table and scope chain it was built for. Field *names*
//! are checked against an identifier allow-list before they are ever
//! interpolated; field *values* are always bound parameters. The same
//! predicate serves both the count query and the page query (the count
//! query simply omits the ordering).

use chrono::{DateTime, Utc};
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use siteforge_model::{columns, ContentOrder, PREVIEW_SOURCE_ID};
use siteforge_types::{ChannelId, CheckedStatus};

use crate::error::{StoreError, StoreResult};

/// A bound query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Int(v) => v.to_sql(),
            Self::Text(v) => v.to_sql(),
        }
    }
}

/// Where to apply a keyword filter: a system column of the content table,
/// or a named entry in the extensible attributes payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    Column(String),
    Attribute(String),
}

/// An immutable, parameterized filter expression.
#[derive(Debug, Clone)]
pub struct Predicate {
    where_sql: String,
    params: Vec<SqlParam>,
}

impl Predicate {
    /// The expression body, without the `WHERE` keyword.
    pub fn sql(&self) -> &str {
        &self.where_sql
    }

    /// Bound values, in placeholder order.
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// The ordering applied to page queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause(&'static str);

impl OrderClause {
    /// Maps a channel's configured display order to its SQL form.
    #[must_use]
    pub fn for_order(order: ContentOrder) -> Self {
        match order {
            ContentOrder::TopWeightDesc => Self("is_top DESC, taxis DESC, id DESC"),
            ContentOrder::AddDateDesc => Self("is_top DESC, add_date DESC, id DESC"),
        }
    }

    /// The clause body, without the `ORDER BY` keyword.
    pub fn sql(&self) -> &'static str {
        self.0
    }
}

/// Builder translating listing inputs into a [`Predicate`].
#[derive(Debug, Default)]
pub struct PredicateBuilder {
    channels: Vec<ChannelId>,
    checked: CheckedStatus,
    owner: Option<String>,
    date_from: Option<DateTime<Utc>>,
    keyword: Option<(SearchTarget, String)>,
}

impl PredicateBuilder {
    /// Starts a predicate scoped to the given channels.
    pub fn for_channels<I>(channels: I) -> Self
    where
        I: IntoIterator<Item = ChannelId>,
    {
        Self {
            channels: channels.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Applies the tri-state publish-state filter.
    #[must_use]
    pub fn checked_status(mut self, checked: CheckedStatus) -> Self {
        self.checked = checked;
        self
    }

    /// Restricts rows to those added by the given identity. Used for
    /// viewers whose view grant is scoped to their own content.
    #[must_use]
    pub fn owned_by(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    /// Adds a lower bound on the add-date.
    #[must_use]
    pub fn date_from(mut self, from: Option<DateTime<Utc>>) -> Self {
        self.date_from = from;
        self
    }

    /// Adds a keyword filter on exactly one field. The target name must
    /// already be validated against the resolved schema by the caller; the
    /// identifier check here only guards against caller bugs.
    #[must_use]
    pub fn keyword(mut self, target: SearchTarget, keyword: &str) -> Self {
        self.keyword = Some((target, keyword.to_string()));
        self
    }

    /// Assembles the predicate. Preview rows are always excluded.
    pub fn build(self) -> StoreResult<Predicate> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if self.channels.is_empty() {
            clauses.push("1 = 0".to_string());
        } else {
            let placeholders = vec!["?"; self.channels.len()].join(", ");
            clauses.push(format!("{} IN ({placeholders})", columns::CHANNEL_ID));
            params.extend(
                self.channels
                    .iter()
                    .map(|c| SqlParam::Int(i64::from(c.as_i32()))),
            );
        }

        clauses.push(format!("{} <> ?", columns::SOURCE_ID));
        params.push(SqlParam::Int(PREVIEW_SOURCE_ID));

        match self.checked {
            CheckedStatus::All => {}
            CheckedStatus::CheckedOnly => {
                clauses.push(format!("{} = ?", columns::IS_CHECKED));
                params.push(SqlParam::Int(1));
            }
            CheckedStatus::PendingOnly => {
                clauses.push(format!("{} = ?", columns::IS_CHECKED));
                params.push(SqlParam::Int(0));
            }
        }

        if let Some(owner) = self.owner {
            clauses.push(format!("{} = ?", columns::ADDED_BY));
            params.push(SqlParam::Text(owner));
        }

        if let Some(from) = self.date_from {
            clauses.push(format!("{} >= ?", columns::ADD_DATE));
            params.push(SqlParam::Int(from.timestamp_millis()));
        }

        if let Some((target, keyword)) = self.keyword {
            let pattern = format!("%{}%", escape_like(&keyword));
            match target {
                SearchTarget::Column(name) => {
                    let name = ensure_identifier(&name)?;
                    clauses.push(format!("{name} LIKE ? ESCAPE '\\'"));
                    params.push(SqlParam::Text(pattern));
                }
                SearchTarget::Attribute(name) => {
                    let name = ensure_identifier(&name)?;
                    // The JSON path is a bound parameter too; only the
                    // attributes column name is interpolated.
                    clauses.push(format!(
                        "json_extract({}, ?) LIKE ? ESCAPE '\\'",
                        columns::ATTRIBUTES
                    ));
                    params.push(SqlParam::Text(format!("$.{name}")));
                    params.push(SqlParam::Text(pattern));
                }
            }
        }

        Ok(Predicate {
            where_sql: clauses.join(" AND "),
            params,
        })
    }
}

/// Allow-list check for identifiers interpolated into SQL text.
pub(crate) fn ensure_identifier(name: &str) -> StoreResult<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(StoreError::UnsafeIdentifier(name.to_string()))
    }
}

/// Escapes LIKE wildcards in user keywords so they match literally.
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_list_matches_nothing() {
        let p = PredicateBuilder::for_channels([]).build().unwrap();
        assert!(p.sql().starts_with("1 = 0"));
    }

    #[test]
    fn channel_ids_are_bound() {
        let p = PredicateBuilder::for_channels([ChannelId::new(3), ChannelId::new(4)])
            .build()
            .unwrap();
        assert!(p.sql().contains("channel_id IN (?, ?)"));
        assert_eq!(p.params()[0], SqlParam::Int(3));
        assert_eq!(p.params()[1], SqlParam::Int(4));
    }

    #[test]
    fn keyword_value_never_appears_in_sql() {
        let p = PredicateBuilder::for_channels([ChannelId::new(1)])
            .keyword(SearchTarget::Column("title".into()), "'; DROP TABLE x--")
            .build()
            .unwrap();
        assert!(!p.sql().contains("DROP"));
        assert!(p
            .params()
            .iter()
            .any(|v| matches!(v, SqlParam::Text(t) if t.contains("DROP"))));
    }

    #[test]
    fn unsafe_column_name_is_rejected() {
        let err = PredicateBuilder::for_channels([ChannelId::new(1)])
            .keyword(SearchTarget::Column("title; --".into()), "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsafeIdentifier(_)));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let p = PredicateBuilder::for_channels([ChannelId::new(1)])
            .keyword(SearchTarget::Column("title".into()), "50%_off")
            .build()
            .unwrap();
        let bound = p
            .params()
            .iter()
            .find_map(|v| match v {
                SqlParam::Text(t) if t.contains("off") => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(bound, "%50\\%\\_off%");
    }
}

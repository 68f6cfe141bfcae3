//! Row projection: merging raw attribute values with the resolved schema to
//! produce display-ready listing rows.

use crate::permission::{ChannelPermission, PermissionScope};
use chrono::DateTime;
use serde::Serialize;
use siteforge_model::{ChannelInfo, ContentRecord, InputKind, ResolvedSchema, SiteInfo};
use siteforge_types::ContentId;
use std::collections::HashMap;

const TEXT_PREVIEW_CHARS: usize = 50;

/// A content record after merging with the schema: typed, display-ready.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectedRow {
    pub id: ContentId,
    pub title: String,
    /// Site/channel-specific link target for the title.
    pub link: String,
    /// Human-readable publish state derived from the checked flag and level.
    pub state_label: String,
    /// Operations the viewer may perform on this row.
    pub commands: Vec<ContentCommand>,
    /// One formatted value per visible schema field, in schema order.
    pub fields: Vec<ProjectedField>,
}

/// One formatted listing column value.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectedField {
    pub attribute_name: String,
    pub display_name: String,
    pub value: String,
}

/// Capability-gated row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCommand {
    Edit,
    Delete,
    Translate,
}

/// Per-request memo of formatted display values, keyed by attribute name
/// and raw value. Rows in one listing frequently repeat the same dropdown
/// value; the memo avoids re-resolving the label each time. Never shared
/// across requests.
#[derive(Debug, Default)]
pub struct DisplayMemo {
    values: HashMap<(String, String), String>,
}

impl DisplayMemo {
    fn get_or_insert_with<F>(&mut self, name: &str, raw: &str, format: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(v) = self.values.get(&(name.to_string(), raw.to_string())) {
            return v.clone();
        }
        let formatted = format();
        self.values
            .insert((name.to_string(), raw.to_string()), formatted.clone());
        formatted
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// Projects raw content rows through one schema snapshot.
///
/// Holds the schema for the whole listing call, so every projected row uses
/// the same schema version regardless of concurrent invalidations.
pub struct ResultProjector<'a> {
    schema: &'a ResolvedSchema,
    site: &'a SiteInfo,
    channel: &'a ChannelInfo,
    commands: Vec<ContentCommand>,
    memo: DisplayMemo,
}

impl<'a> ResultProjector<'a> {
    pub fn new(
        schema: &'a ResolvedSchema,
        site: &'a SiteInfo,
        channel: &'a ChannelInfo,
        scope: &PermissionScope<'_>,
    ) -> Self {
        let mut commands = Vec::new();
        if scope.can(ChannelPermission::ContentEdit) {
            commands.push(ContentCommand::Edit);
        }
        if scope.can(ChannelPermission::ContentDelete) {
            commands.push(ContentCommand::Delete);
        }
        if scope.can(ChannelPermission::ContentTranslate) {
            commands.push(ContentCommand::Translate);
        }
        Self {
            schema,
            site,
            channel,
            commands,
            memo: DisplayMemo::default(),
        }
    }

    /// Produces the display row for one record.
    pub fn project(&mut self, record: &ContentRecord) -> ProjectedRow {
        let fields = self
            .schema
            .display_fields()
            // The title is rendered as the row link, not as a column.
            .filter(|def| !def.attribute_name.eq_ignore_ascii_case(siteforge_model::columns::TITLE))
            .map(|def| {
                let raw = record
                    .attr(&def.attribute_name)
                    .map(raw_text)
                    .unwrap_or_default();
                let value = if raw.is_empty() {
                    String::new()
                } else {
                    self.memo.get_or_insert_with(&def.attribute_name, &raw, || {
                        format_value(def.input_kind, &raw, def)
                    })
                };
                ProjectedField {
                    attribute_name: def.attribute_name.clone(),
                    display_name: def.display_name.clone(),
                    value,
                }
            })
            .collect();

        ProjectedRow {
            id: record.id,
            title: record.title.clone(),
            link: format!(
                "/sites/{}/channels/{}/contents/{}",
                self.site.id, self.channel.id, record.id
            ),
            state_label: state_label(record.is_checked, record.checked_level),
            commands: self.commands.clone(),
            fields,
        }
    }
}

/// Publish-state indicator derived from the checked flag and level.
pub fn state_label(is_checked: bool, checked_level: i32) -> String {
    if is_checked {
        "Approved".to_string()
    } else if checked_level > 0 {
        format!("Pending review (level {checked_level})")
    } else {
        "Draft".to_string()
    }
}

/// The stored value's canonical text form, used both as memo key and as
/// formatting input.
fn raw_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn format_value(kind: InputKind, raw: &str, def: &siteforge_model::AttributeDefinition) -> String {
    match kind {
        InputKind::Date => format_millis(raw, "%Y-%m-%d"),
        InputKind::DateTime => format_millis(raw, "%Y-%m-%d %H:%M"),
        InputKind::CheckBox => {
            if matches!(raw, "true" | "1") {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        InputKind::Radio | InputKind::SelectOne => def
            .option_label(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string()),
        InputKind::SelectMultiple => raw
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| def.option_label(v).unwrap_or(v).to_string())
            .collect::<Vec<_>>()
            .join(", "),
        InputKind::Text | InputKind::TextArea => truncate(raw, TEXT_PREVIEW_CHARS),
        InputKind::Number | InputKind::Image | InputKind::File | InputKind::TextEditor => {
            raw.to_string()
        }
    }
}

/// Dates are stored as epoch milliseconds; a non-numeric value is shown as-is.
fn format_millis(raw: &str, pattern: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels() {
        assert_eq!(state_label(true, 3), "Approved");
        assert_eq!(state_label(false, 2), "Pending review (level 2)");
        assert_eq!(state_label(false, 0), "Draft");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let long = "é".repeat(60);
        let out = truncate(&long, 50);
        assert_eq!(out.chars().count(), 51); // 50 + ellipsis
    }

    #[test]
    fn millis_formatting_falls_back_to_raw() {
        assert_eq!(format_millis("not-a-number", "%Y-%m-%d"), "not-a-number");
        assert_eq!(format_millis("0", "%Y-%m-%d"), "1970-01-01");
    }

    #[test]
    fn memo_formats_each_value_once() {
        let mut memo = DisplayMemo::default();
        let mut calls = 0;
        let first = memo.get_or_insert_with("category", "2", || {
            calls += 1;
            "Sports".to_string()
        });
        let second = memo.get_or_insert_with("category", "2", || {
            calls += 1;
            "Sports".to_string()
        });
        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(memo.len(), 1);
    }
}

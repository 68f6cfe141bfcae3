use serde::{Deserialize, Serialize};
use siteforge_types::ScopeId;
use std::collections::HashMap;

/// One field of a channel's extensible attribute schema.
///
/// Definitions live at a scope (channel, ancestor channel, site, or system);
/// resolving a schema merges definitions along a scope chain, with the more
/// specific scope winning on name collisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name, unique within a resolved schema (case-insensitive).
    pub attribute_name: String,
    /// Human-readable name shown in list headers and search dropdowns.
    pub display_name: String,
    pub input_kind: InputKind,
    /// Whether the field appears as a column in listings.
    pub visible_in_list: bool,
    /// Whether the field may be chosen as a keyword-search target.
    pub searchable: bool,
    /// Value/label pairs. Only meaningful for option-list kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AttributeOption>,
    /// The scope this definition was found at.
    pub scope: ScopeId,
}

impl AttributeDefinition {
    fn simple(name: &str, display: &str, input_kind: InputKind, scope: ScopeId) -> Self {
        Self {
            attribute_name: name.into(),
            display_name: display.into(),
            input_kind,
            visible_in_list: true,
            searchable: input_kind.default_searchable(),
            options: Vec::new(),
            scope,
        }
    }

    /// Shorthand for a single-line text field.
    pub fn text(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::Text, scope)
    }

    /// Shorthand for a multi-line text field.
    pub fn text_area(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::TextArea, scope)
    }

    /// Shorthand for an unbounded rich-text field. Never searchable and
    /// excluded from listing projections.
    pub fn text_editor(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::TextEditor, scope)
    }

    /// Shorthand for a numeric field.
    pub fn number(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::Number, scope)
    }

    /// Shorthand for a date field.
    pub fn date(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::Date, scope)
    }

    /// Shorthand for a date-and-time field.
    pub fn date_time(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::DateTime, scope)
    }

    /// Shorthand for a yes/no checkbox field.
    pub fn check_box(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::CheckBox, scope)
    }

    /// Shorthand for a single-choice dropdown with fixed options.
    pub fn select_one(
        name: &str,
        display: &str,
        options: Vec<AttributeOption>,
        scope: ScopeId,
    ) -> Self {
        Self {
            options,
            ..Self::simple(name, display, InputKind::SelectOne, scope)
        }
    }

    /// Shorthand for a radio-button group with fixed options.
    pub fn radio(
        name: &str,
        display: &str,
        options: Vec<AttributeOption>,
        scope: ScopeId,
    ) -> Self {
        Self {
            options,
            ..Self::simple(name, display, InputKind::Radio, scope)
        }
    }

    /// Shorthand for an image-reference field.
    pub fn image(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::Image, scope)
    }

    /// Shorthand for a file-attachment field.
    pub fn file(name: &str, display: &str, scope: ScopeId) -> Self {
        Self::simple(name, display, InputKind::File, scope)
    }

    /// Marks the field hidden from listing columns.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible_in_list = false;
        self
    }

    /// Overrides the searchable flag.
    #[must_use]
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Looks up the display label for a stored option value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// A value/label pair for option-list attribute kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
}

impl AttributeOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The input kind of an attribute, driving both search eligibility and how
/// the projector formats stored values for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    TextEditor,
    Number,
    Date,
    DateTime,
    CheckBox,
    Radio,
    SelectOne,
    SelectMultiple,
    Image,
    File,
}

impl InputKind {
    /// Unbounded text kinds are excluded from listing return columns to
    /// bound query payload size.
    #[must_use]
    pub const fn is_unbounded_text(&self) -> bool {
        matches!(self, Self::TextEditor)
    }

    /// Kinds that carry a fixed value/label option list.
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(self, Self::Radio | Self::SelectOne | Self::SelectMultiple)
    }

    const fn default_searchable(&self) -> bool {
        !self.is_unbounded_text()
    }
}

/// The merged field set for one physical table under one scope chain.
///
/// A resolved schema is an immutable value object: the catalog hands out
/// `Arc<ResolvedSchema>` snapshots so one listing call sees exactly one
/// schema version end to end. Attribute names are unique after merging;
/// lookups are case-insensitive because stored column names are lowercased.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    fields: Vec<AttributeDefinition>,
    by_name: HashMap<String, usize>,
}

impl ResolvedSchema {
    /// Merges per-scope definition lists, most specific scope first.
    ///
    /// The first definition seen for a name wins; a broader scope never
    /// merges into or amends a more specific one.
    pub fn merge<I>(per_scope: I) -> Self
    where
        I: IntoIterator<Item = Vec<AttributeDefinition>>,
    {
        let mut fields: Vec<AttributeDefinition> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for scope_fields in per_scope {
            for def in scope_fields {
                let key = def.attribute_name.to_lowercase();
                if by_name.contains_key(&key) {
                    continue;
                }
                by_name.insert(key, fields.len());
                fields.push(def);
            }
        }

        Self { fields, by_name }
    }

    /// All fields in merge order.
    pub fn fields(&self) -> &[AttributeDefinition] {
        &self.fields
    }

    /// Case-insensitive lookup by attribute name.
    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.fields[i])
    }

    /// True when the schema defines the named attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Fields shown as listing columns.
    pub fn display_fields(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.fields
            .iter()
            .filter(|f| f.visible_in_list && !f.input_kind.is_unbounded_text())
    }

    /// Fields eligible as keyword-search targets (the search dropdown).
    pub fn searchable_fields(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// Lowercased attribute names fetched by listing queries, excluding
    /// unbounded text kinds.
    pub fn listing_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !f.input_kind.is_unbounded_text())
            .map(|f| f.attribute_name.to_lowercase())
            .collect()
    }

    /// Number of merged fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

//! Snippet record and the validated field overlay used by create/update.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Maximum allowed length for a snippet title.
pub const TITLE_MAX: usize = 100;

/// Store-assigned snippet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(i64);

impl SnippetId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value used on the wire and as the store key.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The content-affecting fields of a snippet, grouped so the highlight
/// transform and the update overlay operate on one value.
///
/// `language` and `style` hold canonical registry identifiers; callers must
/// resolve raw tokens through the registry before constructing this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetContent {
    pub title: String,
    pub code: String,
    pub line_numbers: bool,
    pub language: String,
    pub style: String,
}

/// Validated field overlay produced by inbound deserialization.
///
/// Absent fields keep their existing (or default) values; each present field
/// overlays only its own counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetDraft {
    pub title: Option<String>,
    pub code: Option<String>,
    pub line_numbers: Option<bool>,
    pub language: Option<String>,
    pub style: Option<String>,
}

impl SnippetDraft {
    /// Build the content for a new record, falling back to the given
    /// defaults for absent fields.
    ///
    /// Returns `None` when `code` is absent; create validation rejects that
    /// case before the service runs.
    pub fn into_new_content(self, default_language: &str, default_style: &str) -> Option<SnippetContent> {
        let Self {
            title,
            code,
            line_numbers,
            language,
            style,
        } = self;
        Some(SnippetContent {
            title: title.unwrap_or_default(),
            code: code?,
            line_numbers: line_numbers.unwrap_or(false),
            language: language.unwrap_or_else(|| default_language.to_owned()),
            style: style.unwrap_or_else(|| default_style.to_owned()),
        })
    }

    /// Overlay the present fields onto existing content.
    pub fn overlay(self, existing: &SnippetContent) -> SnippetContent {
        let Self {
            title,
            code,
            line_numbers,
            language,
            style,
        } = self;
        SnippetContent {
            title: title.unwrap_or_else(|| existing.title.clone()),
            code: code.unwrap_or_else(|| existing.code.clone()),
            line_numbers: line_numbers.unwrap_or(existing.line_numbers),
            language: language.unwrap_or_else(|| existing.language.clone()),
            style: style.unwrap_or_else(|| existing.style.clone()),
        }
    }

    /// True when no field is present, meaning an overlay changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.code.is_none()
            && self.line_numbers.is_none()
            && self.language.is_none()
            && self.style.is_none()
    }
}

/// Persisted snippet record.
///
/// ## Invariants
/// - `id`, `created`, and `owner` are assigned at creation and never change.
/// - `language` and `style` are canonical registry identifiers.
/// - `highlighted` is the transform output for the current content; records
///   are only written with a freshly computed rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    id: SnippetId,
    created: DateTime<Utc>,
    content: SnippetContent,
    owner: User,
    highlighted: String,
}

impl Snippet {
    /// Assemble a record from already-validated parts.
    pub fn new(
        id: SnippetId,
        created: DateTime<Utc>,
        content: SnippetContent,
        owner: User,
        highlighted: String,
    ) -> Self {
        Self {
            id,
            created,
            content,
            owner,
            highlighted,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> SnippetId {
        self.id
    }

    /// Creation timestamp, immutable after the first write.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Content-affecting fields.
    pub fn content(&self) -> &SnippetContent {
        &self.content
    }

    /// Display title; may be empty.
    pub fn title(&self) -> &str {
        &self.content.title
    }

    /// The snippet's source text.
    pub fn code(&self) -> &str {
        &self.content.code
    }

    /// Whether the rendering carries a line-number gutter.
    pub fn line_numbers(&self) -> bool {
        self.content.line_numbers
    }

    /// Canonical language identifier.
    pub fn language(&self) -> &str {
        &self.content.language
    }

    /// Canonical style identifier.
    pub fn style(&self) -> &str {
        &self.content.style
    }

    /// The creating user; sole holder of write rights.
    pub fn owner(&self) -> &User {
        &self.owner
    }

    /// Cached rendering of the current content.
    pub fn highlighted(&self) -> &str {
        &self.highlighted
    }

    /// Produce the successor record for an update: same identity, owner and
    /// creation time, new content and rendering.
    pub fn with_content(&self, content: SnippetContent, highlighted: String) -> Self {
        Self {
            id: self.id,
            created: self.created,
            content,
            owner: self.owner.clone(),
            highlighted,
        }
    }
}

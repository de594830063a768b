//! Snippet wire representations and request validation.
//!
//! Inbound payloads are untyped field maps: every field is optional and the
//! validator decides, per action, what must be present. Validation is not
//! fail-fast — every offending field contributes a message, and the result is
//! a single `invalid_request` error whose details map field names to message
//! lists. Server-assigned fields (`id`, `created`, `owner`, `highlighted`)
//! are never read from input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, HighlightRegistry, Snippet, SnippetDraft, TITLE_MAX};

/// Untyped snippet fields accepted on create and update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct SnippetPayload {
    #[schema(example = "fibonacci")]
    pub title: Option<String>,
    #[schema(example = "def fib(n): ...")]
    pub code: Option<String>,
    pub line_numbers: Option<bool>,
    #[schema(example = "python")]
    pub language: Option<String>,
    #[schema(example = "InspiredGitHub")]
    pub style: Option<String>,
}

/// Structured projection of a snippet record.
///
/// `owner` carries the owning user's username and is read-only: it is never
/// accepted back on input even if present in a request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SnippetBody {
    #[schema(example = 1)]
    pub id: i64,
    pub title: String,
    pub code: String,
    pub line_numbers: bool,
    #[schema(example = "Python")]
    pub language: String,
    #[schema(example = "InspiredGitHub")]
    pub style: String,
    #[schema(example = "ada")]
    pub owner: String,
}

impl From<&Snippet> for SnippetBody {
    fn from(snippet: &Snippet) -> Self {
        Self {
            id: snippet.id().value(),
            title: snippet.title().to_owned(),
            code: snippet.code().to_owned(),
            line_numbers: snippet.line_numbers(),
            language: snippet.language().to_owned(),
            style: snippet.style().to_owned(),
            owner: snippet.owner().username().to_string(),
        }
    }
}

/// Which action the payload is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// `code` is required.
    Create,
    /// Every field is optional; present fields overlay their counterparts.
    Update,
}

#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    fn into_result(self, draft: SnippetDraft) -> Result<SnippetDraft, Error> {
        if self.0.is_empty() {
            return Ok(draft);
        }
        Err(Error::invalid_request("validation failed").with_details(json!(self.0)))
    }
}

/// Validate an untyped payload into a [`SnippetDraft`].
///
/// Language and style tokens are resolved to their canonical registry
/// identifiers so everything downstream of validation works with registry
/// members only.
pub fn validate_payload(
    payload: SnippetPayload,
    registry: &HighlightRegistry,
    mode: ValidationMode,
) -> Result<SnippetDraft, Error> {
    let SnippetPayload {
        title,
        code,
        line_numbers,
        language,
        style,
    } = payload;
    let mut errors = FieldErrors::default();

    if let Some(title) = &title
        && title.chars().count() > TITLE_MAX
    {
        errors.push("title", format!("title must be at most {TITLE_MAX} characters"));
    }

    match (&code, mode) {
        (None, ValidationMode::Create) => errors.push("code", "code is required"),
        (Some(code), _) if code.is_empty() => errors.push("code", "code must not be empty"),
        _ => {}
    }

    let language = language.and_then(|token| {
        let resolved = registry.resolve_language(&token);
        if resolved.is_none() {
            errors.push(
                "language",
                format!("{token:?} is not a recognised language"),
            );
        }
        resolved
    });

    let style = style.and_then(|token| {
        let resolved = registry.resolve_style(&token);
        if resolved.is_none() {
            errors.push("style", format!("{token:?} is not a recognised style"));
        }
        resolved
    });

    errors.into_result(SnippetDraft {
        title,
        code,
        line_numbers,
        language,
        style,
    })
}

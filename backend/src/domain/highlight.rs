//! Highlight registry and rendering transform.
//!
//! The registry wraps syntect's bundled syntax and theme sets and is built
//! once at startup, then shared read-only. Rendering is a pure function of a
//! snippet's content: identical inputs always produce byte-identical markup.

use std::fmt::Write as _;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::domain::{Error, SnippetContent};

/// Failures raised while building the registry.
///
/// Any of these is fatal at startup: the service must not begin serving with
/// an empty or inconsistent registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The bundled syntax set exposes no usable languages.
    #[error("highlighting library provides no languages")]
    NoLanguages,
    /// The bundled theme set exposes no styles.
    #[error("highlighting library provides no styles")]
    NoStyles,
    /// The configured default language token resolves to nothing.
    #[error("default language {token:?} is not a recognised language")]
    UnknownDefaultLanguage { token: String },
    /// The configured default style token resolves to nothing.
    #[error("default style {token:?} is not a recognised style")]
    UnknownDefaultStyle { token: String },
}

/// Immutable enumeration of recognised languages and styles, plus the
/// renderer that consumes them.
#[derive(Debug)]
pub struct HighlightRegistry {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
    languages: Vec<String>,
    styles: Vec<String>,
    default_language: String,
    default_style: String,
}

impl HighlightRegistry {
    /// Build the registry from syntect's bundled definitions, resolving the
    /// configured default tokens to canonical identifiers.
    pub fn from_defaults(
        default_language: &str,
        default_style: &str,
    ) -> Result<Self, RegistryError> {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();

        let mut languages: Vec<String> = syntaxes
            .syntaxes()
            .iter()
            .filter(|syntax| !syntax.hidden)
            .map(|syntax| syntax.name.clone())
            .collect();
        languages.sort();
        languages.dedup();
        if languages.is_empty() {
            return Err(RegistryError::NoLanguages);
        }

        // BTreeMap keys arrive sorted.
        let styles: Vec<String> = themes.themes.keys().cloned().collect();
        if styles.is_empty() {
            return Err(RegistryError::NoStyles);
        }

        let registry = Self {
            syntaxes,
            themes,
            languages,
            styles,
            default_language: String::new(),
            default_style: String::new(),
        };
        let default_language = registry.resolve_language(default_language).ok_or_else(|| {
            RegistryError::UnknownDefaultLanguage {
                token: default_language.to_owned(),
            }
        })?;
        let default_style =
            registry
                .resolve_style(default_style)
                .ok_or_else(|| RegistryError::UnknownDefaultStyle {
                    token: default_style.to_owned(),
                })?;

        Ok(Self {
            default_language,
            default_style,
            ..registry
        })
    }

    /// Ordered canonical language names for presentation.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Ordered style names for presentation.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Canonical identifier applied when a request omits `language`.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Canonical identifier applied when a request omits `style`.
    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    /// Resolve a language token to its canonical name.
    ///
    /// Matching is case-insensitive and also accepts file extensions, the
    /// way lexer aliases do (`py` and `python` both resolve to `Python`).
    pub fn resolve_language(&self, token: &str) -> Option<String> {
        self.syntaxes
            .find_syntax_by_token(token)
            .filter(|syntax| !syntax.hidden)
            .map(|syntax| syntax.name.clone())
    }

    /// Resolve a style token to its canonical name, case-insensitively.
    pub fn resolve_style(&self, token: &str) -> Option<String> {
        self.styles
            .iter()
            .find(|name| name.eq_ignore_ascii_case(token))
            .cloned()
    }

    /// True when `token` names a recognised language.
    pub fn is_valid_language(&self, token: &str) -> bool {
        self.resolve_language(token).is_some()
    }

    /// True when `token` names a recognised style.
    pub fn is_valid_style(&self, token: &str) -> bool {
        self.resolve_style(token).is_some()
    }

    fn syntax_for(&self, language: &str) -> Result<&SyntaxReference, Error> {
        self.syntaxes
            .find_syntax_by_token(language)
            .filter(|syntax| !syntax.hidden)
            .ok_or_else(|| Error::internal(format!("language {language:?} missing from registry")))
    }

    fn theme_for(&self, style: &str) -> Result<&Theme, Error> {
        self.themes
            .themes
            .get(style)
            .ok_or_else(|| Error::internal(format!("style {style:?} missing from registry")))
    }

    /// Render content to a complete standalone HTML document.
    ///
    /// `language` and `style` must already be validated against this
    /// registry; a failed lookup here is a programming error and surfaces as
    /// an internal failure rather than a client error.
    pub fn render(&self, content: &SnippetContent) -> Result<String, Error> {
        let syntax = self.syntax_for(&content.language)?;
        let theme = self.theme_for(&content.style)?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut code_html = String::new();
        let mut line_count = 0usize;
        for line in LinesWithEndings::from(&content.code) {
            let regions = highlighter
                .highlight_line(line, &self.syntaxes)
                .map_err(|err| Error::internal(format!("highlighting failed: {err}")))?;
            let html = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                .map_err(|err| Error::internal(format!("html rendering failed: {err}")))?;
            code_html.push_str(&html);
            line_count += 1;
        }

        Ok(assemble_document(content, theme, &code_html, line_count))
    }
}

fn color_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn assemble_document(
    content: &SnippetContent,
    theme: &Theme,
    code_html: &str,
    line_count: usize,
) -> String {
    let background = theme
        .settings
        .background
        .map_or_else(|| "#ffffff".to_owned(), color_hex);
    let foreground = theme
        .settings
        .foreground
        .map_or_else(|| "#000000".to_owned(), color_hex);

    let document_title = if content.title.is_empty() {
        "snippet".to_owned()
    } else {
        escape_html(&content.title)
    };

    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(doc, "<title>{document_title}</title>");
    doc.push_str("</head>\n");
    let _ = writeln!(
        doc,
        "<body style=\"background-color:{background};color:{foreground};\">"
    );
    if !content.title.is_empty() {
        let _ = writeln!(doc, "<h2>{}</h2>", escape_html(&content.title));
    }
    if content.line_numbers {
        let mut gutter = String::new();
        for number in 1..=line_count {
            let _ = writeln!(gutter, "{number}");
        }
        doc.push_str("<table class=\"highlight\"><tr>");
        let _ = write!(
            doc,
            "<td style=\"text-align:right;padding-right:8px;\"><pre>{gutter}</pre></td>"
        );
        let _ = write!(doc, "<td><pre>{code_html}</pre></td>");
        doc.push_str("</tr></table>\n");
    } else {
        let _ = writeln!(doc, "<pre>{code_html}</pre>");
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

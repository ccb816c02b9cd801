//! Message templates and the catalog that resolves message keys.
//!
//! A template is literal text with `{name}` placeholders:
//! - `{field}` resolves to the reported field name
//! - any other name is looked up in the [`MessageCatalog`]
//! - `{{` and `}}` produce literal braces
//!
//! Catalog text may itself use placeholders (usually `{field}`). It is
//! expanded one level deep; catalog keys inside catalog text stay verbatim.

use crate::constraint::{NOT_BLANK_MESSAGE, NOT_BLANK_MESSAGE_KEY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Placeholder name that resolves to the reported field name.
pub const FIELD_PLACEHOLDER: &str = "field";

// Escaped braces, a closed `{name}`, or a lone brace.
const TEMPLATE_TOKEN_PATTERN: &str = r"\{\{|\}\}|\{([^{}]*)\}|[{}]";

#[allow(clippy::expect_used, reason = "constant pattern compiles")]
static TEMPLATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TEMPLATE_TOKEN_PATTERN).expect("valid template token regex"));

/// A message template attached to a constraint declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplate(Cow<'static, str>);

impl MessageTemplate {
    /// Wrap a static template without allocating.
    #[must_use]
    pub const fn from_static(template: &'static str) -> Self {
        Self(Cow::Borrowed(template))
    }

    /// Wrap an owned or borrowed template.
    pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
        Self(template.into())
    }

    /// Raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the template into literal and placeholder segments.
    pub fn segments(&self) -> Result<Vec<Segment>, TemplateError> {
        parse_segments(&self.0)
    }

    /// Check the template is well formed.
    pub fn check(&self) -> Result<(), TemplateError> {
        self.segments().map(|_| ())
    }

    /// Resolve placeholders for `field` against `catalog`.
    ///
    /// A malformed template renders verbatim.
    #[must_use]
    pub fn render(&self, field: &str, catalog: &MessageCatalog) -> String {
        self.segments().map_or_else(
            |_| self.0.to_string(),
            |segments| render_segments(&segments, field, catalog, true),
        )
    }
}

impl From<&'static str> for MessageTemplate {
    fn from(template: &'static str) -> Self {
        Self::from_static(template)
    }
}

impl From<String> for MessageTemplate {
    fn from(template: String) -> Self {
        Self(Cow::Owned(template))
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A parsed template piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text (escapes already applied).
    Literal(String),
    /// Placeholder name, trimmed.
    Placeholder(String),
}

/// Malformed template error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    /// `{` without a matching `}`.
    UnclosedPlaceholder {
        /// Byte offset of the opening brace.
        offset: usize,
    },
    /// `{` inside a placeholder name.
    NestedPlaceholder {
        /// Byte offset of the outer opening brace.
        offset: usize,
    },
    /// `{}` or a whitespace-only placeholder name.
    EmptyPlaceholder {
        /// Byte offset of the opening brace.
        offset: usize,
    },
    /// `}` that does not close a placeholder and is not escaped.
    StrayClosingBrace {
        /// Byte offset of the brace.
        offset: usize,
    },
}

impl TemplateError {
    /// Byte offset the error points at.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::UnclosedPlaceholder { offset }
            | Self::NestedPlaceholder { offset }
            | Self::EmptyPlaceholder { offset }
            | Self::StrayClosingBrace { offset } => offset,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedPlaceholder { offset } => {
                write!(formatter, "unclosed placeholder at byte {offset}")
            },
            Self::NestedPlaceholder { offset } => {
                write!(formatter, "nested placeholder at byte {offset}")
            },
            Self::EmptyPlaceholder { offset } => {
                write!(formatter, "empty placeholder at byte {offset}")
            },
            Self::StrayClosingBrace { offset } => {
                write!(formatter, "unmatched '}}' at byte {offset}")
            },
        }
    }
}

impl std::error::Error for TemplateError {}

/// Message text keyed by message key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: BTreeMap<String, String>,
}

impl MessageCatalog {
    /// Catalog with no entries (keys stay unresolved).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            messages: BTreeMap::new(),
        }
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(key.into(), text.into());
        self
    }

    /// Overlay entries, replacing existing keys.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, text) in entries {
            self.messages.insert(key.into(), text.into());
        }
    }

    /// Look up the text for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::empty().with_message(NOT_BLANK_MESSAGE_KEY, NOT_BLANK_MESSAGE)
    }
}

fn parse_segments(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut cursor = 0;

    for token in TEMPLATE_TOKEN_RE.captures_iter(input) {
        let Some(whole) = token.get(0) else {
            continue;
        };
        let offset = whole.start();
        literal.push_str(input.get(cursor..offset).unwrap_or_default());
        cursor = whole.end();

        if let Some(name) = token.get(1) {
            let name = name.as_str().trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyPlaceholder { offset });
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(name.to_owned()));
            continue;
        }

        match whole.as_str() {
            "{{" => literal.push('{'),
            "}}" => literal.push('}'),
            "}" => return Err(TemplateError::StrayClosingBrace { offset }),
            _ => return Err(open_brace_error(input, offset)),
        }
    }

    literal.push_str(input.get(cursor..).unwrap_or_default());
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

// A lone `{` either never closes or opens another placeholder before closing.
fn open_brace_error(input: &str, offset: usize) -> TemplateError {
    let rest = input.get(offset + 1..).unwrap_or_default();
    match rest.chars().find(|ch| matches!(ch, '{' | '}')) {
        Some('{') => TemplateError::NestedPlaceholder { offset },
        _ => TemplateError::UnclosedPlaceholder { offset },
    }
}

fn render_segments(
    segments: &[Segment],
    field: &str,
    catalog: &MessageCatalog,
    expand_catalog: bool,
) -> String {
    let mut output = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(name) if name == FIELD_PLACEHOLDER => output.push_str(field),
            Segment::Placeholder(name) => match catalog.get(name) {
                Some(text) if expand_catalog => match parse_segments(text) {
                    Ok(inner) => output.push_str(&render_segments(&inner, field, catalog, false)),
                    Err(_) => output.push_str(text),
                },
                _ => {
                    output.push('{');
                    output.push_str(name);
                    output.push('}');
                },
            },
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_resolves_through_default_catalog() {
        let template = MessageTemplate::from_static("{fieldcheck.constraints.NullableNotBlank.message}");
        assert_eq!(
            template.render("title", &MessageCatalog::default()),
            "must not be blank"
        );
    }

    #[test]
    fn field_placeholder_is_substituted() {
        let template = MessageTemplate::from_static("{field} must have content");
        assert_eq!(
            template.render("label", &MessageCatalog::empty()),
            "label must have content"
        );
    }

    #[test]
    fn catalog_text_may_reference_field() {
        let catalog = MessageCatalog::empty().with_message("custom.key", "{ field } is blank");
        let template = MessageTemplate::from_static("{custom.key}!");
        assert_eq!(template.render("title", &catalog), "title is blank!");
    }

    #[test]
    fn catalog_expansion_stops_after_one_level() {
        let catalog = MessageCatalog::empty()
            .with_message("a", "see {b}")
            .with_message("b", "never reached");
        let template = MessageTemplate::from_static("{a}");
        assert_eq!(template.render("x", &catalog), "see {b}");
    }

    #[test]
    fn unknown_keys_stay_verbatim() {
        let template = MessageTemplate::from_static("{missing.key}");
        assert_eq!(
            template.render("title", &MessageCatalog::empty()),
            "{missing.key}"
        );
    }

    #[test]
    fn escaped_braces_render_literally() {
        let template = MessageTemplate::from_static("{{{field}}}");
        assert_eq!(template.render("title", &MessageCatalog::empty()), "{title}");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert_eq!(
            MessageTemplate::from_static("value {field").check(),
            Err(TemplateError::UnclosedPlaceholder { offset: 6 })
        );
        assert_eq!(
            MessageTemplate::from_static("a {b {c}}").check(),
            Err(TemplateError::NestedPlaceholder { offset: 2 })
        );
        assert_eq!(
            MessageTemplate::from_static("empty {  }").check(),
            Err(TemplateError::EmptyPlaceholder { offset: 6 })
        );
        assert_eq!(
            MessageTemplate::from_static("oops }").check(),
            Err(TemplateError::StrayClosingBrace { offset: 5 })
        );
    }

    #[test]
    fn error_offsets_are_byte_positions() {
        assert_eq!(
            MessageTemplate::from_static("é {x").check(),
            Err(TemplateError::UnclosedPlaceholder { offset: 3 })
        );
        assert_eq!(
            MessageTemplate::from_static("{{x}").check(),
            Err(TemplateError::StrayClosingBrace { offset: 3 })
        );
    }

    #[test]
    fn segments_merge_escapes_into_literal_runs() -> Result<(), TemplateError> {
        let segments = MessageTemplate::from_static("a {{b}} { field }.").segments()?;
        assert_eq!(
            segments,
            vec![
                Segment::Literal("a {b} ".to_owned()),
                Segment::Placeholder("field".to_owned()),
                Segment::Literal(".".to_owned()),
            ]
        );
        Ok(())
    }

    #[test]
    fn malformed_template_renders_verbatim() {
        let template = MessageTemplate::from_static("broken {field");
        assert_eq!(
            template.render("title", &MessageCatalog::default()),
            "broken {field"
        );
    }

    #[test]
    fn catalog_extend_overrides_defaults() {
        let mut catalog = MessageCatalog::default();
        catalog.extend([(NOT_BLANK_MESSAGE_KEY, "darf nicht leer sein")]);
        assert_eq!(catalog.get(NOT_BLANK_MESSAGE_KEY), Some("darf nicht leer sein"));
        assert_eq!(catalog, MessageCatalog::empty().with_message(NOT_BLANK_MESSAGE_KEY, "darf nicht leer sein"));
    }
}

//! Front-matter parsing
//!
//! The header is a YAML-like block between two `---` lines at the very top
//! of a markdown file. Only flat `key: value` lines are understood; a value
//! written as `[a, b, c]` is a list.

use indexmap::IndexMap;
use std::borrow::Cow;

use super::post::{FieldValue, PostBuilder};
use super::{MetadataExtractor, Parsed, PostDescriptor};
use crate::error::ContentError;
use crate::helpers::{file_stem, parse_date};

/// Keys with a dedicated field on the metadata model
const KNOWN_KEYS: [&str; 6] = ["title", "date", "author", "summary", "image", "tags"];

/// Key/value pairs from a front-matter header, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Split a document into its header and body
    ///
    /// Returns `None` when the document has no header block. The body is
    /// everything after the closing delimiter line.
    pub fn parse(content: &str) -> Option<(Self, &str)> {
        let (header, body) = split_header(content)?;
        Some((Self::parse_header(header), body))
    }

    /// Parse the lines between the delimiters
    ///
    /// Lines without a colon or with an empty key are skipped; a repeated
    /// key keeps its last value.
    pub fn parse_header(header: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in header.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            // Re-inserting keeps the first position but takes the new value
            fields.insert(key.to_string(), parse_value(value.trim()));
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar value of a key; lists are joined with `", "`
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(FieldValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize back to `key: value` lines, lists as `[a, b]`
    pub fn to_header(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            match value {
                FieldValue::Text(s) => out.push_str(&format!("{}: {}\n", key, quote(s))),
                FieldValue::List(items) => {
                    let items: Vec<_> = items.iter().map(|item| quote(item)).collect();
                    out.push_str(&format!("{}: [{}]\n", key, items.join(", ")))
                }
            }
        }
        out
    }

    /// Wrap [`to_header`](Self::to_header) in delimiters, ready to prepend to a body
    pub fn to_block(&self) -> String {
        format!("---\n{}---\n", self.to_header())
    }

    pub fn insert(&mut self, key: &str, value: FieldValue) {
        self.fields.insert(key.to_string(), value);
    }
}

/// Locate the header block, returning `(header, body)`
///
/// Both delimiters are lines holding only `---`, surrounding whitespace
/// allowed; the opening one must be the first line.
fn split_header(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let first_end = content.find('\n')?;
    if content[..first_end].trim() != "---" {
        return None;
    }

    let header_start = first_end + 1;
    let mut line_start = header_start;

    while line_start <= content.len() {
        let rest = &content[line_start..];
        let (line, next) = match rest.find('\n') {
            Some(i) => (&rest[..i], line_start + i + 1),
            None => (rest, content.len()),
        };

        if line.trim() == "---" {
            let header = &content[header_start..line_start];
            let header = header.strip_suffix('\n').unwrap_or(header);
            let header = header.strip_suffix('\r').unwrap_or(header);
            return Some((header, &content[next..]));
        }

        if next >= content.len() {
            break;
        }
        line_start = next;
    }

    None
}

/// Interpret one trimmed value: `[a, b]` is a list, anything else text
fn parse_value(value: &str) -> FieldValue {
    if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
        let inner = &value[1..value.len() - 1];
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        FieldValue::List(items)
    } else {
        FieldValue::Text(unquote(value).to_string())
    }
}

/// Drop one pair of matching surrounding quotes
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Wrap a value in double quotes when it would not read back as written
fn quote(s: &str) -> Cow<'_, str> {
    let ambiguous = s.starts_with(['[', '"', '\'']) || s.trim() != s;
    if ambiguous {
        Cow::Owned(format!("\"{}\"", s))
    } else {
        Cow::Borrowed(s)
    }
}

/// Extraction strategy for markdown sources
#[derive(Debug, Clone)]
pub struct FrontMatterParser {
    owner: String,
}

impl FrontMatterParser {
    /// `owner` is the site owner, the default author
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
        }
    }

    /// Parse a markdown document; `label` names it in diagnostics and
    /// supplies the slug when the caller has none
    pub fn parse(&self, raw: &str, label: &str) -> Parsed {
        let descriptor = PostDescriptor {
            slug: file_stem(label).to_string(),
            language: crate::i18n::Language::FALLBACK,
            source: label.to_string(),
            kind: super::SourceKind::Markdown,
        };
        self.extract(raw, &descriptor)
    }
}

impl MetadataExtractor for FrontMatterParser {
    fn extract(&self, raw: &str, descriptor: &PostDescriptor) -> Parsed {
        let builder = PostBuilder::new(descriptor.language, &descriptor.slug, &self.owner)
            .source(descriptor.source.as_str());

        let Some((fm, body)) = FrontMatter::parse(raw) else {
            return Parsed {
                post: builder.content(raw).build(),
                diagnostics: vec![ContentError::MalformedHeader(descriptor.source.clone())],
            };
        };

        let mut diagnostics = Vec::new();
        let mut builder = builder.content(body);

        if let Some(title) = fm.text("title") {
            builder = builder.title(title);
        }
        if let Some(author) = fm.text("author") {
            builder = builder.author(author);
        }
        if let Some(summary) = fm.text("summary") {
            builder = builder.summary(summary);
        }
        if let Some(image) = fm.text("image") {
            builder = builder.image(image);
        }
        if let Some(tags) = fm.get("tags") {
            builder = builder.tags(tags.as_list());
        }
        if let Some(value) = fm.text("date") {
            match parse_date(&value) {
                Some(date) => builder = builder.date(date),
                None => diagnostics.push(ContentError::UnparseableDate {
                    value,
                    source_label: descriptor.source.clone(),
                }),
            }
        }

        for (key, value) in &fm.fields {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                builder = builder.extra(key, value.clone());
            }
        }

        Parsed {
            post: builder.build(),
            diagnostics,
        }
    }
}

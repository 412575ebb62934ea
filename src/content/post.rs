//! Post metadata model

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::helpers::{display_date, today};
use crate::i18n::Language;

/// Title used when none can be recovered
pub const DEFAULT_TITLE: &str = "Untitled Post";

/// Summary used when none can be recovered
pub const DEFAULT_SUMMARY: &str = "No summary available";

/// Tag shown for posts without tags
pub const DEFAULT_TAG: &str = "Blog";

/// A raw header value: scalar text or a bracketed list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The value as one string, list items joined with `", "`
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// The value as a list, a non-empty scalar being a single item
    pub fn as_list(&self) -> Vec<String> {
        match self {
            FieldValue::Text(s) if s.is_empty() => Vec::new(),
            FieldValue::Text(s) => vec![s.clone()],
            FieldValue::List(items) => items.clone(),
        }
    }
}

/// Metadata and body of one language variant of a post
///
/// Built once per fetch through [`PostBuilder`] and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetadata {
    title: String,
    date: NaiveDate,
    author: String,
    summary: String,
    image: Option<String>,
    tags: Vec<String>,
    /// Markdown body, absent when read from a rendered page
    content: Option<String>,
    language: Language,
    slug: String,
    /// Path the metadata was read from
    source: String,
    /// Header keys with no dedicated field
    extra: IndexMap<String, FieldValue>,
}

impl PostMetadata {
    pub fn builder(language: Language, slug: &str, owner: &str) -> PostBuilder {
        PostBuilder::new(language, slug, owner)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// First tag, or `"Blog"` for untagged posts
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or(DEFAULT_TAG)
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn extra(&self) -> &IndexMap<String, FieldValue> {
        &self.extra
    }

    /// Date formatted for the post's own language
    pub fn display_date(&self) -> String {
        display_date(&self.date, self.language)
    }
}

/// Collects recovered fields and applies defaults for the rest
///
/// Empty strings count as missing, so a blank `title:` line still yields
/// the default title.
#[derive(Debug, Clone)]
pub struct PostBuilder {
    language: Language,
    slug: String,
    owner: String,
    title: Option<String>,
    date: Option<NaiveDate>,
    author: Option<String>,
    summary: Option<String>,
    image: Option<String>,
    tags: Vec<String>,
    content: Option<String>,
    source: String,
    extra: IndexMap<String, FieldValue>,
}

impl PostBuilder {
    /// `owner` is the site owner, the default author
    pub fn new(language: Language, slug: &str, owner: &str) -> Self {
        Self {
            language,
            slug: slug.to_string(),
            owner: owner.to_string(),
            title: None,
            date: None,
            author: None,
            summary: None,
            image: None,
            tags: Vec::new(),
            content: None,
            source: String::new(),
            extra: IndexMap::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = non_empty(author.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = non_empty(summary.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = non_empty(image.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn extra(mut self, key: &str, value: FieldValue) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> PostMetadata {
        PostMetadata {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: self.date.unwrap_or_else(today),
            author: self.author.unwrap_or(self.owner),
            summary: self.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            image: self.image,
            tags: self.tags,
            content: self.content,
            language: self.language,
            slug: self.slug,
            source: self.source,
            extra: self.extra,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

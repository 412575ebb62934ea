//! Post catalog: the fixed list of known posts per language
//!
//! Posts are never discovered by scanning; the catalog is configuration
//! data read from `_config.yml`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{CatalogEntry, SiteConfig};
use crate::error::ConfigError;
use crate::helpers::{html_path, markdown_path};
use crate::i18n::Language;

/// Format of a post source file, selecting the extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Markdown with a front-matter header
    #[default]
    Markdown,
    /// Pre-rendered post page
    Html,
}

impl SourceKind {
    /// Guess the kind from a file extension, markdown unless `.html`/`.htm`
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".html") || lower.ends_with(".htm") {
            SourceKind::Html
        } else {
            SourceKind::Markdown
        }
    }
}

/// Where one language variant of a post lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDescriptor {
    pub slug: String,
    pub language: Language,
    /// Path handed to the fetcher
    pub source: String,
    pub kind: SourceKind,
}

impl PostDescriptor {
    /// Markdown variant at `<base>/<language>/<slug>.md`
    pub fn markdown(base: &str, language: Language, slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            language,
            source: markdown_path(base, language.code(), slug),
            kind: SourceKind::Markdown,
        }
    }

    /// Rendered variant at `<base>/<slug>_<language>.html`
    pub fn html(base: &str, language: Language, slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            language,
            source: html_path(base, language.code(), slug),
            kind: SourceKind::Html,
        }
    }

    /// Resolve a configured entry against the site's naming convention
    fn from_entry(config: &SiteConfig, language: Language, entry: &CatalogEntry) -> Self {
        let kind = entry.kind.unwrap_or_else(|| {
            entry
                .source
                .as_deref()
                .map(SourceKind::from_path)
                .unwrap_or_default()
        });

        match (&entry.source, kind) {
            (Some(source), _) => Self {
                slug: entry.slug.clone(),
                language,
                source: source.clone(),
                kind,
            },
            (None, SourceKind::Markdown) => Self::markdown(&config.blog_path, language, &entry.slug),
            (None, SourceKind::Html) => Self::html(&config.html_blog_path, language, &entry.slug),
        }
    }
}

/// Known posts per language, in catalog order
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    entries: IndexMap<Language, Vec<PostDescriptor>>,
}

impl PostCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from the `catalog:` section of the site config
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for (language, entries) in &config.catalog {
            for entry in entries {
                catalog.insert(PostDescriptor::from_entry(config, *language, entry))?;
            }
        }

        tracing::debug!(
            "Catalog loaded: {}",
            catalog
                .entries
                .iter()
                .map(|(lang, posts)| format!("{}={}", lang, posts.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(catalog)
    }

    /// Append a post; slugs are unique within a language
    pub fn insert(&mut self, descriptor: PostDescriptor) -> Result<(), ConfigError> {
        let posts = self.entries.entry(descriptor.language).or_default();
        if posts.iter().any(|p| p.slug == descriptor.slug) {
            return Err(ConfigError::DuplicateSlug {
                language: descriptor.language.to_string(),
                slug: descriptor.slug,
            });
        }
        posts.push(descriptor);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, descriptor: PostDescriptor) -> Result<Self, ConfigError> {
        self.insert(descriptor)?;
        Ok(self)
    }

    /// Posts of one language, in catalog order
    pub fn posts(&self, language: Language) -> &[PostDescriptor] {
        self.entries
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up one language variant of a post
    pub fn find(&self, language: Language, slug: &str) -> Option<&PostDescriptor> {
        self.posts(language).iter().find(|p| p.slug == slug)
    }

    /// Languages with at least one post
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.entries
            .iter()
            .filter(|(_, posts)| !posts.is_empty())
            .map(|(lang, _)| *lang)
    }

    /// Total number of language variants
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

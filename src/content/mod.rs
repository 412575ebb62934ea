//! Content module - post metadata, the catalog, and the two extraction
//! strategies that turn fetched text into [`PostMetadata`]

mod catalog;
mod extract;
mod frontmatter;
mod markdown;
mod post;

pub use catalog::{PostCatalog, PostDescriptor, SourceKind};
pub use extract::HtmlExtractor;
pub use frontmatter::{FrontMatter, FrontMatterParser};
pub use markdown::MarkdownRenderer;
pub use post::{FieldValue, PostBuilder, PostMetadata, DEFAULT_SUMMARY, DEFAULT_TAG, DEFAULT_TITLE};

use crate::config::SiteConfig;
use crate::error::ContentError;

/// Metadata recovered from one document plus the non-fatal problems met
#[derive(Debug, Clone)]
pub struct Parsed {
    pub post: PostMetadata,
    pub diagnostics: Vec<ContentError>,
}

/// A strategy turning raw fetched text into post metadata
///
/// Extraction never fails: unrecoverable fields take their defaults and
/// the problem is reported in [`Parsed::diagnostics`].
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, raw: &str, descriptor: &PostDescriptor) -> Parsed;
}

/// Both extraction strategies, selected by a descriptor's [`SourceKind`]
#[derive(Debug, Clone)]
pub struct Extractors {
    markdown: FrontMatterParser,
    html: HtmlExtractor,
}

impl Extractors {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            markdown: FrontMatterParser::new(&config.author),
            html: HtmlExtractor::new(&config.author, &config.title),
        }
    }

    pub fn for_kind(&self, kind: SourceKind) -> &dyn MetadataExtractor {
        match kind {
            SourceKind::Markdown => &self.markdown,
            SourceKind::Html => &self.html,
        }
    }

    /// Extract with the strategy matching the descriptor, logging diagnostics
    pub fn extract(&self, raw: &str, descriptor: &PostDescriptor) -> PostMetadata {
        let parsed = self.for_kind(descriptor.kind).extract(raw, descriptor);
        for diagnostic in &parsed.diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        parsed.post
    }
}

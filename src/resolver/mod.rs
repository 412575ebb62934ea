//! Language resolution with fallback to English
//!
//! A post is looked up in the requested language first; when that variant
//! is missing from the catalog or cannot be fetched, the English variant is
//! served instead and the result is flagged as a fallback. Resolution never
//! fails: "no post" is an ordinary `None`.

use futures::future::join_all;

use crate::content::{Extractors, PostCatalog, PostDescriptor, PostMetadata};
use crate::fetch::Fetcher;
use crate::i18n::Language;

/// A post ready for the detail view
#[derive(Debug, Clone)]
pub struct Resolved {
    pub post: PostMetadata,
    /// Language the reader asked for
    pub requested: Language,
    /// True when the English variant stands in for the requested one
    pub fallback: bool,
}

/// Posts ready for the listing view, newest first
#[derive(Debug, Clone)]
pub struct Listing {
    pub posts: Vec<PostMetadata>,
    pub requested: Language,
    /// Language the posts are actually in
    pub language: Language,
    pub fallback: bool,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Resolves catalog entries to parsed posts
pub struct Resolver {
    catalog: PostCatalog,
    fetcher: Box<dyn Fetcher>,
    extractors: Extractors,
}

impl Resolver {
    pub fn new(catalog: PostCatalog, fetcher: Box<dyn Fetcher>, extractors: Extractors) -> Self {
        Self {
            catalog,
            fetcher,
            extractors,
        }
    }

    pub fn catalog(&self) -> &PostCatalog {
        &self.catalog
    }

    /// Resolve one post for the detail view
    pub async fn resolve(&self, slug: &str, requested: Language) -> Option<Resolved> {
        if let Some(post) = self.load_variant(slug, requested).await {
            return Some(Resolved {
                post,
                requested,
                fallback: false,
            });
        }

        if requested.is_fallback() {
            tracing::info!("Post {} not found", slug);
            return None;
        }

        tracing::info!(
            "Post {} unavailable in {}, falling back to {}",
            slug,
            requested,
            Language::FALLBACK
        );
        match self.load_variant(slug, Language::FALLBACK).await {
            Some(post) => Some(Resolved {
                post,
                requested,
                fallback: true,
            }),
            None => {
                tracing::info!("Post {} not found", slug);
                None
            }
        }
    }

    /// Resolve every catalog entry for the listing view
    ///
    /// Entries that fail are dropped. When nothing at all resolves in the
    /// requested language, the English listing is served as a fallback.
    pub async fn list(&self, requested: Language) -> Listing {
        let posts = self.load_language(requested).await;
        if !posts.is_empty() || requested.is_fallback() {
            return Listing {
                posts,
                requested,
                language: requested,
                fallback: false,
            };
        }

        tracing::info!(
            "No posts in {}, falling back to {}",
            requested,
            Language::FALLBACK
        );
        Listing {
            posts: self.load_language(Language::FALLBACK).await,
            requested,
            language: Language::FALLBACK,
            fallback: true,
        }
    }

    async fn load_variant(&self, slug: &str, language: Language) -> Option<PostMetadata> {
        let Some(descriptor) = self.catalog.find(language, slug) else {
            tracing::debug!("{} is not in the {} catalog", slug, language);
            return None;
        };
        self.load(descriptor).await
    }

    /// Fetch every post of one language concurrently, newest first
    async fn load_language(&self, language: Language) -> Vec<PostMetadata> {
        let descriptors = self.catalog.posts(language);
        let results = join_all(descriptors.iter().map(|d| self.load(d))).await;

        let mut posts: Vec<PostMetadata> = results.into_iter().flatten().collect();
        // Stable: equal dates keep catalog order
        posts.sort_by(|a, b| b.date().cmp(&a.date()));

        tracing::debug!(
            "Resolved {}/{} {} posts",
            posts.len(),
            descriptors.len(),
            language
        );
        posts
    }

    async fn load(&self, descriptor: &PostDescriptor) -> Option<PostMetadata> {
        match self.fetcher.fetch(&descriptor.source).await {
            Ok(raw) => Some(self.extractors.extract(&raw, descriptor)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}", e);
                None
            }
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    /// Serves documents from memory; paths listed in `broken` fail
    #[derive(Default)]
    struct MemoryFetcher {
        files: HashMap<String, String>,
        broken: Vec<String>,
    }

    impl MemoryFetcher {
        fn with(mut self, path: &str, body: &str) -> Self {
            self.files.insert(path.to_string(), body.to_string());
            self
        }

        fn broken(mut self, path: &str) -> Self {
            self.broken.push(path.to_string());
            self
        }
    }

    #[async_trait]
    impl Fetcher for MemoryFetcher {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            if self.broken.iter().any(|p| p == path) {
                return Err(FetchError::failure(path, "connection reset"));
            }
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(path.to_string()))
        }
    }

    fn markdown(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\nBody of {}\n", title, date, title)
    }

    fn md(lang: Language, slug: &str) -> PostDescriptor {
        PostDescriptor::markdown("blogs", lang, slug)
    }

    fn resolver(catalog: PostCatalog, fetcher: MemoryFetcher) -> Resolver {
        Resolver::new(
            catalog,
            Box::new(fetcher),
            Extractors::new(&SiteConfig::default()),
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_requested_language() {
        let catalog = PostCatalog::new()
            .with(md(Language::ZhTw, "250415"))
            .unwrap();
        let fetcher = MemoryFetcher::default().with("blogs/zh-tw/250415.md", &markdown("中文", "2025-04-15"));

        let resolved = resolver(catalog, fetcher)
            .resolve("250415", Language::ZhTw)
            .await
            .unwrap();
        assert!(!resolved.fallback);
        assert_eq!(resolved.post.title(), "中文");
        assert_eq!(resolved.post.language(), Language::ZhTw);
    }

    #[tokio::test]
    async fn test_falls_back_when_missing_from_catalog() {
        let catalog = PostCatalog::new().with(md(Language::En, "250415")).unwrap();
        let fetcher = MemoryFetcher::default().with("blogs/en/250415.md", &markdown("English", "2025-04-15"));

        let resolved = resolver(catalog, fetcher)
            .resolve("250415", Language::ZhTw)
            .await
            .unwrap();
        assert!(resolved.fallback);
        assert_eq!(resolved.requested, Language::ZhTw);
        assert_eq!(resolved.post.language(), Language::En);
        assert_eq!(resolved.post.title(), "English");
    }

    #[tokio::test]
    async fn test_falls_back_when_fetch_fails() {
        let catalog = PostCatalog::new()
            .with(md(Language::En, "a"))
            .unwrap()
            .with(md(Language::ZhTw, "a"))
            .unwrap();
        let fetcher = MemoryFetcher::default()
            .with("blogs/en/a.md", &markdown("English", "2025-04-15"))
            .broken("blogs/zh-tw/a.md");

        let resolved = resolver(catalog, fetcher)
            .resolve("a", Language::ZhTw)
            .await
            .unwrap();
        assert!(resolved.fallback);
        assert_eq!(resolved.post.title(), "English");
    }

    #[tokio::test]
    async fn test_catalogued_but_missing_file_falls_back() {
        let catalog = PostCatalog::new()
            .with(md(Language::En, "a"))
            .unwrap()
            .with(md(Language::ZhTw, "a"))
            .unwrap();
        let fetcher = MemoryFetcher::default().with("blogs/en/a.md", &markdown("English", "2025-04-15"));

        let resolved = resolver(catalog, fetcher)
            .resolve("a", Language::ZhTw)
            .await
            .unwrap();
        assert!(resolved.fallback);
    }

    #[tokio::test]
    async fn test_english_missing_is_no_post() {
        let catalog = PostCatalog::new().with(md(Language::ZhTw, "a")).unwrap();
        let fetcher = MemoryFetcher::default().with("blogs/zh-tw/a.md", &markdown("中文", "2025-04-15"));
        let resolver = resolver(catalog, fetcher);

        assert!(resolver.resolve("a", Language::En).await.is_none());
        assert!(resolver.resolve("missing", Language::ZhTw).await.is_none());
    }

    #[tokio::test]
    async fn test_html_sources_use_html_extractor() {
        let catalog = PostCatalog::new()
            .with(PostDescriptor::html("html_blogs", Language::En, "a"))
            .unwrap();
        let page = r#"<h1 class="post-title">Rendered</h1><div class="post-date">April 15, 2025</div>"#;
        let fetcher = MemoryFetcher::default().with("html_blogs/a_en.html", page);

        let resolved = resolver(catalog, fetcher)
            .resolve("a", Language::En)
            .await
            .unwrap();
        assert_eq!(resolved.post.title(), "Rendered");
        assert_eq!(resolved.post.date(), ymd(2025, 4, 15));
        assert_eq!(resolved.post.tags(), ["Blog"]);
        assert_eq!(resolved.post.content(), None);
    }

    #[tokio::test]
    async fn test_listing_sorted_newest_first() {
        let catalog = PostCatalog::new()
            .with(md(Language::En, "old"))
            .unwrap()
            .with(md(Language::En, "new"))
            .unwrap();
        let fetcher = MemoryFetcher::default()
            .with("blogs/en/old.md", &markdown("Old", "2024-01-01"))
            .with("blogs/en/new.md", &markdown("New", "2025-04-15"));

        let listing = resolver(catalog, fetcher).list(Language::En).await;
        assert!(!listing.fallback);
        let dates: Vec<_> = listing.posts.iter().map(|p| p.date()).collect();
        assert_eq!(dates, vec![ymd(2025, 4, 15), ymd(2024, 1, 1)]);
    }

    #[tokio::test]
    async fn test_listing_ties_keep_catalog_order() {
        let catalog = PostCatalog::new()
            .with(md(Language::En, "first"))
            .unwrap()
            .with(md(Language::En, "second"))
            .unwrap()
            .with(md(Language::En, "third"))
            .unwrap();
        let fetcher = MemoryFetcher::default()
            .with("blogs/en/first.md", &markdown("First", "2024-05-01"))
            .with("blogs/en/second.md", &markdown("Second", "2024-05-01"))
            .with("blogs/en/third.md", &markdown("Third", "2024-06-01"));

        let listing = resolver(catalog, fetcher).list(Language::En).await;
        let titles: Vec<_> = listing.posts.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second"]);
    }

    #[tokio::test]
    async fn test_listing_drops_failures() {
        let catalog = PostCatalog::new()
            .with(md(Language::ZhTw, "ok"))
            .unwrap()
            .with(md(Language::ZhTw, "gone"))
            .unwrap()
            .with(md(Language::ZhTw, "broken"))
            .unwrap();
        let fetcher = MemoryFetcher::default()
            .with("blogs/zh-tw/ok.md", &markdown("好", "2025-01-01"))
            .broken("blogs/zh-tw/broken.md");

        let listing = resolver(catalog, fetcher).list(Language::ZhTw).await;
        assert!(!listing.fallback);
        assert_eq!(listing.posts.len(), 1);
        assert_eq!(listing.posts[0].slug(), "ok");
    }

    #[tokio::test]
    async fn test_empty_listing_falls_back_to_english() {
        let catalog = PostCatalog::new()
            .with(md(Language::En, "a"))
            .unwrap()
            .with(md(Language::ZhTw, "a"))
            .unwrap();
        let fetcher = MemoryFetcher::default().with("blogs/en/a.md", &markdown("English", "2025-04-15"));

        let listing = resolver(catalog, fetcher).list(Language::ZhTw).await;
        assert!(listing.fallback);
        assert_eq!(listing.language, Language::En);
        assert_eq!(listing.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_nothing() {
        let listing = resolver(PostCatalog::new(), MemoryFetcher::default())
            .list(Language::En)
            .await;
        assert!(listing.is_empty());
        assert!(!listing.fallback);
    }
}

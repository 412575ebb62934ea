//! Show a single post

use anyhow::Result;

use crate::i18n::Language;
use crate::render::RenderSink;
use crate::resolver::Resolver;
use crate::Blog;

/// Resolve a post and print it
pub async fn run(
    blog: &Blog,
    slug: &str,
    requested: Option<Language>,
    json: bool,
    remote: bool,
) -> Result<()> {
    let resolver = blog.resolver(remote)?;
    let language = blog.language(requested);
    let mut sink = super::stdout_sink(&blog.config, json);

    if !show(&resolver, slug, language, sink.as_mut()).await? {
        anyhow::bail!("Post not found: {}", slug);
    }
    Ok(())
}

/// Resolve `slug` in `language` and hand the outcome to `sink`
///
/// Returns whether a post was found.
pub async fn show(
    resolver: &Resolver,
    slug: &str,
    language: Language,
    sink: &mut dyn RenderSink,
) -> Result<bool> {
    match resolver.resolve(slug, language).await {
        Some(resolved) => {
            if resolved.fallback {
                tracing::info!("Showing {} in {}", slug, resolved.post.language());
            }
            sink.post(&resolved)?;
            Ok(true)
        }
        None => {
            sink.not_found(slug, language)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextSink;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "catalog:\n  en:\n    - slug: '250415'\n  zh-tw:\n    - slug: '250415'\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("blogs/en")).unwrap();
        fs::write(
            dir.path().join("blogs/en/250415.md"),
            "---\ntitle: Hello\ndate: 2025-04-15\n---\nEnglish body\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    async fn output(blog: &Blog, slug: &str, language: Language) -> (bool, String) {
        let resolver = blog.resolver(false).unwrap();
        let mut sink = TextSink::new(Vec::new(), &blog.config);
        let found = show(&resolver, slug, language, &mut sink).await.unwrap();
        (found, String::from_utf8(sink.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn test_show_post() {
        let (_dir, blog) = site();
        let (found, out) = output(&blog, "250415", Language::En).await;
        assert!(found);
        assert!(out.starts_with("Hello\n"));
        assert!(out.contains("English body"));
    }

    #[tokio::test]
    async fn test_show_missing_translation_falls_back() {
        let (_dir, blog) = site();
        let (found, out) = output(&blog, "250415", Language::ZhTw).await;
        assert!(found);
        assert!(out.contains("此文章尚無中文版本"));
        assert!(out.contains("English body"));
    }

    #[tokio::test]
    async fn test_show_unknown_slug() {
        let (_dir, blog) = site();
        let (found, out) = output(&blog, "nope", Language::En).await;
        assert!(!found);
        assert_eq!(out, "Post not found: nope\n");
    }
}

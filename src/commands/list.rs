//! List posts

use anyhow::Result;

use crate::i18n::Language;
use crate::render::RenderSink;
use crate::resolver::Resolver;
use crate::Blog;

/// Resolve every catalog entry and print the cards
pub async fn run(blog: &Blog, requested: Option<Language>, json: bool, remote: bool) -> Result<()> {
    let resolver = blog.resolver(remote)?;
    let language = blog.language(requested);
    let mut sink = super::stdout_sink(&blog.config, json);

    let count = list(&resolver, language, sink.as_mut()).await?;
    tracing::info!("Listed {} posts", count);
    Ok(())
}

/// Resolve the listing for `language` and hand it to `sink`
///
/// Returns the number of posts listed.
pub async fn list(resolver: &Resolver, language: Language, sink: &mut dyn RenderSink) -> Result<usize> {
    let listing = resolver.list(language).await;
    sink.listing(&listing)?;
    Ok(listing.posts.len())
}

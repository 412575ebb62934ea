//! Rendering sinks
//!
//! The core hands resolved posts to a [`RenderSink`] and never builds
//! markup itself. The CLI prints through [`TextSink`] or [`JsonSink`];
//! [`PageRenderer`] writes standalone post pages for `convert`.

mod page;

pub use page::{PageRenderer, DEFAULT_TEMPLATE};

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::config::SiteConfig;
use crate::content::PostMetadata;
use crate::helpers::{display_date, html_path};
use crate::i18n::Language;
use crate::resolver::{Listing, Resolved};

/// Receives the outcome of a resolution
pub trait RenderSink {
    /// Detail view of one post
    fn post(&mut self, resolved: &Resolved) -> Result<()>;

    /// Listing view; may be empty
    fn listing(&mut self, listing: &Listing) -> Result<()>;

    /// The post could not be found in any language
    fn not_found(&mut self, slug: &str, requested: Language) -> Result<()>;
}

/// Link target of a listing card: the rendered page of the post
fn card_link(config: &SiteConfig, post: &PostMetadata) -> String {
    html_path(&config.html_blog_path, post.language().code(), post.slug())
}

/// Tag shown on a card: the post's first tag, else the site's default
fn card_tag<'a>(config: &'a SiteConfig, post: &'a PostMetadata) -> &'a str {
    post.tags()
        .first()
        .map(String::as_str)
        .unwrap_or(&config.default_tag)
}

/// Plain-text rendering for terminals
pub struct TextSink<W: Write> {
    out: W,
    config: SiteConfig,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, config: &SiteConfig) -> Self {
        Self {
            out,
            config: config.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn post(&mut self, resolved: &Resolved) -> Result<()> {
        let post = &resolved.post;
        let lang = resolved.requested;

        if resolved.fallback {
            writeln!(self.out, "({})", lang.messages().fallback_notice)?;
        }
        writeln!(self.out, "{}", post.title())?;
        writeln!(
            self.out,
            "{} · {}",
            display_date(&post.date(), lang),
            post.author()
        )?;
        if !post.tags().is_empty() {
            writeln!(self.out, "[{}]", post.tags().join(", "))?;
        }
        if let Some(image) = post.image() {
            writeln!(self.out, "Image: {}", image)?;
        }
        writeln!(self.out)?;
        match post.content() {
            Some(content) => writeln!(self.out, "{}", content.trim_end())?,
            None => writeln!(self.out, "{}", post.summary())?,
        }
        Ok(())
    }

    fn listing(&mut self, listing: &Listing) -> Result<()> {
        let messages = listing.requested.messages();

        if listing.fallback {
            writeln!(self.out, "({})", messages.fallback_notice)?;
        }
        if listing.is_empty() {
            writeln!(self.out, "{}", messages.no_posts)?;
            return Ok(());
        }

        for post in &listing.posts {
            writeln!(
                self.out,
                "[{}] {} - {}",
                card_tag(&self.config, post),
                display_date(&post.date(), listing.requested),
                post.title()
            )?;
            writeln!(self.out, "    {}", post.summary())?;
            writeln!(
                self.out,
                "    {}: {}",
                messages.read_more,
                card_link(&self.config, post)
            )?;
        }
        Ok(())
    }

    fn not_found(&mut self, slug: &str, requested: Language) -> Result<()> {
        writeln!(
            self.out,
            "{}: {}",
            requested.messages().post_not_found,
            slug
        )?;
        Ok(())
    }
}

/// Card or detail data as serialized by [`JsonSink`]
#[derive(Serialize)]
struct PostView<'a> {
    #[serde(flatten)]
    post: &'a PostMetadata,
    display_date: String,
    primary_tag: &'a str,
    card_image: &'a str,
    link: String,
}

impl<'a> PostView<'a> {
    fn new(config: &'a SiteConfig, post: &'a PostMetadata, lang: Language) -> Self {
        Self {
            post,
            display_date: display_date(&post.date(), lang),
            primary_tag: card_tag(config, post),
            card_image: post.image().unwrap_or(&config.default_image),
            link: card_link(config, post),
        }
    }
}

/// One JSON document per rendering call
pub struct JsonSink<W: Write> {
    out: W,
    config: SiteConfig,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W, config: &SiteConfig) -> Self {
        Self {
            out,
            config: config.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn post(&mut self, resolved: &Resolved) -> Result<()> {
        let view = PostView::new(&self.config, &resolved.post, resolved.requested);
        let value = serde_json::json!({
            "requested": resolved.requested,
            "fallback": resolved.fallback,
            "post": view,
        });
        self.emit(value)
    }

    fn listing(&mut self, listing: &Listing) -> Result<()> {
        let posts: Vec<_> = listing
            .posts
            .iter()
            .map(|p| PostView::new(&self.config, p, listing.requested))
            .collect();
        let value = serde_json::json!({
            "requested": listing.requested,
            "language": listing.language,
            "fallback": listing.fallback,
            "posts": posts,
        });
        self.emit(value)
    }

    fn not_found(&mut self, slug: &str, requested: Language) -> Result<()> {
        let value = serde_json::json!({
            "requested": requested,
            "slug": slug,
            "post": null,
        });
        self.emit(value)
    }
}

//! Standalone post pages
//!
//! A page template carries empty landmark containers (`#postHeader`,
//! `#featuredImageContainer`, `#postContent`) and default meta tags. The
//! renderer fills them from a post's metadata so the page can be read
//! without client-side scripting, and so the HTML extractor can recover the
//! metadata from it later.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use crate::config::SiteConfig;
use crate::content::PostMetadata;
use crate::helpers::{display_date, html_escape, html_path};
use crate::i18n::Language;

lazy_static! {
    static ref TITLE_TAG: Regex = Regex::new(r"(?is)<title>.*?</title>").unwrap();
    static ref POST_HEADER: Regex =
        Regex::new(r#"(?s)<div id="postHeader" class="post-header">\s*(?:<!--.*?-->)?\s*</div>"#)
            .unwrap();
    static ref FEATURED_IMAGE: Regex =
        Regex::new(r#"(?s)<div id="featuredImageContainer">\s*(?:<!--.*?-->)?\s*</div>"#).unwrap();
    static ref POST_CONTENT: Regex = Regex::new(
        r#"(?s)<div id="postContent" class="post-content">\s*(?:<!--.*?-->)?\s*</div>"#
    )
    .unwrap();
    static ref DYNAMIC_SCRIPT: Regex =
        Regex::new(r#"<script src="[^"]*blog-post\.js"></script>"#).unwrap();
}

/// Built-in page used when the site has no template of its own
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Blog Post</title>
    <meta property="og:type" content="article">
    <meta property="og:title" content="">
    <meta property="og:description" content="">
    <meta property="og:image" content="">
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="">
    <meta name="twitter:description" content="">
    <meta name="twitter:image" content="">
    <link rel="stylesheet" href="../assets/css/blog.css">
</head>
<body>
    <article class="post">
        <div id="postHeader" class="post-header">
            <!-- Post title and meta info -->
        </div>
        <div id="featuredImageContainer">
            <!-- Featured image -->
        </div>
        <div id="postContent" class="post-content">
            <!-- Post content -->
        </div>
    </article>
</body>
</html>
"#;

/// Fills a page template from post metadata and rendered body HTML
#[derive(Debug, Clone)]
pub struct PageRenderer {
    template: String,
    site_name: String,
    html_blog_path: String,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig) -> Self {
        Self::with_template(config, DEFAULT_TEMPLATE)
    }

    pub fn with_template(config: &SiteConfig, template: &str) -> Self {
        Self {
            template: template.to_string(),
            site_name: config.title.clone(),
            html_blog_path: config.html_blog_path.clone(),
        }
    }

    /// Render a full page for `post`, whose body is already HTML
    pub fn render(&self, post: &PostMetadata, body_html: &str) -> String {
        let lang = post.language();
        let page_title = html_escape(&format!("{} | {}", post.title(), self.site_name));
        let summary = html_escape(post.summary());

        let mut html = TITLE_TAG
            .replace(&self.template, NoExpand(&format!("<title>{}</title>", page_title)))
            .into_owned();

        html = set_meta(&html, "property", "og:title", &page_title);
        html = set_meta(&html, "property", "og:description", &summary);
        html = set_meta(&html, "name", "twitter:title", &page_title);
        html = set_meta(&html, "name", "twitter:description", &summary);
        if let Some(image) = post.image() {
            let image = html_escape(image);
            html = set_meta(&html, "property", "og:image", &image);
            html = set_meta(&html, "name", "twitter:image", &image);
        }

        let header = format!(
            r#"<div id="postHeader" class="post-header">{}</div>"#,
            self.header(post)
        );
        html = POST_HEADER.replace(&html, NoExpand(&header)).into_owned();

        if let Some(image) = post.image() {
            let figure = format!(
                r#"<div id="featuredImageContainer"><img src="{}" alt="{}" class="post-featured-img"></div>"#,
                html_escape(image),
                html_escape(post.title())
            );
            html = FEATURED_IMAGE.replace(&html, NoExpand(&figure)).into_owned();
        }

        let content = format!(
            r#"<div id="postContent" class="post-content">{}</div>"#,
            body_html
        );
        html = POST_CONTENT.replace(&html, NoExpand(&content)).into_owned();

        html = DYNAMIC_SCRIPT.replace_all(&html, "").into_owned();
        set_document_language(&html, lang)
    }

    /// Title, date, author and the language toggle
    fn header(&self, post: &PostMetadata) -> String {
        let lang = post.language();
        let toggle: String = Language::ALL
            .iter()
            .map(|l| {
                let target = html_path("", l.code(), post.slug());
                format!(
                    r#"
            <a class="lang-btn{}" data-lang="{}" href="{}">{}</a>"#,
                    if *l == lang { " active" } else { "" },
                    l.code(),
                    target,
                    l.display_name()
                )
            })
            .collect();

        format!(
            r#"
        <h1 class="post-title">{title}</h1>
        <div class="post-meta">
            <div class="post-date">
                <i class="far fa-calendar-alt"></i>
                {date}
            </div>
            <div class="post-author">
                <i class="far fa-user"></i>
                {author}
            </div>
        </div>
        <div class="language-toggle">{toggle}
        </div>
    "#,
            title = html_escape(post.title()),
            date = display_date(&post.date(), lang),
            author = html_escape(post.author()),
            toggle = toggle
        )
    }

    /// Output location of a post's page, relative to the site root
    pub fn output_path(&self, post: &PostMetadata) -> String {
        html_path(&self.html_blog_path, post.language().code(), post.slug())
    }
}

/// Set the `content` of the meta tag whose `attr` equals `key`
///
/// The value must already be escaped.
fn set_meta(html: &str, attr: &str, key: &str, value: &str) -> String {
    let pattern = format!(
        r#"<meta {}="{}" content="[^"]*"\s*/?>"#,
        attr,
        regex::escape(key)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return html.to_string();
    };
    let tag = format!(r#"<meta {}="{}" content="{}">"#, attr, key, value);
    re.replace(html, NoExpand(&tag)).into_owned()
}

fn set_document_language(html: &str, lang: Language) -> String {
    lazy_static! {
        static ref HTML_LANG: Regex = Regex::new(r#"<html lang="[^"]*">"#).unwrap();
    }
    let tag = format!(r#"<html lang="{}">"#, lang.locale_tag());
    HTML_LANG.replace(html, NoExpand(&tag)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{HtmlExtractor, MetadataExtractor, PostBuilder, PostDescriptor};
    use chrono::NaiveDate;

    fn post(lang: Language, image: Option<&str>) -> PostMetadata {
        let mut builder = PostBuilder::new(lang, "250415", "Tammy Yang")
            .title("Fish & Chips: a \"review\"")
            .date(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap())
            .summary("Crispy <and> salty")
            .content("ignored");
        if let Some(image) = image {
            builder = builder.image(image);
        }
        builder.build()
    }

    #[test]
    fn test_render_fills_landmarks() {
        let renderer = PageRenderer::new(&SiteConfig::default());
        let html = renderer.render(&post(Language::En, Some("assets/a.png")), "<p>Body</p>");

        assert!(html.contains("<title>Fish &amp; Chips: a &quot;review&quot; | Tammy Yang Blog</title>"));
        assert!(html.contains(r#"<h1 class="post-title">Fish &amp; Chips"#));
        assert!(html.contains("April 5, 2025"));
        assert!(html.contains(r#"<img src="assets/a.png""#));
        assert!(html.contains(r#"<div id="postContent" class="post-content"><p>Body</p></div>"#));
        assert!(html.contains(r#"<meta property="og:image" content="assets/a.png">"#));
        assert!(html.contains(r#"<html lang="en-US">"#));
        assert!(html.contains(r#"href="250415_zh-tw.html""#));
    }

    #[test]
    fn test_render_without_image_keeps_container() {
        let renderer = PageRenderer::new(&SiteConfig::default());
        let html = renderer.render(&post(Language::ZhTw, None), "");
        assert!(html.contains("<!-- Featured image -->"));
        assert!(html.contains("2025年4月5日"));
        assert!(!html.contains("post-featured-img"));
    }

    #[test]
    fn test_rendered_page_reads_back() {
        let config = SiteConfig::default();
        let renderer = PageRenderer::new(&config);
        let extractor = HtmlExtractor::new(&config.author, &config.title);

        for lang in Language::ALL {
            let original = post(lang, Some("assets/blog-images/x.png"));
            let html = renderer.render(&original, "<p>First paragraph.</p>");
            let descriptor = PostDescriptor::html(&config.html_blog_path, lang, "250415");
            let parsed = extractor.extract(&html, &descriptor);

            assert!(parsed.diagnostics.is_empty());
            let back = parsed.post;
            assert_eq!(back.title(), original.title());
            assert_eq!(back.date(), original.date());
            assert_eq!(back.author(), original.author());
            assert_eq!(back.summary(), original.summary());
            assert_eq!(back.image(), original.image());
        }
    }

    #[test]
    fn test_custom_template_script_removed() {
        let template = r#"<html lang="en"><head><title>Tammy Yang | Blog Post</title></head><body>
<div id="postHeader" class="post-header">
    <!-- Post title and meta info will be dynamically inserted here -->
</div>
<div id="postContent" class="post-content">
    <!-- Post content will be dynamically inserted here -->
</div>
<script src="assets/js/blog-post.js"></script></body></html>"#;
        let renderer = PageRenderer::with_template(&SiteConfig::default(), template);
        let html = renderer.render(&post(Language::En, None), "<p>x</p>");
        assert!(!html.contains("blog-post.js"));
        assert!(html.contains("post-title"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_output_path() {
        let renderer = PageRenderer::new(&SiteConfig::default());
        assert_eq!(
            renderer.output_path(&post(Language::ZhTw, None)),
            "html_blogs/250415_zh-tw.html"
        );
    }
}

//! Metadata extraction from rendered post pages
//!
//! A rendered page carries no front matter, so every field is recovered from
//! the landmarks the page renderer writes (`.post-title`, `.post-date`,
//! `.post-author`, `.post-featured-img`, `#postContent`) and from the Open
//! Graph / Twitter meta tags, each field falling back independently.

use super::post::{PostBuilder, DEFAULT_TAG};
use super::{MetadataExtractor, Parsed, PostDescriptor};
use crate::error::ContentError;
use crate::helpers::{collapse_whitespace, html_unescape, parse_date, parse_localized_numeric, truncate};

/// Elements whose content is never visible text
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Summaries from body text longer than this are cut
const SUMMARY_MAX_CHARS: usize = 150;

/// Extraction strategy for rendered HTML pages
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    owner: String,
    title_suffix: String,
}

impl HtmlExtractor {
    /// `owner` is the site owner, `site_name` the suffix of page titles
    pub fn new(owner: &str, site_name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            title_suffix: format!(" | {}", site_name),
        }
    }

    fn title(&self, page: &Page) -> Option<String> {
        page.text_of_class("post-title")
            .or_else(|| page.meta("og:title").map(|t| self.strip_suffix(&t)))
            .or_else(|| page.first("title").map(|e| self.strip_suffix(&e.text)))
            .filter(|t| !t.is_empty())
    }

    fn author(&self, page: &Page) -> Option<String> {
        let text = page.text_of_class("post-author")?;
        let guest = text.replace(&self.owner, "");
        Some(guest.trim().to_string()).filter(|a| !a.is_empty())
    }

    fn strip_suffix(&self, title: &str) -> String {
        let title = title.trim();
        title
            .strip_suffix(self.title_suffix.as_str())
            .unwrap_or(title)
            .trim()
            .to_string()
    }
}

impl MetadataExtractor for HtmlExtractor {
    fn extract(&self, raw: &str, descriptor: &PostDescriptor) -> Parsed {
        let page = Page::new(raw);
        let mut diagnostics = Vec::new();
        let mut builder = PostBuilder::new(descriptor.language, &descriptor.slug, &self.owner)
            .source(descriptor.source.as_str())
            // No tag markup is rendered yet
            .tags(vec![DEFAULT_TAG.to_string()]);

        if let Some(title) = self.title(&page) {
            builder = builder.title(title);
        }

        match page.text_of_class("post-date") {
            Some(text) => match parse_localized_numeric(&text).or_else(|| parse_date(&text)) {
                Some(date) => builder = builder.date(date),
                None => diagnostics.push(ContentError::UnparseableDate {
                    value: text,
                    source_label: descriptor.source.clone(),
                }),
            },
            None => tracing::debug!("No date element in {}", descriptor.source),
        }

        if let Some(author) = self.author(&page) {
            builder = builder.author(author);
        }

        if let Some(summary) = page.summary() {
            builder = builder.summary(summary);
        }

        if let Some(image) = page.image() {
            builder = builder.image(image);
        }

        Parsed {
            post: builder.build(),
            diagnostics,
        }
    }
}

/// The elements of a page in document order
///
/// Comments are dropped and `<script>`/`<style>` content is never treated
/// as markup or text.
struct Page {
    elements: Vec<Element>,
}

/// One element with decoded attributes and visible text
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    /// Visible text of the subtree, whitespace collapsed
    text: String,
    /// Index one past the element's last descendant in [`Page::elements`]
    end: usize,
}

impl Page {
    fn new(html: &str) -> Self {
        let mut elements = Vec::new();
        match tl::parse(html, tl::ParserOptions::default()) {
            Ok(dom) => {
                let parser = dom.parser();
                for handle in dom.children() {
                    collect(*handle, parser, &mut elements);
                }
            }
            Err(e) => tracing::debug!("Failed to parse page: {:?}", e),
        }
        Self { elements }
    }

    fn first(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    fn position(&self, pred: impl Fn(&Element) -> bool) -> Option<usize> {
        self.elements.iter().position(pred)
    }

    /// Visible text of the first element with `class`, if non-empty
    fn text_of_class(&self, class: &str) -> Option<String> {
        self.elements
            .iter()
            .find(|e| e.has_class(class))
            .map(|e| e.text.clone())
            .filter(|t| !t.is_empty())
    }

    /// Content of a `<meta property=..>` or `<meta name=..>` tag
    fn meta(&self, key: &str) -> Option<String> {
        self.elements
            .iter()
            .filter(|e| e.name == "meta")
            .find(|e| e.attr("property") == Some(key) || e.attr("name") == Some(key))
            .and_then(|e| e.attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }

    fn summary(&self) -> Option<String> {
        self.meta("og:description")
            .or_else(|| self.meta("twitter:description"))
            .or_else(|| self.first_paragraph())
    }

    /// First paragraph of the post body, shortened for a card
    fn first_paragraph(&self) -> Option<String> {
        let container = self
            .position(|e| e.attr("id") == Some("postContent"))
            .or_else(|| self.position(|e| e.has_class("post-content")))?;
        let end = self.elements[container].end;
        let paragraph = self.elements[container + 1..end]
            .iter()
            .find(|e| e.name == "p")?;
        if paragraph.text.is_empty() {
            return None;
        }
        Some(truncate(&paragraph.text, SUMMARY_MAX_CHARS, Some("...")))
    }

    fn image(&self) -> Option<String> {
        self.elements
            .iter()
            .find(|e| e.has_class("post-featured-img"))
            .and_then(|e| e.attr("src"))
            .map(|src| src.trim().to_string())
            .filter(|src| !src.is_empty())
            .or_else(|| self.meta("og:image"))
            .or_else(|| self.meta("twitter:image"))
    }
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Flatten the subtree at `handle` into `out`, returning its decoded text
fn collect(handle: tl::NodeHandle, parser: &tl::Parser<'_>, out: &mut Vec<Element>) -> String {
    match handle.get(parser) {
        Some(tl::Node::Tag(tag)) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                return String::new();
            }

            let attributes = tag.attributes();
            let mut attrs: Vec<(String, String)> = Vec::new();
            for key in ["id", "class"] {
                if let Some(value) = attributes.get(key).flatten() {
                    attrs.push((key.to_string(), html_unescape(&value.as_utf8_str())));
                }
            }
            for (key, value) in attributes.iter() {
                let key = key.to_ascii_lowercase();
                if attrs.iter().all(|(k, _)| *k != key) {
                    let value = value.map(|v| html_unescape(&v)).unwrap_or_default();
                    attrs.push((key, value));
                }
            }

            let index = out.len();
            out.push(Element {
                name,
                attrs,
                text: String::new(),
                end: index + 1,
            });

            let mut text = String::new();
            for child in tag.children().top().iter() {
                text.push_str(&collect(*child, parser, out));
            }
            out[index].text = collapse_whitespace(&text);
            out[index].end = out.len();
            text
        }
        Some(tl::Node::Raw(bytes)) => html_unescape(&bytes.as_utf8_str()),
        Some(tl::Node::Comment(_)) | None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DEFAULT_SUMMARY, DEFAULT_TITLE};
    use crate::helpers::today;
    use crate::i18n::Language;
    use chrono::NaiveDate;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="zh-TW">
<head>
    <meta charset="UTF-8">
    <title>我的第一篇文章 | Tammy Yang Blog</title>
    <meta property="og:title" content="我的第一篇文章 | Tammy Yang Blog">
    <meta property="og:description" content="關於創業的一些想法">
    <meta property="og:image" content="assets/blog-images/og.png">
    <meta name="twitter:description" content="twitter summary">
</head>
<body>
    <div id="postHeader" class="post-header">
        <h1 class="post-title">我的第一篇文章</h1>
        <div class="post-meta">
            <div class="post-date">
                <i class="far fa-calendar-alt"></i>
                2025年4月15日
            </div>
            <div class="post-author">
                <i class="far fa-user"></i>
                Tammy Yang
            </div>
        </div>
    </div>
    <div id="featuredImageContainer"><img src="assets/blog-images/hero.png" alt="hero" class="post-featured-img"></div>
    <div id="postContent" class="post-content"><p>第一段。</p><p>第二段。</p></div>
</body>
</html>"#;

    fn extractor() -> HtmlExtractor {
        HtmlExtractor::new("Tammy Yang", "Tammy Yang Blog")
    }

    fn descriptor() -> PostDescriptor {
        PostDescriptor::html("html_blogs", Language::ZhTw, "250415")
    }

    fn extract(html: &str) -> Parsed {
        extractor().extract(html, &descriptor())
    }

    #[test]
    fn test_full_page() {
        let parsed = extract(PAGE);
        assert!(parsed.diagnostics.is_empty());
        let post = parsed.post;
        assert_eq!(post.title(), "我的第一篇文章");
        assert_eq!(post.date(), NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
        assert_eq!(post.author(), "Tammy Yang");
        assert_eq!(post.summary(), "關於創業的一些想法");
        assert_eq!(post.image(), Some("assets/blog-images/hero.png"));
        assert_eq!(post.tags(), ["Blog"]);
        assert_eq!(post.content(), None);
        assert_eq!(post.slug(), "250415");
        assert_eq!(post.language(), Language::ZhTw);
    }

    #[test]
    fn test_og_description_only() {
        let html = r#"<html><head><meta property="og:description" content="Hello world"></head><body></body></html>"#;
        let post = extract(html).post;
        assert_eq!(post.summary(), "Hello world");
        assert_eq!(post.title(), DEFAULT_TITLE);
        assert_eq!(post.author(), "Tammy Yang");
        assert_eq!(post.image(), None);
        assert_eq!(post.date(), today());
    }

    #[test]
    fn test_title_fallbacks() {
        let og = r#"<meta property="og:title" content="From OG | Tammy Yang Blog"><title>Other</title>"#;
        assert_eq!(extract(og).post.title(), "From OG");

        let title = r#"<head><title>From Title | Tammy Yang Blog</title></head>"#;
        assert_eq!(extract(title).post.title(), "From Title");

        let empty = r#"<h1 class="post-title">   </h1><title>Fallback</title>"#;
        assert_eq!(extract(empty).post.title(), "Fallback");
    }

    #[test]
    fn test_natural_language_date() {
        let html = r#"<div class="post-date"><i class="far fa-calendar-alt"></i> April 15, 2025 </div>"#;
        assert_eq!(
            extract(html).post.date(),
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_bad_date_reports_and_defaults() {
        let html = r#"<div class="post-date">sometime soon</div>"#;
        let parsed = extract(html);
        assert_eq!(parsed.post.date(), today());
        assert_eq!(parsed.diagnostics.len(), 1);
    }

    #[test]
    fn test_guest_author() {
        let html = r#"<div class="post-author"><i class="far fa-user"></i> Guest Writer</div>"#;
        assert_eq!(extract(html).post.author(), "Guest Writer");
    }

    #[test]
    fn test_summary_from_first_paragraph() {
        let html = r#"<div id="postContent" class="post-content"><h2>Intro</h2><p>Short <em>first</em> paragraph.</p><p>Second.</p></div>"#;
        assert_eq!(extract(html).post.summary(), "Short first paragraph.");
    }

    #[test]
    fn test_long_paragraph_is_truncated() {
        let body = "x".repeat(200);
        let html = format!(r#"<div id="postContent"><p>{}</p></div>"#, body);
        let summary = extract(&html).post.summary().to_string();
        assert_eq!(summary.chars().count(), 150);
        assert_eq!(summary, format!("{}...", "x".repeat(147)));

        let exact = "y".repeat(150);
        let html = format!(r#"<div id="postContent"><p>{}</p></div>"#, exact);
        assert_eq!(extract(&html).post.summary(), exact);
    }

    #[test]
    fn test_twitter_fallbacks() {
        let html = r#"<meta name="twitter:description" content="tw"><meta name="twitter:image" content="tw.png">"#;
        let post = extract(html).post;
        assert_eq!(post.summary(), "tw");
        assert_eq!(post.image(), Some("tw.png"));
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let post = extract("").post;
        assert_eq!(post.title(), DEFAULT_TITLE);
        assert_eq!(post.summary(), DEFAULT_SUMMARY);
        assert_eq!(post.tags(), ["Blog"]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = r#"<h1 class="post-title">Fish &amp; Chips</h1><meta property="og:description" content="&quot;quoted&quot;">"#;
        let post = extract(html).post;
        assert_eq!(post.title(), "Fish & Chips");
        assert_eq!(post.summary(), "\"quoted\"");
    }

    #[test]
    fn test_nested_elements_are_matched() {
        let html = r#"<div class="post-date"><div><span>2024年1月1日</span></div></div><div>2025年5月5日</div>"#;
        assert_eq!(
            extract(html).post.date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_tag_prefix_is_not_a_match() {
        let html = r#"<div id="postContent"><pre>code</pre><p>Real paragraph</p></div>"#;
        assert_eq!(extract(html).post.summary(), "Real paragraph");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let html = r#"<meta property="og:description" content="Why 1 > 0 matters">
<div id="postContent"><p>Body para.</p></div>"#;
        assert_eq!(extract(html).post.summary(), "Why 1 > 0 matters");
    }

    #[test]
    fn test_commented_landmark_is_ignored() {
        let html = r#"<!-- <h1 class="post-title">Old draft</h1> --><h1 class="post-title">Real</h1>"#;
        assert_eq!(extract(html).post.title(), "Real");
    }

    #[test]
    fn test_script_content_is_not_markup() {
        let html = r#"<script>var tpl = '<h1 class="post-title">Fake</h1>';</script>
<h1 class="post-title">Real title</h1>
<div id="postContent"><script>document.write("<p>injected</p>")</script><p>Visible.</p></div>"#;
        let post = extract(html).post;
        assert_eq!(post.title(), "Real title");
        assert_eq!(post.summary(), "Visible.");
    }

    #[test]
    fn test_numeric_entities_are_decoded() {
        let html = r#"<h1 class="post-title">Tammy&#8217;s &#x4E2D;文 post</h1>"#;
        assert_eq!(extract(html).post.title(), "Tammy\u{2019}s 中文 post");
    }

    #[test]
    fn test_entity_in_attribute() {
        let html = r#"<img class="post-featured-img" src="a.png?w=1&amp;h=2">"#;
        assert_eq!(extract(html).post.image(), Some("a.png?w=1&h=2"));
    }
}

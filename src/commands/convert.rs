//! Convert markdown posts into standalone HTML pages

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{FrontMatterParser, MarkdownRenderer, MetadataExtractor, PostDescriptor};
use crate::i18n::Language;
use crate::render::{PageRenderer, DEFAULT_TEMPLATE};
use crate::Blog;

/// Image directory copied next to the generated pages
const IMAGE_DIR: &str = "assets/blog-images";

/// What to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every markdown file of every language (or of one language)
    All(Option<Language>),
    /// One post, in every language (or in one language)
    Post(String, Option<Language>),
}

/// One page written
#[derive(Debug, Clone)]
pub struct Converted {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Run a conversion and report what was written
pub fn run(blog: &Blog, selection: &Selection) -> Result<()> {
    let start = std::time::Instant::now();

    copy_assets(blog)?;
    let converter = Converter::new(blog)?;
    let converted = match selection {
        Selection::All(language) => converter.convert_all(*language)?,
        Selection::Post(slug, language) => {
            let converted = converter.convert_post(slug, *language)?;
            if converted.is_empty() {
                anyhow::bail!("No markdown source found for post {}", slug);
            }
            converted
        }
    };

    for page in &converted {
        println!("Converted {:?} -> {:?}", page.source, page.output);
    }
    tracing::info!(
        "Converted {} pages in {:.2}s",
        converted.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Markdown to page pipeline for one site
pub struct Converter<'a> {
    blog: &'a Blog,
    parser: FrontMatterParser,
    markdown: MarkdownRenderer,
    pages: PageRenderer,
}

impl<'a> Converter<'a> {
    /// Uses the site's template when present, the built-in page otherwise
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let template_path = blog.base_dir.join(&blog.config.template_path);
        let pages = if template_path.is_file() {
            let template = fs::read_to_string(&template_path)
                .with_context(|| format!("Failed to read template {:?}", template_path))?;
            PageRenderer::with_template(&blog.config, &template)
        } else {
            tracing::debug!("No template at {:?}, using the built-in page", template_path);
            PageRenderer::with_template(&blog.config, DEFAULT_TEMPLATE)
        };

        Ok(Self {
            blog,
            parser: FrontMatterParser::new(&blog.config.author),
            markdown: MarkdownRenderer::new(),
            pages,
        })
    }

    /// Convert every `<blog_path>/<lang>/*.md`
    pub fn convert_all(&self, language: Option<Language>) -> Result<Vec<Converted>> {
        let mut converted = Vec::new();

        for lang in languages(language) {
            let dir = self.blog.base_dir.join(&self.blog.config.blog_path).join(lang.code());
            if !dir.is_dir() {
                tracing::warn!("Language directory not found: {:?}", dir);
                continue;
            }

            let mut slugs: Vec<String> = WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
                .filter_map(|e| e.path().file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect();
            slugs.sort();

            for slug in slugs {
                if let Some(page) = self.convert_one(&slug, lang)? {
                    converted.push(page);
                }
            }
        }

        Ok(converted)
    }

    /// Convert one post; languages without a markdown source are skipped
    pub fn convert_post(&self, slug: &str, language: Option<Language>) -> Result<Vec<Converted>> {
        let mut converted = Vec::new();
        for lang in languages(language) {
            if let Some(page) = self.convert_one(slug, lang)? {
                converted.push(page);
            }
        }
        Ok(converted)
    }

    fn convert_one(&self, slug: &str, language: Language) -> Result<Option<Converted>> {
        let descriptor = PostDescriptor::markdown(&self.blog.config.blog_path, language, slug);
        let source = self.blog.base_dir.join(&descriptor.source);
        if !source.is_file() {
            tracing::warn!("File not found: {:?}", source);
            return Ok(None);
        }

        let raw = fs::read_to_string(&source)
            .with_context(|| format!("Failed to read {:?}", source))?;
        let parsed = self.parser.extract(&raw, &descriptor);
        for diagnostic in &parsed.diagnostics {
            tracing::warn!("{}", diagnostic);
        }

        let post = parsed.post;
        let body = self.markdown.render(post.content().unwrap_or_default());
        let html = self.pages.render(&post, &body);

        let output = self.blog.base_dir.join(self.pages.output_path(&post));
        write_file(&output, &html)?;
        tracing::debug!("Wrote {:?}", output);

        Ok(Some(Converted { source, output }))
    }
}

fn languages(language: Option<Language>) -> Vec<Language> {
    match language {
        Some(lang) => vec![lang],
        None => Language::ALL.to_vec(),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

/// Copy `assets/blog-images` under the page directory so relative image
/// paths keep working
fn copy_assets(blog: &Blog) -> Result<()> {
    let source = blog.base_dir.join(IMAGE_DIR);
    let target = blog.base_dir.join(&blog.config.html_blog_path).join(IMAGE_DIR);
    fs::create_dir_all(&target)?;

    if !source.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(&source).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let dest = target.join(entry.file_name());
        fs::copy(entry.path(), &dest)?;
        tracing::debug!("Copied asset {:?}", entry.file_name());
    }
    Ok(())
}

//! Site configuration (_config.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::SourceKind;
use crate::error::ConfigError;
use crate::i18n::{Language, PREFERENCE_KEY};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    /// Site name, appended to page titles as `" | <title>"`
    pub title: String,
    /// Site owner, the default post author
    pub author: String,
    /// Base URL of the deployed site, used by the HTTP fetcher
    pub url: String,
    pub default_language: Language,

    // Directory
    pub blog_path: String,
    pub html_blog_path: String,
    /// HTML template used by `convert`; a built-in page is used when missing
    pub template_path: String,

    // Listing
    pub per_page: usize,
    /// Card image for posts without a featured image
    pub default_image: String,
    /// Tag shown on cards for posts without tags
    pub default_tag: String,

    // Preferences
    pub preference_file: String,
    pub preference_key: String,

    // Fetching
    /// Request timeout for the HTTP fetcher, in seconds
    pub fetch_timeout: Option<u64>,

    /// Known posts per language, in catalog order
    pub catalog: IndexMap<Language, Vec<CatalogEntry>>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// One configured catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub slug: String,
    /// Explicit source location; derived from the naming convention when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Source format; inferred from `source` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,
}

impl CatalogEntry {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            source: None,
            kind: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Tammy Yang Blog".to_string(),
            author: "Tammy Yang".to_string(),
            url: "http://localhost:8000".to_string(),
            default_language: Language::En,

            blog_path: "blogs".to_string(),
            html_blog_path: "html_blogs".to_string(),
            template_path: "blog-post.html".to_string(),

            per_page: 10,
            default_image: "assets/tammy-logo.png".to_string(),
            default_tag: "Blog".to_string(),

            preference_file: crate::store::PREFERENCE_FILE.to_string(),
            preference_key: PREFERENCE_KEY.to_string(),

            fetch_timeout: None,

            catalog: IndexMap::new(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Suffix appended to page titles, e.g. `" | Tammy Yang Blog"`
    pub fn title_suffix(&self) -> String {
        format!(" | {}", self.title)
    }
}

//! bilingual-blog: content core of a bilingual (English / Traditional
//! Chinese) personal blog
//!
//! Posts live in static files, either markdown with a front-matter header or
//! pre-rendered HTML pages. This crate parses both into one metadata model
//! and decides which language variant to show, falling back to English when
//! a translation is missing.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod helpers;
pub mod i18n;
pub mod render;
pub mod resolver;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

use content::{Extractors, PostCatalog};
use fetch::{Fetcher, FsFetcher, HttpFetcher};
use i18n::{Language, LanguagePreference};
use resolver::Resolver;
use store::FilePreferenceStore;

/// Environment variables consulted, in order, for the reader's locale
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Blog {
    /// Open a blog from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    pub fn catalog(&self) -> Result<PostCatalog> {
        Ok(PostCatalog::from_config(&self.config)?)
    }

    /// Fetcher for the site on disk, or for the deployed site when `remote`
    pub fn fetcher(&self, remote: bool) -> Result<Box<dyn Fetcher>> {
        if remote {
            let timeout = self.config.fetch_timeout.map(Duration::from_secs);
            tracing::debug!("Fetching from {}", self.config.url);
            Ok(Box::new(HttpFetcher::new(&self.config.url, timeout)?))
        } else {
            Ok(Box::new(FsFetcher::new(&self.base_dir)))
        }
    }

    pub fn resolver(&self, remote: bool) -> Result<Resolver> {
        Ok(Resolver::new(
            self.catalog()?,
            self.fetcher(remote)?,
            Extractors::new(&self.config),
        ))
    }

    pub fn preference_store(&self) -> FilePreferenceStore {
        FilePreferenceStore::new(self.base_dir.join(&self.config.preference_file))
    }

    /// Language to serve: an explicit request (persisted), else the stored
    /// preference, else the locale
    pub fn language(&self, requested: Option<Language>) -> Language {
        let store = self.preference_store();
        let preference = LanguagePreference::with_key(&store, &self.config.preference_key);
        let locale = locale_tag().unwrap_or_else(|| self.config.default_language.code().to_string());
        preference.select(requested, Some(locale.as_str()))
    }
}

/// The reader's locale from the environment, e.g. `zh_TW.UTF-8`
pub fn locale_tag() -> Option<String> {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

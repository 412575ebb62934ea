//! Error types shared across the content core
//!
//! Nothing here is fatal to a resolution: fetch errors trigger the English
//! fallback, content errors are logged and replaced by defaults.

use thiserror::Error;

/// Errors reported by a [`Fetcher`](crate::fetch::Fetcher)
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch {path}: {message}")]
    Failure { path: String, message: String },
}

impl FetchError {
    /// Build a failure for `path` from any displayable cause
    pub fn failure(path: &str, cause: impl std::fmt::Display) -> Self {
        Self::Failure {
            path: path.to_string(),
            message: cause.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Diagnostics produced while turning raw text into post metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("No front matter found in {0}")]
    MalformedHeader(String),

    #[error("Unparseable date {value:?} in {source_label}")]
    UnparseableDate { value: String, source_label: String },
}

/// Errors raised while loading the site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown language {0:?}, expected one of: en, zh-tw")]
    UnknownLanguage(String),

    #[error("Duplicate slug {slug:?} in {language} catalog")]
    DuplicateSlug { language: String, slug: String },
}

//! Fetching raw post documents
//!
//! The resolver only needs "text or not found". [`FsFetcher`] reads a site
//! checked out on disk, [`HttpFetcher`] reads a deployed site.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::FetchError;
use crate::helpers::join_url;

/// Retrieve a document by its site-relative path
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads documents from a site directory
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Map a site path into the root, refusing to leave it
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self
            .resolve(path)
            .ok_or_else(|| FetchError::NotFound(path.to_string()))?;

        match tokio::fs::read_to_string(&full).await {
            Ok(text) => {
                tracing::debug!("Read {:?} ({} bytes)", full, text.len());
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(path.to_string())),
            Err(e) => Err(FetchError::failure(path, e)),
        }
    }
}

/// Reads documents from a deployed site over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `timeout` bounds each request; `None` leaves it to the client default
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::failure(path, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::failure(path, format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::failure(path, e))?;
        tracing::debug!("Fetched {} ({} bytes)", url, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_fetch() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blogs/en")).unwrap();
        fs::write(dir.path().join("blogs/en/a.md"), "hello").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("blogs/en/a.md").await.unwrap(), "hello");
        assert_eq!(fetcher.fetch("/blogs/en/a.md").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fs_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch("blogs/zh-tw/a.md").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fs_refuses_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let fetcher = FsFetcher::new(dir.path().join("site"));
        let err = fetcher.fetch("../secret.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fs_directory_is_failure() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blogs")).unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch("blogs").await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_http_url_for() {
        let fetcher = HttpFetcher::new("https://example.com/", None).unwrap();
        assert_eq!(
            fetcher.url_for("/html_blogs/a_en.html"),
            "https://example.com/html_blogs/a_en.html"
        );
    }
}

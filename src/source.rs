use crate::config::SourceConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use log::debug;
use std::path::{Component, Path, PathBuf};

/// Somewhere data files and templates can be read from
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the full text at `location`, failing on any non-success outcome
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Reads locations as paths below a root directory
///
/// A leading `/` is relative to the root, the way a site-absolute URL is
/// relative to the document root. Paths that climb out of the root are
/// refused.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSource { root: root.into() }
    }

    pub fn resolve(&self, location: &str) -> Result<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(Error::fetch(location, "path escapes the content root"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for FileSource {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        let path = self.resolve(location)?;
        debug!("Reading {} from {}", location, path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::fetch(location, e))
    }
}

/// Fetches locations over HTTP(S), joining relative ones onto a base URL
#[cfg(feature = "web")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Option<url::Url>,
}

#[cfg(feature = "web")]
impl HttpSource {
    pub fn new(base_url: Option<url::Url>) -> Self {
        HttpSource {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn resolve(&self, location: &str) -> Result<url::Url> {
        match url::Url::parse(location) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base_url
                    .as_ref()
                    .ok_or_else(|| Error::fetch(location, "relative location without a base URL"))?;
                base.join(location).map_err(|e| Error::fetch(location, e))
            }
            Err(e) => Err(Error::fetch(location, e)),
        }
    }
}

#[cfg(feature = "web")]
#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        let url = self.resolve(location)?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(location, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| Error::fetch(location, e))
    }
}

/// Chooses HTTP for absolute `http(s)://` locations or when a base URL is
/// configured, and the file system otherwise
pub struct LocationSource {
    files: FileSource,
    #[cfg(feature = "web")]
    http: HttpSource,
}

impl LocationSource {
    pub fn new(config: &SourceConfig) -> Self {
        LocationSource {
            files: FileSource::new(config.root.clone()),
            #[cfg(feature = "web")]
            http: HttpSource::new(config.base_url.clone()),
        }
    }

    #[cfg(feature = "web")]
    fn wants_http(&self, location: &str) -> bool {
        location.starts_with("http://")
            || location.starts_with("https://")
            || self.http.base_url.is_some()
    }
}

#[async_trait]
impl ContentSource for LocationSource {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        #[cfg(feature = "web")]
        {
            if self.wants_http(location) {
                return self.http.fetch_text(location).await;
            }
        }
        self.files.fetch_text(location).await
    }
}

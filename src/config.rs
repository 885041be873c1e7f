use crate::error::{Error, Result};
use std::path::PathBuf;

/// Template used when a listing does not name its own
pub const DEFAULT_TEMPLATE_PATH: &str = "/components/event-listing/event-listing.component.html";

/// Where listing data files and templates are fetched from
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Directory site-absolute paths are resolved against
    pub root: PathBuf,
    /// When set, relative locations are fetched over HTTP from here
    #[cfg(feature = "web")]
    pub base_url: Option<url::Url>,
    pub default_template_path: String,
}

impl SourceConfig {
    /// Create a new default configuration
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            #[cfg(feature = "web")]
            base_url: None,
            default_template_path: DEFAULT_TEMPLATE_PATH.to_string(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.uses_http() && !self.root.is_dir() {
            return Err(Error::Config(format!(
                "content root is not a directory: {}",
                self.root.display()
            )));
        }

        if self.default_template_path.trim().is_empty() {
            return Err(Error::Config("default template path is empty".to_string()));
        }

        Ok(())
    }

    #[cfg(feature = "web")]
    fn uses_http(&self) -> bool {
        self.base_url.is_some()
    }

    #[cfg(not(feature = "web"))]
    fn uses_http(&self) -> bool {
        false
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct SourceConfigBuilder {
    config: SourceConfig,
}

impl SourceConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: SourceConfig::new(root),
        }
    }

    #[cfg(feature = "web")]
    pub fn base_url(mut self, base_url: Option<url::Url>) -> Self {
        self.config.base_url = base_url;
        self
    }

    pub fn default_template_path(mut self, path: impl Into<String>) -> Self {
        self.config.default_template_path = path.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SourceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

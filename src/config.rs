//! Perception Kit configuration management

use crate::error::{Error, Result};
use crate::meaning::FetchPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main Perception Kit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceptionConfig {
    /// Artifact loader configuration
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Fetch admission configuration
    #[serde(default)]
    pub admission: AdmissionConfig,
}

impl PerceptionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Artifact loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with artifact requests
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("perception-kit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Which URLs artifacts may be fetched from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// URL of the hosting document; its origin is the same-origin reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,

    /// Origins admitted by default (empty = same-origin only)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl AdmissionConfig {
    /// Parsed document URL, if configured
    pub fn document_url(&self) -> Result<Option<Url>> {
        self.document_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| Error::Config(format!("Invalid document_url: {}", e)))
    }

    /// Policy applied when a caller does not pass one
    pub fn default_policy(&self) -> FetchPolicy {
        if self.allowed_origins.is_empty() {
            FetchPolicy::SameOrigin
        } else {
            FetchPolicy::Origins(self.allowed_origins.clone())
        }
    }
}

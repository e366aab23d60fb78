//! Artifact loading
//!
//! An `ArtifactLoader` turns a URL or an already available document into
//! `ArArtifact` descriptors. `HttpArtifactLoader` fetches over HTTP; tests
//! and embedders can substitute their own implementation.

pub mod decoder;
pub mod http;

pub use decoder::{decode_document, decode_json};
pub use http::HttpArtifactLoader;

use crate::error::Result;
use crate::schema::ArArtifact;
use async_trait::async_trait;
use url::Url;

/// Source of artifact descriptors
#[async_trait]
pub trait ArtifactLoader: Send + Sync {
    /// Fetch `url` and decode the artifacts it describes.
    async fn from_url(&self, url: &Url) -> Result<Vec<ArArtifact>>;

    /// Decode artifacts embedded in an HTML document located at `base`.
    fn from_document(&self, document: &str, base: &Url) -> Result<Vec<ArArtifact>> {
        Ok(decode_document(document, base))
    }
}

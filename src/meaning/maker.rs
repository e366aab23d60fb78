//! MeaningMaker - the facade hosts talk to
//!
//! Wires a loader, a local store and a dealer together:
//! - indexes artifacts embedded in the hosting document on `init`
//! - loads artifacts from URLs, subject to a fetch policy
//! - treats markers whose value is an absolute URL as pointers to pages
//!   carrying more artifacts, and indexes those before matching
//! - forwards perceptual events to the dealer

use super::FetchPolicy;
use crate::config::PerceptionConfig;
use crate::dealer::ArtifactDealer;
use crate::error::Result;
use crate::loader::{ArtifactLoader, HttpArtifactLoader};
use crate::perception::{DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResultDelta};
use crate::schema::ArArtifact;
use crate::stores::{ArtifactStore, LocalArtifactStore};
use std::sync::Arc;
use url::Url;

/// Orchestrates artifact loading and perception for one host document
pub struct MeaningMaker {
    loader: Arc<dyn ArtifactLoader>,
    store: Arc<LocalArtifactStore>,
    dealer: ArtifactDealer,
    document_url: Option<Url>,
    default_policy: FetchPolicy,
}

impl MeaningMaker {
    /// Create a maker with a fresh local store registered with its dealer
    pub fn new(loader: Arc<dyn ArtifactLoader>) -> Self {
        let store = Arc::new(LocalArtifactStore::new());
        let dealer = ArtifactDealer::with_stores(vec![store.clone() as Arc<dyn ArtifactStore>]);
        Self {
            loader,
            store,
            dealer,
            document_url: None,
            default_policy: FetchPolicy::SameOrigin,
        }
    }

    /// Create a maker with an HTTP loader and admission settings from `config`
    pub fn from_config(config: &PerceptionConfig) -> Result<Self> {
        let loader = HttpArtifactLoader::new(&config.loader)?;
        let mut maker = Self::new(Arc::new(loader))
            .with_default_policy(config.admission.default_policy());
        if let Some(url) = config.admission.document_url()? {
            maker = maker.with_document_url(url);
        }
        Ok(maker)
    }

    /// Set the URL of the hosting document
    pub fn with_document_url(mut self, url: Url) -> Self {
        self.document_url = Some(url);
        self
    }

    /// Set the policy used when a caller passes none
    pub fn with_default_policy(mut self, policy: FetchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// URL of the hosting document
    pub fn document_url(&self) -> Option<&Url> {
        self.document_url.as_ref()
    }

    /// The store artifacts loaded by this maker are indexed into
    pub fn local_store(&self) -> &Arc<LocalArtifactStore> {
        &self.store
    }

    /// Index the artifacts embedded in the hosting document
    pub async fn init(&self, document: &str) -> Vec<ArArtifact> {
        let base = match &self.document_url {
            Some(url) => url.clone(),
            None => {
                tracing::warn!("No document URL configured; relative artifact URLs stay unresolved");
                match Url::parse("about:blank") {
                    Ok(url) => url,
                    Err(_) => return Vec::new(),
                }
            }
        };
        self.load_artifacts_from_document(document, &base).await
    }

    /// Index the artifacts embedded in `document`, located at `base`
    pub async fn load_artifacts_from_document(&self, document: &str, base: &Url) -> Vec<ArArtifact> {
        match self.loader.from_document(document, base) {
            Ok(artifacts) => {
                self.save_artifacts(&artifacts).await;
                artifacts
            }
            Err(e) => {
                tracing::error!(document = %base, "Failed to decode artifacts: {}", e);
                Vec::new()
            }
        }
    }

    /// Register an additional store with the dealer
    pub async fn add_artifact_store(&self, store: Arc<dyn ArtifactStore>) {
        self.dealer.add_artifact_store(store).await;
    }

    /// Fetch and index artifacts from `url`.
    ///
    /// Load failures are logged and yield no artifacts.
    pub async fn load_artifacts_from_url(&self, url: &Url) -> Vec<ArArtifact> {
        match self.loader.from_url(url).await {
            Ok(artifacts) => {
                let indexed = self.save_artifacts(&artifacts).await;
                tracing::info!(
                    url = %url,
                    artifacts = artifacts.len(),
                    targets = indexed,
                    "Loaded artifacts"
                );
                artifacts
            }
            Err(e) => {
                tracing::error!(url = %url, "Failed to load artifacts: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch and index artifacts from `url` if `policy` admits it.
    ///
    /// `None` applies the maker's default policy, same-origin unless
    /// configured otherwise. A rejected URL is never fetched.
    pub async fn load_artifacts_from_supported_url(
        &self,
        url: &Url,
        policy: Option<&FetchPolicy>,
    ) -> Vec<ArArtifact> {
        let policy = policy.unwrap_or(&self.default_policy);
        if !policy.admits(url, self.document_url.as_ref()) {
            tracing::debug!(url = %url, ?policy, "Fetch not admitted by policy");
            return Vec::new();
        }
        self.load_artifacts_from_url(url).await
    }

    /// All images worth detecting right now.
    ///
    /// Each entry carries one id and every known encoding; picking an
    /// encoding is up to the recognizer.
    pub async fn get_detectable_images(&self) -> Vec<DetectableImage> {
        self.dealer.get_detectable_images().await
    }

    /// A marker came into view.
    ///
    /// If its value is an absolute URL admitted by `policy`, the page it
    /// points at is indexed first, so a code can carry its own content.
    pub async fn marker_found(&self, marker: Marker, policy: Option<&FetchPolicy>) -> NearbyResultDelta {
        // No base URL: relative values would turn ordinary text into URLs
        if let Ok(url) = Url::parse(&marker.value) {
            self.load_artifacts_from_supported_url(&url, policy).await;
        }
        self.dealer.marker_found(marker).await
    }

    /// A marker left the view
    pub async fn marker_lost(&self, marker: &Marker) -> NearbyResultDelta {
        self.dealer.marker_lost(marker).await
    }

    /// The observer moved
    pub async fn update_geolocation(&self, geo: GeoCoordinates) -> NearbyResultDelta {
        self.dealer.update_geolocation(geo).await
    }

    /// An image came into view
    pub async fn image_found(&self, image: DetectedImage) -> NearbyResultDelta {
        self.dealer.image_found(image).await
    }

    /// An image left the view
    pub async fn image_lost(&self, image: &DetectedImage) -> NearbyResultDelta {
        self.dealer.image_lost(image).await
    }

    async fn save_artifacts(&self, artifacts: &[ArArtifact]) -> usize {
        let mut indexed = 0;
        for artifact in artifacts {
            indexed += self.store.add_artifact(artifact.clone()).await;
        }
        indexed
    }
}

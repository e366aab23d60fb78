//! In-memory artifact store
//!
//! Classifies inbound artifacts by target kind and routes each target to
//! the matching index. Indices sit behind `tokio::sync::RwLock` so lookups
//! run concurrently with each other and only indexing takes a write lock.

use super::{ArtifactStore, ImageIndex, MarkerIndex};
use crate::perception::{DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResult};
use crate::schema::{ArArtifact, Target};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory store routing barcodes and image targets to their indices
pub struct LocalArtifactStore {
    markers: RwLock<MarkerIndex>,
    images: RwLock<ImageIndex>,
}

impl LocalArtifactStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            markers: RwLock::new(MarkerIndex::new()),
            images: RwLock::new(ImageIndex::new()),
        }
    }

    /// Index every supported, well-formed target of `artifact`.
    ///
    /// Returns how many targets were indexed. Unsupported targets and
    /// targets missing their key field count as zero.
    pub async fn add_artifact(&self, artifact: ArArtifact) -> usize {
        if artifact.targets().is_empty() {
            return 0;
        }
        let artifact = Arc::new(artifact);

        let mut markers = self.markers.write().await;
        let mut images = self.images.write().await;
        let mut total_added = 0;
        for target in artifact.targets() {
            let added = match target {
                Target::Barcode(barcode) => markers.add_marker(&artifact, barcode),
                Target::ArImageTarget(image) => images.add_image(&artifact, image),
                Target::Unsupported(_) => false,
            };
            if added {
                total_added += 1;
            }
        }

        tracing::debug!(
            targets = artifact.targets().len(),
            indexed = total_added,
            "Indexed artifact"
        );
        total_added
    }

    /// Number of indexed barcodes
    pub async fn marker_count(&self) -> usize {
        self.markers.read().await.len()
    }

    /// Number of indexed image targets
    pub async fn image_count(&self) -> usize {
        self.images.read().await.len()
    }
}

impl Default for LocalArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn get_detectable_images(&self, _geo: Option<&GeoCoordinates>) -> Vec<DetectableImage> {
        self.images.read().await.detectable_images()
    }

    async fn find_relevant_artifacts(
        &self,
        markers: &[Marker],
        _geo: Option<&GeoCoordinates>,
        images: &[DetectedImage],
    ) -> Vec<NearbyResult> {
        let mut results = self.markers.read().await.find_relevant_artifacts(markers);
        results.extend(self.images.read().await.find_relevant_artifacts(images));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArImageTarget, Barcode, OneOrMany};
    use serde_json::json;

    fn barcode_artifact(text: &str) -> ArArtifact {
        ArArtifact::new(Target::from(Barcode::new(text)), json!("Fake URL"))
    }

    fn image_artifact(name: &str) -> ArArtifact {
        ArArtifact::new(Target::from(ArImageTarget::new(name, "Fake URL")), json!("Fake URL"))
    }

    async fn populated_store() -> LocalArtifactStore {
        let store = LocalArtifactStore::new();
        store.add_artifact(barcode_artifact("Barcode Value")).await;
        store.add_artifact(image_artifact("ID1")).await;
        store
    }

    #[tokio::test]
    async fn test_accepts_barcodes() {
        let store = LocalArtifactStore::new();
        assert_eq!(store.add_artifact(barcode_artifact("Barcode Value")).await, 1);
        assert_eq!(store.marker_count().await, 1);
    }

    #[tokio::test]
    async fn test_accepts_images() {
        let store = LocalArtifactStore::new();
        assert_eq!(store.add_artifact(image_artifact("ID1")).await, 1);

        let images = store.get_detectable_images(None).await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "ID1");
    }

    #[tokio::test]
    async fn test_ignores_malformed_inputs() {
        let store = LocalArtifactStore::new();
        assert_eq!(store.add_artifact(ArArtifact::default()).await, 0);

        let parsed: ArArtifact = serde_json::from_value(json!({})).unwrap();
        assert_eq!(store.add_artifact(parsed).await, 0);

        let no_text: ArArtifact =
            serde_json::from_value(json!({ "arTarget": { "@type": "Barcode" } })).unwrap();
        assert_eq!(store.add_artifact(no_text).await, 0);
    }

    #[tokio::test]
    async fn test_accepts_artifact_with_list_of_targets() {
        let store = LocalArtifactStore::new();
        let artifact = ArArtifact::new(
            OneOrMany::Many(vec![
                Target::from(Barcode::new("Barcode1")),
                Target::from(Barcode::new("Barcode2")),
                Target::from(ArImageTarget::new("ID1", "Fake URL")),
                Target::from(ArImageTarget::new("ID2", "Fake URL")),
            ]),
            json!("Fake URL"),
        );
        assert_eq!(store.add_artifact(artifact).await, 4);
        assert_eq!(store.marker_count().await, 2);
        assert_eq!(store.image_count().await, 2);
    }

    #[tokio::test]
    async fn test_accepts_artifact_with_some_unsupported_targets() {
        let store = LocalArtifactStore::new();
        let artifact: ArArtifact = serde_json::from_value(json!({
            "arTarget": [
                { "@type": "Barcode", "text": "Barcode1" },
                { "@type": "Unsupported" }
            ],
            "arContent": "Fake URL"
        }))
        .unwrap();
        assert_eq!(store.add_artifact(artifact).await, 1);
    }

    #[tokio::test]
    async fn test_finds_barcodes() {
        let store = populated_store().await;
        let results = store
            .find_relevant_artifacts(&[Marker::qrcode("Barcode Value")], None, &[])
            .await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_finds_images() {
        let store = populated_store().await;
        let results = store
            .find_relevant_artifacts(&[], None, &[DetectedImage::new("ID1")])
            .await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_finds_barcodes_and_images_at_once() {
        let store = populated_store().await;
        let results = store
            .find_relevant_artifacts(
                &[Marker::qrcode("Barcode Value")],
                Some(&GeoCoordinates::new(51.5, -0.12)),
                &[DetectedImage::new("ID1")],
            )
            .await;
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].target.as_ref(), Target::Barcode(_)));
        assert!(matches!(results[1].target.as_ref(), Target::ArImageTarget(_)));
    }

    #[tokio::test]
    async fn test_one_artifact_reachable_through_two_signals() {
        let store = LocalArtifactStore::new();
        let artifact = ArArtifact::new(
            vec![
                Target::from(Barcode::new("X")),
                Target::from(ArImageTarget::new("ID1", "x.jpg")),
            ],
            json!({ "card": "hello" }),
        );
        assert_eq!(store.add_artifact(artifact).await, 2);

        let results = store
            .find_relevant_artifacts(&[Marker::qrcode("X")], None, &[DetectedImage::new("ID1")])
            .await;
        assert_eq!(results.len(), 2);
        assert!(Arc::ptr_eq(&results[0].artifact, &results[1].artifact));
        assert!(!results[0].same_entry(&results[1]));
    }
}

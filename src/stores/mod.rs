//! Pluggable artifact store architecture
//!
//! Defines the `ArtifactStore` trait answering relevance queries, and the
//! in-process `LocalArtifactStore` that routes artifacts to per-kind indices.
//!
//! ## Architecture
//!
//! ```text
//! ArArtifact → LocalArtifactStore ─┬─ Barcode ───────→ MarkerIndex
//!                                  ├─ ARImageTarget ─→ ImageIndex
//!                                  └─ other ─────────→ (skipped)
//! ```
//!
//! Any number of stores can be registered with an `ArtifactDealer`; results
//! from all of them are merged without deduplication.

pub mod image_index;
pub mod local;
pub mod marker_index;

pub use image_index::ImageIndex;
pub use local::LocalArtifactStore;
pub use marker_index::MarkerIndex;

use crate::perception::{DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResult};
use async_trait::async_trait;

/// Pluggable relevance store interface.
///
/// Implementations may index artifacts locally, query a remote catalog, or
/// filter by location. `geo` is `None` until a location has been reported.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Images worth handing to an image recognizer at this location.
    async fn get_detectable_images(&self, geo: Option<&GeoCoordinates>) -> Vec<DetectableImage>;

    /// All results relevant to the currently perceived signals.
    ///
    /// Unmatched signals are skipped; every match is returned.
    async fn find_relevant_artifacts(
        &self,
        markers: &[Marker],
        geo: Option<&GeoCoordinates>,
        images: &[DetectedImage],
    ) -> Vec<NearbyResult>;
}

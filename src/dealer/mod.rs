//! Artifact dealer
//!
//! Turns a stream of independent perceptual observations into coherent
//! found/lost transitions across every registered `ArtifactStore`.
//!
//! Each observation mutates the active signal set, then re-queries all
//! stores for the entire set and diffs the outcome against what was
//! reported before. Recomputing from scratch makes no assumption about how
//! a store matches; the active set is bounded by what a camera can see, so
//! the cost stays small.
//!
//! The state lock is held from mutation through diff, so concurrent
//! observations are applied one at a time and never see a half-updated set.

mod state;

use crate::perception::{
    DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResult, NearbyResultDelta,
};
use crate::stores::ArtifactStore;
use futures::future::join_all;
use state::{ActiveSignals, FoundEntry, ResultKey};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A store together with the id it was registered under
#[derive(Clone)]
struct RegisteredStore {
    id: usize,
    store: Arc<dyn ArtifactStore>,
}

/// Tracks active signals and reports found/lost deltas
pub struct ArtifactDealer {
    stores: RwLock<Vec<RegisteredStore>>,
    state: Mutex<ActiveSignals>,
}

impl ArtifactDealer {
    /// Create a dealer with no stores
    pub fn new() -> Self {
        Self::with_stores(Vec::new())
    }

    /// Create a dealer with an initial set of stores
    pub fn with_stores(stores: Vec<Arc<dyn ArtifactStore>>) -> Self {
        let stores = stores
            .into_iter()
            .enumerate()
            .map(|(id, store)| RegisteredStore { id, store })
            .collect();
        Self {
            stores: RwLock::new(stores),
            state: Mutex::new(ActiveSignals::default()),
        }
    }

    /// Register a store for all subsequent observations.
    ///
    /// Signals that are already active are not re-evaluated against the new
    /// store until the next observation.
    pub async fn add_artifact_store(&self, store: Arc<dyn ArtifactStore>) {
        let mut stores = self.stores.write().await;
        let id = stores.len();
        stores.push(RegisteredStore { id, store });
        tracing::debug!(store_id = id, "Registered artifact store");
    }

    /// Number of registered stores
    pub async fn store_count(&self) -> usize {
        self.stores.read().await.len()
    }

    /// A marker came into view
    pub async fn marker_found(&self, marker: Marker) -> NearbyResultDelta {
        let mut state = self.state.lock().await;
        tracing::debug!(kind = %marker.kind, value = %marker.value, "Marker found");
        state.insert_marker(marker);
        self.recompute(&mut state).await
    }

    /// A marker left the view
    pub async fn marker_lost(&self, marker: &Marker) -> NearbyResultDelta {
        let mut state = self.state.lock().await;
        tracing::debug!(kind = %marker.kind, value = %marker.value, "Marker lost");
        state.remove_marker(marker);
        self.recompute(&mut state).await
    }

    /// An image came into view
    pub async fn image_found(&self, image: DetectedImage) -> NearbyResultDelta {
        let mut state = self.state.lock().await;
        tracing::debug!(id = %image.id, "Image found");
        state.insert_image(image);
        self.recompute(&mut state).await
    }

    /// An image left the view
    pub async fn image_lost(&self, image: &DetectedImage) -> NearbyResultDelta {
        let mut state = self.state.lock().await;
        tracing::debug!(id = %image.id, "Image lost");
        state.remove_image(image);
        self.recompute(&mut state).await
    }

    /// The observer moved
    pub async fn update_geolocation(&self, geo: GeoCoordinates) -> NearbyResultDelta {
        let mut state = self.state.lock().await;
        tracing::debug!(
            latitude = geo.latitude,
            longitude = geo.longitude,
            "Geolocation updated"
        );
        state.geo = Some(geo);
        self.recompute(&mut state).await
    }

    /// Detectable images across all stores for the current location.
    ///
    /// Ids are not deduplicated across stores.
    pub async fn get_detectable_images(&self) -> Vec<DetectableImage> {
        let geo = self.state.lock().await.geo;
        let stores = self.stores.read().await.clone();

        join_all(
            stores
                .iter()
                .map(|registered| registered.store.get_detectable_images(geo.as_ref())),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }

    /// Markers currently in view
    pub async fn active_markers(&self) -> Vec<Marker> {
        self.state.lock().await.markers.clone()
    }

    /// Images currently in view
    pub async fn active_images(&self) -> Vec<DetectedImage> {
        self.state.lock().await.images.clone()
    }

    /// Last reported location
    pub async fn geolocation(&self) -> Option<GeoCoordinates> {
        self.state.lock().await.geo
    }

    /// Results currently reported as found
    pub async fn found(&self) -> Vec<NearbyResult> {
        self.state
            .lock()
            .await
            .found
            .iter()
            .map(|entry| entry.result.clone())
            .collect()
    }

    async fn recompute(&self, state: &mut ActiveSignals) -> NearbyResultDelta {
        let stores = self.stores.read().await.clone();
        let geo = state.geo;

        let per_store = join_all(stores.iter().map(|registered| {
            let markers = &state.markers;
            let images = &state.images;
            async move {
                let results = registered
                    .store
                    .find_relevant_artifacts(markers, geo.as_ref(), images)
                    .await;
                (registered.id, results)
            }
        }))
        .await;

        let current = per_store
            .into_iter()
            .flat_map(|(id, results)| {
                results.into_iter().map(move |result| FoundEntry {
                    key: ResultKey::new(id, &result),
                    result,
                })
            })
            .collect();

        let delta = state.apply(current);
        tracing::debug!(
            found = delta.found.len(),
            lost = delta.lost.len(),
            active = state.found.len(),
            "Recomputed nearby results"
        );
        delta
    }
}

impl Default for ArtifactDealer {
    fn default() -> Self {
        Self::new()
    }
}

//! Active signal state and found/lost diffing

use crate::perception::{DetectedImage, GeoCoordinates, Marker, NearbyResult, NearbyResultDelta};
use std::collections::HashSet;
use std::sync::Arc;

/// Identity of a found result: the registering store plus the addresses of
/// the stored target and artifact.
///
/// Addresses stay unique while the result is held in `found`, because the
/// held `Arc`s keep both allocations alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ResultKey {
    store: usize,
    target: usize,
    artifact: usize,
}

impl ResultKey {
    pub(crate) fn new(store: usize, result: &NearbyResult) -> Self {
        Self {
            store,
            target: Arc::as_ptr(&result.target) as usize,
            artifact: Arc::as_ptr(&result.artifact) as usize,
        }
    }
}

/// A result tagged with the store that produced it
#[derive(Debug, Clone)]
pub(crate) struct FoundEntry {
    pub(crate) key: ResultKey,
    pub(crate) result: NearbyResult,
}

/// Signals currently perceived, plus what has been reported as found
#[derive(Debug, Default)]
pub(crate) struct ActiveSignals {
    /// Markers in view, at most one per value
    pub(crate) markers: Vec<Marker>,
    /// Images in view, at most one per id
    pub(crate) images: Vec<DetectedImage>,
    /// Last reported location
    pub(crate) geo: Option<GeoCoordinates>,
    /// Results reported as found and not yet lost
    pub(crate) found: Vec<FoundEntry>,
}

impl ActiveSignals {
    pub(crate) fn insert_marker(&mut self, marker: Marker) {
        match self.markers.iter_mut().find(|m| m.value == marker.value) {
            Some(existing) => *existing = marker,
            None => self.markers.push(marker),
        }
    }

    pub(crate) fn remove_marker(&mut self, marker: &Marker) {
        self.markers.retain(|m| m.value != marker.value);
    }

    pub(crate) fn insert_image(&mut self, image: DetectedImage) {
        if !self.images.iter().any(|i| i.id == image.id) {
            self.images.push(image);
        }
    }

    pub(crate) fn remove_image(&mut self, image: &DetectedImage) {
        self.images.retain(|i| i.id != image.id);
    }

    /// Replace the found set with `current`, returning what changed.
    ///
    /// Duplicate keys in `current` collapse to their first occurrence. Found
    /// and lost entries keep the order of `current` and of the previous found
    /// set respectively.
    pub(crate) fn apply(&mut self, current: Vec<FoundEntry>) -> NearbyResultDelta {
        let mut seen = HashSet::with_capacity(current.len());
        let current: Vec<FoundEntry> = current
            .into_iter()
            .filter(|entry| seen.insert(entry.key))
            .collect();

        let previous: HashSet<ResultKey> = self.found.iter().map(|e| e.key).collect();

        let found = current
            .iter()
            .filter(|entry| !previous.contains(&entry.key))
            .map(|entry| entry.result.clone())
            .collect();
        let lost = self
            .found
            .iter()
            .filter(|entry| !seen.contains(&entry.key))
            .map(|entry| entry.result.clone())
            .collect();

        self.found = current;
        NearbyResultDelta { found, lost }
    }
}

//! Perceptual signal and result types
//!
//! Signals come from recognizers outside this crate. Results pair a stored
//! target with the artifact that owns it and are compared by identity, not
//! by content.

use crate::schema::{ArArtifact, MediaObject, Target};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A recognized barcode-like signal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    /// Symbology, e.g. `qrcode`
    #[serde(rename = "type")]
    pub kind: String,
    /// Decoded text, the join key against barcode targets
    pub value: String,
}

impl Marker {
    /// Create a marker
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a QR code marker
    pub fn qrcode(value: impl Into<String>) -> Self {
        Self::new("qrcode", value)
    }
}

/// A recognized planar image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectedImage {
    /// Identifier of a previously registered `DetectableImage`
    pub id: String,
}

impl DetectedImage {
    /// Create a detected image
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A catalog entry an image recognizer should watch for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectableImage {
    /// Unique image identifier
    pub id: String,
    /// Encodings of the image, in preference order
    pub media: Vec<MediaObject>,
}

/// Observer location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Accuracy radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl GeoCoordinates {
    /// Create coordinates without an accuracy estimate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }
}

/// One matched (target, artifact) pair
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResult {
    /// Target as stored by the index that matched it
    pub target: Arc<Target>,
    /// Artifact owning the target
    pub artifact: Arc<ArArtifact>,
}

impl NearbyResult {
    /// Create a result
    pub fn new(target: Arc<Target>, artifact: Arc<ArArtifact>) -> Self {
        Self { target, artifact }
    }

    /// Whether both results refer to the same stored target and artifact.
    ///
    /// Two artifacts with identical content are still different entries.
    pub fn same_entry(&self, other: &NearbyResult) -> bool {
        Arc::ptr_eq(&self.target, &other.target) && Arc::ptr_eq(&self.artifact, &other.artifact)
    }
}

/// The found/lost outcome of a single observation
#[derive(Debug, Clone, Default, Serialize)]
pub struct NearbyResultDelta {
    /// Results that became relevant
    pub found: Vec<NearbyResult>,
    /// Results that are no longer relevant
    pub lost: Vec<NearbyResult>,
}

impl NearbyResultDelta {
    /// True when the observation changed nothing
    pub fn is_empty(&self) -> bool {
        self.found.is_empty() && self.lost.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Barcode;
    use serde_json::json;

    #[test]
    fn test_marker_wire_format() {
        let marker: Marker =
            serde_json::from_value(json!({ "type": "qrcode", "value": "https://example.com" }))
                .unwrap();
        assert_eq!(marker, Marker::qrcode("https://example.com"));
    }

    #[test]
    fn test_same_entry_is_identity_not_equality() {
        let target = Arc::new(Target::Barcode(Barcode::new("X")));
        let artifact = Arc::new(ArArtifact::new(Target::from(Barcode::new("X")), json!("c")));
        let twin = Arc::new(ArArtifact::clone(&artifact));

        let a = NearbyResult::new(target.clone(), artifact.clone());
        let b = NearbyResult::new(target.clone(), artifact);
        let c = NearbyResult::new(target, twin);

        assert!(a.same_entry(&b));
        assert!(!a.same_entry(&c));
    }

    #[test]
    fn test_empty_delta() {
        assert!(NearbyResultDelta::default().is_empty());
    }
}

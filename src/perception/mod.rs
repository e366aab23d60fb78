//! Perceptual signals consumed from recognizers and results produced for UI

pub mod types;

pub use types::{
    DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResult, NearbyResultDelta,
};

//! Perception Kit - match what a camera sees against AR artifacts
//!
//! Perception Kit takes the output of barcode and planar image recognizers,
//! plus the observer's location, and decides which content descriptors
//! ("artifacts") have become relevant or stopped being relevant.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   Marker / DetectedImage / GeoCoordinates
//! │ Recognizers │──────────────────────────────────────────┐
//! └─────────────┘                                          │
//!                                                          ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          MeaningMaker                            │
//! │  - indexes artifacts from the host document and from URLs        │
//! │  - fetch admission policy (same-origin, origin list, predicate)  │
//! │  - URL-valued markers load their page before matching            │
//! └───────────────┬──────────────────────────────────┬───────────────┘
//!                 │ ArArtifact                        │ observations
//!                 ▼                                   ▼
//! ┌───────────────────────────────┐   ┌──────────────────────────────┐
//! │      LocalArtifactStore       │◄──│        ArtifactDealer        │
//! │  ┌─────────────┐ ┌──────────┐ │   │  - active signal state       │
//! │  │ MarkerIndex │ │ImageIndex│ │   │  - full recompute + diff     │
//! │  └─────────────┘ └──────────┘ │   │  - any number of stores      │
//! └───────────────────────────────┘   └──────────────┬───────────────┘
//!                                                    │ NearbyResultDelta
//!                                                    ▼
//!                                               UI collaborator
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: JSON-LD artifact descriptor types
//! - [`perception`]: signals consumed and results produced
//! - [`stores`]: the `ArtifactStore` contract and the local indices
//! - [`dealer`]: found/lost reconciliation across stores
//! - [`loader`]: artifact loading from documents and URLs
//! - [`meaning`]: the `MeaningMaker` facade and fetch policy
//! - [`config`]: Configuration management

pub mod config;
pub mod dealer;
pub mod error;
pub mod loader;
pub mod meaning;
pub mod perception;
pub mod schema;
pub mod stores;

pub use config::PerceptionConfig;
pub use dealer::ArtifactDealer;
pub use error::{Error, Result};
pub use meaning::{FetchPolicy, MeaningMaker};
pub use perception::{
    DetectableImage, DetectedImage, GeoCoordinates, Marker, NearbyResult, NearbyResultDelta,
};
pub use schema::{ArArtifact, Target};
pub use stores::{ArtifactStore, LocalArtifactStore};

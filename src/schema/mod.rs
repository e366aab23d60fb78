//! Artifact descriptor schema
//!
//! JSON-LD shapes for `ARArtifact` and its targets.

pub mod types;

pub use types::{
    ArArtifact, ArImageTarget, Barcode, ImageSource, MediaObject, OneOrMany, Target,
    AR_ARTIFACT_TYPE, AR_IMAGE_TARGET_TYPE, BARCODE_TYPE, IMAGE_OBJECT_TYPE,
};

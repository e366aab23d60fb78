//! Planar image index
//!
//! Maps an image target's `name` to the target and artifact registered for
//! it, and projects the stored targets into the `DetectableImage` catalog an
//! image recognizer is configured with.

use crate::perception::{DetectableImage, DetectedImage, NearbyResult};
use crate::schema::{ArArtifact, ArImageTarget, ImageSource, MediaObject, Target};
use std::collections::HashMap;
use std::sync::Arc;

/// Index of image targets by name. Last write wins on duplicate names.
#[derive(Debug, Default)]
pub struct ImageIndex {
    images: HashMap<String, NearbyResult>,
}

impl ImageIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `target` for `artifact`. Returns false when the target has no name.
    pub fn add_image(&mut self, artifact: &Arc<ArArtifact>, target: &ArImageTarget) -> bool {
        let Some(name) = target.name.as_deref().filter(|n| !n.is_empty()) else {
            return false;
        };
        let stored = Arc::new(Target::ArImageTarget(target.clone()));
        self.images
            .insert(name.to_string(), NearbyResult::new(stored, artifact.clone()));
        true
    }

    /// Project every stored target into a `DetectableImage`.
    ///
    /// Media order: the inline `image` object (only if it is an
    /// `ImageObject`) or an `ImageObject` synthesized from a URL `image`,
    /// then `encoding` entries, then `associatedMedia` entries.
    pub fn detectable_images(&self) -> Vec<DetectableImage> {
        self.images
            .values()
            .filter_map(|result| match result.target.as_ref() {
                Target::ArImageTarget(target) => detectable_image(target),
                _ => None,
            })
            .collect()
    }

    /// Look up each detected image by id, in input order
    pub fn find_relevant_artifacts(&self, detected: &[DetectedImage]) -> Vec<NearbyResult> {
        detected
            .iter()
            .filter_map(|image| self.images.get(&image.id).cloned())
            .collect()
    }

    /// Number of indexed images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn detectable_image(target: &ArImageTarget) -> Option<DetectableImage> {
    let id = target.name.clone()?;
    let mut media = Vec::new();

    match &target.image {
        Some(ImageSource::Object(object)) if object.is_image_object() => media.push(object.clone()),
        Some(ImageSource::Object(_)) | None => {}
        Some(ImageSource::Url(url)) => media.push(MediaObject::image(url.clone())),
    }

    // `encoding` and `associatedMedia` are synonyms
    for extra in [&target.encoding, &target.associated_media].into_iter().flatten() {
        media.extend(extra.as_slice().iter().cloned());
    }

    Some(DetectableImage { id, media })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OneOrMany;
    use serde_json::json;

    fn artifact() -> Arc<ArArtifact> {
        Arc::new(ArArtifact::default())
    }

    fn catalog_entry(index: &ImageIndex, id: &str) -> DetectableImage {
        index
            .detectable_images()
            .into_iter()
            .find(|image| image.id == id)
            .unwrap()
    }

    #[test]
    fn test_rejects_missing_name() {
        let mut index = ImageIndex::new();
        assert!(!index.add_image(&artifact(), &ArImageTarget::default()));
        assert!(!index.add_image(
            &artifact(),
            &ArImageTarget {
                name: Some(String::new()),
                ..Default::default()
            }
        ));
        assert!(index.is_empty());
        assert!(index.detectable_images().is_empty());
    }

    #[test]
    fn test_url_image_synthesizes_one_media_entry() {
        let mut index = ImageIndex::new();
        index.add_image(&artifact(), &ArImageTarget::new("poster", "https://example.com/p.jpg"));

        let entry = catalog_entry(&index, "poster");
        assert_eq!(entry.media, vec![MediaObject::image("https://example.com/p.jpg")]);
    }

    #[test]
    fn test_inline_image_object_is_used_as_is() {
        let inline: MediaObject = serde_json::from_value(json!({
            "@type": "ImageObject",
            "encodingUrl": "https://example.com/p.jpg",
            "encodingFormat": "image/jpeg"
        }))
        .unwrap();
        let mut index = ImageIndex::new();
        index.add_image(
            &artifact(),
            &ArImageTarget {
                name: Some("poster".into()),
                image: Some(ImageSource::Object(inline.clone())),
                ..Default::default()
            },
        );

        assert_eq!(catalog_entry(&index, "poster").media, vec![inline]);
    }

    #[test]
    fn test_inline_object_of_other_type_is_ignored() {
        let mut index = ImageIndex::new();
        index.add_image(
            &artifact(),
            &ArImageTarget {
                name: Some("clip".into()),
                image: Some(ImageSource::Object(MediaObject {
                    kind: Some("VideoObject".into()),
                    ..Default::default()
                })),
                ..Default::default()
            },
        );

        assert!(catalog_entry(&index, "clip").media.is_empty());
    }

    #[test]
    fn test_associated_media_and_encoding_are_appended() {
        let mut target = ArImageTarget::new("poster", "p.jpg");
        target.associated_media = Some(OneOrMany::Many(vec![
            MediaObject::image("p.idx"),
            MediaObject::image("p.png"),
        ]));
        target.encoding = Some(OneOrMany::One(MediaObject::image("p.webp")));

        let mut index = ImageIndex::new();
        index.add_image(&artifact(), &target);

        let urls: Vec<_> = catalog_entry(&index, "poster")
            .media
            .into_iter()
            .map(|m| m.encoding_url.unwrap())
            .collect();
        assert_eq!(urls, vec!["p.jpg", "p.webp", "p.idx", "p.png"]);
    }

    #[test]
    fn test_target_without_image_has_empty_media() {
        let mut index = ImageIndex::new();
        index.add_image(
            &artifact(),
            &ArImageTarget {
                name: Some("bare".into()),
                ..Default::default()
            },
        );

        let entry = catalog_entry(&index, "bare");
        assert!(entry.media.is_empty());
    }

    #[test]
    fn test_find_skips_unknown_ids() {
        let mut index = ImageIndex::new();
        index.add_image(&artifact(), &ArImageTarget::new("ID1", "a.jpg"));
        index.add_image(&artifact(), &ArImageTarget::new("ID2", "b.jpg"));

        let results = index.find_relevant_artifacts(&[
            DetectedImage::new("ID2"),
            DetectedImage::new("nope"),
            DetectedImage::new("ID1"),
        ]);
        assert_eq!(results.len(), 2);
        let names: Vec<_> = results
            .iter()
            .map(|r| match r.target.as_ref() {
                Target::ArImageTarget(t) => t.name.clone().unwrap(),
                other => panic!("unexpected target {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["ID2", "ID1"]);
    }
}

//! Barcode text index

use crate::perception::{Marker, NearbyResult};
use crate::schema::{ArArtifact, Barcode, Target};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps barcode text to the target and artifact registered for it.
///
/// Registering the same text twice replaces the earlier entry.
#[derive(Debug, Default)]
pub struct MarkerIndex {
    markers: HashMap<String, NearbyResult>,
}

impl MarkerIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `barcode` for `artifact`. Returns false when the barcode has no text.
    pub fn add_marker(&mut self, artifact: &Arc<ArArtifact>, barcode: &Barcode) -> bool {
        let Some(text) = barcode.text.as_deref().filter(|t| !t.is_empty()) else {
            return false;
        };
        let target = Arc::new(Target::Barcode(barcode.clone()));
        self.markers
            .insert(text.to_string(), NearbyResult::new(target, artifact.clone()));
        true
    }

    /// Look up each marker by value, in input order
    pub fn find_relevant_artifacts(&self, markers: &[Marker]) -> Vec<NearbyResult> {
        markers
            .iter()
            .filter_map(|marker| self.markers.get(&marker.value).cloned())
            .collect()
    }

    /// Number of indexed barcodes
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(content: &str) -> Arc<ArArtifact> {
        Arc::new(ArArtifact {
            ar_content: json!(content),
            ..Default::default()
        })
    }

    #[test]
    fn test_rejects_missing_or_empty_text() {
        let mut index = MarkerIndex::new();
        assert!(!index.add_marker(&artifact("a"), &Barcode { text: None }));
        assert!(!index.add_marker(&artifact("a"), &Barcode::new("")));
        assert!(index.is_empty());
    }

    #[test]
    fn test_find_in_input_order_skipping_unmatched() {
        let mut index = MarkerIndex::new();
        assert!(index.add_marker(&artifact("first"), &Barcode::new("one")));
        assert!(index.add_marker(&artifact("second"), &Barcode::new("two")));

        let results = index.find_relevant_artifacts(&[
            Marker::qrcode("two"),
            Marker::qrcode("missing"),
            Marker::qrcode("one"),
        ]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].artifact.ar_content, json!("second"));
        assert_eq!(results[1].artifact.ar_content, json!("first"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut index = MarkerIndex::new();
        index.add_marker(&artifact("old"), &Barcode::new("same"));
        index.add_marker(&artifact("new"), &Barcode::new("same"));
        assert_eq!(index.len(), 1);

        let results = index.find_relevant_artifacts(&[Marker::qrcode("same")]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].artifact.ar_content, json!("new"));
    }

    #[test]
    fn test_lookup_returns_same_entry_each_time() {
        let mut index = MarkerIndex::new();
        index.add_marker(&artifact("a"), &Barcode::new("x"));

        let first = index.find_relevant_artifacts(&[Marker::qrcode("x")]);
        let second = index.find_relevant_artifacts(&[Marker::new("ean13", "x")]);
        assert!(first[0].same_entry(&second[0]));
    }
}

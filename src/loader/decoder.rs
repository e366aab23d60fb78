//! JSON-LD artifact decoding
//!
//! Artifacts arrive either as a JSON document or embedded in an HTML page
//! inside `<script type="application/ld+json">` blocks. Within a JSON value,
//! `ARArtifact` objects are collected from arrays and `@graph` containers;
//! everything else is ignored.

use crate::error::Result;
use crate::schema::{ArArtifact, AR_ARTIFACT_TYPE};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

fn ld_json_script() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"(?is)<script\b[^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script\s*>"#,
            )
            .ok()
        })
        .as_ref()
}

/// Decode artifacts from a JSON document.
///
/// Fails only when `text` is not JSON at all.
pub fn decode_json(text: &str, base: &Url) -> Result<Vec<ArArtifact>> {
    let value: Value = serde_json::from_str(text)?;
    let mut artifacts = Vec::new();
    collect_artifacts(value, base, &mut artifacts);
    Ok(artifacts)
}

/// Decode artifacts from the JSON-LD script blocks of an HTML document.
///
/// Blocks that are not valid JSON are skipped with a warning.
pub fn decode_document(html: &str, base: &Url) -> Vec<ArArtifact> {
    let mut artifacts = Vec::new();
    let Some(pattern) = ld_json_script() else {
        return artifacts;
    };
    for captures in pattern.captures_iter(html) {
        let Some(body) = captures.get(1) else {
            continue;
        };
        match serde_json::from_str::<Value>(body.as_str().trim()) {
            Ok(value) => collect_artifacts(value, base, &mut artifacts),
            Err(e) => {
                tracing::warn!(document = %base, "Skipping malformed ld+json block: {}", e);
            }
        }
    }
    artifacts
}

fn collect_artifacts(value: Value, base: &Url, out: &mut Vec<ArArtifact>) {
    match value {
        Value::Array(values) => {
            for value in values {
                collect_artifacts(value, base, out);
            }
        }
        Value::Object(mut object) => {
            if object.get("@type").and_then(Value::as_str) == Some(AR_ARTIFACT_TYPE) {
                match serde_json::from_value::<ArArtifact>(Value::Object(object)) {
                    Ok(mut artifact) => {
                        artifact.resolve_urls(base);
                        out.push(artifact);
                    }
                    Err(e) => tracing::debug!("Ignoring undecodable artifact: {}", e),
                }
            } else if let Some(graph) = object.remove("@graph") {
                collect_artifacts(graph, base, out);
            }
        }
        _ => {}
    }
}

//! Artifact descriptor data types
//!
//! Descriptors are JSON-LD flavored objects discriminated by `@type`. Only
//! `ARArtifact` objects are indexed; their `arTarget` holds one or many
//! targets, each either a `Barcode` or an `ARImageTarget`. Targets of any
//! other shape are kept as [`Target::Unsupported`] so that newer descriptor
//! formats still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

/// `@type` of an artifact descriptor
pub const AR_ARTIFACT_TYPE: &str = "ARArtifact";
/// `@type` of a barcode target
pub const BARCODE_TYPE: &str = "Barcode";
/// `@type` of a planar image target
pub const AR_IMAGE_TARGET_TYPE: &str = "ARImageTarget";
/// `@type` of an image media encoding
pub const IMAGE_OBJECT_TYPE: &str = "ImageObject";

/// A JSON-LD property that may hold a single value or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A list of values. Tried first so arrays never collapse into `One`.
    Many(Vec<T>),
    /// A single value
    One(T),
}

impl<T> OneOrMany<T> {
    /// View the property as a slice, regardless of its shape
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    /// Mutable view of the property as a slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            OneOrMany::One(value) => std::slice::from_mut(value),
            OneOrMany::Many(values) => values,
        }
    }

    /// Number of values held
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True when the property holds an empty list
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// A media encoding of an image (schema.org `MediaObject`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    /// Media type tag, usually `ImageObject`
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// URL of the encoded media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_url: Option<String>,
    /// Alternate URL of the media content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    /// Encoding format, e.g. `image/jpeg` or a recognizer index format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,
    /// Any other properties, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaObject {
    /// An `ImageObject` encoding pointing at `url`
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: Some(IMAGE_OBJECT_TYPE.to_string()),
            encoding_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Whether this media is tagged as an `ImageObject`
    pub fn is_image_object(&self) -> bool {
        self.kind.as_deref() == Some(IMAGE_OBJECT_TYPE)
    }

    /// Resolve relative URLs against `base`
    pub fn resolve_urls(&mut self, base: &Url) {
        for url in [&mut self.encoding_url, &mut self.content_url]
            .into_iter()
            .flatten()
        {
            resolve_in_place(url, base);
        }
    }
}

/// The `image` property of an image target: a URL or an inline media object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// URL of the image
    Url(String),
    /// Inline media object
    Object(MediaObject),
}

/// A barcode target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    /// Decoded barcode text; required for indexing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Barcode {
    /// Create a barcode target for `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// A planar image target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArImageTarget {
    /// Image identifier; required for indexing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Primary image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    /// Additional encodings of the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<OneOrMany<MediaObject>>,
    /// Synonym of `encoding`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_media: Option<OneOrMany<MediaObject>>,
}

impl ArImageTarget {
    /// Create an image target named `name` with a URL image
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            image: Some(ImageSource::Url(image_url.into())),
            ..Default::default()
        }
    }

    fn resolve_urls(&mut self, base: &Url) {
        match &mut self.image {
            Some(ImageSource::Url(url)) => resolve_in_place(url, base),
            Some(ImageSource::Object(media)) => media.resolve_urls(base),
            None => {}
        }
        for media in [&mut self.encoding, &mut self.associated_media]
            .into_iter()
            .flatten()
        {
            for entry in media.as_mut_slice() {
                entry.resolve_urls(base);
            }
        }
    }
}

/// A perceptual trigger inside an artifact
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// `{"@type": "Barcode", ...}`
    Barcode(Barcode),
    /// `{"@type": "ARImageTarget", ...}`
    ArImageTarget(ArImageTarget),
    /// Anything else, kept verbatim
    Unsupported(Value),
}

impl Target {
    /// Classify a raw JSON value by its `@type`.
    ///
    /// A known `@type` whose body does not fit the target shape is kept as
    /// `Unsupported` rather than failing the surrounding artifact.
    pub fn from_value(value: Value) -> Self {
        let parsed = match value.get("@type").and_then(Value::as_str) {
            Some(BARCODE_TYPE) => Barcode::deserialize(&value).ok().map(Target::Barcode),
            Some(AR_IMAGE_TARGET_TYPE) => ArImageTarget::deserialize(&value)
                .ok()
                .map(Target::ArImageTarget),
            _ => None,
        };
        parsed.unwrap_or(Target::Unsupported(value))
    }
}

impl From<Barcode> for Target {
    fn from(barcode: Barcode) -> Self {
        Target::Barcode(barcode)
    }
}

impl From<ArImageTarget> for Target {
    fn from(target: ArImageTarget) -> Self {
        Target::ArImageTarget(target)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Target::from_value)
    }
}

impl Serialize for Target {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(tag = "@type")]
        enum Tagged<'a> {
            Barcode(&'a Barcode),
            #[serde(rename = "ARImageTarget")]
            ArImageTarget(&'a ArImageTarget),
        }

        match self {
            Target::Barcode(barcode) => Tagged::Barcode(barcode).serialize(serializer),
            Target::ArImageTarget(target) => Tagged::ArImageTarget(target).serialize(serializer),
            Target::Unsupported(value) => value.serialize(serializer),
        }
    }
}

/// A content descriptor reachable through one or more targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArArtifact {
    /// Descriptor type tag, `ARArtifact` when present
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// One or many targets that make this artifact relevant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar_target: Option<OneOrMany<Target>>,
    /// Opaque content payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub ar_content: Value,
}

impl ArArtifact {
    /// Create an artifact with the given targets and content
    pub fn new(targets: impl Into<OneOrMany<Target>>, content: Value) -> Self {
        Self {
            kind: Some(AR_ARTIFACT_TYPE.to_string()),
            ar_target: Some(targets.into()),
            ar_content: content,
        }
    }

    /// All targets of this artifact, normalized to a slice
    pub fn targets(&self) -> &[Target] {
        self.ar_target.as_ref().map(OneOrMany::as_slice).unwrap_or(&[])
    }

    /// Resolve relative image and media URLs of every target against `base`
    pub fn resolve_urls(&mut self, base: &Url) {
        let Some(targets) = self.ar_target.as_mut() else {
            return;
        };
        for target in targets.as_mut_slice() {
            if let Target::ArImageTarget(image_target) = target {
                image_target.resolve_urls(base);
            }
        }
    }
}

fn resolve_in_place(url: &mut String, base: &Url) {
    if let Ok(resolved) = base.join(url) {
        *url = resolved.to_string();
    }
}

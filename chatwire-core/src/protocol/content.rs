//! Message content: plain text or an ordered list of typed parts

use base64::Engine as _;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Content of a message - a bare string or a non-empty array of parts
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Structured content parts (vision input)
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(s) => s.is_empty(),
            MessageContent::Parts(parts) => parts.is_empty(),
        }
    }

    /// Get text representation
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s.as_str()),
            MessageContent::Parts(_) => None,
        }
    }

    /// Get the parts, if this is structured content
    pub fn as_parts(&self) -> Option<&[ContentPart]> {
        match self {
            MessageContent::Text(_) => None,
            MessageContent::Parts(parts) => Some(parts),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

impl Serialize for MessageContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MessageContent::Text(text) => serializer.serialize_str(text),
            MessageContent::Parts(parts) => parts.serialize(serializer),
        }
    }
}

struct MessageContentVisitor;

impl<'de> Visitor<'de> for MessageContentVisitor {
    type Value = MessageContent;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a non-empty array of content parts")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(MessageContent::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(MessageContent::Text(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut parts = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(part) = seq.next_element::<ContentPart>()? {
            parts.push(part);
        }
        if parts.is_empty() {
            return Err(de::Error::invalid_length(0, &self));
        }
        Ok(MessageContent::Parts(parts))
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MessageContentVisitor)
    }
}

/// Individual content part for multimodal messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content part
    Text { text: String },
    /// Image reference, either a remote URL or an inline data URL
    ImageUrl { image_url: ImageUrl },
}

/// Image reference carried by an `image_url` part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Remote URL or `data:` URL
    pub url: String,

    /// Resolution hint; absent on the wire means `high`
    #[serde(default)]
    pub detail: ImageDetail,
}

/// Resolution the model should use when looking at an image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    #[default]
    High,
}

/// Where image data comes from when building an image part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw JPEG bytes, inlined as a base64 data URL
    Bytes(Vec<u8>),
    /// URL passed through untouched
    Url(String),
}

impl ImageSource {
    /// Resolve into the URL string sent on the wire
    pub fn into_url(self) -> String {
        match self {
            ImageSource::Bytes(bytes) => format!(
                "data:image/jpeg;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
            ImageSource::Url(url) => url,
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<String> for ImageSource {
    fn from(url: String) -> Self {
        ImageSource::Url(url)
    }
}

impl From<&str> for ImageSource {
    fn from(url: &str) -> Self {
        ImageSource::Url(url.to_string())
    }
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image part from raw bytes or a URL.
    ///
    /// Bytes are encoded as `data:image/jpeg;base64,...`. `detail` defaults to
    /// [`ImageDetail::High`].
    pub fn image(source: impl Into<ImageSource>, detail: Option<ImageDetail>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: source.into().into_url(),
                detail: detail.unwrap_or_default(),
            },
        }
    }

    /// Create an image part from a URL with the default detail
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::image(ImageSource::Url(url.into()), None)
    }

    /// Text of a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::ImageUrl { .. } => None,
        }
    }

    /// Image reference of an image part
    pub fn as_image(&self) -> Option<&ImageUrl> {
        match self {
            ContentPart::Text { .. } => None,
            ContentPart::ImageUrl { image_url } => Some(image_url),
        }
    }
}

//! Content blocks carried inside a message

use std::fmt;
use std::str::FromStr;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use log::trace;

// ===== Source =====

/// Encoding of an image source. The API only knows base64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind
{   #[default]
    Base64
}

/// Image MIME types the API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType
{   #[serde(rename = "image/jpeg")]
    Jpeg
  , #[serde(rename = "image/png")]
    Png
  , #[serde(rename = "image/gif")]
    Gif
  , #[serde(rename = "image/webp")]
    Webp
}

impl MediaType
{   /// MIME string as sent on the wire
    pub fn as_str(&self) -> &'static str
    {   match self
        {   MediaType::Jpeg => "image/jpeg"
          , MediaType::Png => "image/png"
          , MediaType::Gif => "image/gif"
          , MediaType::Webp => "image/webp"
        }
    }
}

impl fmt::Display for MediaType
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl FromStr for MediaType
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s
        {   "image/jpeg" => Ok(MediaType::Jpeg)
          , "image/png" => Ok(MediaType::Png)
          , "image/gif" => Ok(MediaType::Gif)
          , "image/webp" => Ok(MediaType::Webp)
          , other => Err(crate::error::Error::TypeMismatch(
              format!("unsupported media type: {}", other)
            ))
        }
    }
}

/// Inline image payload. `data` holds the raw bytes; the wire form is
/// standard base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source
{   /// Encoding tag, "base64" when absent
    #[serde(rename = "type", default)]
    kind: SourceKind
  , /// Image MIME type
    media_type: MediaType
  , /// Raw image bytes
    #[serde(with = "base64_bytes")]
    data: Vec<u8>
}

impl Source
{   pub fn base64(
      media_type: MediaType
    , data: impl Into<Vec<u8>>
    ) -> Self
    {   Source
        {   kind: SourceKind::Base64
          , media_type
          , data: data.into()
        }
    }

    pub fn kind(&self) -> SourceKind
    {   self.kind
    }

    pub fn media_type(&self) -> MediaType
    {   self.media_type
    }

    pub fn data(&self) -> &[u8]
    {   &self.data
    }
}

mod base64_bytes
{   use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &[u8], serializer: S)
      -> Result<S::Ok, S::Error>
    where
      S: Serializer
    {   serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D>(deserializer: D)
      -> Result<Vec<u8>, D::Error>
    where
      D: Deserializer<'de>
    {   let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes())
          .map_err(|e| DeError::custom(
            format!("base64 decode error: {}", e)
          ))
    }
}

// ===== Content =====

/// One block of message payload, selected by the wire `type` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content
{   Text
    {   /// Block text
        text: String
    }
  , Image
    {   /// Inline image payload
        source: Source
    }
}

impl Content
{   /// Text block
    pub fn text(text: impl Into<String>) -> Self
    {   Content::Text { text: text.into() }
    }

    /// Base64 image block
    pub fn image(
      media_type: MediaType
    , data: impl Into<Vec<u8>>
    ) -> Self
    {   Content::Image { source: Source::base64(media_type, data) }
    }

    /// Wire tag of this block
    pub fn kind(&self) -> &'static str
    {   match self
        {   Content::Text { .. } => "text"
          , Content::Image { .. } => "image"
        }
    }

    pub fn as_text(&self) -> Option<&str>
    {   match self
        {   Content::Text { text } => Some(text.as_str())
          , Content::Image { .. } => None
        }
    }

    pub fn source(&self) -> Option<&Source>
    {   match self
        {   Content::Image { source } => Some(source)
          , Content::Text { .. } => None
        }
    }
}

impl From<&str> for Content
{   fn from(text: &str) -> Self
    {   Content::text(text)
    }
}

impl From<String> for Content
{   fn from(text: String) -> Self
    {   Content::text(text)
    }
}

impl From<Source> for Content
{   fn from(source: Source) -> Self
    {   Content::Image { source }
    }
}

// ===== Contents =====

/// Ordered blocks of one message. Always encoded as an array; a bare
/// string is accepted when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Contents(Vec<Content>);

impl Contents
{   pub fn new(blocks: Vec<Content>) -> Self
    {   Contents(blocks)
    }

    pub fn as_slice(&self) -> &[Content]
    {   &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Content>
    {   self.0.iter()
    }

    pub fn len(&self) -> usize
    {   self.0.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.0.is_empty()
    }

    /// Text of all text blocks joined in order
    pub fn text(&self) -> String
    {   self.0.iter()
          .filter_map(Content::as_text)
          .collect::<Vec<_>>()
          .join("")
    }

    pub fn into_vec(self) -> Vec<Content>
    {   self.0
    }
}

impl From<&str> for Contents
{   fn from(text: &str) -> Self
    {   Contents(vec![Content::from(text)])
    }
}

impl From<String> for Contents
{   fn from(text: String) -> Self
    {   Contents(vec![Content::from(text)])
    }
}

impl From<Content> for Contents
{   fn from(block: Content) -> Self
    {   Contents(vec![block])
    }
}

impl From<Vec<Content>> for Contents
{   fn from(blocks: Vec<Content>) -> Self
    {   Contents(blocks)
    }
}

impl FromIterator<Content> for Contents
{   fn from_iter<I: IntoIterator<Item = Content>>(iter: I) -> Self
    {   Contents(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Contents
{   type Item = &'a Content;
    type IntoIter = std::slice::Iter<'a, Content>;

    fn into_iter(self) -> Self::IntoIter
    {   self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Contents
{   fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
      D: Deserializer<'de>
    {   match Value::deserialize(deserializer)?
        {   Value::String(text) => {
              trace!("Coercing bare string content to text block");
              Ok(Contents::from(text))
            }
          , blocks @ Value::Array(_) => {
              // decode blocks directly so missing-field errors keep their key
              Vec::<Content>::deserialize(blocks)
                .map(Contents)
                .map_err(DeError::custom)
            }
          , other => Err(DeError::custom(format!(
              "invalid type: {}, expected a string or an array of content blocks"
            , other
            )))
        }
    }
}

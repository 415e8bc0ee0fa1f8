//! Inbound bodies returned by the Messages endpoint

use serde::{Deserialize, Serialize};
use log::{debug, error};
use crate::content::Content;
use crate::error::Error;
use crate::message::Role;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason
{   EndTurn
  , MaxTokens
  , StopSequence
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   /// Tokens read from the request
    pub input_tokens: u32
  , /// Tokens generated
    pub output_tokens: u32
}

/// Object kind tag on a successful body, always "message"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind
{   #[default]
    Message
}

/// Successful Messages API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse
{   /// Unique message id
    pub id: String
  , /// Object kind, always "message"
    #[serde(rename = "type", default)]
    pub kind: ResponseKind
  , /// Always assistant
    pub role: Role
  , /// Generated blocks
    pub content: Vec<Content>
  , /// Model that handled the request
    pub model: String
  , /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<StopReason>
  , /// Matched stop sequence, if any
    #[serde(default)]
    pub stop_sequence: Option<String>
  , /// Token accounting
    #[serde(default)]
    pub usage: Usage
}

impl MessageResponse
{   pub fn from_json(body: &str) -> Result<Self, Error>
    {   debug!("Decoding response ({} bytes)", body.len());
        serde_json::from_str(body).map_err(|e| {
          error!("Response decode error: {}", e);
          Error::from(e)
        })
    }

    pub fn to_json(&self) -> Result<String, Error>
    {   serde_json::to_string(self)
          .map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Text blocks joined in order; image blocks are skipped
    pub fn text(&self) -> String
    {   self.content.iter()
          .filter_map(Content::as_text)
          .collect::<Vec<_>>()
          .join("")
    }
}

/// Error detail inside an [`ErrorResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError
{   /// e.g. "invalid_request_error", "overloaded_error"
    #[serde(rename = "type")]
    pub kind: String
  , /// Human-readable detail
    pub message: String
}

/// Error envelope: `{"type":"error","error":{...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse
{   /// Always "error"
    #[serde(rename = "type")]
    pub kind: String
  , /// Error detail
    pub error: ApiError
}

impl ErrorResponse
{   pub fn from_json(body: &str) -> Result<Self, Error>
    {   serde_json::from_str(body).map_err(|e| {
          error!("Error body decode error: {}", e);
          Error::from(e)
        })
    }
}

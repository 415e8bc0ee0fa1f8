//! Outbound request for the Messages endpoint

use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{debug, error, trace};
use crate::config::Config;
use crate::error::Error;
use crate::message::{Message, Metadata};

/// Keys that must be present and non-null in a request document
const REQUIRED_KEYS: [&str; 3] = ["model", "max_tokens", "messages"];

/// Messages API request body.
/// Built through [`MessageRequestBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest
{   /// Model that will complete the prompt
    model: String
  , /// Upper bound on generated tokens
    max_tokens: u32
  , /// Conversation turns, oldest first
    messages: Vec<Message>
  , /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system: Option<String>
  , /// Opaque end-user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>
  , /// Custom strings that stop generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>
  , /// Stream the reply as server-sent events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream: Option<bool>
  , /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>
  , /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>
  , /// Only sample from the top K tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>
}

impl MessageRequest
{   /// Request with only the required fields
    pub fn new(
      model: impl Into<String>
    , max_tokens: u32
    , messages: Vec<Message>
    ) -> Self
    {   MessageRequest
        {   model: model.into()
          , max_tokens
          , messages
          , system: None
          , metadata: None
          , stop_sequences: None
          , stream: None
          , temperature: None
          , top_p: None
          , top_k: None
        }
    }

    pub fn builder() -> MessageRequestBuilder
    {   MessageRequestBuilder::default()
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    pub fn max_tokens(&self) -> u32
    {   self.max_tokens
    }

    pub fn messages(&self) -> &[Message]
    {   &self.messages
    }

    pub fn system(&self) -> Option<&str>
    {   self.system.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata>
    {   self.metadata.as_ref()
    }

    pub fn stop_sequences(&self) -> Option<&[String]>
    {   self.stop_sequences.as_deref()
    }

    pub fn stream(&self) -> Option<bool>
    {   self.stream
    }

    pub fn temperature(&self) -> Option<f64>
    {   self.temperature
    }

    pub fn top_p(&self) -> Option<f64>
    {   self.top_p
    }

    pub fn top_k(&self) -> Option<u32>
    {   self.top_k
    }

    // ===== Encoding =====

    /// Compact JSON body
    pub fn to_json(&self) -> Result<String, Error>
    {   let body = serde_json::to_string(self)
          .map_err(|e| Error::Serialize(e.to_string()))?;
        trace!("Encoded request: {}", body);
        Ok(body)
    }

    /// Indented JSON, for logs
    pub fn to_json_pretty(&self) -> Result<String, Error>
    {   serde_json::to_string_pretty(self)
          .map_err(|e| Error::Serialize(e.to_string()))
    }

    pub fn to_json_value(&self) -> Result<Value, Error>
    {   serde_json::to_value(self)
          .map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Diagnostic text honouring `pretty_diagnostics`
    pub fn diagnostic_string(&self, config: &Config)
      -> Result<String, Error>
    {   if config.pretty_diagnostics
        {   self.to_json_pretty()
        } else
        {   self.to_json()
        }
    }

    // ===== Decoding =====

    pub fn from_json(body: &str) -> Result<Self, Error>
    {   debug!("Decoding request ({} bytes)", body.len());
        let value: Value = serde_json::from_str(body).map_err(|e| {
          error!("Request is not JSON: {}", e);
          Error::Parse(e.to_string())
        })?;
        MessageRequest::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, Error>
    {   let object = value.as_object().ok_or_else(|| {
          error!("Request document is not an object");
          Error::TypeMismatch(
            "request must be a JSON object".to_string()
          )
        })?;

        for key in REQUIRED_KEYS
        {   if object.get(key).map_or(true, Value::is_null)
            {   error!("Request is missing {}", key);
                return Err(Error::MissingRequiredField(key.to_string()));
            }
        }

        serde_json::from_value(value).map_err(|e| {
          error!("Request decode error: {}", e);
          Error::from(e)
        })
    }
}

/// Same text as [`MessageRequest::to_json`]
impl fmt::Display for MessageRequest
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let body = serde_json::to_string(self)
          .map_err(|_| fmt::Error)?;
        f.write_str(&body)
    }
}

// ===== Builder =====

/// Collects fields for a [`MessageRequest`].
/// `build` fails if `model`, `max_tokens` or `messages` was never set.
#[derive(Debug, Clone, Default)]
pub struct MessageRequestBuilder
{   model: Option<String>
  , max_tokens: Option<u32>
  , messages: Option<Vec<Message>>
  , system: Option<String>
  , metadata: Option<Metadata>
  , stop_sequences: Option<Vec<String>>
  , stream: Option<bool>
  , temperature: Option<f64>
  , top_p: Option<f64>
  , top_k: Option<u32>
}

impl MessageRequestBuilder
{   /// Builder pre-filled from configured defaults
    pub fn from_config(config: &Config) -> Self
    {   debug!("Creating request builder from config");
        let defaults = &config.defaults;
        MessageRequestBuilder
        {   model: defaults.model.clone()
          , max_tokens: defaults.max_tokens
          , system: defaults.system.clone()
          , metadata: defaults.user_id.clone().map(Metadata::new)
          , ..MessageRequestBuilder::default()
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self
    {   self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self
    {   self.max_tokens = Some(max_tokens);
        self
    }

    /// Replace the whole message list
    pub fn messages<I>(mut self, messages: I) -> Self
    where
      I: IntoIterator<Item = Message>
    {   self.messages = Some(messages.into_iter().collect());
        self
    }

    /// Append one turn
    pub fn message(mut self, message: Message) -> Self
    {   self.messages.get_or_insert_with(Vec::new).push(message);
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self
    {   self.system = Some(system.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self
    {   self.metadata = Some(metadata);
        self
    }

    pub fn user_id(self, user_id: impl Into<String>) -> Self
    {   self.metadata(Metadata::new(user_id))
    }

    pub fn stop_sequences<I, S>(mut self, sequences: I) -> Self
    where
      I: IntoIterator<Item = S>
    , S: Into<String>
    {   self.stop_sequences = Some(
          sequences.into_iter().map(Into::into).collect()
        );
        self
    }

    pub fn stop_sequence(mut self, sequence: impl Into<String>) -> Self
    {   self.stop_sequences
          .get_or_insert_with(Vec::new)
          .push(sequence.into());
        self
    }

    pub fn stream(mut self, stream: bool) -> Self
    {   self.stream = Some(stream);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self
    {   self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self
    {   self.top_p = Some(top_p);
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self
    {   self.top_k = Some(top_k);
        self
    }

    /// Sampling ranges and message count are left to the server
    pub fn build(self) -> Result<MessageRequest, Error>
    {   let model = self.model.ok_or_else(|| {
          error!("Request built without model");
          Error::MissingRequiredField("model".to_string())
        })?;
        let max_tokens = self.max_tokens.ok_or_else(|| {
          error!("Request built without max_tokens");
          Error::MissingRequiredField("max_tokens".to_string())
        })?;
        let messages = self.messages.ok_or_else(|| {
          error!("Request built without messages");
          Error::MissingRequiredField("messages".to_string())
        })?;

        // JSON has no NaN or infinity
        require_finite("temperature", self.temperature)?;
        require_finite("top_p", self.top_p)?;

        debug!(
          "Built request for {} with {} messages",
          model, messages.len()
        );

        Ok(MessageRequest
        {   model
          , max_tokens
          , messages
          , system: self.system
          , metadata: self.metadata
          , stop_sequences: self.stop_sequences
          , stream: self.stream
          , temperature: self.temperature
          , top_p: self.top_p
          , top_k: self.top_k
        })
    }
}

fn require_finite(field: &str, value: Option<f64>)
  -> Result<(), Error>
{   match value
    {   Some(v) if !v.is_finite() => {
          error!("Request built with non-finite {}: {}", field, v);
          Err(Error::TypeMismatch(
            format!("{} must be a finite number, got {}", field, v)
          ))
        }
      , _ => Ok(())
    }
}
